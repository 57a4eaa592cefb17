use std::collections::HashMap;
use std::fmt;

use nom_supreme::final_parser::Location;

#[derive(Debug, Clone, PartialEq)]
pub enum JsonValue {
    Object(HashMap<String, JsonValue>),
    Array(Vec<JsonValue>),
    String(String),
    Number(f64),
    Boolean(bool),
    Null,
}

/// Debug string, not a serializer: containers print as `array` / `object`.
impl fmt::Display for JsonValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JsonValue::Object(_) => f.write_str("object"),
            JsonValue::Array(_) => f.write_str("array"),
            JsonValue::String(s) => f.write_str(s),
            JsonValue::Number(n) => write!(f, "{}", n),
            JsonValue::Boolean(b) => write!(f, "{}", b),
            JsonValue::Null => f.write_str("null"),
        }
    }
}

impl JsonValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            JsonValue::Object(_) => "object",
            JsonValue::Array(_) => "array",
            JsonValue::String(_) => "string",
            JsonValue::Number(_) => "number",
            JsonValue::Boolean(_) => "boolean",
            JsonValue::Null => "null",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            JsonValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<JsonValue>> {
        match self {
            JsonValue::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&HashMap<String, JsonValue>> {
        match self {
            JsonValue::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            JsonValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            JsonValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, JsonValue::Null)
    }
}

impl From<bool> for JsonValue {
    fn from(b: bool) -> Self {
        JsonValue::Boolean(b)
    }
}

impl From<f64> for JsonValue {
    fn from(n: f64) -> Self {
        JsonValue::Number(n)
    }
}

impl From<i32> for JsonValue {
    fn from(n: i32) -> Self {
        JsonValue::Number(f64::from(n))
    }
}

impl From<&str> for JsonValue {
    fn from(s: &str) -> Self {
        JsonValue::String(s.to_owned())
    }
}

impl From<String> for JsonValue {
    fn from(s: String) -> Self {
        JsonValue::String(s)
    }
}

impl From<Vec<JsonValue>> for JsonValue {
    fn from(items: Vec<JsonValue>) -> Self {
        JsonValue::Array(items)
    }
}

impl From<HashMap<String, JsonValue>> for JsonValue {
    fn from(map: HashMap<String, JsonValue>) -> Self {
        JsonValue::Object(map)
    }
}

/* ------------------------------------------------------------------ */
/*  Generic “key” helper                                              */
/* ------------------------------------------------------------------ */

/// Anything that can address a child inside a `JsonValue`.
///
/// * `&str`  → object key
/// * `usize` → array index
pub trait JsonIndex {
    fn at(self, parent: &JsonValue) -> Option<&JsonValue>;
}

impl JsonIndex for &str {
    fn at(self, parent: &JsonValue) -> Option<&JsonValue> {
        match parent {
            JsonValue::Object(map) => map.get(self),
            _ => None,
        }
    }
}

impl JsonIndex for usize {
    fn at(self, parent: &JsonValue) -> Option<&JsonValue> {
        match parent {
            JsonValue::Array(arr) => arr.get(self),
            _ => None,
        }
    }
}

/* ------------------------------------------------------------------ */
/*  Accessor                                                          */
/* ------------------------------------------------------------------ */

impl JsonValue {
    /// Borrow a child value by object key or array index.
    ///
    /// ```
    /// let v = jerry::parse(r#"{"name": ["a", "b"]}"#).unwrap();
    /// assert_eq!(v.get("name").and_then(|n| n.get(1)), Some(&"b".into()));
    /// ```
    pub fn get<K>(&self, key: K) -> Option<&JsonValue>
    where
        K: JsonIndex,
    {
        key.at(self)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut JsonValue> {
        match self {
            JsonValue::Object(map) => map.get_mut(key),
            _ => None,
        }
    }

    pub fn get_idx_mut(&mut self, idx: usize) -> Option<&mut JsonValue> {
        match self {
            JsonValue::Array(vec) => vec.get_mut(idx),
            _ => None,
        }
    }
}

use std::ops::Index;

impl Index<&str> for JsonValue {
    type Output = JsonValue;
    fn index(&self, key: &str) -> &Self::Output {
        self.get(key).expect("object key not found")
    }
}

impl Index<usize> for JsonValue {
    type Output = JsonValue;
    fn index(&self, idx: usize) -> &Self::Output {
        self.get(idx).expect("array index out of bounds")
    }
}

/* ------------------------------------------------------------------ */
/*  Errors                                                            */
/* ------------------------------------------------------------------ */

/// Why a parse stopped. Every variant carries the byte offset at which no
/// further progress was possible.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    UnexpectedEndOfInput {
        offset: usize,
        expected: &'static str,
    },
    UnexpectedCharacter {
        offset: usize,
        found: char,
        context: String,
    },
    UnterminatedString {
        offset: usize,
    },
    InvalidEscape {
        offset: usize,
    },
    MalformedNumber {
        offset: usize,
    },
    MissingDelimiter {
        offset: usize,
        expected: &'static str,
    },
    TrailingData {
        offset: usize,
    },
    DepthLimitExceeded {
        offset: usize,
        limit: usize,
    },
}

impl ParseError {
    pub fn offset(&self) -> usize {
        match self {
            ParseError::UnexpectedEndOfInput { offset, .. }
            | ParseError::UnexpectedCharacter { offset, .. }
            | ParseError::UnterminatedString { offset }
            | ParseError::InvalidEscape { offset }
            | ParseError::MalformedNumber { offset }
            | ParseError::MissingDelimiter { offset, .. }
            | ParseError::TrailingData { offset }
            | ParseError::DepthLimitExceeded { offset, .. } => *offset,
        }
    }

    /// 1-based line and column of the error inside `input`, the text that
    /// was handed to the parser.
    pub fn location(&self, input: &str) -> Location {
        let mut offset = self.offset().min(input.len());
        while !input.is_char_boundary(offset) {
            offset -= 1;
        }
        Location::locate_tail(input, &input[offset..])
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::UnexpectedEndOfInput { offset, expected } => write!(
                f,
                "unexpected end of input at offset {}, expected {}",
                offset, expected
            ),
            ParseError::UnexpectedCharacter {
                offset,
                found,
                context,
            } => write!(
                f,
                "unexpected character {:?} at offset {}: {}",
                found, offset, context
            ),
            ParseError::UnterminatedString { offset } => {
                write!(f, "unterminated string starting at offset {}", offset)
            }
            ParseError::InvalidEscape { offset } => {
                write!(f, "invalid escape sequence at offset {}", offset)
            }
            ParseError::MalformedNumber { offset } => {
                write!(f, "malformed number at offset {}", offset)
            }
            ParseError::MissingDelimiter { offset, expected } => {
                write!(f, "expected {} at offset {}", expected, offset)
            }
            ParseError::TrailingData { offset } => {
                write!(f, "trailing data after value at offset {}", offset)
            }
            ParseError::DepthLimitExceeded { offset, limit } => write!(
                f,
                "nesting deeper than {} levels at offset {}",
                limit, offset
            ),
        }
    }
}

impl std::error::Error for ParseError {}
