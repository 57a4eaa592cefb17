//! Recursive-descent JSON grammar over the lexemes in `json_tok`.
//!
//! Alternatives are tried in a fixed order from the same cursor. Once a
//! rule has consumed its opening `[`, `{` or `"`, it is committed: a later
//! failure is reported as an error instead of falling through to the next
//! alternative.

use std::collections::HashMap;

use log::{debug, trace};

use crate::cursor::Cursor;
use crate::escape::unescape;
use crate::json_tok::{
    boolean, brace_close, brace_open, bracket_close, bracket_open, colon, comma,
    continues_number, json_number, json_string, null, unexpected, Whitespace,
};
use crate::json_types::{JsonValue, ParseError};

pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Knobs for [`JsonParser`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserConfig {
    /// Deepest array/object nesting accepted.
    pub max_depth: usize,
    /// Ignore anything after the top-level value instead of failing.
    pub allow_trailing_data: bool,
    pub whitespace: Whitespace,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            allow_trailing_data: false,
            whitespace: Whitespace::Json,
        }
    }
}

impl ParserConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_trailing_data(mut self, allow: bool) -> Self {
        self.allow_trailing_data = allow;
        self
    }

    pub fn with_whitespace(mut self, whitespace: Whitespace) -> Self {
        self.whitespace = whitespace;
        self
    }
}

type Parsed<'a> = Result<(JsonValue, Cursor<'a>), ParseError>;

#[derive(Debug, Default)]
pub struct JsonParser {
    config: ParserConfig,
    depth: usize,
}

impl JsonParser {
    pub fn new(config: ParserConfig) -> Self {
        Self { config, depth: 0 }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse `input` as exactly one JSON value.
    pub fn parse(&mut self, input: &str) -> Result<JsonValue, ParseError> {
        self.depth = 0;
        match self.parse_document(Cursor::new(input)) {
            Ok(value) => {
                debug!("parsed {} bytes into {}", input.len(), value.type_name());
                Ok(value)
            }
            Err(e) => {
                debug!("parse failed at offset {}: {}", e.offset(), e);
                Err(e)
            }
        }
    }

    fn parse_document(&mut self, cursor: Cursor<'_>) -> Result<JsonValue, ParseError> {
        let (value, rest) = self.parse_value(cursor)?;
        let rest = self.skip_whitespace(rest);
        if !rest.is_at_end() && !self.config.allow_trailing_data {
            return Err(ParseError::TrailingData {
                offset: rest.position(),
            });
        }
        Ok(value)
    }

    fn skip_whitespace<'a>(&self, cursor: Cursor<'a>) -> Cursor<'a> {
        self.config
            .whitespace
            .skip()
            .run(cursor)
            .map_or(cursor, |(_, after)| after)
    }

    fn parse_value<'a>(&mut self, cursor: Cursor<'a>) -> Parsed<'a> {
        let cursor = self.skip_whitespace(cursor);

        if let Some((b, next)) = boolean().run(cursor) {
            return Ok((JsonValue::Boolean(b), next));
        }
        if let Some(((), next)) = null().run(cursor) {
            return Ok((JsonValue::Null, next));
        }
        if let Some((raw, next)) = json_string().run(cursor) {
            let text = unescape(raw, cursor.position() + 1)?;
            return Ok((JsonValue::String(text), next));
        }
        if let Some((raw, next)) = json_number().run(cursor) {
            return self.parse_number(raw, cursor, next);
        }
        if let Some((_, next)) = bracket_open().run(cursor) {
            return self.parse_array(cursor, next);
        }
        if let Some((_, next)) = brace_open().run(cursor) {
            return self.parse_object(cursor, next);
        }

        Err(match cursor.peek() {
            Some('"') => ParseError::UnterminatedString {
                offset: cursor.position(),
            },
            Some(c) if c == '-' || c.is_ascii_digit() => ParseError::MalformedNumber {
                offset: cursor.position(),
            },
            _ => unexpected(cursor, "a JSON value"),
        })
    }

    fn parse_number<'a>(&self, raw: &str, start: Cursor<'a>, next: Cursor<'a>) -> Parsed<'a> {
        let malformed = ParseError::MalformedNumber {
            offset: start.position(),
        };
        if next.peek().map_or(false, continues_number) {
            return Err(malformed);
        }
        match raw.parse::<f64>() {
            Ok(n) if n.is_finite() => Ok((JsonValue::Number(n), next)),
            _ => Err(malformed),
        }
    }

    fn parse_array<'a>(&mut self, open: Cursor<'a>, cursor: Cursor<'a>) -> Parsed<'a> {
        self.descend(open)?;
        trace!("array at offset {} (depth {})", open.position(), self.depth);

        let mut items = Vec::new();
        let mut cursor = self.skip_whitespace(cursor);
        if let Some((_, next)) = bracket_close().run(cursor) {
            self.depth -= 1;
            return Ok((JsonValue::Array(items), next));
        }

        loop {
            let (item, next) = self.parse_value(cursor)?;
            items.push(item);
            cursor = self.skip_whitespace(next);

            if let Some((_, next)) = comma().run(cursor) {
                cursor = next;
                continue;
            }
            if let Some((_, next)) = bracket_close().run(cursor) {
                self.depth -= 1;
                return Ok((JsonValue::Array(items), next));
            }
            return Err(missing(cursor, "',' or ']'"));
        }
    }

    fn parse_object<'a>(&mut self, open: Cursor<'a>, cursor: Cursor<'a>) -> Parsed<'a> {
        self.descend(open)?;
        trace!("object at offset {} (depth {})", open.position(), self.depth);

        let mut map = HashMap::new();
        let mut cursor = self.skip_whitespace(cursor);
        if let Some((_, next)) = brace_close().run(cursor) {
            self.depth -= 1;
            return Ok((JsonValue::Object(map), next));
        }

        loop {
            let (key, next) = parse_key(cursor)?;
            cursor = self.skip_whitespace(next);
            cursor = match colon().run(cursor) {
                Some((_, next)) => next,
                None => return Err(missing(cursor, "':'")),
            };

            let (value, next) = self.parse_value(cursor)?;
            // duplicate keys: the last one wins
            map.insert(key, value);
            cursor = self.skip_whitespace(next);

            if let Some((_, next)) = comma().run(cursor) {
                cursor = self.skip_whitespace(next);
                continue;
            }
            if let Some((_, next)) = brace_close().run(cursor) {
                self.depth -= 1;
                return Ok((JsonValue::Object(map), next));
            }
            return Err(missing(cursor, "',' or '}'"));
        }
    }

    fn descend(&mut self, open: Cursor<'_>) -> Result<(), ParseError> {
        if self.depth >= self.config.max_depth {
            return Err(ParseError::DepthLimitExceeded {
                offset: open.position(),
                limit: self.config.max_depth,
            });
        }
        self.depth += 1;
        Ok(())
    }
}

fn parse_key(cursor: Cursor<'_>) -> Result<(String, Cursor<'_>), ParseError> {
    match json_string().run(cursor) {
        Some((raw, next)) => Ok((unescape(raw, cursor.position() + 1)?, next)),
        None if cursor.peek() == Some('"') => Err(ParseError::UnterminatedString {
            offset: cursor.position(),
        }),
        None => Err(unexpected(cursor, "a string key")),
    }
}

fn missing(cursor: Cursor<'_>, expected: &'static str) -> ParseError {
    let offset = cursor.position();
    if cursor.is_at_end() {
        ParseError::UnexpectedEndOfInput { offset, expected }
    } else {
        ParseError::MissingDelimiter { offset, expected }
    }
}
