//! A JSON parser built on a small parser-combinator core.
//!
//! ```
//! let v = jerry::parse(r#"{"outer": {"inner": ["x", "y"]}}"#).unwrap();
//! assert_eq!(v["outer"]["inner"][1].as_str(), Some("y"));
//! ```

pub mod combinator;
pub mod cursor;
mod escape;
pub mod json_parser;
pub mod json_tok;
pub mod json_types;

pub use cursor::Cursor;
pub use json_parser::{JsonParser, ParserConfig, DEFAULT_MAX_DEPTH};
pub use json_tok::{tokenize, Kind, Tok, Whitespace};
pub use json_types::{JsonIndex, JsonValue, ParseError};

/// Parse `input` as one JSON value with the default [`ParserConfig`].
pub fn parse(input: &str) -> Result<JsonValue, ParseError> {
    JsonParser::default().parse(input)
}

pub fn parse_with_config(input: &str, config: &ParserConfig) -> Result<JsonValue, ParseError> {
    JsonParser::new(config.clone()).parse(input)
}
