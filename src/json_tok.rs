//! `json_tok` – JSON micro-syntax built from the combinator core.
//
//  Every lexeme parser here only *recognises* text; values are produced by
//  the grammar in `json_parser`. A `Tok` carries a `start..end` byte range
//  back into the input rather than a slice.

use strsim::damerau_levenshtein;

use crate::combinator::{character, digit, expect_char, expect_string, satisfy, word, Parser};
use crate::cursor::Cursor;
use crate::escape::unescape;
use crate::json_types::ParseError;

const KEYWORDS: [&str; 3] = ["true", "false", "null"];
const MAX_DIST: usize = 2;

/// Which characters count as insignificant whitespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Whitespace {
    /// Only U+0020.
    SpaceOnly,
    /// Space, tab, line feed and carriage return.
    #[default]
    Json,
}

impl Whitespace {
    pub fn parser<'a>(self) -> Parser<'a, char> {
        match self {
            Whitespace::SpaceOnly => whitespace(),
            Whitespace::Json => json_whitespace(),
        }
    }

    /// Zero or more whitespace characters.
    pub fn skip<'a>(self) -> Parser<'a, ()> {
        self.parser().many().map(|_| ())
    }
}

/* ------------------------------------------------------------------ */
/*  Lexemes                                                           */
/* ------------------------------------------------------------------ */

pub fn whitespace<'a>() -> Parser<'a, char> {
    expect_char(' ')
}

pub fn json_whitespace<'a>() -> Parser<'a, char> {
    satisfy(|c| matches!(c, ' ' | '\t' | '\n' | '\r'))
}

pub fn brace_open<'a>() -> Parser<'a, char> {
    expect_char('{')
}

pub fn brace_close<'a>() -> Parser<'a, char> {
    expect_char('}')
}

pub fn bracket_open<'a>() -> Parser<'a, char> {
    expect_char('[')
}

pub fn bracket_close<'a>() -> Parser<'a, char> {
    expect_char(']')
}

pub fn colon<'a>() -> Parser<'a, char> {
    expect_char(':')
}

pub fn comma<'a>() -> Parser<'a, char> {
    expect_char(',')
}

pub fn double_quote<'a>() -> Parser<'a, char> {
    expect_char('"')
}

pub fn boolean<'a>() -> Parser<'a, bool> {
    expect_string("true")
        .value(true)
        .or_else(expect_string("false").value(false))
}

pub fn null<'a>() -> Parser<'a, ()> {
    expect_string("null").value(())
}

/// A quoted string; yields the raw text between the quotes, escapes intact.
pub fn json_string<'a>() -> Parser<'a, &'a str> {
    // a backslash always takes the next character with it, so `\"` never closes
    let escaped = expect_char('\\').then(character());
    let plain = satisfy(|c| c != '"' && c != '\\');
    let body = escaped.or_else(plain).many().recognize();

    double_quote().then(body).skip(double_quote())
}

/// `-? (0 | [1-9][0-9]*) (. [0-9]+)? ([eE] [+-]? [0-9]+)?`, as raw text.
pub fn json_number<'a>() -> Parser<'a, &'a str> {
    let sign = expect_char('-').optional();
    let integer = expect_char('0')
        .recognize()
        .or_else(satisfy(|c| matches!(c, '1'..='9')).then(digit().many()).recognize());
    let fraction = expect_char('.').then(digit().many1()).optional();
    let exponent = satisfy(|c| c == 'e' || c == 'E')
        .then(satisfy(|c| c == '+' || c == '-').optional())
        .then(digit().many1())
        .optional();

    sign.then(integer).then(fraction).then(exponent).recognize()
}

/// Could a number lexeme continue with `c`? Seeing one right after
/// `json_number` stopped means the literal is malformed.
pub(crate) fn continues_number(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-')
}

/// Closest keyword to a bare word, if it looks like a typo of one.
pub fn suggest_keyword(bare: &str) -> Option<&'static str> {
    KEYWORDS
        .iter()
        .copied()
        .map(|kw| (damerau_levenshtein(bare, kw), kw))
        .filter(|(dist, _)| *dist <= MAX_DIST)
        .min_by_key(|(dist, _)| *dist)
        .map(|(_, kw)| kw)
}

/// Error for "none of the expected lexemes start at `cursor`".
pub(crate) fn unexpected(cursor: Cursor<'_>, expected: &'static str) -> ParseError {
    let offset = cursor.position();
    match cursor.peek() {
        None => ParseError::UnexpectedEndOfInput { offset, expected },
        Some(found) => {
            let hint = word()
                .run(cursor)
                .and_then(|(bare, _)| suggest_keyword(bare));
            let context = match hint {
                Some(kw) => format!("expected {}, did you mean `{}`?", expected, kw),
                None => format!("expected {}", expected),
            };
            ParseError::UnexpectedCharacter {
                offset,
                found,
                context,
            }
        }
    }
}

/* ------------------------------------------------------------------ */
/*  Token stream                                                      */
/* ------------------------------------------------------------------ */

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    ObjectStart,
    ObjectEnd,
    ArrayStart,
    ArrayEnd,
    Colon,
    Comma,
    String,
    Number,
    Boolean,
    Null,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tok {
    pub kind: Kind,
    pub start: usize, // byte offsets into the tokenized input
    pub end: usize,
}

impl Tok {
    /// The lexeme, quotes included for strings.
    pub fn text<'a>(&self, src: &'a str) -> &'a str {
        &src[self.start..self.end]
    }
}

fn token<'a>() -> Parser<'a, Kind> {
    brace_open()
        .value(Kind::ObjectStart)
        .or_else(brace_close().value(Kind::ObjectEnd))
        .or_else(bracket_open().value(Kind::ArrayStart))
        .or_else(bracket_close().value(Kind::ArrayEnd))
        .or_else(colon().value(Kind::Colon))
        .or_else(comma().value(Kind::Comma))
        .or_else(json_string().value(Kind::String))
        .or_else(json_number().value(Kind::Number))
        .or_else(boolean().value(Kind::Boolean))
        .or_else(null().value(Kind::Null))
}

fn spanned<'a>(kind: Parser<'a, Kind>) -> Parser<'a, Tok> {
    Parser::new(move |cursor: Cursor<'a>| {
        let (kind, next) = kind.run(cursor)?;
        let tok = Tok {
            kind,
            start: cursor.position(),
            end: next.position(),
        };
        Some((tok, next))
    })
}

/// Split `input` into tokens, skipping JSON whitespace.
///
/// Only the micro-syntax is checked (string escapes included); bracket
/// balance and comma placement are the grammar's business.
pub fn tokenize(input: &str) -> Result<Vec<Tok>, ParseError> {
    let skip_ws = Whitespace::Json.skip();
    let next_token = spanned(token());

    let mut toks = Vec::new();
    let mut cursor = Cursor::new(input);
    loop {
        cursor = skip_ws.run(cursor).map_or(cursor, |(_, after)| after);
        let found = match cursor.peek() {
            Some(c) => c,
            None => return Ok(toks),
        };

        let (tok, next) = match next_token.run(cursor) {
            Some(step) => step,
            None if found == '"' => {
                return Err(ParseError::UnterminatedString {
                    offset: cursor.position(),
                })
            }
            None if found == '-' || found.is_ascii_digit() => {
                return Err(ParseError::MalformedNumber {
                    offset: cursor.position(),
                })
            }
            None => return Err(unexpected(cursor, "a JSON token")),
        };

        match tok.kind {
            Kind::String => {
                unescape(&input[tok.start + 1..tok.end - 1], tok.start + 1)?;
            }
            Kind::Number => {
                if next.peek().map_or(false, continues_number) {
                    return Err(ParseError::MalformedNumber { offset: tok.start });
                }
            }
            _ => {}
        }

        toks.push(tok);
        cursor = next;
    }
}
