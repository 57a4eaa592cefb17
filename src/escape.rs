//! Escape decoding for raw string bodies.
//
//  The string lexer only decides where a string ends; the bytes between the
//  quotes are decoded here afterwards. Offsets in errors point at the
//  backslash that starts the bad sequence.

use nom::{
    branch::alt,
    bytes::complete::take_while_m_n,
    character::complete::char,
    combinator::{map_res, value},
    sequence::preceded,
    IResult,
};

use crate::json_types::ParseError;

fn hex4(input: &str) -> IResult<&str, u16> {
    map_res(take_while_m_n(4, 4, |c: char| c.is_ascii_hexdigit()), |h| {
        u16::from_str_radix(h, 16)
    })(input)
}

/// `uXXXX`, or a `uD8xx\uDCxx` surrogate pair.
fn unicode_escape(input: &str) -> IResult<&str, char> {
    let (rest, hi) = preceded(char('u'), hex4)(input)?;
    let (rest, code) = match hi {
        0xD800..=0xDBFF => {
            let (rest, lo) = preceded(char('\\'), preceded(char('u'), hex4))(rest)?;
            if !(0xDC00..=0xDFFF).contains(&lo) {
                return Err(nom::Err::Error(nom::error::Error::new(
                    input,
                    nom::error::ErrorKind::Verify,
                )));
            }
            let code = 0x10000 + ((u32::from(hi) - 0xD800) << 10) + (u32::from(lo) - 0xDC00);
            (rest, code)
        }
        _ => (rest, u32::from(hi)),
    };
    match char::from_u32(code) {
        Some(c) => Ok((rest, c)),
        // lone low surrogate
        None => Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Char,
        ))),
    }
}

/// One escape sequence, backslash included.
fn escape_sequence(input: &str) -> IResult<&str, char> {
    preceded(
        char('\\'),
        alt((
            value('"', char('"')),
            value('\\', char('\\')),
            value('/', char('/')),
            value('\u{0008}', char('b')),
            value('\u{000C}', char('f')),
            value('\n', char('n')),
            value('\r', char('r')),
            value('\t', char('t')),
            unicode_escape,
        )),
    )(input)
}

/// Decode the body of a string literal. `base` is the byte offset of `raw`
/// in the original input.
pub fn unescape(raw: &str, base: usize) -> Result<String, ParseError> {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(at) = rest.find('\\') {
        out.push_str(&rest[..at]);
        match escape_sequence(&rest[at..]) {
            Ok((after, c)) => {
                out.push(c);
                rest = after;
            }
            Err(_) => {
                return Err(ParseError::InvalidEscape {
                    offset: base + (raw.len() - rest.len()) + at,
                })
            }
        }
    }
    out.push_str(rest);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_untouched() {
        assert_eq!(unescape("hello world", 0).unwrap(), "hello world");
        assert_eq!(unescape("", 0).unwrap(), "");
    }

    #[test]
    fn test_simple_escapes() {
        assert_eq!(
            unescape(r#"a\"b\\c\/d\be\ff\ng\rh\ti"#, 0).unwrap(),
            "a\"b\\c/d\u{0008}e\u{000C}f\ng\rh\ti"
        );
    }

    #[test]
    fn test_unicode_escapes() {
        assert_eq!(unescape(r"\u263A", 0).unwrap(), "☺");
        assert_eq!(unescape(r"x\u00e9y", 0).unwrap(), "xéy");
        assert_eq!(unescape(r"\uD83D\uDE00", 0).unwrap(), "😀");
    }

    #[test]
    fn test_invalid_escape_offsets() {
        let cases = vec![
            (r"\q", 10, 10),
            (r"ab\x", 0, 2),
            (r"ok\n then \u12", 0, 10),
            (r"\uD83D", 4, 4),
            (r"\uDE00", 0, 0),
            (r"\uD83Dx", 0, 0),
            ("tail\\", 1, 5),
        ];
        for (raw, base, offset) in cases {
            assert_eq!(
                unescape(raw, base),
                Err(ParseError::InvalidEscape { offset }),
                "input {:?}",
                raw
            );
        }
    }
}
