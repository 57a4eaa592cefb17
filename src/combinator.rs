//! `combinator` – small monadic parser core.
//
//  A `Parser<'a, T>` is a shared closure `Cursor -> Option<(T, Cursor)>`.
//  Failure returns no cursor at all, so a caller that tries another
//  alternative always restarts from the cursor it already holds.

use std::rc::Rc;

use crate::cursor::Cursor;

/// Result of running a parser: the value plus the cursor after it.
pub type Step<'a, T> = Option<(T, Cursor<'a>)>;

pub struct Parser<'a, T> {
    func: Rc<dyn Fn(Cursor<'a>) -> Step<'a, T> + 'a>,
}

impl<'a, T> Clone for Parser<'a, T> {
    fn clone(&self) -> Self {
        Self {
            func: Rc::clone(&self.func),
        }
    }
}

impl<'a, T> std::fmt::Debug for Parser<'a, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Parser { .. }")
    }
}

impl<'a, T: 'a> Parser<'a, T> {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Cursor<'a>) -> Step<'a, T> + 'a,
    {
        Self { func: Rc::new(f) }
    }

    #[inline]
    pub fn run(&self, cursor: Cursor<'a>) -> Step<'a, T> {
        (self.func)(cursor)
    }

    /// Sequencing: feed this parser's value to `f` and run the parser it
    /// returns from where this one stopped.
    pub fn bind<U: 'a, F>(self, f: F) -> Parser<'a, U>
    where
        F: Fn(T) -> Parser<'a, U> + 'a,
    {
        Parser::new(move |cursor| {
            let (value, next) = self.run(cursor)?;
            f(value).run(next)
        })
    }

    pub fn map<U: 'a, F>(self, f: F) -> Parser<'a, U>
    where
        F: Fn(T) -> U + 'a,
    {
        Parser::new(move |cursor| self.run(cursor).map(|(value, next)| (f(value), next)))
    }

    /// Left-biased choice. `other` sees the same cursor `self` was given.
    pub fn or_else(self, other: Parser<'a, T>) -> Parser<'a, T> {
        Parser::new(move |cursor| self.run(cursor).or_else(|| other.run(cursor)))
    }

    /// Run `self` then `next`, keeping `next`'s value.
    pub fn then<U: 'a>(self, next: Parser<'a, U>) -> Parser<'a, U> {
        self.bind(move |_| next.clone())
    }

    /// Run `self` then `next`, keeping `self`'s value.
    pub fn skip<U: 'a>(self, next: Parser<'a, U>) -> Parser<'a, T> {
        Parser::new(move |cursor| {
            let (value, after) = self.run(cursor)?;
            let (_, after) = next.run(after)?;
            Some((value, after))
        })
    }

    /// Replace the value with a constant.
    pub fn value<U: Clone + 'a>(self, value: U) -> Parser<'a, U> {
        self.map(move |_| value.clone())
    }

    pub fn many(self) -> Parser<'a, Vec<T>> {
        many_of(self)
    }

    pub fn many1(self) -> Parser<'a, Vec<T>> {
        many1(self)
    }

    pub fn optional(self) -> Parser<'a, Option<T>> {
        optional(self)
    }

    pub fn recognize(self) -> Parser<'a, &'a str> {
        recognize(self)
    }
}

/* ------------------------------------------------------------------ */
/*  Constructors                                                      */
/* ------------------------------------------------------------------ */

/// Always succeeds with `value`, consuming nothing.
pub fn pure<'a, T: Clone + 'a>(value: T) -> Parser<'a, T> {
    Parser::new(move |cursor| Some((value.clone(), cursor)))
}

/// Always fails.
pub fn fail<'a, T: 'a>() -> Parser<'a, T> {
    Parser::new(|_: Cursor<'a>| None)
}

/// One character satisfying `predicate`.
pub fn satisfy<'a, P>(predicate: P) -> Parser<'a, char>
where
    P: Fn(char) -> bool + 'a,
{
    Parser::new(move |cursor: Cursor<'a>| {
        let c = cursor.peek()?;
        if predicate(c) {
            Some((c, cursor.advance()?))
        } else {
            None
        }
    })
}

/// Any single character.
pub fn character<'a>() -> Parser<'a, char> {
    satisfy(|_| true)
}

pub fn expect_char<'a>(expected: char) -> Parser<'a, char> {
    satisfy(move |c| c == expected)
}

/// Exactly `expected`, consuming `expected.len()` bytes.
pub fn expect_string<'a>(expected: &'a str) -> Parser<'a, &'a str> {
    Parser::new(move |cursor: Cursor<'a>| {
        let mut at = cursor;
        for want in expected.chars() {
            if at.peek()? != want {
                return None;
            }
            at = at.advance()?;
        }
        Some((expected, at))
    })
}

/// Succeeds with `value` iff it equals `other`.
pub fn is_equal<'a, T: PartialEq + Clone + 'a>(value: T, other: T) -> Parser<'a, T> {
    if value == other {
        pure(value)
    } else {
        fail()
    }
}

/// Succeeds with `value` iff it differs from `other`.
pub fn is_not_equal<'a, T: PartialEq + Clone + 'a>(value: T, other: T) -> Parser<'a, T> {
    if value != other {
        pure(value)
    } else {
        fail()
    }
}

/// One ASCII digit, as its numeric value.
pub fn digit<'a>() -> Parser<'a, u32> {
    satisfy(|c| c.is_ascii_digit()).map(|c| c as u32 - '0' as u32)
}

/// A run of ASCII letters.
pub fn word<'a>() -> Parser<'a, &'a str> {
    satisfy(|c| c.is_ascii_alphabetic()).many1().recognize()
}

/* ------------------------------------------------------------------ */
/*  Combinators                                                       */
/* ------------------------------------------------------------------ */

/// Zero or more repetitions. Never fails.
///
/// Stops at end of input, at the first failure, or at the first success
/// that did not move the cursor (which would otherwise loop forever).
pub fn many_of<'a, T: 'a>(parser: Parser<'a, T>) -> Parser<'a, Vec<T>> {
    Parser::new(move |start: Cursor<'a>| {
        let mut items = Vec::new();
        let mut cursor = start;
        while !cursor.is_at_end() {
            match parser.run(cursor) {
                Some((item, next)) if next.position() > cursor.position() => {
                    items.push(item);
                    cursor = next;
                }
                _ => break,
            }
        }
        Some((items, cursor))
    })
}

/// One or more repetitions.
pub fn many1<'a, T: 'a>(parser: Parser<'a, T>) -> Parser<'a, Vec<T>> {
    let repeated = many_of(parser);
    Parser::new(move |cursor| match repeated.run(cursor)? {
        (items, _) if items.is_empty() => None,
        step => Some(step),
    })
}

pub fn optional<'a, T: 'a>(parser: Parser<'a, T>) -> Parser<'a, Option<T>> {
    Parser::new(move |cursor| match parser.run(cursor) {
        Some((value, next)) => Some((Some(value), next)),
        None => Some((None, cursor)),
    })
}

/// Run `parser` and yield the text it consumed instead of its value.
pub fn recognize<'a, T: 'a>(parser: Parser<'a, T>) -> Parser<'a, &'a str> {
    Parser::new(move |cursor: Cursor<'a>| {
        let (_, next) = parser.run(cursor)?;
        Some((cursor.slice_to(&next), next))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start(input: &str) -> Cursor<'_> {
        Cursor::new(input)
    }

    #[test]
    fn test_character_advances() {
        let input = "the quick brown fox jumped over the fella";
        let cursor = start(input);
        assert_eq!(cursor.peek(), Some('t'));

        let (c, next) = character().run(cursor).unwrap();
        assert_eq!(c, 't');
        assert_eq!(next.peek(), Some('h'));
    }

    #[test]
    fn test_pure_consumes_nothing() {
        let (c, next) = pure('t').run(start("the quick brown fox")).unwrap();
        assert_eq!(c, 't');
        assert_eq!(next.position(), 0);
    }

    #[test]
    fn test_fail_never_matches() {
        assert!(fail::<char>().run(start("abc")).is_none());
        assert!(fail::<char>().run(start("")).is_none());
    }

    #[test]
    fn test_word() {
        let (w, next) = word().run(start("the quick brown fox")).unwrap();
        assert_eq!(w, "the");
        assert_eq!(next.position(), 3);

        assert!(word().run(start(" the")).is_none());
    }

    #[test]
    fn test_words_separated_by_spaces() {
        let word_then_spaces = word().skip(expect_char(' ').many());
        let (words, next) = word_then_spaces.many().run(start("the quick brown fox")).unwrap();
        assert_eq!(words, vec!["the", "quick", "brown", "fox"]);
        assert!(next.is_at_end());
    }

    #[test]
    fn test_map_upper() {
        let to_upper = character().map(|c| c.to_ascii_uppercase());
        let (c, next) = to_upper.run(start("the quick brown fox")).unwrap();
        assert_eq!(c, 'T');
        assert_eq!(next.position(), 1);
    }

    #[test]
    fn test_expect_char_repeatedly() {
        let brace_open = expect_char('{');
        let mut cursor = start("{{}}");
        let mut seen = 0;
        while let Some((c, next)) = brace_open.run(cursor) {
            assert_eq!(c, '{');
            seen += 1;
            cursor = next;
            assert_eq!(cursor.position(), seen);
        }
        assert_eq!(cursor.position(), 2);
    }

    #[test]
    fn test_or_else_either_brace() {
        let either = expect_char('{').or_else(expect_char('}'));
        let mut cursor = start("{{}}");
        let mut got = Vec::new();
        while let Some((c, next)) = either.run(cursor) {
            got.push(c);
            cursor = next;
        }
        assert_eq!(cursor.position(), 4);
        assert_eq!(got, vec!['{', '{', '}', '}']);
    }

    #[test]
    fn test_or_else_backtracks_to_original_cursor() {
        // both branches share the prefix "nu"; the first gives up after it
        let first = expect_string("nu").then(expect_char('x')).value("first");
        let second = expect_string("null").value("second");

        let (which, next) = first.or_else(second).run(start("null")).unwrap();
        assert_eq!(which, "second");
        assert_eq!(next.position(), 4);
    }

    #[test]
    fn test_or_else_prefers_left() {
        let p = expect_string("tr").or_else(expect_string("true"));
        let (s, next) = p.run(start("true")).unwrap();
        assert_eq!(s, "tr");
        assert_eq!(next.position(), 2);
    }

    #[test]
    fn test_bind_failure_in_second_step() {
        let p = character().bind(|c| if c == 'a' { expect_char('b') } else { fail() });
        assert!(p.run(start("ab")).is_some());
        assert!(p.run(start("ac")).is_none());
        assert!(p.run(start("xb")).is_none());
    }

    #[test]
    fn test_many_of_collects_everything() {
        let (chars, next) = character().many().run(start("abcdefg")).unwrap();
        assert_eq!(chars, vec!['a', 'b', 'c', 'd', 'e', 'f', 'g']);
        assert!(next.is_at_end());
    }

    #[test]
    fn test_many_of_never_fails() {
        let (items, next) = expect_char('x').many().run(start("abc")).unwrap();
        assert!(items.is_empty());
        assert_eq!(next.position(), 0);

        let (items, _) = expect_char('x').many().run(start("")).unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn test_many_of_stops_on_zero_width_success() {
        let (items, next) = pure('z').many().run(start("abc")).unwrap();
        assert!(items.is_empty());
        assert_eq!(next.position(), 0);
    }

    #[test]
    fn test_many1_requires_one() {
        assert!(digit().many1().run(start("x1")).is_none());
        let (digits, _) = digit().many1().run(start("12x")).unwrap();
        assert_eq!(digits, vec![1, 2]);
    }

    #[test]
    fn test_many1_reusable() {
        let digits = digit().many1();
        for _ in 0..3 {
            let (d, _) = digits.run(start("42")).unwrap();
            assert_eq!(d, vec![4, 2]);
        }
    }

    #[test]
    fn test_digits() {
        let (digits, _) = digit().many().run(start("0123456789")).unwrap();
        assert_eq!(digits, vec![0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);
    }

    #[test]
    fn test_expect_string() {
        let (s, next) = expect_string("null").run(start("null,")).unwrap();
        assert_eq!(s, "null");
        assert_eq!(next.peek(), Some(','));

        assert!(expect_string("null").run(start("nul")).is_none());
        assert!(expect_string("null").run(start("nulL")).is_none());
    }

    #[test]
    fn test_is_equal_and_not_equal() {
        let cursor = start("abc");
        assert_eq!(is_equal('{', '{').run(cursor).map(|(c, _)| c), Some('{'));
        assert!(is_equal('{', '}').run(cursor).is_none());
        assert!(is_not_equal('"', '"').run(cursor).is_none());

        let not_quote = character().bind(|c| is_not_equal(c, '"'));
        assert!(not_quote.run(start("a")).is_some());
        assert!(not_quote.run(start("\"")).is_none());
    }

    #[test]
    fn test_optional_and_recognize() {
        let signed = expect_char('-').optional().then(digit().many1()).recognize();
        assert_eq!(signed.run(start("-12a")).map(|(s, _)| s), Some("-12"));
        assert_eq!(signed.run(start("7")).map(|(s, _)| s), Some("7"));
        assert!(signed.run(start("-")).is_none());
    }

    #[test]
    fn test_same_cursor_same_result() {
        let p = word().skip(expect_char(' ').many());
        let cursor = start("alpha beta");
        let first = p.run(cursor);
        let second = p.run(cursor);
        assert_eq!(first, second);
    }
}
