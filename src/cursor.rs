//! `cursor` – immutable read position into the source text.
//
//  A cursor is a `(&str, byte offset)` pair. Every step hands back a *new*
//  cursor, so trying an alternative is just reusing the old value.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor<'a> {
    src: &'a str,
    pos: usize, // always <= src.len() and on a char boundary
}

impl<'a> Cursor<'a> {
    /// Cursor at the start of `src`.
    pub fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    /// Cursor at byte `offset` of `src`.
    ///
    /// `offset == src.len()` is the end-of-input cursor. Offsets past the end
    /// or inside a multi-byte character give `None`.
    pub fn at(src: &'a str, offset: usize) -> Option<Self> {
        if src.is_char_boundary(offset) {
            Some(Self { src, pos: offset })
        } else {
            None
        }
    }

    /// Character under the cursor, `None` at end of input.
    #[inline]
    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Cursor one character further on. Refuses to move past the end.
    #[inline]
    pub fn advance(&self) -> Option<Self> {
        let c = self.peek()?;
        Some(Self {
            src: self.src,
            pos: self.pos + c.len_utf8(),
        })
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    /// Unconsumed input.
    #[inline]
    pub fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    /// The whole input this cursor walks over.
    pub fn source(&self) -> &'a str {
        self.src
    }

    /// Text between `self` and a later cursor over the same input.
    pub fn slice_to(&self, later: &Cursor<'a>) -> &'a str {
        &self.src[self.pos..later.pos.max(self.pos)]
    }
}
