//! Input cursor.
//!
//! The scanner walks the input one byte at a time. It owns nothing: the
//! source text is borrowed from the caller and the only mutable state is the
//! current offset, which never moves backward. Error contexts are rendered by
//! reading around the offset without moving it.

use crate::error::{ErrorContext, ParseContext};

/// Whitespace accepted between tokens: space, `\t`, `\n`, `\v`, `\f`, `\r`.
pub fn is_space(b: u8) -> bool {
    b == b' ' || (b'\t'..=b'\r').contains(&b)
}

/// A forward-only cursor over the input text.
pub struct Scanner<'a> {
    source: &'a str,
    pos: usize,
    ctx: &'a ParseContext,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str, ctx: &'a ParseContext) -> Self {
        Self {
            source,
            pos: 0,
            ctx,
        }
    }

    /// Current byte offset.
    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.source.len()
    }

    /// The byte under the cursor.
    pub fn peek(&self) -> Option<u8> {
        self.source.as_bytes().get(self.pos).copied()
    }

    /// The byte `n` positions past the cursor.
    pub fn peek_at(&self, n: usize) -> Option<u8> {
        self.source.as_bytes().get(self.pos + n).copied()
    }

    /// Whether the byte under the cursor is an ASCII digit.
    pub fn at_digit(&self) -> bool {
        self.peek().is_some_and(|b| b.is_ascii_digit())
    }

    pub fn advance(&mut self) {
        if self.pos < self.source.len() {
            self.pos += 1;
        }
    }

    pub fn skip_space(&mut self) {
        while self.peek().is_some_and(is_space) {
            self.pos += 1;
        }
    }

    /// Match `keyword` byte for byte at the cursor. On success the cursor
    /// moves past it; on failure it stays put.
    pub fn match_keyword(&mut self, keyword: &[u8]) -> bool {
        for (i, &expected) in keyword.iter().enumerate() {
            if self.peek_at(i) != Some(expected) {
                return false;
            }
        }
        self.pos += keyword.len();
        true
    }

    /// Source text between two byte offsets. Both offsets must sit next to
    /// an ASCII delimiter so they fall on character boundaries.
    pub fn slice(&self, start: usize, end: usize) -> &'a str {
        &self.source[start..end]
    }

    /// The character under the cursor, if the cursor is on a boundary.
    pub fn current_char(&self) -> Option<char> {
        self.source.get(self.pos..).and_then(|rest| rest.chars().next())
    }

    /// Name of whatever sits under the cursor, for error messages.
    pub fn describe_current(&self) -> String {
        match (self.current_char(), self.peek()) {
            (Some(c), _) => format!("{:?}", c),
            (None, Some(b)) => format!("byte 0x{:02x}", b),
            (None, None) => "end of input".to_string(),
        }
    }

    /// Snapshot of the input around the cursor.
    pub fn error_context(&self) -> ErrorContext {
        ErrorContext::capture(self.source.as_bytes(), self.pos, self.ctx)
    }
}
