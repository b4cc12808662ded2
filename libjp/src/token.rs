//! Control-token classification.
//!
//! A control token is decided by the first significant byte of the next
//! construct. It steers the parser: an `ObjectOpen` starts an object, a
//! `Comma` continues the enclosing container, and so on. Tokens are never
//! cached; the parser reclassifies at every structural step.

use crate::error::{ParseError, Result};
use crate::scanner::Scanner;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlToken {
    ObjectOpen,
    ObjectClose,
    ArrayOpen,
    ArrayClose,
    Comma,
    StringMarker,
    Colon,
    BoolMarker,
    NumberMarker,
    NullMarker,
    Invalid,
}

impl ControlToken {
    /// Classify a single byte.
    pub fn classify(b: u8) -> Self {
        match b {
            b'{' => ControlToken::ObjectOpen,
            b'}' => ControlToken::ObjectClose,
            b'[' => ControlToken::ArrayOpen,
            b']' => ControlToken::ArrayClose,
            b',' => ControlToken::Comma,
            b'"' => ControlToken::StringMarker,
            b':' => ControlToken::Colon,
            b't' | b'f' => ControlToken::BoolMarker,
            b'n' => ControlToken::NullMarker,
            b'-' | b'0'..=b'9' => ControlToken::NumberMarker,
            _ => ControlToken::Invalid,
        }
    }

    /// Name used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            ControlToken::ObjectOpen => "'{'",
            ControlToken::ObjectClose => "'}'",
            ControlToken::ArrayOpen => "'['",
            ControlToken::ArrayClose => "']'",
            ControlToken::Comma => "','",
            ControlToken::Colon => "':'",
            ControlToken::StringMarker => "a string",
            ControlToken::NumberMarker => "a number",
            ControlToken::BoolMarker => "true or false",
            ControlToken::NullMarker => "null",
            ControlToken::Invalid => "invalid",
        }
    }
}

/// Skip whitespace and classify the next byte without consuming it.
///
/// `expected` names what the caller wants next; it is reported if the input
/// has already run out.
pub fn next_token(scanner: &mut Scanner<'_>, expected: &str) -> Result<ControlToken> {
    scanner.skip_space();
    match scanner.peek() {
        Some(b) => Ok(ControlToken::classify(b)),
        None => Err(ParseError::UnexpectedEnd {
            expected: expected.to_string(),
            context: scanner.error_context(),
        }),
    }
}
