//! Error types for JSON parsing.

use std::fmt;

use thiserror::Error;

use crate::value::ValueKind;

/// Result type for JSON parsing operations.
pub type Result<T> = std::result::Result<T, ParseError>;

/// Number of input bytes shown on each side of the cursor in an error window.
pub const SURROUNDING_WIDTH: usize = 10;

/// Parse context carrying filename for error reporting.
#[derive(Clone, Debug, Default)]
pub struct ParseContext {
    pub filename: Option<String>,
}

impl ParseContext {
    /// Create a new parse context.
    pub fn new(filename: Option<&str>) -> Self {
        Self {
            filename: filename.map(String::from),
        }
    }

    /// Format a location suffix for error messages.
    pub fn loc_suffix(&self, line: usize, col: usize) -> String {
        match &self.filename {
            Some(name) => format!(" at {}:{} of <{}>", line + 1, col + 1, name),
            None => format!(" at {}:{}", line + 1, col + 1),
        }
    }
}

/// Where a parse failed, with the surrounding input rendered for display.
///
/// `line` and `col` are zero-based; `col` counts characters from the start
/// of the line. `window` holds up to [`SURROUNDING_WIDTH`] bytes before the
/// cursor, the byte under the cursor, and up to [`SURROUNDING_WIDTH`] bytes
/// after it. `caret` is the character column of the cursor inside `window`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ErrorContext {
    pub offset: usize,
    pub line: usize,
    pub col: usize,
    pub location: String,
    pub window: String,
    pub caret: usize,
}

impl ErrorContext {
    /// Capture the context around `offset` in `input`.
    pub fn capture(input: &[u8], offset: usize, ctx: &ParseContext) -> Self {
        let offset = offset.min(input.len());
        let consumed = &input[..offset];
        let line = consumed.iter().filter(|&&b| b == b'\n').count();
        let line_start = consumed
            .iter()
            .rposition(|&b| b == b'\n')
            .map_or(0, |i| i + 1);
        let col = String::from_utf8_lossy(&consumed[line_start..])
            .chars()
            .count();

        let window_start = offset.saturating_sub(SURROUNDING_WIDTH);
        let window_end = if offset < input.len() {
            (offset + 1 + SURROUNDING_WIDTH).min(input.len())
        } else {
            offset
        };
        let before = render_window(&input[window_start..offset]);
        let after = render_window(&input[offset..window_end]);
        let caret = before.chars().count();

        Self {
            offset,
            line,
            col,
            location: ctx.loc_suffix(line, col),
            window: before + &after,
            caret,
        }
    }

    /// The two-line snippet: the input window and a caret under the cursor.
    pub fn snippet(&self) -> String {
        format!("{}\n{}^", self.window, " ".repeat(self.caret))
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n{}", self.location, self.snippet())
    }
}

/// Whitespace is flattened so the caret line stays aligned with the window.
fn render_window(bytes: &[u8]) -> String {
    let flat: Vec<u8> = bytes
        .iter()
        .map(|&b| if b.is_ascii_whitespace() || b == 0x0b { b' ' } else { b })
        .collect();
    String::from_utf8_lossy(&flat).into_owned()
}

/// Broad classification of a [`ParseError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A delimiter was missing or misplaced.
    Structural,
    /// A string or number literal was malformed.
    Lexical,
    /// The input ended while more was required.
    UnexpectedEnd,
    /// A complete value was followed by more content.
    TrailingInput,
    /// A character or keyword started none of the known constructs.
    UnrecognizedLiteral,
    /// Objects and arrays were nested past the configured limit.
    DepthExceeded,
}

/// Error type for JSON parsing.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum ParseError {
    /// Input was empty or held only whitespace.
    #[error("no value found in input{0}")]
    Empty(ErrorContext),

    /// Input ended where a token was required.
    #[error("unexpected end of input, expected {expected}{context}")]
    UnexpectedEnd {
        expected: String,
        context: ErrorContext,
    },

    /// A structural token other than the expected one.
    #[error("expected {expected}, found {found}{context}")]
    UnexpectedToken {
        expected: String,
        found: String,
        context: ErrorContext,
    },

    /// A structural token where a value should start.
    #[error("value expected, found {found}{context}")]
    ValueExpected { found: String, context: ErrorContext },

    /// A character that starts no value.
    #[error("value expected, found '{found}'{context}")]
    UnrecognizedChar { found: char, context: ErrorContext },

    /// A `t`, `f` or `n` that did not spell a keyword.
    #[error("invalid {literal} value, expected {expected}{context}")]
    InvalidLiteral {
        literal: &'static str,
        expected: &'static str,
        context: ErrorContext,
    },

    /// Input ended inside a string.
    #[error("reached end of input, expected '\"'{0}")]
    UnterminatedString(ErrorContext),

    /// A backslash followed by an unsupported character.
    #[error("invalid escape char '\\{found}'{context}")]
    InvalidEscape { found: char, context: ErrorContext },

    /// Unescaped whitespace other than a space inside a string.
    #[error("literal whitespace not allowed in string, found {found:?}{context}")]
    LiteralWhitespace { found: char, context: ErrorContext },

    /// Unescaped control character inside a string.
    #[error("control character {found:?} not allowed in string{context}")]
    ControlCharacter { found: char, context: ErrorContext },

    /// A number without its integer digits.
    #[error("expected a digit, found {found}{context}")]
    ExpectedDigit { found: String, context: ErrorContext },

    /// A zero integer part followed by more digits.
    #[error("leading zero in number{0}")]
    LeadingZero(ErrorContext),

    /// A decimal point without fraction digits.
    #[error("expected a digit after '.', found {found}{context}")]
    MissingFraction { found: String, context: ErrorContext },

    /// An exponent marker without exponent digits.
    #[error("expected a digit or sign in exponent, found {found}{context}")]
    MissingExponent { found: String, context: ErrorContext },

    /// Content after the top-level value.
    #[error("unexpected content after value, found {found}{context}")]
    TrailingInput { found: String, context: ErrorContext },

    /// Containers nested past the limit.
    #[error("nesting deeper than {limit} levels{context}")]
    DepthExceeded { limit: usize, context: ErrorContext },
}

impl ParseError {
    /// The broad category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ParseError::Empty(_) | ParseError::UnexpectedEnd { .. } => ErrorKind::UnexpectedEnd,
            ParseError::UnexpectedToken { .. } | ParseError::ValueExpected { .. } => {
                ErrorKind::Structural
            }
            ParseError::UnrecognizedChar { .. } | ParseError::InvalidLiteral { .. } => {
                ErrorKind::UnrecognizedLiteral
            }
            ParseError::UnterminatedString(_)
            | ParseError::InvalidEscape { .. }
            | ParseError::LiteralWhitespace { .. }
            | ParseError::ControlCharacter { .. }
            | ParseError::ExpectedDigit { .. }
            | ParseError::LeadingZero(_)
            | ParseError::MissingFraction { .. }
            | ParseError::MissingExponent { .. } => ErrorKind::Lexical,
            ParseError::TrailingInput { .. } => ErrorKind::TrailingInput,
            ParseError::DepthExceeded { .. } => ErrorKind::DepthExceeded,
        }
    }

    /// Where the error happened.
    pub fn context(&self) -> &ErrorContext {
        match self {
            ParseError::Empty(context)
            | ParseError::UnterminatedString(context)
            | ParseError::LeadingZero(context)
            | ParseError::UnexpectedEnd { context, .. }
            | ParseError::UnexpectedToken { context, .. }
            | ParseError::ValueExpected { context, .. }
            | ParseError::UnrecognizedChar { context, .. }
            | ParseError::InvalidLiteral { context, .. }
            | ParseError::InvalidEscape { context, .. }
            | ParseError::LiteralWhitespace { context, .. }
            | ParseError::ControlCharacter { context, .. }
            | ParseError::ExpectedDigit { context, .. }
            | ParseError::MissingFraction { context, .. }
            | ParseError::MissingExponent { context, .. }
            | ParseError::TrailingInput { context, .. }
            | ParseError::DepthExceeded { context, .. } => context,
        }
    }

    /// The construct the parser was looking for, when one was named.
    pub fn expected(&self) -> Option<&str> {
        match self {
            ParseError::UnexpectedEnd { expected, .. }
            | ParseError::UnexpectedToken { expected, .. } => Some(expected),
            ParseError::InvalidLiteral { expected, .. } => Some(expected),
            ParseError::ValueExpected { .. } | ParseError::UnrecognizedChar { .. } => {
                Some("a value")
            }
            ParseError::UnterminatedString(_) => Some("'\"'"),
            ParseError::ExpectedDigit { .. }
            | ParseError::MissingFraction { .. }
            | ParseError::MissingExponent { .. } => Some("a digit"),
            ParseError::TrailingInput { .. } => Some("end of input"),
            _ => None,
        }
    }

    /// The construct actually found, when one was recorded.
    pub fn found(&self) -> Option<String> {
        match self {
            ParseError::UnexpectedToken { found, .. }
            | ParseError::ValueExpected { found, .. }
            | ParseError::ExpectedDigit { found, .. }
            | ParseError::MissingFraction { found, .. }
            | ParseError::MissingExponent { found, .. }
            | ParseError::TrailingInput { found, .. } => Some(found.clone()),
            ParseError::UnrecognizedChar { found, .. }
            | ParseError::InvalidEscape { found, .. }
            | ParseError::LiteralWhitespace { found, .. }
            | ParseError::ControlCharacter { found, .. } => Some(format!("{:?}", found)),
            _ => None,
        }
    }
}

/// Error returned by the typed getters on [`crate::Value`].
#[derive(Error, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypeError {
    #[error("wrong type: expected {expected}, found {found}")]
    WrongType { expected: ValueKind, found: ValueKind },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loc_suffix() {
        assert_eq!(ParseContext::new(None).loc_suffix(0, 4), " at 1:5");
        assert_eq!(
            ParseContext::new(Some("a.json")).loc_suffix(2, 0),
            " at 3:1 of <a.json>"
        );
    }

    #[test]
    fn test_capture_window_clips_to_width() {
        let input = b"0123456789abcdefghijKLMNOPQRSTUVWXYZ";
        let context = ErrorContext::capture(input, 20, &ParseContext::default());
        assert_eq!(context.window, "abcdefghijKLMNOPQRSTU");
        assert_eq!(context.caret, 10);
        assert_eq!(context.snippet(), "abcdefghijKLMNOPQRSTU\n          ^");
    }

    #[test]
    fn test_capture_at_start() {
        let context = ErrorContext::capture(b"{\"a\" }", 0, &ParseContext::default());
        assert_eq!(context.window, "{\"a\" }");
        assert_eq!(context.caret, 0);
        assert_eq!((context.line, context.col), (0, 0));
    }

    #[test]
    fn test_capture_at_end() {
        let context = ErrorContext::capture(b"[1, 2", 5, &ParseContext::default());
        assert_eq!(context.window, "[1, 2");
        assert_eq!(context.caret, 5);
        assert!(context.snippet().ends_with("     ^"));
    }

    #[test]
    fn test_capture_counts_lines() {
        let context = ErrorContext::capture(b"{\n  \"a\": x\n}", 9, &ParseContext::default());
        assert_eq!(context.line, 1);
        assert_eq!(context.col, 7);
        assert_eq!(context.location, " at 2:8");
        // The newline is flattened to a space in the window.
        assert_eq!(context.window, "{   \"a\": x }");
        assert_eq!(context.caret, 9);
    }

    #[test]
    fn test_error_display() {
        let context = ErrorContext::capture(b"{\"a\" }", 5, &ParseContext::default());
        let err = ParseError::UnexpectedToken {
            expected: "':'".into(),
            found: "'}'".into(),
            context,
        };
        assert_eq!(
            err.to_string(),
            "expected ':', found '}' at 1:6\n{\"a\" }\n     ^"
        );
        assert_eq!(err.kind(), ErrorKind::Structural);
        assert_eq!(err.expected(), Some("':'"));
        assert_eq!(err.found().as_deref(), Some("'}'"));
    }

    #[test]
    fn test_unterminated_string_display() {
        let context = ErrorContext::capture(b"\"abc", 4, &ParseContext::new(Some("s.json")));
        let err = ParseError::UnterminatedString(context);
        assert_eq!(
            err.to_string(),
            "reached end of input, expected '\"' at 1:5 of <s.json>\n\"abc\n    ^"
        );
        assert_eq!(err.kind(), ErrorKind::Lexical);
    }

    #[test]
    fn test_type_error_display() {
        let err = TypeError::WrongType {
            expected: ValueKind::Object,
            found: ValueKind::Number,
        };
        assert_eq!(
            err.to_string(),
            "wrong type: expected an object, found a number"
        );
    }
}
