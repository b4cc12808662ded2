//! A recursive-descent JSON parser following the json.org grammar.
//!
//! The parser reads a borrowed input text and produces a [`Value`] tree, or
//! stops at the first error with a [`ParseError`] that says what was expected,
//! what was found, and where.
//!
//! # Parsing Pipeline
//!
//! 1. **Scanner**: a forward-only cursor over the input bytes that skips
//!    whitespace and matches keywords.
//!
//! 2. **Token classifier**: looks at the next significant byte and decides
//!    which construct comes next (object, array, string, number, bool, null,
//!    or a delimiter).
//!
//! 3. **Value parser**: dispatches on the token, parses the construct, and
//!    recurses into nested objects and arrays up to a configurable depth.
//!
//! Numbers are evaluated digit by digit into an `f64`; see the `number`
//! module for the precision this gives. `\uXXXX` escapes are not supported.

mod encode;
mod error;
mod number;
mod options;
mod parser;
mod scanner;
mod token;
mod value;

pub use encode::{encode, Format};
pub use error::{ErrorContext, ErrorKind, ParseContext, ParseError, Result, TypeError};
pub use options::{ParseOptions, DEFAULT_MAX_DEPTH};
pub use parser::Parser;
pub use value::{Value, ValueKind};

/// Parse a JSON document from a string.
///
/// # Example
///
/// ```
/// use libjp::parse;
///
/// let value = parse(r#"{"name": "John", "age": 31}"#).unwrap();
/// assert_eq!(value.get("name").and_then(|v| v.as_str()), Some("John"));
/// assert_eq!(value.get("age").and_then(|v| v.as_number()), Some(31.0));
/// ```
pub fn parse(input: &str) -> Result<Value> {
    parse_with_filename(input, None)
}

/// Parse a JSON document from a string with a filename for error messages.
pub fn parse_with_filename(input: &str, filename: Option<&str>) -> Result<Value> {
    let ctx = ParseContext::new(filename);
    parser::parse_root(input, &ctx, ParseOptions::default())
}

/// Parse a JSON document with explicit options.
pub fn parse_with_options(input: &str, options: &ParseOptions) -> Result<Value> {
    let ctx = ParseContext::new(None);
    parser::parse_root(input, &ctx, *options)
}

/// Parse a JSON document with both a context and explicit options.
pub fn parse_with_context(input: &str, ctx: &ParseContext, options: &ParseOptions) -> Result<Value> {
    parser::parse_root(input, ctx, *options)
}
