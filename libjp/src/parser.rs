//! Recursive-descent value parser.
//!
//! The parser peeks a control token, dispatches to the matching construct
//! parser, and recurses for nested values. Objects and arrays run small
//! state machines:
//!
//! - object: key or `}` → `:` → value → `,` or `}` (back to key on `,`)
//! - array: value or `]` → `,` or `]` (back to value on `,`)
//!
//! The first failure aborts the parse; nothing partial is returned.

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::error::{ParseContext, ParseError, Result};
use crate::number;
use crate::options::ParseOptions;
use crate::scanner::{is_space, Scanner};
use crate::token::{next_token, ControlToken};
use crate::value::Value;

/// Bytes allowed after a backslash inside a string.
fn is_escape_follower(b: u8) -> bool {
    matches!(b, b'"' | b'\\' | b'/' | b'b' | b'f' | b'n' | b'r' | b't')
}

/// Parser over a single input text.
pub struct Parser<'a> {
    scanner: Scanner<'a>,
    options: ParseOptions,
    depth: usize,
}

impl<'a> Parser<'a> {
    /// Create a parser for `input`. Errors are located using `ctx`.
    pub fn new(input: &'a str, ctx: &'a ParseContext, options: ParseOptions) -> Self {
        Self {
            scanner: Scanner::new(input, ctx),
            options,
            depth: 0,
        }
    }

    /// Parse the whole input as exactly one value.
    pub fn parse(mut self) -> Result<Value> {
        self.scanner.skip_space();
        if self.scanner.is_at_end() {
            return Err(ParseError::Empty(self.scanner.error_context()));
        }

        let value = self.parse_next_value()?;

        self.scanner.skip_space();
        if !self.scanner.is_at_end() {
            return Err(ParseError::TrailingInput {
                found: self.scanner.describe_current(),
                context: self.scanner.error_context(),
            });
        }
        Ok(value)
    }

    // ========================================================================
    // Dispatch
    // ========================================================================

    fn parse_next_value(&mut self) -> Result<Value> {
        let token = next_token(&mut self.scanner, "a value")?;
        self.parse_value(token)
    }

    /// Parse the value introduced by `token`, which was classified from the
    /// byte under the cursor.
    fn parse_value(&mut self, token: ControlToken) -> Result<Value> {
        match token {
            ControlToken::ObjectOpen => {
                self.descend("object")?;
                let object = self.parse_object()?;
                self.depth -= 1;
                Ok(Value::Object(object))
            }
            ControlToken::ArrayOpen => {
                self.descend("array")?;
                let array = self.parse_array()?;
                self.depth -= 1;
                Ok(Value::Array(array))
            }
            ControlToken::StringMarker => Ok(Value::String(self.parse_string()?)),
            ControlToken::BoolMarker => Ok(Value::Bool(self.parse_bool()?)),
            ControlToken::NumberMarker => Ok(Value::Number(number::parse_number(
                &mut self.scanner,
            )?)),
            ControlToken::NullMarker => {
                self.parse_null()?;
                Ok(Value::Null)
            }
            ControlToken::Invalid => Err(match self.scanner.current_char() {
                Some(found) => ParseError::UnrecognizedChar {
                    found,
                    context: self.scanner.error_context(),
                },
                None => ParseError::ValueExpected {
                    found: self.scanner.describe_current(),
                    context: self.scanner.error_context(),
                },
            }),
            ControlToken::ObjectClose
            | ControlToken::ArrayClose
            | ControlToken::Comma
            | ControlToken::Colon => Err(ParseError::ValueExpected {
                found: token.name().to_string(),
                context: self.scanner.error_context(),
            }),
        }
    }

    fn descend(&mut self, what: &str) -> Result<()> {
        self.depth += 1;
        trace!(depth = self.depth, offset = self.scanner.pos(), "entering {}", what);
        if self.depth > self.options.max_depth {
            return Err(ParseError::DepthExceeded {
                limit: self.options.max_depth,
                context: self.scanner.error_context(),
            });
        }
        Ok(())
    }

    /// Fail unless `actual` is `expected`.
    fn expect(&self, expected: ControlToken, actual: ControlToken) -> Result<()> {
        if actual == expected {
            Ok(())
        } else {
            Err(self.unexpected(expected.name(), actual))
        }
    }

    fn unexpected(&self, expected: &str, actual: ControlToken) -> ParseError {
        let found = match actual {
            ControlToken::Invalid => self.scanner.describe_current(),
            _ => actual.name().to_string(),
        };
        ParseError::UnexpectedToken {
            expected: expected.to_string(),
            found,
            context: self.scanner.error_context(),
        }
    }

    // ========================================================================
    // Containers
    // ========================================================================

    fn parse_object(&mut self) -> Result<HashMap<String, Value>> {
        debug_assert_eq!(self.scanner.peek(), Some(b'{'));
        self.scanner.advance();

        let mut obj = HashMap::new();

        let mut token = next_token(&mut self.scanner, "a string or '}'")?;
        if token == ControlToken::ObjectClose {
            self.scanner.advance();
            return Ok(obj);
        }

        loop {
            self.expect(ControlToken::StringMarker, token)?;
            let key = self.parse_string()?;

            token = next_token(&mut self.scanner, "':'")?;
            self.expect(ControlToken::Colon, token)?;
            self.scanner.advance();

            let value = self.parse_next_value()?;
            obj.insert(key, value);

            match next_token(&mut self.scanner, "',' or '}'")? {
                ControlToken::Comma => {
                    self.scanner.advance();
                    token = next_token(&mut self.scanner, "a string")?;
                }
                ControlToken::ObjectClose => break,
                other => return Err(self.unexpected("',' or '}'", other)),
            }
        }

        debug_assert_eq!(self.scanner.peek(), Some(b'}'));
        self.scanner.advance();
        Ok(obj)
    }

    fn parse_array(&mut self) -> Result<Vec<Value>> {
        debug_assert_eq!(self.scanner.peek(), Some(b'['));
        self.scanner.advance();

        let mut arr = Vec::new();

        let mut token = next_token(&mut self.scanner, "a value or ']'")?;
        if token == ControlToken::ArrayClose {
            self.scanner.advance();
            return Ok(arr);
        }

        loop {
            arr.push(self.parse_value(token)?);

            match next_token(&mut self.scanner, "',' or ']'")? {
                ControlToken::Comma => {
                    self.scanner.advance();
                    token = next_token(&mut self.scanner, "a value")?;
                }
                ControlToken::ArrayClose => break,
                other => return Err(self.unexpected("',' or ']'", other)),
            }
        }

        debug_assert_eq!(self.scanner.peek(), Some(b']'));
        self.scanner.advance();
        Ok(arr)
    }

    // ========================================================================
    // Scalars
    // ========================================================================

    /// Parse a quoted string. The first pass validates and counts escapes;
    /// only strings that contain escapes are rebuilt.
    fn parse_string(&mut self) -> Result<String> {
        debug_assert_eq!(self.scanner.peek(), Some(b'"'));
        self.scanner.advance();

        let start = self.scanner.pos();
        let mut escapes = 0;
        loop {
            match self.scanner.peek() {
                None => {
                    return Err(ParseError::UnterminatedString(
                        self.scanner.error_context(),
                    ))
                }
                Some(b'"') => break,
                Some(b'\\') => {
                    self.scanner.advance();
                    match self.scanner.peek() {
                        Some(b) if is_escape_follower(b) => escapes += 1,
                        Some(_) => {
                            return Err(ParseError::InvalidEscape {
                                found: self.scanner.current_char().unwrap_or('\u{fffd}'),
                                context: self.scanner.error_context(),
                            })
                        }
                        None => {
                            return Err(ParseError::UnterminatedString(
                                self.scanner.error_context(),
                            ))
                        }
                    }
                }
                Some(b' ') => {}
                Some(b) if is_space(b) => {
                    return Err(ParseError::LiteralWhitespace {
                        found: char::from(b),
                        context: self.scanner.error_context(),
                    })
                }
                Some(b) if b < 0x20 => {
                    return Err(ParseError::ControlCharacter {
                        found: char::from(b),
                        context: self.scanner.error_context(),
                    })
                }
                Some(_) => {}
            }
            self.scanner.advance();
        }

        let raw = self.scanner.slice(start, self.scanner.pos());
        self.scanner.advance();

        if escapes == 0 {
            Ok(raw.to_string())
        } else {
            Ok(unescape(raw, escapes))
        }
    }

    fn parse_bool(&mut self) -> Result<bool> {
        if self.scanner.match_keyword(b"true") {
            return Ok(true);
        }
        if self.scanner.match_keyword(b"false") {
            return Ok(false);
        }
        Err(ParseError::InvalidLiteral {
            literal: "bool",
            expected: "true or false",
            context: self.scanner.error_context(),
        })
    }

    fn parse_null(&mut self) -> Result<()> {
        if self.scanner.match_keyword(b"null") {
            return Ok(());
        }
        Err(ParseError::InvalidLiteral {
            literal: "null",
            expected: "null",
            context: self.scanner.error_context(),
        })
    }
}

/// Substitute escape sequences in an already validated string body.
fn unescape(raw: &str, escapes: usize) -> String {
    let mut out = String::with_capacity(raw.len() - escapes);
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('b') => out.push('\x08'),
            Some('f') => out.push('\x0c'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

/// Parse `input` with the given context and options, logging the outcome.
pub fn parse_root(input: &str, ctx: &ParseContext, options: ParseOptions) -> Result<Value> {
    debug!(
        len = input.len(),
        filename = ?ctx.filename,
        "parsing"
    );
    let result = Parser::new(input, ctx, options).parse();
    if let Err(err) = &result {
        debug!(offset = err.context().offset, kind = ?err.kind(), "parse failed");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn parse(input: &str) -> Result<Value> {
        parse_root(input, &ParseContext::default(), ParseOptions::default())
    }

    fn parse_depth(input: &str, max_depth: usize) -> Result<Value> {
        let options = ParseOptions::new().with_max_depth(max_depth);
        parse_root(input, &ParseContext::default(), options)
    }

    #[test]
    fn test_parse_scalars() {
        assert_eq!(parse("null").unwrap(), Value::Null);
        assert_eq!(parse("true").unwrap(), Value::Bool(true));
        assert_eq!(parse("false").unwrap(), Value::Bool(false));
        assert_eq!(parse("42").unwrap(), Value::Number(42.0));
        assert_eq!(parse("\"hi\"").unwrap(), Value::String("hi".into()));
    }

    #[test]
    fn test_parse_empty_object() {
        let value = parse("{}").unwrap();
        assert_eq!(value.get_object().unwrap().len(), 0);
        assert!(parse(" { } ").unwrap().is_object());
    }

    #[test]
    fn test_parse_empty_array() {
        let value = parse("{\"name\":[]}").unwrap();
        assert_eq!(value.get("name").unwrap().get_array().unwrap().len(), 0);
        assert_eq!(parse("[ ]").unwrap(), Value::Array(vec![]));
    }

    #[test]
    fn test_parse_object_fields() {
        let value = parse(r#"{"name":"Adam","val":true,"nothing":null}"#).unwrap();
        assert_eq!(value.get("name").unwrap().get_string().unwrap(), "Adam");
        assert!(value.get("val").unwrap().get_bool().unwrap());
        assert!(value.get("nothing").unwrap().is_null());
    }

    #[test]
    fn test_parse_complex() {
        let value = parse(
            r#"{"name":"Carl","age":-0.010,"food":["spaghetti","ice-cream"],"sub":{"fake":-10.94}}"#,
        )
        .unwrap();
        let obj = value.get_object().unwrap();
        assert_eq!(obj["name"].get_string().unwrap(), "Carl");
        assert_eq!(obj["age"].get_number().unwrap(), -0.01);
        assert_eq!(
            obj["food"],
            Value::Array(vec!["spaghetti".into(), "ice-cream".into()])
        );
        let fake = obj["sub"].get("fake").unwrap().get_number().unwrap();
        assert!((fake + 10.94).abs() < 1e-12);
    }

    #[test]
    fn test_parse_array_order() {
        let value = parse("[3, \"two\", [1], {}, false]").unwrap();
        let arr = value.get_array().unwrap();
        assert_eq!(arr.len(), 5);
        assert_eq!(arr[0], Value::Number(3.0));
        assert_eq!(arr[1], Value::String("two".into()));
        assert_eq!(arr[2], Value::Array(vec![Value::Number(1.0)]));
        assert!(arr[3].is_object());
        assert_eq!(arr[4], Value::Bool(false));
    }

    #[test]
    fn test_duplicate_keys_last_wins() {
        let value = parse(r#"{"a":1,"a":2}"#).unwrap();
        let obj = value.get_object().unwrap();
        assert_eq!(obj.len(), 1);
        assert_eq!(obj["a"], Value::Number(2.0));
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(
            parse(r#""a\"b\\c\/d""#).unwrap(),
            Value::String("a\"b\\c/d".into())
        );
        assert_eq!(
            parse(r#""\b\f\n\r\t""#).unwrap(),
            Value::String("\x08\x0c\n\r\t".into())
        );
        assert_eq!(parse(r#""\\\\""#).unwrap(), Value::String("\\\\".into()));
    }

    #[test]
    fn test_string_keeps_spaces_and_unicode() {
        assert_eq!(
            parse("\"  héllo wörld ✓ \"").unwrap(),
            Value::String("  héllo wörld ✓ ".into())
        );
    }

    #[test]
    fn test_string_literal_whitespace() {
        let err = parse("{\"a\":\"x\ny\"}").unwrap_err();
        assert!(matches!(err, ParseError::LiteralWhitespace { found: '\n', .. }));
        assert_eq!(err.kind(), ErrorKind::Lexical);
        assert_eq!(err.context().offset, 7);
        assert!(matches!(
            parse("\"a\tb\""),
            Err(ParseError::LiteralWhitespace { found: '\t', .. })
        ));
    }

    #[test]
    fn test_string_control_character() {
        assert!(matches!(
            parse("\"a\u{1}b\""),
            Err(ParseError::ControlCharacter { found: '\u{1}', .. })
        ));
    }

    #[test]
    fn test_string_invalid_escape() {
        let err = parse(r#""\x""#).unwrap_err();
        assert!(matches!(err, ParseError::InvalidEscape { found: 'x', .. }));
        assert!(matches!(
            parse(r#""\u0041""#),
            Err(ParseError::InvalidEscape { found: 'u', .. })
        ));
    }

    #[test]
    fn test_string_unterminated() {
        let err = parse("\"unterminated").unwrap_err();
        assert!(matches!(err, ParseError::UnterminatedString(_)));
        assert!(err.to_string().starts_with("reached end of input, expected '\"'"));
        assert!(matches!(
            parse("\"ends in escape\\"),
            Err(ParseError::UnterminatedString(_))
        ));
    }

    #[test]
    fn test_invalid_literals() {
        for input in ["tru", "fals", "trUe", "t"] {
            let err = parse(input).unwrap_err();
            assert!(
                matches!(err, ParseError::InvalidLiteral { literal: "bool", .. }),
                "{}",
                input
            );
            assert_eq!(err.kind(), ErrorKind::UnrecognizedLiteral);
        }
        assert!(matches!(
            parse("nul"),
            Err(ParseError::InvalidLiteral { literal: "null", .. })
        ));
        assert!(matches!(
            parse("[nil]"),
            Err(ParseError::InvalidLiteral { literal: "null", .. })
        ));
    }

    #[test]
    fn test_unrecognized_char() {
        let err = parse("@invalid").unwrap_err();
        assert!(matches!(err, ParseError::UnrecognizedChar { found: '@', .. }));
        assert_eq!(err.kind(), ErrorKind::UnrecognizedLiteral);
        assert!(matches!(
            parse("[+1]"),
            Err(ParseError::UnrecognizedChar { found: '+', .. })
        ));
    }

    #[test]
    fn test_value_expected() {
        let err = parse(",").unwrap_err();
        assert!(matches!(err, ParseError::ValueExpected { ref found, .. } if found == "','"));
        assert_eq!(err.kind(), ErrorKind::Structural);

        let err = parse(r#"{"a":[ :}"#).unwrap_err();
        assert!(matches!(err, ParseError::ValueExpected { ref found, .. } if found == "':'"));

        assert!(matches!(parse("[1,]"), Err(ParseError::ValueExpected { .. })));
    }

    #[test]
    fn test_object_structural_errors() {
        let err = parse(r#"{"num": 10, }"#).unwrap_err();
        assert_eq!(err.expected(), Some("a string"));
        assert_eq!(err.found().as_deref(), Some("'}'"));

        let err = parse(r#"{"name" }"#).unwrap_err();
        assert_eq!(err.expected(), Some("':'"));
        assert_eq!(err.found().as_deref(), Some("'}'"));

        let err = parse("{1: 2}").unwrap_err();
        assert_eq!(err.expected(), Some("a string"));
        assert_eq!(err.found().as_deref(), Some("a number"));

        let err = parse(r#"{"a": 1 "b": 2}"#).unwrap_err();
        assert_eq!(err.expected(), Some("',' or '}'"));
        assert_eq!(err.found().as_deref(), Some("a string"));
    }

    #[test]
    fn test_array_structural_errors() {
        let err = parse("[1 2]").unwrap_err();
        assert_eq!(err.expected(), Some("',' or ']'"));
        assert_eq!(err.found().as_deref(), Some("a number"));

        let err = parse("[1}").unwrap_err();
        assert_eq!(err.found().as_deref(), Some("'}'"));

        let err = parse("[1 @]").unwrap_err();
        assert_eq!(err.found().as_deref(), Some("'@'"));
    }

    #[test]
    fn test_unexpected_end() {
        for input in ["[1, 2", "{\"a\": 1", "{\"a\"", "{", "[", "{\"a\":"] {
            let err = parse(input).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::UnexpectedEnd, "{}", input);
            assert_eq!(err.context().offset, input.len(), "{}", input);
        }
        let err = parse("[1, 2").unwrap_err();
        assert_eq!(err.expected(), Some("',' or ']'"));
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(parse(""), Err(ParseError::Empty(_))));
        assert!(matches!(parse(" \n\t "), Err(ParseError::Empty(_))));
    }

    #[test]
    fn test_trailing_input() {
        let err = parse("{} x").unwrap_err();
        assert!(matches!(err, ParseError::TrailingInput { ref found, .. } if found == "'x'"));
        assert_eq!(err.kind(), ErrorKind::TrailingInput);
        assert_eq!(err.context().offset, 3);

        assert!(matches!(parse("null extra"), Err(ParseError::TrailingInput { .. })));
        assert!(matches!(parse("truex"), Err(ParseError::TrailingInput { .. })));
        assert!(matches!(parse("1x"), Err(ParseError::TrailingInput { .. })));
        assert!(matches!(parse("[] []"), Err(ParseError::TrailingInput { .. })));
        assert!(parse("{}  \n").is_ok());
    }

    #[test]
    fn test_depth_limit() {
        let nested = |n: usize| format!("{}{}", "[".repeat(n), "]".repeat(n));
        assert!(parse_depth(&nested(4), 4).is_ok());

        let err = parse_depth(&nested(5), 4).unwrap_err();
        assert!(matches!(err, ParseError::DepthExceeded { limit: 4, .. }));
        assert_eq!(err.kind(), ErrorKind::DepthExceeded);
        assert_eq!(err.context().offset, 4);

        assert!(parse_depth(r#"{"a":{"b":{}}}"#, 3).is_ok());
        assert!(parse_depth(r#"{"a":{"b":{}}}"#, 2).is_err());
        assert!(parse_depth("1", 0).is_ok());
        assert!(parse_depth("[]", 0).is_err());
    }

    #[test]
    fn test_depth_resets_between_siblings() {
        let wide = format!("[{}]", vec!["[[]]"; 50].join(","));
        assert!(parse_depth(&wide, 3).is_ok());
    }

    #[test]
    fn test_default_depth_rejects_deep_input() {
        let deep = "[".repeat(10_000);
        assert!(matches!(parse(&deep), Err(ParseError::DepthExceeded { limit: 128, .. })));
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape(r"a\nb", 1), "a\nb");
        assert_eq!(unescape(r#"\"\\\/"#, 3), "\"\\/");
    }
}
