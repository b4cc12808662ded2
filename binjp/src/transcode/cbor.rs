//! CBOR output and diagnostic notation.
//!
//!   - null     -> simple value 22
//!   - bool     -> simple values 20 / 21
//!   - number   -> major 0 / 1 integer when integral, else float64
//!   - string   -> major 3 text string
//!   - array    -> major 4, definite length
//!   - object   -> major 5, definite length, text keys sorted
//!
//! Bytes are written directly instead of through `ciborium`, which shrinks
//! floats to half or single precision when it can. Non-integral numbers are
//! always float64 here.

use std::fmt::Write as _;

use ciborium::value::Value as CborValue;
use libjp::Value;

use super::as_integer;

const MAJOR_UNSIGNED: u8 = 0;
const MAJOR_NEGATIVE: u8 = 1;
const MAJOR_TEXT: u8 = 3;
const MAJOR_ARRAY: u8 = 4;
const MAJOR_MAP: u8 = 5;

const FALSE: u8 = 0xf4;
const TRUE: u8 = 0xf5;
const NULL: u8 = 0xf6;
const FLOAT64: u8 = 0xfb;

/// Encode a value as CBOR bytes.
pub fn encode(value: &Value) -> Vec<u8> {
    let mut buf = Vec::new();
    write_value(&mut buf, value);
    buf
}

fn write_value(buf: &mut Vec<u8>, value: &Value) {
    match value {
        Value::Null => buf.push(NULL),
        Value::Bool(b) => buf.push(if *b { TRUE } else { FALSE }),
        Value::Number(n) => match as_integer(*n) {
            Some(i) if i < 0 => write_head(buf, MAJOR_NEGATIVE, (-1 - i) as u64),
            Some(i) => write_head(buf, MAJOR_UNSIGNED, i as u64),
            None => {
                buf.push(FLOAT64);
                buf.extend_from_slice(&n.to_be_bytes());
            }
        },
        Value::String(s) => write_text(buf, s),
        Value::Array(items) => {
            write_head(buf, MAJOR_ARRAY, items.len() as u64);
            for item in items {
                write_value(buf, item);
            }
        }
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            write_head(buf, MAJOR_MAP, keys.len() as u64);
            for key in keys {
                write_text(buf, key);
                write_value(buf, &map[key]);
            }
        }
    }
}

fn write_text(buf: &mut Vec<u8>, s: &str) {
    write_head(buf, MAJOR_TEXT, s.len() as u64);
    buf.extend_from_slice(s.as_bytes());
}

/// Major type in the top three bits, argument in the shortest form.
fn write_head(buf: &mut Vec<u8>, major: u8, arg: u64) {
    let high = major << 5;
    if arg < 24 {
        buf.push(high | arg as u8);
    } else if let Ok(a) = u8::try_from(arg) {
        buf.push(high | 24);
        buf.push(a);
    } else if let Ok(a) = u16::try_from(arg) {
        buf.push(high | 25);
        buf.extend_from_slice(&a.to_be_bytes());
    } else if let Ok(a) = u32::try_from(arg) {
        buf.push(high | 26);
        buf.extend_from_slice(&a.to_be_bytes());
    } else {
        buf.push(high | 27);
        buf.extend_from_slice(&arg.to_be_bytes());
    }
}

/// Render CBOR bytes in diagnostic notation (RFC 8949 section 8).
pub fn diagnostic(input: &[u8]) -> Result<String, String> {
    let value: CborValue =
        ciborium::de::from_reader(input).map_err(|e| format!("CBOR decode error: {}", e))?;
    let mut out = String::new();
    diag(&mut out, &value, 0);
    out.push('\n');
    Ok(out)
}

fn diag(out: &mut String, value: &CborValue, indent: usize) {
    match value {
        CborValue::Null => out.push_str("null"),
        CborValue::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        CborValue::Integer(i) => {
            let _ = write!(out, "{}", i128::from(*i));
        }
        CborValue::Float(f) => diag_float(out, *f),
        CborValue::Text(s) => diag_text(out, s),
        CborValue::Bytes(bytes) => {
            out.push_str("h'");
            for b in bytes {
                let _ = write!(out, "{:02x}", b);
            }
            out.push('\'');
        }
        CborValue::Array(items) => {
            if items.is_empty() {
                out.push_str("[]");
            } else if items.iter().all(is_scalar) {
                out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    diag(out, item, indent);
                }
                out.push(']');
            } else {
                diag_block(out, '[', ']', items.len(), indent, |out, i, inner| {
                    diag(out, &items[i], inner)
                });
            }
        }
        CborValue::Map(pairs) => {
            if pairs.is_empty() {
                out.push_str("{}");
            } else {
                diag_block(out, '{', '}', pairs.len(), indent, |out, i, inner| {
                    diag(out, &pairs[i].0, inner);
                    out.push_str(": ");
                    diag(out, &pairs[i].1, inner);
                });
            }
        }
        CborValue::Tag(tag, inner) => {
            let _ = write!(out, "{}(", tag);
            diag(out, inner, indent);
            out.push(')');
        }
        other => {
            let _ = write!(out, "<{:?}>", other);
        }
    }
}

/// One entry per line, indented two spaces past the brackets.
fn diag_block<F>(out: &mut String, open: char, close: char, len: usize, indent: usize, mut entry: F)
where
    F: FnMut(&mut String, usize, usize),
{
    let inner = indent + 2;
    out.push(open);
    out.push('\n');
    for i in 0..len {
        out.push_str(&" ".repeat(inner));
        entry(out, i, inner);
        if i + 1 < len {
            out.push(',');
        }
        out.push('\n');
    }
    out.push_str(&" ".repeat(indent));
    out.push(close);
}

fn diag_float(out: &mut String, f: f64) {
    if f.is_nan() {
        out.push_str("NaN");
    } else if f.is_infinite() {
        out.push_str(if f > 0.0 { "Infinity" } else { "-Infinity" });
    } else if f.fract() == 0.0 && f.abs() < 1e16 {
        let _ = write!(out, "{:.1}", f);
    } else {
        let s = f.to_string();
        out.push_str(&s);
        if !s.contains(['.', 'e']) {
            out.push_str(".0");
        }
    }
}

fn diag_text(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

fn is_scalar(value: &CborValue) -> bool {
    !matches!(value, CborValue::Array(_) | CborValue::Map(_) | CborValue::Tag(..))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_scalars() {
        assert_eq!(encode(&Value::Null), [0xf6]);
        assert_eq!(encode(&Value::Bool(false)), [0xf4]);
        assert_eq!(encode(&Value::Bool(true)), [0xf5]);
        assert_eq!(encode(&Value::Number(10.0)), [0x0a]);
        assert_eq!(encode(&Value::Number(100.0)), [0x18, 0x64]);
        assert_eq!(encode(&Value::Number(1000.0)), [0x19, 0x03, 0xe8]);
        assert_eq!(encode(&Value::Number(-1.0)), [0x20]);
        assert_eq!(encode(&Value::Number(-100.0)), [0x38, 0x63]);
    }

    #[test]
    fn test_encode_float_stays_double() {
        let bytes = encode(&Value::Number(1.5));
        assert_eq!(bytes.len(), 9);
        assert_eq!(bytes[0], 0xfb);
        assert_eq!(&bytes[1..], &1.5f64.to_be_bytes());
    }

    #[test]
    fn test_encode_containers() {
        let value = libjp::parse(r#"{"b": [1, "x"], "a": true}"#).unwrap();
        assert_eq!(
            encode(&value),
            [0xa2, 0x61, b'a', 0xf5, 0x61, b'b', 0x82, 0x01, 0x61, b'x']
        );
    }

    #[test]
    fn test_ciborium_reads_output() {
        let value = libjp::parse(r#"{"name": "John", "ratio": 0.25, "n": -7}"#).unwrap();
        let bytes = encode(&value);
        let decoded: CborValue = ciborium::de::from_reader(bytes.as_slice()).unwrap();
        let CborValue::Map(pairs) = decoded else {
            panic!("expected a map");
        };
        assert_eq!(pairs.len(), 3);
        assert_eq!(pairs[0].0, CborValue::Text("n".into()));
        assert_eq!(pairs[0].1, CborValue::Integer((-7).into()));
        assert_eq!(pairs[2].1, CborValue::Float(0.25));
    }

    #[test]
    fn test_diagnostic() {
        let value = libjp::parse(r#"{"a": [1, 2.5, null], "b": {"c": "d\n"}}"#).unwrap();
        let diag = diagnostic(&encode(&value)).unwrap();
        assert_eq!(
            diag,
            "{\n  \"a\": [1, 2.5, null],\n  \"b\": {\n    \"c\": \"d\\n\"\n  }\n}\n"
        );
    }

    #[test]
    fn test_diagnostic_scalars() {
        assert_eq!(diagnostic(&encode(&Value::Number(-0.0))).unwrap(), "-0.0\n");
        assert_eq!(diagnostic(&encode(&Value::Array(vec![]))).unwrap(), "[]\n");
        assert!(diagnostic(&[0xff]).is_err());
    }
}
