//! Encode JSON values back to text.
//!
//! Object keys are emitted in sorted order so output is deterministic even
//! though [`Value::Object`] does not keep insertion order.

use std::collections::HashMap;

use crate::Value;

/// Output format for encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Indented JSON, two spaces per level.
    Json,
    /// JSON without insignificant whitespace.
    Compact,
}

/// Encode a value to a string in the specified format.
pub fn encode(value: &Value, format: Format) -> String {
    match format {
        Format::Json => encode_json(value, 0),
        Format::Compact => {
            let mut out = String::new();
            encode_compact(&mut out, value);
            out
        }
    }
}

// =============================================================================
// Indented JSON
// =============================================================================

fn encode_json(value: &Value, indent: usize) -> String {
    let pad = "  ".repeat(indent);
    let pad1 = "  ".repeat(indent + 1);

    match value {
        Value::Null => "null".to_string(),
        Value::Bool(true) => "true".to_string(),
        Value::Bool(false) => "false".to_string(),
        Value::Number(n) => encode_number(*n),
        Value::String(s) => encode_json_string(s),
        Value::Array(arr) => {
            if arr.is_empty() {
                "[]".to_string()
            } else {
                let items: Vec<String> = arr
                    .iter()
                    .map(|v| format!("{}{}", pad1, encode_json(v, indent + 1)))
                    .collect();
                format!("[\n{}\n{}]", items.join(",\n"), pad)
            }
        }
        Value::Object(obj) => {
            if obj.is_empty() {
                "{}".to_string()
            } else {
                let items: Vec<String> = sorted_keys(obj)
                    .into_iter()
                    .map(|k| {
                        format!(
                            "{}{}: {}",
                            pad1,
                            encode_json_string(k),
                            encode_json(&obj[k], indent + 1)
                        )
                    })
                    .collect();
                format!("{{\n{}\n{}}}", items.join(",\n"), pad)
            }
        }
    }
}

// =============================================================================
// Compact JSON
// =============================================================================

fn encode_compact(out: &mut String, value: &Value) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(true) => out.push_str("true"),
        Value::Bool(false) => out.push_str("false"),
        Value::Number(n) => out.push_str(&encode_number(*n)),
        Value::String(s) => out.push_str(&encode_json_string(s)),
        Value::Array(arr) => {
            out.push('[');
            for (i, item) in arr.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                encode_compact(out, item);
            }
            out.push(']');
        }
        Value::Object(obj) => {
            out.push('{');
            for (i, k) in sorted_keys(obj).into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&encode_json_string(k));
                out.push(':');
                encode_compact(out, &obj[k]);
            }
            out.push('}');
        }
    }
}

// =============================================================================
// Scalars
// =============================================================================

fn sorted_keys(obj: &HashMap<String, Value>) -> Vec<&String> {
    let mut keys: Vec<&String> = obj.keys().collect();
    keys.sort();
    keys
}

/// Magnitudes outside `[1e-6, 1e21)` are written in exponent form so the
/// digit count stays short enough to read back.
fn encode_number(n: f64) -> String {
    if n.is_nan() || n.is_infinite() {
        "null".to_string() // JSON doesn't support NaN/Infinity
    } else if n != 0.0 && (n.abs() >= 1e21 || n.abs() < 1e-6) {
        format!("{:e}", n)
    } else {
        format!("{}", n)
    }
}

fn encode_json_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 2);
    result.push('"');
    for c in s.chars() {
        match c {
            '"' => result.push_str("\\\""),
            '\\' => result.push_str("\\\\"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            '\x08' => result.push_str("\\b"),
            '\x0c' => result.push_str("\\f"),
            c if c < '\u{20}' => {
                result.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => result.push(c),
        }
    }
    result.push('"');
    result
}
