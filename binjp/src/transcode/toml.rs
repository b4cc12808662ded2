//! TOML output.
//!
//!   - null     -> error (TOML has no null)
//!   - bool     -> TOML boolean
//!   - number   -> TOML integer when integral, else TOML float
//!   - string   -> TOML string
//!   - array    -> TOML array, objects inside become inline tables
//!   - object   -> TOML table, keys sorted
//!
//! The document root must be an object.

use libjp::Value;
use toml_edit::{Array, DocumentMut, Formatted, InlineTable, Item, Table};

use super::as_integer;

/// Encode a value as a TOML document.
pub fn encode(value: &Value) -> Result<String, String> {
    let Value::Object(_) = value else {
        return Err(format!(
            "TOML requires the top-level value to be an object, found {}",
            value.kind()
        ));
    };
    let mut doc = DocumentMut::new();
    if let Item::Table(table) = to_item(value)? {
        for (key, item) in table.iter() {
            doc[key] = item.clone();
        }
    }
    Ok(doc.to_string())
}

fn to_item(value: &Value) -> Result<Item, String> {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut table = Table::new();
            for key in keys {
                table.insert(key.as_str(), to_item(&map[key])?);
            }
            Ok(Item::Table(table))
        }
        _ => to_value(value).map(Item::Value),
    }
}

fn to_value(value: &Value) -> Result<toml_edit::Value, String> {
    match value {
        Value::Null => Err("TOML has no null type".to_string()),
        Value::Bool(b) => Ok(toml_edit::Value::Boolean(Formatted::new(*b))),
        Value::Number(n) => Ok(match as_integer(*n) {
            Some(i) => toml_edit::Value::Integer(Formatted::new(i)),
            None => toml_edit::Value::Float(Formatted::new(*n)),
        }),
        Value::String(s) => Ok(toml_edit::Value::String(Formatted::new(s.clone()))),
        Value::Array(items) => {
            let mut array = Array::new();
            for item in items {
                array.push(to_value(item)?);
            }
            Ok(toml_edit::Value::Array(array))
        }
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut inline = InlineTable::new();
            for key in keys {
                inline.insert(key.as_str(), to_value(&map[key])?);
            }
            Ok(toml_edit::Value::InlineTable(inline))
        }
    }
}
