//! YAML output.
//!
//!   - null     -> YAML null
//!   - bool     -> YAML bool
//!   - number   -> YAML integer when integral, else YAML float
//!   - string   -> YAML string
//!   - array    -> YAML sequence
//!   - object   -> YAML mapping, keys sorted

use libjp::Value;

use super::as_integer;

/// Encode a value as a YAML document.
pub fn encode(value: &Value) -> Result<String, String> {
    serde_yaml::to_string(&to_yaml(value)).map_err(|e| format!("YAML encode error: {}", e))
}

fn to_yaml(value: &Value) -> serde_yaml::Value {
    match value {
        Value::Null => serde_yaml::Value::Null,
        Value::Bool(b) => serde_yaml::Value::Bool(*b),
        Value::Number(n) => match as_integer(*n) {
            Some(i) => serde_yaml::Value::Number(i.into()),
            None => serde_yaml::Value::Number((*n).into()),
        },
        Value::String(s) => serde_yaml::Value::String(s.clone()),
        Value::Array(items) => serde_yaml::Value::Sequence(items.iter().map(to_yaml).collect()),
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut mapping = serde_yaml::Mapping::new();
            for key in keys {
                mapping.insert(serde_yaml::Value::String(key.clone()), to_yaml(&map[key]));
            }
            serde_yaml::Value::Mapping(mapping)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_object() {
        let value = libjp::parse(r#"{"name": "John", "age": 31, "tags": ["a", "b"]}"#).unwrap();
        let yaml = encode(&value).unwrap();
        assert_eq!(yaml, "age: 31\nname: John\ntags:\n- a\n- b\n");
    }

    #[test]
    fn test_encode_scalars() {
        assert_eq!(encode(&Value::Null).unwrap(), "null\n");
        assert_eq!(encode(&Value::Bool(true)).unwrap(), "true\n");
        assert_eq!(encode(&Value::Number(0.5)).unwrap(), "0.5\n");
        assert_eq!(encode(&Value::Number(-3.0)).unwrap(), "-3\n");
    }

    #[test]
    fn test_encode_reads_back() {
        let value = libjp::parse(r#"{"a": [1, 2.5, null, true], "b": {"c": "d"}}"#).unwrap();
        let yaml = encode(&value).unwrap();
        let back: serde_yaml::Value = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back["a"][1], serde_yaml::Value::Number(2.5.into()));
        assert_eq!(back["b"]["c"], serde_yaml::Value::String("d".into()));
    }
}
