//! JSON value representation.

use std::collections::HashMap;
use std::fmt;

use crate::encode::{encode, Format};
use crate::error::TypeError;

/// A parsed JSON value.
///
/// A value owns its whole subtree. Object keys are unique and unordered.
#[derive(Clone, PartialEq)]
pub enum Value {
    /// Object (key-value map).
    Object(HashMap<String, Value>),
    /// Array of values.
    Array(Vec<Value>),
    /// String with escapes resolved.
    String(String),
    /// 64-bit floating-point number.
    Number(f64),
    /// Boolean value.
    Bool(bool),
    /// Null value.
    Null,
}

/// The variant tag of a [`Value`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Object,
    Array,
    String,
    Number,
    Bool,
    Null,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Object => "an object",
            ValueKind::Array => "an array",
            ValueKind::String => "a string",
            ValueKind::Number => "a number",
            ValueKind::Bool => "a bool",
            ValueKind::Null => "null",
        };
        f.write_str(name)
    }
}

impl Value {
    /// Returns the variant tag of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Object(_) => ValueKind::Object,
            Value::Array(_) => ValueKind::Array,
            Value::String(_) => ValueKind::String,
            Value::Number(_) => ValueKind::Number,
            Value::Bool(_) => ValueKind::Bool,
            Value::Null => ValueKind::Null,
        }
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    /// Returns `true` if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns a reference to the object if this is an `Object`.
    pub fn as_object(&self) -> Option<&HashMap<String, Value>> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Returns a reference to the array if this is an `Array`.
    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// Returns a reference to the string if this is a `String`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the number if this is a `Number`.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the boolean value if this is a `Bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Looks up `key` if this is an `Object`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|obj| obj.get(key))
    }

    /// Returns the object, or a [`TypeError`] naming the stored variant.
    pub fn get_object(&self) -> Result<&HashMap<String, Value>, TypeError> {
        self.as_object().ok_or_else(|| self.wrong_type(ValueKind::Object))
    }

    pub fn get_array(&self) -> Result<&Vec<Value>, TypeError> {
        self.as_array().ok_or_else(|| self.wrong_type(ValueKind::Array))
    }

    pub fn get_string(&self) -> Result<&str, TypeError> {
        self.as_str().ok_or_else(|| self.wrong_type(ValueKind::String))
    }

    pub fn get_number(&self) -> Result<f64, TypeError> {
        self.as_number().ok_or_else(|| self.wrong_type(ValueKind::Number))
    }

    pub fn get_bool(&self) -> Result<bool, TypeError> {
        self.as_bool().ok_or_else(|| self.wrong_type(ValueKind::Bool))
    }

    fn wrong_type(&self, expected: ValueKind) -> TypeError {
        TypeError::WrongType {
            expected,
            found: self.kind(),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Object(obj) => f.debug_map().entries(obj).finish(),
            Value::Array(arr) => f.debug_list().entries(arr).finish(),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Number(n) => write!(f, "{}", n),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Null => write!(f, "null"),
        }
    }
}

/// Renders compact JSON with sorted keys. Meant for diagnostics; not
/// guaranteed to reproduce the source text.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode(self, Format::Compact))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(arr: Vec<Value>) -> Self {
        Value::Array(arr)
    }
}

impl From<HashMap<String, Value>> for Value {
    fn from(obj: HashMap<String, Value>) -> Self {
        Value::Object(obj)
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Null
    }
}

impl TryFrom<&Value> for f64 {
    type Error = TypeError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        value.get_number()
    }
}

impl TryFrom<&Value> for bool {
    type Error = TypeError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        value.get_bool()
    }
}

impl<'a> TryFrom<&'a Value> for &'a str {
    type Error = TypeError;

    fn try_from(value: &'a Value) -> Result<Self, Self::Error> {
        value.get_string()
    }
}
