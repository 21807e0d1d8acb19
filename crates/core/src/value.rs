//! Tagged attribute values.
//!
//! A store-agnostic representation of a single attribute. Numbers are carried
//! as their decimal text, which is how the store transports them on the wire.

use serde_json::{Map, Number, Value};

/// A single attribute value of a record or stored item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Number(String),
    String(String),
    List(Vec<FieldValue>),
    Map(Vec<(String, FieldValue)>),
}

impl FieldValue {
    /// Returns the string payload, if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the decimal text, if this is a number value.
    pub fn as_number(&self) -> Option<&str> {
        match self {
            FieldValue::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Converts back to JSON so typed records can be decoded with serde.
    ///
    /// A number whose text is not valid JSON is kept as a string.
    pub fn into_json(self) -> Value {
        match self {
            FieldValue::Null => Value::Null,
            FieldValue::Bool(b) => Value::Bool(b),
            FieldValue::Number(n) => match n.parse::<Number>() {
                Ok(number) => Value::Number(number),
                Err(_) => Value::String(n),
            },
            FieldValue::String(s) => Value::String(s),
            FieldValue::List(items) => {
                Value::Array(items.into_iter().map(FieldValue::into_json).collect())
            }
            FieldValue::Map(entries) => Value::Object(
                entries
                    .into_iter()
                    .map(|(name, value)| (name, value.into_json()))
                    .collect::<Map<String, Value>>(),
            ),
        }
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => FieldValue::Null,
            Value::Bool(b) => FieldValue::Bool(b),
            Value::Number(n) => FieldValue::Number(n.to_string()),
            Value::String(s) => FieldValue::String(s),
            Value::Array(items) => {
                FieldValue::List(items.into_iter().map(FieldValue::from).collect())
            }
            Value::Object(entries) => FieldValue::Map(
                entries
                    .into_iter()
                    .map(|(name, value)| (name, FieldValue::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

macro_rules! impl_number_conversion {
    ($($type:ty),*) => {
        $(
            impl From<$type> for FieldValue {
                fn from(value: $type) -> Self {
                    FieldValue::Number(value.to_string())
                }
            }
        )*
    };
}

impl_number_conversion!(i32, i64, u32, u64, f64);
