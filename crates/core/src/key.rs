//! Item key descriptors.

use crate::storage::RepositoryError;
use crate::value::FieldValue;

/// The identifying attributes of an item, in key-schema order.
///
/// Point operations in this crate use a single string partition key; further
/// attributes can be appended with [`Key::with`] for composite-key tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key {
    attributes: Vec<(String, FieldValue)>,
}

impl Key {
    /// Appends another string attribute to the key.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes
            .push((name.into(), FieldValue::String(value.into())));
        self
    }

    /// Reads back the string value stored under `name`.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(existing, _)| existing == name)
            .and_then(|(_, value)| value.as_str())
    }

    pub fn attributes(&self) -> &[(String, FieldValue)] {
        &self.attributes
    }

    /// Stable textual form used for logging and in-memory indexing.
    pub fn render(&self) -> String {
        self.attributes
            .iter()
            .map(|(name, value)| format!("{}={}", name, value.as_str().unwrap_or_default()))
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl std::fmt::Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.render())
    }
}

/// Builds a single-attribute string key.
pub fn build_key(
    field_name: impl Into<String>,
    field_value: impl Into<String>,
) -> Result<Key, RepositoryError> {
    let field_name = field_name.into();
    if field_name.is_empty() {
        return Err(RepositoryError::InvalidArgument(
            "key field name must not be empty".to_string(),
        ));
    }
    Ok(Key {
        attributes: vec![(field_name, FieldValue::String(field_value.into()))],
    })
}
