use std::collections::BTreeMap;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{RepositoryError, Result};
use crate::record::{extract_fields, normalize};
use crate::value::FieldValue;

/// A stored item: attribute name to value.
pub type Item = BTreeMap<String, FieldValue>;

/// What `read` and `query_by_indexed_field` do when the store call fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReadErrorPolicy {
    /// Log the failure and return an empty result. Callers cannot tell a
    /// missing item from a failed call.
    #[default]
    ReturnEmpty,
    /// Surface the failure as `StoreReadFailed`.
    Propagate,
}

impl FromStr for ReadErrorPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "empty" | "return-empty" => Ok(ReadErrorPolicy::ReturnEmpty),
            "propagate" => Ok(ReadErrorPolicy::Propagate),
            other => Err(format!("unknown read error policy: {other}")),
        }
    }
}

/// Converts a record into a stored item.
///
/// Attribute names are the record's field names with the first character
/// lower-cased, matching the names the update path writes.
pub fn record_to_item<T>(record: &T) -> Result<Item>
where
    T: Serialize + ?Sized,
{
    Ok(extract_fields(record)?
        .into_iter()
        .map(|(name, value)| (normalize(&name), value))
        .collect())
}

/// Decodes a stored item into a record.
pub fn item_to_record<T>(item: Item) -> Result<T>
where
    T: DeserializeOwned,
{
    let object = FieldValue::Map(item.into_iter().collect()).into_json();
    serde_json::from_value(object).map_err(|e| RepositoryError::Serialization(e.to_string()))
}
