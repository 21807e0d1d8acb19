//! DynamoDB attribute conversion functions.
//!
//! Pure functions for converting between DynamoDB AttributeValue maps and the
//! store-agnostic values of `itemstore_core`. These are testable in isolation
//! without DynamoDB access.

use std::collections::{BTreeMap, HashMap};

use aws_sdk_dynamodb::types::AttributeValue;
use base64::Engine;
use itemstore_core::storage::Item;
use itemstore_core::{FieldValue, Key};

/// Convert a value to its DynamoDB attribute.
pub fn to_attribute(value: &FieldValue) -> AttributeValue {
    match value {
        FieldValue::Null => AttributeValue::Null(true),
        FieldValue::Bool(b) => AttributeValue::Bool(*b),
        FieldValue::Number(n) => AttributeValue::N(n.clone()),
        FieldValue::String(s) => AttributeValue::S(s.clone()),
        FieldValue::List(items) => AttributeValue::L(items.iter().map(to_attribute).collect()),
        FieldValue::Map(entries) => AttributeValue::M(
            entries
                .iter()
                .map(|(name, value)| (name.clone(), to_attribute(value)))
                .collect(),
        ),
    }
}

/// Convert a DynamoDB attribute to a value.
///
/// Sets become lists and binary data becomes base64 text.
pub fn from_attribute(attribute: &AttributeValue) -> FieldValue {
    match attribute {
        AttributeValue::Null(_) => FieldValue::Null,
        AttributeValue::Bool(b) => FieldValue::Bool(*b),
        AttributeValue::N(n) => FieldValue::Number(n.clone()),
        AttributeValue::S(s) => FieldValue::String(s.clone()),
        AttributeValue::L(items) => FieldValue::List(items.iter().map(from_attribute).collect()),
        AttributeValue::M(entries) => {
            // Sorted so decoded maps are deterministic.
            let sorted: BTreeMap<&String, &AttributeValue> = entries.iter().collect();
            FieldValue::Map(
                sorted
                    .into_iter()
                    .map(|(name, value)| (name.clone(), from_attribute(value)))
                    .collect(),
            )
        }
        AttributeValue::Ss(items) => {
            FieldValue::List(items.iter().cloned().map(FieldValue::String).collect())
        }
        AttributeValue::Ns(items) => {
            FieldValue::List(items.iter().cloned().map(FieldValue::Number).collect())
        }
        AttributeValue::B(blob) => FieldValue::String(encode_blob(blob.as_ref())),
        AttributeValue::Bs(blobs) => FieldValue::List(
            blobs
                .iter()
                .map(|blob| FieldValue::String(encode_blob(blob.as_ref())))
                .collect(),
        ),
        _ => FieldValue::Null,
    }
}

fn encode_blob(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

/// Convert an item to a DynamoDB attribute map.
pub fn item_to_attributes(item: &Item) -> HashMap<String, AttributeValue> {
    item.iter()
        .map(|(name, value)| (name.clone(), to_attribute(value)))
        .collect()
}

/// Convert a DynamoDB attribute map to an item.
pub fn attributes_to_item(attributes: &HashMap<String, AttributeValue>) -> Item {
    attributes
        .iter()
        .map(|(name, value)| (name.clone(), from_attribute(value)))
        .collect()
}

/// Convert a key to the DynamoDB key map.
pub fn key_to_attributes(key: &Key) -> HashMap<String, AttributeValue> {
    key.attributes()
        .iter()
        .map(|(name, value)| (name.clone(), to_attribute(value)))
        .collect()
}

/// Convert a placeholder value table to `ExpressionAttributeValues`.
pub fn values_to_attributes(
    values: &BTreeMap<String, FieldValue>,
) -> HashMap<String, AttributeValue> {
    values
        .iter()
        .map(|(placeholder, value)| (placeholder.clone(), to_attribute(value)))
        .collect()
}

/// Convert a placeholder name table to `ExpressionAttributeNames`.
pub fn names_to_attributes(names: &BTreeMap<String, String>) -> HashMap<String, String> {
    names
        .iter()
        .map(|(placeholder, name)| (placeholder.clone(), name.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_dynamodb::primitives::Blob;
    use itemstore_core::build_key;

    fn sample_item() -> Item {
        Item::from([
            ("id".to_string(), FieldValue::from("abc")),
            ("amount".to_string(), FieldValue::from(100)),
            ("captured".to_string(), FieldValue::from(true)),
            ("notes".to_string(), FieldValue::Null),
            (
                "tags".to_string(),
                FieldValue::List(vec![FieldValue::from("card")]),
            ),
            (
                "address".to_string(),
                FieldValue::Map(vec![("city".to_string(), FieldValue::from("Quito"))]),
            ),
        ])
    }

    #[test]
    fn test_item_round_trip() {
        let item = sample_item();
        let attributes = item_to_attributes(&item);
        assert_eq!(attributes_to_item(&attributes), item);
    }

    #[test]
    fn test_scalar_attribute_types() {
        let attributes = item_to_attributes(&sample_item());

        assert_eq!(attributes.get("id").unwrap().as_s().unwrap(), "abc");
        assert_eq!(attributes.get("amount").unwrap().as_n().unwrap(), "100");
        assert!(*attributes.get("captured").unwrap().as_bool().unwrap());
        assert!(*attributes.get("notes").unwrap().as_null().unwrap());
    }

    #[test]
    fn test_key_is_string_attribute() {
        let key = build_key("id", "abc").unwrap();
        let attributes = key_to_attributes(&key);

        assert_eq!(attributes.len(), 1);
        assert_eq!(attributes.get("id").unwrap().as_s().unwrap(), "abc");
    }

    #[test]
    fn test_sets_become_lists() {
        let attribute = AttributeValue::Ss(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(
            from_attribute(&attribute),
            FieldValue::List(vec![FieldValue::from("a"), FieldValue::from("b")])
        );

        let attribute = AttributeValue::Ns(vec!["1".to_string()]);
        assert_eq!(
            from_attribute(&attribute),
            FieldValue::List(vec![FieldValue::from(1)])
        );
    }

    #[test]
    fn test_binary_becomes_base64() {
        let attribute = AttributeValue::B(Blob::new(b"hi".to_vec()));
        assert_eq!(from_attribute(&attribute), FieldValue::from("aGk="));
    }

    #[test]
    fn test_nested_map_is_sorted() {
        let attribute = AttributeValue::M(HashMap::from([
            ("b".to_string(), AttributeValue::S("2".to_string())),
            ("a".to_string(), AttributeValue::S("1".to_string())),
        ]));

        assert_eq!(
            from_attribute(&attribute),
            FieldValue::Map(vec![
                ("a".to_string(), FieldValue::from("1")),
                ("b".to_string(), FieldValue::from("2")),
            ])
        );
    }
}
