//! Field extraction from typed records.
//!
//! Any `Serialize` type is a record: its top-level fields, in declaration
//! order, become the candidate update document.

use serde::Serialize;
use serde_json::Value;

use crate::storage::RepositoryError;
use crate::value::FieldValue;

/// Field name (record casing) to current value, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateDocument {
    fields: Vec<(String, FieldValue)>,
}

impl UpdateDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field, replacing the value of an existing field with the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl IntoIterator for UpdateDocument {
    type Item = (String, FieldValue);
    type IntoIter = std::vec::IntoIter<(String, FieldValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

impl FromIterator<(String, FieldValue)> for UpdateDocument {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        let mut document = UpdateDocument::new();
        for (name, value) in iter {
            document.insert(name, value);
        }
        document
    }
}

/// Lower-cases the first character of `name` and leaves the rest untouched.
///
/// `"Amount"` becomes `"amount"`, `"ID"` becomes `"iD"`. The first character
/// always maps to exactly one character: for the few whose lowercase form
/// expands (`'İ'`), only the leading char of the expansion is kept.
pub fn normalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => {
            let lower = first.to_lowercase().next().unwrap_or(first);
            std::iter::once(lower).chain(chars).collect()
        }
        None => String::new(),
    }
}

/// Extracts the top-level fields of `record` as an update document.
///
/// Values are passed through untouched, nested records included. A record
/// that serializes to `null` or to anything other than a struct-like object
/// is rejected with [`RepositoryError::InvalidArgument`].
///
/// A struct with no fields (`struct Empty {}`) yields an empty document. A
/// unit struct (`struct Marker;`) serializes to `null` exactly like `None`, so
/// it cannot be told apart from a nil record and is rejected as one.
pub fn extract_fields<T>(record: &T) -> Result<UpdateDocument, RepositoryError>
where
    T: Serialize + ?Sized,
{
    let value = serde_json::to_value(record)
        .map_err(|e| RepositoryError::InvalidArgument(format!("record is not serializable: {e}")))?;

    match value {
        Value::Object(entries) => Ok(entries
            .into_iter()
            .map(|(name, value)| (name, FieldValue::from(value)))
            .collect()),
        Value::Null => Err(RepositoryError::InvalidArgument(
            "record must not be nil".to_string(),
        )),
        other => Err(RepositoryError::InvalidArgument(format!(
            "record must have named fields, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    #[serde(rename_all = "PascalCase")]
    struct Payment {
        amount: u32,
        status: String,
        merchant_id: String,
    }

    #[derive(Serialize)]
    struct Nested {
        name: String,
        address: Address,
        notes: Option<String>,
    }

    #[derive(Serialize)]
    struct Address {
        city: String,
    }

    fn sample_payment() -> Payment {
        Payment {
            amount: 100,
            status: "PENDING".to_string(),
            merchant_id: "M1".to_string(),
        }
    }

    #[test]
    fn test_normalize_lowercases_first_char_only() {
        assert_eq!(normalize("Amount"), "amount");
        assert_eq!(normalize("ID"), "iD");
        assert_eq!(normalize("merchantId"), "merchantId");
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("Élan"), "élan");
    }

    #[test]
    fn test_normalize_maps_first_char_to_one_char() {
        let normalized = normalize("İd");
        assert_eq!(normalized, "id");
        assert_eq!(normalized.chars().count(), "İd".chars().count());
        assert_eq!(normalize("ΣIGMA"), "σIGMA");
    }

    #[test]
    fn test_extract_fields_in_declaration_order() {
        let document = extract_fields(&sample_payment()).unwrap();

        let names: Vec<&str> = document.names().collect();
        assert_eq!(names, vec!["Amount", "Status", "MerchantId"]);
        assert_eq!(document.get("Amount"), Some(&FieldValue::from(100)));
        assert_eq!(document.get("Status"), Some(&FieldValue::from("PENDING")));
    }

    #[test]
    fn test_extract_fields_is_idempotent() {
        let payment = sample_payment();
        assert_eq!(
            extract_fields(&payment).unwrap(),
            extract_fields(&payment).unwrap()
        );
    }

    #[test]
    fn test_extract_fields_keeps_nested_and_empty_values() {
        let record = Nested {
            name: String::new(),
            address: Address {
                city: "Quito".to_string(),
            },
            notes: None,
        };

        let document = extract_fields(&record).unwrap();

        assert_eq!(document.get("name"), Some(&FieldValue::from("")));
        assert_eq!(
            document.get("address"),
            Some(&FieldValue::Map(vec![(
                "city".to_string(),
                FieldValue::from("Quito")
            )]))
        );
        assert_eq!(document.get("notes"), Some(&FieldValue::Null));
    }

    #[test]
    fn test_extract_fields_rejects_nil() {
        let record: Option<Payment> = None;
        let err = extract_fields(&record).unwrap_err();
        assert_eq!(
            err,
            RepositoryError::InvalidArgument("record must not be nil".to_string())
        );
    }

    #[test]
    fn test_extract_fields_rejects_non_records() {
        assert!(matches!(
            extract_fields(&vec![1, 2, 3]),
            Err(RepositoryError::InvalidArgument(_))
        ));
        assert!(matches!(
            extract_fields("plain"),
            Err(RepositoryError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_empty_record_yields_empty_document() {
        #[derive(Serialize)]
        struct Empty {}

        let document = extract_fields(&Empty {}).unwrap();
        assert!(document.is_empty());
    }

    #[test]
    fn test_unit_struct_is_rejected_like_nil() {
        #[derive(Serialize)]
        struct Marker;

        assert_eq!(
            extract_fields(&Marker).unwrap_err(),
            RepositoryError::InvalidArgument("record must not be nil".to_string())
        );
    }

    #[test]
    fn test_insert_replaces_existing_field() {
        let mut document = UpdateDocument::new();
        document.insert("status", "PENDING");
        document.insert("status", "PAID");

        assert_eq!(document.len(), 1);
        assert_eq!(document.get("status"), Some(&FieldValue::from("PAID")));
    }
}
