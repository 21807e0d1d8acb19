//! Secondary index queries.

use std::collections::BTreeMap;

use crate::expression::{ExpressionError, PlaceholderTokens};
use crate::value::FieldValue;

/// A single-page, two-predicate equality lookup on a secondary index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexQuery {
    pub index_name: String,
    pub key_field: String,
    pub key_value: String,
    pub status_field: String,
    pub status_value: String,
}

impl IndexQuery {
    pub fn new(
        index_name: impl Into<String>,
        key_field: impl Into<String>,
        key_value: impl Into<String>,
        status_field: impl Into<String>,
        status_value: impl Into<String>,
    ) -> Result<Self, ExpressionError> {
        let query = Self {
            index_name: index_name.into(),
            key_field: key_field.into(),
            key_value: key_value.into(),
            status_field: status_field.into(),
            status_value: status_value.into(),
        };
        if query.key_field.is_empty() {
            return Err(ExpressionError::EmptyKeyField);
        }
        if query.status_field.is_empty() {
            return Err(ExpressionError::EmptyStatusField);
        }
        if query.key_field == query.status_field {
            return Err(ExpressionError::DuplicateQueryField {
                name: query.key_field,
            });
        }
        Ok(query)
    }

    /// `#key = :key and #status = :status`.
    pub fn key_condition(&self) -> String {
        let (k, s) = self.tokens();
        format!("#{k} = :{k} and #{s} = :{s}")
    }

    pub fn names(&self) -> BTreeMap<String, String> {
        let (k, s) = self.tokens();
        BTreeMap::from([
            (format!("#{k}"), self.key_field.clone()),
            (format!("#{s}"), self.status_field.clone()),
        ])
    }

    pub fn values(&self) -> BTreeMap<String, FieldValue> {
        let (k, s) = self.tokens();
        BTreeMap::from([
            (format!(":{k}"), FieldValue::String(self.key_value.clone())),
            (format!(":{s}"), FieldValue::String(self.status_value.clone())),
        ])
    }

    fn tokens(&self) -> (String, String) {
        let mut tokens = PlaceholderTokens::default();
        (
            tokens.token_for(&self.key_field),
            tokens.token_for(&self.status_field),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merchant_status_query() {
        let query = IndexQuery::new("gsi1", "merchantId", "M1", "status", "ACTIVE").unwrap();

        assert_eq!(query.index_name, "gsi1");
        assert_eq!(
            query.key_condition(),
            "#merchantId = :merchantId and #status = :status"
        );
        assert_eq!(
            query.names(),
            BTreeMap::from([
                ("#merchantId".to_string(), "merchantId".to_string()),
                ("#status".to_string(), "status".to_string()),
            ])
        );
        assert_eq!(
            query.values(),
            BTreeMap::from([
                (":merchantId".to_string(), FieldValue::from("M1")),
                (":status".to_string(), FieldValue::from("ACTIVE")),
            ])
        );
    }

    #[test]
    fn test_field_names_outside_placeholder_alphabet() {
        let query = IndexQuery::new("gsi1", "merchant-id", "M1", "merchant_id", "ACTIVE").unwrap();

        assert_eq!(
            query.key_condition(),
            "#merchant_id = :merchant_id and #merchant_id_2 = :merchant_id_2"
        );
        assert_eq!(
            query.names(),
            BTreeMap::from([
                ("#merchant_id".to_string(), "merchant-id".to_string()),
                ("#merchant_id_2".to_string(), "merchant_id".to_string()),
            ])
        );
        assert_eq!(query.values().len(), 2);
    }

    #[test]
    fn test_rejects_empty_field_names() {
        assert_eq!(
            IndexQuery::new("gsi1", "", "M1", "status", "ACTIVE"),
            Err(ExpressionError::EmptyKeyField)
        );
        assert_eq!(
            IndexQuery::new("gsi1", "merchantId", "M1", "", "ACTIVE"),
            Err(ExpressionError::EmptyStatusField)
        );
    }

    #[test]
    fn test_rejects_same_key_and_status_field() {
        assert_eq!(
            IndexQuery::new("gsi1", "status", "A", "status", "B"),
            Err(ExpressionError::DuplicateQueryField {
                name: "status".to_string()
            })
        );
    }
}
