//! Conditional update expressions.
//!
//! Turns an [`UpdateDocument`] into a `SET` clause plus an equality condition
//! on the key attribute. Every attribute is referenced through a `#name`
//! placeholder and every value through a `:name` placeholder, so reserved
//! words such as `status` are safe to update. Placeholder tokens are derived
//! from the attribute name; the name table always holds the real name.

use std::collections::{BTreeMap, HashMap, HashSet};

use thiserror::Error;

use crate::record::{normalize, UpdateDocument};
use crate::value::FieldValue;

/// Errors that can occur while building an update expression.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExpressionError {
    #[error("key field must not be empty")]
    EmptyKeyField,
    #[error("status field must not be empty")]
    EmptyStatusField,
    #[error("key and status conditions use the same field: {name:?}")]
    DuplicateQueryField { name: String },
}

/// Field names that must never appear in the `SET` clause.
///
/// Entries are normalized on insertion, so `"Status"` and `"status"` are the
/// same entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkipSet(HashSet<String>);

impl SkipSet {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(names.into_iter().map(|n| normalize(n.as_ref())).collect())
    }

    /// Whether the normalized form of `field` is skipped.
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains(&normalize(field))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One `#name = :value` term of the `SET` clause.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SetTerm {
    attribute: String,
    name_placeholder: String,
    value_placeholder: String,
}

/// A built conditional update.
///
/// The placeholder tables hold exactly one binding for every placeholder
/// referenced by the `SET` terms and the condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateExpression {
    set_terms: Vec<SetTerm>,
    condition_name: String,
    condition_value: String,
    names: BTreeMap<String, String>,
    values: BTreeMap<String, FieldValue>,
}

impl UpdateExpression {
    /// The `SET ...` clause, or `None` when only the condition remains.
    pub fn update_clause(&self) -> Option<String> {
        if self.set_terms.is_empty() {
            return None;
        }
        let terms: Vec<String> = self
            .set_terms
            .iter()
            .map(|t| format!("{} = {}", t.name_placeholder, t.value_placeholder))
            .collect();
        Some(format!("SET {}", terms.join(", ")))
    }

    /// The existence condition, e.g. `#id = :id`.
    pub fn condition_clause(&self) -> String {
        format!("{} = {}", self.condition_name, self.condition_value)
    }

    /// Name placeholder to attribute name.
    pub fn names(&self) -> &BTreeMap<String, String> {
        &self.names
    }

    /// Value placeholder to bound value.
    pub fn values(&self) -> &BTreeMap<String, FieldValue> {
        &self.values
    }

    /// Attribute names written by the `SET` clause, in document order.
    pub fn set_attributes(&self) -> impl Iterator<Item = &str> {
        self.set_terms.iter().map(|t| t.attribute.as_str())
    }

    /// The value bound to the `SET` term for `attribute`.
    pub fn set_value(&self, attribute: &str) -> Option<&FieldValue> {
        self.set_terms
            .iter()
            .find(|t| t.attribute == attribute)
            .and_then(|t| self.values.get(&t.value_placeholder))
    }

    /// The value the key attribute is expected to hold.
    pub fn expected_key_value(&self) -> Option<&FieldValue> {
        self.values.get(&self.condition_value)
    }

    /// The attribute the condition compares.
    pub fn condition_attribute(&self) -> Option<&str> {
        self.names.get(&self.condition_name).map(String::as_str)
    }

    pub fn is_condition_only(&self) -> bool {
        self.set_terms.is_empty()
    }
}

/// Builds a conditional update from `fields`.
///
/// Each field whose normalized name is not in `skip` becomes a `SET` term
/// bound to its value. The condition requires the stored `key_field` to equal
/// `key_value`, so updating an item that does not exist fails at the store.
/// When every field is skipped the result holds only the condition.
///
/// Two fields that normalize to the same name keep the last value seen.
pub fn build_update(
    fields: &UpdateDocument,
    skip: &SkipSet,
    key_field: &str,
    key_value: &str,
) -> Result<UpdateExpression, ExpressionError> {
    if key_field.is_empty() {
        return Err(ExpressionError::EmptyKeyField);
    }

    let mut tokens = PlaceholderTokens::default();
    let mut set_terms: Vec<SetTerm> = Vec::new();
    let mut names = BTreeMap::new();
    let mut values = BTreeMap::new();

    for (name, value) in fields.iter() {
        if skip.contains(name) {
            continue;
        }
        let attribute = normalize(name);
        let token = tokens.token_for(&attribute);
        let name_placeholder = format!("#{token}");
        let value_placeholder = format!(":{token}");

        names.insert(name_placeholder.clone(), attribute.clone());
        values.insert(value_placeholder.clone(), value.clone());

        if !set_terms.iter().any(|t| t.attribute == attribute) {
            set_terms.push(SetTerm {
                attribute,
                name_placeholder,
                value_placeholder,
            });
        }
    }

    let key_token = tokens.token_for(key_field);
    let condition_name = format!("#{key_token}");
    names.insert(condition_name.clone(), key_field.to_string());

    let condition_value = unique_value_placeholder(&key_token, &values);
    values.insert(
        condition_value.clone(),
        FieldValue::String(key_value.to_string()),
    );

    Ok(UpdateExpression {
        set_terms,
        condition_name,
        condition_value,
        names,
        values,
    })
}

/// Hands out placeholder tokens, one per distinct attribute name.
///
/// A token keeps the ASCII letters, digits and underscores of the name and
/// replaces everything else with `_`. Names that end up with the same token
/// get a numeric suffix.
#[derive(Debug, Default)]
pub(crate) struct PlaceholderTokens {
    by_name: HashMap<String, String>,
    taken: HashSet<String>,
}

impl PlaceholderTokens {
    pub(crate) fn token_for(&mut self, name: &str) -> String {
        if let Some(token) = self.by_name.get(name) {
            return token.clone();
        }
        let base = sanitize(name);
        let mut token = base.clone();
        let mut n = 2;
        while self.taken.contains(&token) {
            token = format!("{base}_{n}");
            n += 1;
        }
        self.taken.insert(token.clone());
        self.by_name.insert(name.to_string(), token.clone());
        token
    }
}

fn sanitize(name: &str) -> String {
    let token: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if token.is_empty() {
        "attr".to_string()
    } else {
        token
    }
}

fn unique_value_placeholder(token: &str, taken: &BTreeMap<String, FieldValue>) -> String {
    let base = format!(":{token}");
    if !taken.contains_key(&base) {
        return base;
    }
    let expected = format!(":{token}_expected");
    if !taken.contains_key(&expected) {
        return expected;
    }
    (2..)
        .map(|n| format!(":{token}_expected{n}"))
        .find(|candidate| !taken.contains_key(candidate))
        .unwrap_or(expected)
}
