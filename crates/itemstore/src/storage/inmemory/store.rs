//! In-memory store client implementation.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};

use itemstore_core::storage::{Item, StoreClient, StoreError};
use itemstore_core::{FieldValue, IndexQuery, Key, UpdateExpression};

/// The store operation a scripted failure applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOperation {
    Put,
    Get,
    Delete,
    Update,
    Query,
}

#[derive(Debug, Default)]
struct Table {
    key_fields: Vec<String>,
    indexes: HashSet<String>,
    items: BTreeMap<String, Item>,
}

impl Table {
    /// Renders the primary key of `item`, failing when a key attribute is missing.
    fn item_key(&self, item: &Item) -> Result<String, StoreError> {
        let mut key: Option<Key> = None;
        for field in &self.key_fields {
            let value = item.get(field).and_then(FieldValue::as_str).ok_or_else(|| {
                StoreError::Validation(format!("missing key attribute: {field}"))
            })?;
            key = Some(match key {
                Some(key) => key.with(field.as_str(), value),
                None => itemstore_core::build_key(field.as_str(), value)
                    .map_err(|e| StoreError::Validation(e.to_string()))?,
            });
        }
        key.map(|k| k.render())
            .ok_or_else(|| StoreError::Validation("table has no key schema".to_string()))
    }

    fn check_key(&self, key: &Key) -> Result<String, StoreError> {
        let names: Vec<&str> = key.attributes().iter().map(|(n, _)| n.as_str()).collect();
        if names != self.key_fields.iter().map(String::as_str).collect::<Vec<_>>() {
            return Err(StoreError::Validation(
                "The provided key element does not match the schema".to_string(),
            ));
        }
        Ok(key.render())
    }
}

/// In-memory store for testing.
///
/// Tables must be declared with their key schema before use. Data is not
/// persisted and will be lost when the store is dropped.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<HashMap<String, Table>>>,
    failures: Arc<Mutex<HashMap<StoreOperation, StoreError>>>,
}

impl InMemoryStore {
    /// Creates a new store with no tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a table keyed by `key_fields`, in key-schema order.
    pub fn with_table(self, name: &str, key_fields: &[&str]) -> Self {
        if let Ok(mut tables) = self.tables.try_write() {
            tables.insert(
                name.to_string(),
                Table {
                    key_fields: key_fields.iter().map(|f| f.to_string()).collect(),
                    ..Table::default()
                },
            );
        }
        self
    }

    /// Declares a secondary index on an existing table.
    pub fn with_index(self, table: &str, index_name: &str) -> Self {
        if let Ok(mut tables) = self.tables.try_write() {
            if let Some(table) = tables.get_mut(table) {
                table.indexes.insert(index_name.to_string());
            }
        }
        self
    }

    /// Makes the next call of `operation` fail with `error`.
    pub async fn fail_next(&self, operation: StoreOperation, error: StoreError) {
        self.failures.lock().await.insert(operation, error);
    }

    /// Number of items stored in `table`.
    pub async fn item_count(&self, table: &str) -> usize {
        self.tables
            .read()
            .await
            .get(table)
            .map(|t| t.items.len())
            .unwrap_or_default()
    }

    async fn take_failure(&self, operation: StoreOperation) -> Result<(), StoreError> {
        match self.failures.lock().await.remove(&operation) {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

fn table_not_found(table: &str) -> StoreError {
    StoreError::TableNotFound(format!("Requested resource not found: {table}"))
}

#[async_trait]
impl StoreClient for InMemoryStore {
    async fn put_item(&self, table: &str, item: Item) -> Result<(), StoreError> {
        self.take_failure(StoreOperation::Put).await?;
        let mut tables = self.tables.write().await;
        let table = tables.get_mut(table).ok_or_else(|| table_not_found(table))?;
        let key = table.item_key(&item)?;
        table.items.insert(key, item);
        Ok(())
    }

    async fn get_item(&self, table: &str, key: &Key) -> Result<Option<Item>, StoreError> {
        self.take_failure(StoreOperation::Get).await?;
        let tables = self.tables.read().await;
        let table = tables.get(table).ok_or_else(|| table_not_found(table))?;
        let key = table.check_key(key)?;
        Ok(table.items.get(&key).cloned())
    }

    async fn delete_item(&self, table: &str, key: &Key) -> Result<(), StoreError> {
        self.take_failure(StoreOperation::Delete).await?;
        let mut tables = self.tables.write().await;
        let table = tables.get_mut(table).ok_or_else(|| table_not_found(table))?;
        let key = table.check_key(key)?;
        table.items.remove(&key);
        Ok(())
    }

    async fn update_item(
        &self,
        table: &str,
        key: &Key,
        expression: &UpdateExpression,
    ) -> Result<(), StoreError> {
        self.take_failure(StoreOperation::Update).await?;
        let mut tables = self.tables.write().await;
        let table = tables.get_mut(table).ok_or_else(|| table_not_found(table))?;
        let key = table.check_key(key)?;

        if let Some(attribute) = expression
            .set_attributes()
            .find(|attribute| table.key_fields.iter().any(|field| field == attribute))
        {
            return Err(StoreError::Validation(format!(
                "Cannot update attribute {attribute}. This attribute is part of the key"
            )));
        }

        let item = table
            .items
            .get_mut(&key)
            .ok_or(StoreError::ConditionCheckFailed)?;

        let holds = match (expression.condition_attribute(), expression.expected_key_value()) {
            (Some(attribute), Some(expected)) => item.get(attribute) == Some(expected),
            _ => false,
        };
        if !holds {
            return Err(StoreError::ConditionCheckFailed);
        }

        let updates: Vec<(String, FieldValue)> = expression
            .set_attributes()
            .filter_map(|attribute| {
                expression
                    .set_value(attribute)
                    .map(|value| (attribute.to_string(), value.clone()))
            })
            .collect();
        for (attribute, value) in updates {
            item.insert(attribute, value);
        }
        Ok(())
    }

    async fn query_index(&self, table: &str, query: &IndexQuery) -> Result<Vec<Item>, StoreError> {
        self.take_failure(StoreOperation::Query).await?;
        let tables = self.tables.read().await;
        let table = tables.get(table).ok_or_else(|| table_not_found(table))?;
        if !table.indexes.contains(&query.index_name) {
            return Err(StoreError::Validation(format!(
                "The table does not have the specified index: {}",
                query.index_name
            )));
        }

        let has = |item: &&Item, field: &str, value: &str| {
            item.get(field).and_then(FieldValue::as_str) == Some(value)
        };
        Ok(table
            .items
            .values()
            .filter(|item| has(item, &query.key_field, &query.key_value))
            .filter(|item| has(item, &query.status_field, &query.status_value))
            .cloned()
            .collect())
    }
}
