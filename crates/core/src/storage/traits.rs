use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::context::RequestContext;
use crate::expression::UpdateExpression;
use crate::key::Key;
use crate::query::IndexQuery;

use super::{Item, Result, StoreError};

/// The operations a repository needs from the underlying key-value store.
///
/// Implementations own their connection handling and retry behavior.
#[async_trait]
pub trait StoreClient: Send + Sync {
    /// Writes `item`, replacing any item with the same key.
    async fn put_item(&self, table: &str, item: Item) -> std::result::Result<(), StoreError>;

    /// Reads the item stored under `key`.
    async fn get_item(&self, table: &str, key: &Key)
        -> std::result::Result<Option<Item>, StoreError>;

    async fn delete_item(&self, table: &str, key: &Key) -> std::result::Result<(), StoreError>;

    /// Applies `expression` to the item under `key` if its condition holds.
    ///
    /// A failed condition is reported as [`StoreError::ConditionCheckFailed`].
    async fn update_item(
        &self,
        table: &str,
        key: &Key,
        expression: &UpdateExpression,
    ) -> std::result::Result<(), StoreError>;

    /// Returns one page of items matching `query`.
    async fn query_index(
        &self,
        table: &str,
        query: &IndexQuery,
    ) -> std::result::Result<Vec<Item>, StoreError>;
}

/// Create, read, update, delete and indexed lookups against one table.
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// Stores a new item.
    async fn create<T>(&self, ctx: &RequestContext, item: &T) -> Result<()>
    where
        T: Serialize + Sync;

    /// Gets the item whose `key_field` equals `key_value`.
    async fn read<T>(&self, ctx: &RequestContext, key_field: &str, key_value: &str)
        -> Result<Option<T>>
    where
        T: DeserializeOwned + Send;

    /// Deletes the item whose `key_field` equals `key_value`.
    async fn delete(&self, ctx: &RequestContext, key_field: &str, key_value: &str) -> Result<()>;

    /// Overwrites the fields of an existing item with the fields of `item`,
    /// except those named in `skip_fields`.
    async fn update<T>(
        &self,
        ctx: &RequestContext,
        item: &T,
        key_field: &str,
        key_value: &str,
        skip_fields: &[&str],
    ) -> Result<()>
    where
        T: Serialize + Sync;

    /// Looks up items through `index_name` where `key_field` equals
    /// `key_value` and `status_field` equals `status_value`.
    async fn query_by_indexed_field<T>(
        &self,
        ctx: &RequestContext,
        key_field: &str,
        key_value: &str,
        index_name: &str,
        status_field: &str,
        status_value: &str,
    ) -> Result<Vec<T>>
    where
        T: DeserializeOwned + Send;
}
