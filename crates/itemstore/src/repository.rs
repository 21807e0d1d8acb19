//! Table repository implementation.
//!
//! Implements `ItemRepository` from `itemstore_core::storage` over any
//! `StoreClient`.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;

use itemstore_core::storage::{
    item_to_record, record_to_item, Item, ItemRepository, ReadErrorPolicy, RepositoryError,
    Result, StoreClient, StoreError,
};
use itemstore_core::{
    build_key, build_update, extract_fields, FieldValue, IndexQuery, RequestContext, SkipSet,
    UpdateExpression,
};

use crate::logs::{log_error, log_info, log_info_with_payload};

/// Repository bound to one table of one store.
///
/// Stateless across calls: every call builds fresh requests, so one instance
/// can serve concurrent invocations.
#[derive(Debug, Clone)]
pub struct TableRepository<C> {
    client: C,
    table_name: String,
    read_errors: ReadErrorPolicy,
}

impl<C: StoreClient> TableRepository<C> {
    /// Creates a new repository with the given store client and table name.
    ///
    /// Read and query failures return an empty result unless another policy
    /// is set with [`TableRepository::with_read_error_policy`].
    pub fn new(client: C, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
            read_errors: ReadErrorPolicy::default(),
        }
    }

    pub fn with_read_error_policy(mut self, policy: ReadErrorPolicy) -> Self {
        self.read_errors = policy;
        self
    }

    /// Get the table name.
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn read_error_policy(&self) -> ReadErrorPolicy {
        self.read_errors
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Gets the raw stored item whose `key_field` equals `key_value`.
    pub async fn read_item(
        &self,
        ctx: &RequestContext,
        key_field: &str,
        key_value: &str,
    ) -> Result<Option<Item>> {
        log_info("read", ctx);
        let key = build_key(key_field, key_value)?;

        match self.client.get_item(&self.table_name, &key).await {
            Ok(item) => Ok(item),
            Err(err) => {
                log_error("read", "GetItem", ctx, &err);
                self.on_read_error("read", err).map(|()| None)
            }
        }
    }

    /// Runs `query` and returns the raw page of matching items.
    pub async fn query_items(&self, ctx: &RequestContext, query: &IndexQuery) -> Result<Vec<Item>> {
        log_info("query_by_indexed_field", ctx);
        let input = json!({
            "table": self.table_name,
            "index": query.index_name,
            "keyCondition": query.key_condition(),
            "values": bindings_json(&query.values()),
        });
        log_info_with_payload("query_by_indexed_field input", &input, ctx);

        match self.client.query_index(&self.table_name, query).await {
            Ok(items) => Ok(items),
            Err(err) => {
                log_error("query_by_indexed_field", "Query", ctx, &err);
                self.on_read_error("query_by_indexed_field", err)
                    .map(|()| Vec::new())
            }
        }
    }

    fn on_read_error(&self, operation: &'static str, source: StoreError) -> Result<()> {
        match self.read_errors {
            ReadErrorPolicy::ReturnEmpty => Ok(()),
            ReadErrorPolicy::Propagate => Err(RepositoryError::StoreReadFailed { operation, source }),
        }
    }
}

fn bindings_json<'a>(values: impl IntoIterator<Item = (&'a String, &'a FieldValue)>) -> serde_json::Value {
    values
        .into_iter()
        .map(|(placeholder, value)| (placeholder.clone(), value.clone().into_json()))
        .collect::<serde_json::Map<_, _>>()
        .into()
}

fn expression_json(expression: &UpdateExpression) -> serde_json::Value {
    json!({
        "update": expression.update_clause(),
        "condition": expression.condition_clause(),
        "names": expression.names(),
        "values": bindings_json(expression.values()),
    })
}

#[async_trait]
impl<C: StoreClient> ItemRepository for TableRepository<C> {
    async fn create<T>(&self, ctx: &RequestContext, item: &T) -> Result<()>
    where
        T: Serialize + Sync,
    {
        log_info("create", ctx);
        let attributes = record_to_item(item).inspect_err(|err| {
            log_error("create", "record_to_item", ctx, err);
        })?;
        log_info_with_payload("create input", item, ctx);

        self.client
            .put_item(&self.table_name, attributes)
            .await
            .map_err(|source| {
                log_error("create", "PutItem", ctx, &source);
                RepositoryError::StoreWriteFailed {
                    operation: "create",
                    source,
                }
            })
    }

    async fn read<T>(&self, ctx: &RequestContext, key_field: &str, key_value: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned + Send,
    {
        match self.read_item(ctx, key_field, key_value).await? {
            Some(item) => item_to_record(item).map(Some),
            None => Ok(None),
        }
    }

    async fn delete(&self, ctx: &RequestContext, key_field: &str, key_value: &str) -> Result<()> {
        log_info("delete", ctx);
        let key = build_key(key_field, key_value)?;

        self.client
            .delete_item(&self.table_name, &key)
            .await
            .map_err(|source| {
                log_error("delete", "DeleteItem", ctx, &source);
                RepositoryError::StoreDeleteFailed {
                    operation: "delete",
                    source,
                }
            })
    }

    async fn update<T>(
        &self,
        ctx: &RequestContext,
        item: &T,
        key_field: &str,
        key_value: &str,
        skip_fields: &[&str],
    ) -> Result<()>
    where
        T: Serialize + Sync,
    {
        log_info("update", ctx);
        let document = extract_fields(item).inspect_err(|err| {
            log_error("update", "extract_fields", ctx, err);
        })?;

        // A failed build aborts before the store is touched.
        let expression = build_update(&document, &SkipSet::new(skip_fields), key_field, key_value)
            .map_err(|err| {
                log_error("update", "build_update", ctx, &err);
                RepositoryError::ExpressionBuildFailed(err)
            })?;
        log_info_with_payload("update expression", &expression_json(&expression), ctx);
        let key = build_key(key_field, key_value)?;

        self.client
            .update_item(&self.table_name, &key, &expression)
            .await
            .map_err(|source| {
                log_error("update", "UpdateItem", ctx, &source);
                RepositoryError::StoreUpdateFailed {
                    operation: "update",
                    source,
                }
            })
    }

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
        T: DeserializeOwned + Send,
    {
        let query = IndexQuery::new(index_name, key_field, key_value, status_field, status_value)?;
        self.query_items(ctx, &query)
            .await?
            .into_iter()
            .map(item_to_record)
            .collect()
    }
}
