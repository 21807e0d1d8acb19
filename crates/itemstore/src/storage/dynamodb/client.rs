//! DynamoDB store client.
//!
//! Implements `StoreClient` from `itemstore_core::storage` on top of
//! `aws-sdk-dynamodb`.

use async_trait::async_trait;
use aws_sdk_dynamodb::Client;

use itemstore_core::storage::{Item, StoreClient, StoreError};
use itemstore_core::{IndexQuery, Key, UpdateExpression};

use super::conversions::{
    attributes_to_item, item_to_attributes, key_to_attributes, names_to_attributes,
    values_to_attributes,
};
use super::error::{
    map_delete_item_error, map_get_item_error, map_put_item_error, map_query_error,
    map_update_item_error,
};
use crate::config::Config;

/// DynamoDB-backed store client.
///
/// Wraps an explicitly constructed SDK client; connection pooling and retries
/// are left to the SDK.
#[derive(Debug, Clone)]
pub struct DynamoDbStore {
    client: Client,
}

impl DynamoDbStore {
    /// Creates a store client from an existing SDK client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Creates a store client for the configured region and endpoint.
    ///
    /// Uses the AWS SDK default credential chain. Setting an endpoint URL
    /// targets a local DynamoDB.
    pub async fn connect(config: &Config) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(config.region.clone()));

        if let Some(endpoint) = &config.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }

        let sdk_config = loader.load().await;
        Self::new(Client::new(&sdk_config))
    }
}

#[async_trait]
impl StoreClient for DynamoDbStore {
    async fn put_item(&self, table: &str, item: Item) -> Result<(), StoreError> {
        self.client
            .put_item()
            .table_name(table)
            .set_item(Some(item_to_attributes(&item)))
            .send()
            .await
            .map_err(map_put_item_error)?;

        Ok(())
    }

    async fn get_item(&self, table: &str, key: &Key) -> Result<Option<Item>, StoreError> {
        let result = self
            .client
            .get_item()
            .table_name(table)
            .set_key(Some(key_to_attributes(key)))
            .send()
            .await
            .map_err(map_get_item_error)?;

        Ok(result.item.as_ref().map(attributes_to_item))
    }

    async fn delete_item(&self, table: &str, key: &Key) -> Result<(), StoreError> {
        self.client
            .delete_item()
            .table_name(table)
            .set_key(Some(key_to_attributes(key)))
            .send()
            .await
            .map_err(map_delete_item_error)?;

        Ok(())
    }

    async fn update_item(
        &self,
        table: &str,
        key: &Key,
        expression: &UpdateExpression,
    ) -> Result<(), StoreError> {
        self.client
            .update_item()
            .table_name(table)
            .set_key(Some(key_to_attributes(key)))
            .set_update_expression(expression.update_clause())
            .condition_expression(expression.condition_clause())
            .set_expression_attribute_names(Some(names_to_attributes(expression.names())))
            .set_expression_attribute_values(Some(values_to_attributes(expression.values())))
            .send()
            .await
            .map_err(map_update_item_error)?;

        Ok(())
    }

    async fn query_index(&self, table: &str, query: &IndexQuery) -> Result<Vec<Item>, StoreError> {
        let result = self
            .client
            .query()
            .table_name(table)
            .index_name(&query.index_name)
            .key_condition_expression(query.key_condition())
            .set_expression_attribute_names(Some(names_to_attributes(&query.names())))
            .set_expression_attribute_values(Some(values_to_attributes(&query.values())))
            .send()
            .await
            .map_err(map_query_error)?;

        let items = result.items.unwrap_or_default();
        Ok(items.iter().map(attributes_to_item).collect())
    }
}
