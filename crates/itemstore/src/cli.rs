//! CLI command definitions and dispatch.

use clap::{Parser, Subcommand};
use serde_json::Value;

use itemstore_core::response::{
    ApiResponse, DATA_NOT_FOUND, ITEM_CREATED, ITEM_DELETED, ITEM_OBTAINED, ITEM_UPDATED,
};
use itemstore_core::storage::{ItemRepository, ReadErrorPolicy};
use itemstore_core::RequestContext;

/// Data-access CLI for a single DynamoDB table.
#[derive(Debug, Parser)]
#[command(name = "itemstore")]
#[command(about = "Create, read, update, delete and query items in a DynamoDB table", long_about = None)]
pub struct Cli {
    /// Table name; overrides `TABLE_NAME`.
    #[arg(long, global = true)]
    pub table: Option<String>,

    /// AWS region; overrides `AWS_REGION`.
    #[arg(long, global = true)]
    pub region: Option<String>,

    /// Custom endpoint URL, e.g. http://localhost:8000 for local DynamoDB;
    /// overrides `AWS_ENDPOINT_URL`.
    #[arg(long, global = true)]
    pub endpoint_url: Option<String>,

    /// What reads and queries do when the store fails: `empty` or `propagate`;
    /// overrides `READ_ERROR_POLICY`.
    #[arg(long, global = true, value_parser = parse_policy)]
    pub read_errors: Option<ReadErrorPolicy>,

    /// Request id to correlate logs with; generated when absent.
    #[arg(long, global = true)]
    pub request_id: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Store a new item.
    Put {
        /// Item as a JSON object.
        #[arg(long, value_parser = parse_item)]
        item: Value,
    },
    /// Get an item by key.
    Get {
        #[arg(long)]
        key_field: String,
        #[arg(long)]
        key_value: String,
    },
    /// Delete an item by key.
    Delete {
        #[arg(long)]
        key_field: String,
        #[arg(long)]
        key_value: String,
    },
    /// Overwrite the fields of an existing item.
    Update {
        /// Fields to write, as a JSON object.
        #[arg(long, value_parser = parse_item)]
        item: Value,
        #[arg(long)]
        key_field: String,
        #[arg(long)]
        key_value: String,
        /// Field to leave untouched (repeatable).
        #[arg(long = "skip")]
        skip: Vec<String>,
    },
    /// Look up items through a secondary index.
    Query {
        /// Index name.
        #[arg(long)]
        index: String,
        #[arg(long)]
        key_field: String,
        #[arg(long)]
        key_value: String,
        #[arg(long)]
        status_field: String,
        #[arg(long)]
        status_value: String,
    },
}

fn parse_item(raw: &str) -> Result<Value, String> {
    serde_json::from_str(raw).map_err(|e| format!("item is not valid JSON: {e}"))
}

fn parse_policy(raw: &str) -> Result<ReadErrorPolicy, String> {
    raw.parse()
}

/// Runs `command` against `repository` and maps the outcome to a response.
pub async fn execute<R>(repository: &R, ctx: &RequestContext, command: Command) -> ApiResponse
where
    R: ItemRepository,
{
    let outcome = match command {
        Command::Put { item } => repository
            .create(ctx, &item)
            .await
            .map(|()| ApiResponse::success(201, None, ITEM_CREATED)),
        Command::Get {
            key_field,
            key_value,
        } => repository
            .read::<Value>(ctx, &key_field, &key_value)
            .await
            .map(|item| match item {
                Some(item) => ApiResponse::success(200, Some(item), ITEM_OBTAINED),
                None => ApiResponse::error(404, DATA_NOT_FOUND),
            }),
        Command::Delete {
            key_field,
            key_value,
        } => repository
            .delete(ctx, &key_field, &key_value)
            .await
            .map(|()| ApiResponse::success(200, None, ITEM_DELETED)),
        Command::Update {
            item,
            key_field,
            key_value,
            skip,
        } => {
            let skip: Vec<&str> = skip.iter().map(String::as_str).collect();
            repository
                .update(ctx, &item, &key_field, &key_value, &skip)
                .await
                .map(|()| ApiResponse::success(200, None, ITEM_UPDATED))
        }
        Command::Query {
            index,
            key_field,
            key_value,
            status_field,
            status_value,
        } => repository
            .query_by_indexed_field::<Value>(
                ctx,
                &key_field,
                &key_value,
                &index,
                &status_field,
                &status_value,
            )
            .await
            .map(|items| ApiResponse::success(200, Some(Value::Array(items)), ITEM_OBTAINED)),
    };

    outcome.unwrap_or_else(|err| ApiResponse::from(&err))
}

#[cfg(all(test, feature = "inmemory"))]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::storage::inmemory::{InMemoryStore, StoreOperation};
    use crate::TableRepository;
    use itemstore_core::storage::StoreError;

    const TABLE: &str = "payments";

    fn repository() -> TableRepository<InMemoryStore> {
        let store = InMemoryStore::new()
            .with_table(TABLE, &["id"])
            .with_index(TABLE, "gsi1");
        TableRepository::new(store, TABLE)
    }

    fn get(id: &str) -> Command {
        Command::Get {
            key_field: "id".to_string(),
            key_value: id.to_string(),
        }
    }

    async fn put(repo: &TableRepository<InMemoryStore>, item: Value) {
        let response = execute(repo, &RequestContext::default(), Command::Put { item }).await;
        assert_eq!(response.status, 201);
    }

    #[test]
    fn test_parse_update_with_repeated_skip() {
        let cli = Cli::try_parse_from([
            "itemstore",
            "--table",
            "payments",
            "update",
            "--item",
            r#"{"Amount": 5}"#,
            "--key-field",
            "id",
            "--key-value",
            "abc",
            "--skip",
            "status",
            "--skip",
            "createdAt",
        ])
        .unwrap();

        assert_eq!(cli.table.as_deref(), Some("payments"));
        match cli.command {
            Command::Update { item, skip, .. } => {
                assert_eq!(item, json!({"Amount": 5}));
                assert_eq!(skip, vec!["status", "createdAt"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_rejects_invalid_item_json() {
        let result = Cli::try_parse_from(["itemstore", "put", "--item", "{not json"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_read_error_policy() {
        let cli = Cli::try_parse_from([
            "itemstore",
            "--read-errors",
            "propagate",
            "get",
            "--key-field",
            "id",
            "--key-value",
            "abc",
        ])
        .unwrap();

        assert_eq!(cli.read_errors, Some(ReadErrorPolicy::Propagate));
    }

    #[test]
    fn test_global_flags_are_only_overrides() {
        let cli = Cli::try_parse_from(["itemstore", "get", "--key-field", "id", "--key-value", "a"])
            .unwrap();

        assert_eq!(cli.table, None);
        assert_eq!(cli.region, None);
        assert_eq!(cli.endpoint_url, None);
        assert_eq!(cli.read_errors, None);
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let repo = repository();
        put(&repo, json!({"id": "abc", "amount": 10})).await;

        let response = execute(&repo, &RequestContext::default(), get("abc")).await;

        assert_eq!(
            response,
            ApiResponse::success(200, Some(json!({"id": "abc", "amount": 10})), ITEM_OBTAINED)
        );
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let response = execute(&repository(), &RequestContext::default(), get("nope")).await;
        assert_eq!(response, ApiResponse::error(404, DATA_NOT_FOUND));
    }

    #[tokio::test]
    async fn test_update_missing_item_is_not_found() {
        let command = Command::Update {
            item: json!({"Amount": 5}),
            key_field: "id".to_string(),
            key_value: "abc".to_string(),
            skip: vec![],
        };

        let response = execute(&repository(), &RequestContext::default(), command).await;

        assert_eq!(response.status, 404);
        assert!(!response.is_success());
    }

    #[tokio::test]
    async fn test_update_non_object_item_is_bad_request() {
        let command = Command::Update {
            item: json!([1, 2]),
            key_field: "id".to_string(),
            key_value: "abc".to_string(),
            skip: vec![],
        };

        let response = execute(&repository(), &RequestContext::default(), command).await;

        assert_eq!(response.status, 400);
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = repository();
        put(&repo, json!({"id": "abc"})).await;

        let command = Command::Delete {
            key_field: "id".to_string(),
            key_value: "abc".to_string(),
        };
        let response = execute(&repo, &RequestContext::default(), command).await;

        assert_eq!(response, ApiResponse::success(200, None, ITEM_DELETED));
        assert_eq!(repo.client().item_count(TABLE).await, 0);
    }

    #[tokio::test]
    async fn test_query_returns_array() {
        let repo = repository();
        put(&repo, json!({"id": "p1", "merchantId": "M1", "status": "ACTIVE"})).await;
        put(&repo, json!({"id": "p2", "merchantId": "M1", "status": "INACTIVE"})).await;

        let command = Command::Query {
            index: "gsi1".to_string(),
            key_field: "merchantId".to_string(),
            key_value: "M1".to_string(),
            status_field: "status".to_string(),
            status_value: "ACTIVE".to_string(),
        };
        let response = execute(&repo, &RequestContext::default(), command).await;

        assert_eq!(
            response.data,
            Some(json!([{"id": "p1", "merchantId": "M1", "status": "ACTIVE"}]))
        );
    }

    #[tokio::test]
    async fn test_create_failure_maps_to_server_error() {
        let repo = repository();
        repo.client()
            .fail_next(StoreOperation::Put, StoreError::Throttled("slow down".to_string()))
            .await;

        let response =
            execute(&repo, &RequestContext::default(), Command::Put { item: json!({"id": "a"}) })
                .await;

        assert_eq!(response.status, 503);
    }
}
