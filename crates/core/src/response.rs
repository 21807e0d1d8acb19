//! Uniform `{status, message, data}` response envelope.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::storage::{repository_error_to_status_code, RepositoryError};

pub const DATA_NOT_FOUND: &str = "Data not found";
pub const INVALID_REQUEST_BODY: &str = "Invalid request body";
pub const INVALID_RESPONSE_BODY: &str = "Invalid response body";
pub const ERROR_CREATING_ITEM: &str = "Error creating item";
pub const ERROR_DELETING_ITEM: &str = "Error deleting element";
pub const ERROR_UPDATING_ITEM: &str = "Error updating element";
pub const ITEM_CREATED: &str = "Item created successfully";
pub const ITEM_OBTAINED: &str = "Item successfully obtained";
pub const ITEM_DELETED: &str = "Item deleted successfully";
pub const ITEM_UPDATED: &str = "Item successfully updated";

/// The envelope every operation outcome is mapped into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ApiResponse {
    pub fn success(status: u16, data: Option<Value>, message: impl Into<String>) -> Self {
        Self {
            status,
            message: Some(message.into()),
            data,
        }
    }

    pub fn error(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: Some(message.into()),
            data: None,
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

impl From<&RepositoryError> for ApiResponse {
    fn from(error: &RepositoryError) -> Self {
        let message = match error {
            RepositoryError::InvalidArgument(_) => INVALID_REQUEST_BODY,
            RepositoryError::Serialization(_) => INVALID_RESPONSE_BODY,
            RepositoryError::StoreWriteFailed { .. } => ERROR_CREATING_ITEM,
            RepositoryError::StoreDeleteFailed { .. } => ERROR_DELETING_ITEM,
            RepositoryError::StoreReadFailed { .. } => DATA_NOT_FOUND,
            RepositoryError::StoreUpdateFailed { .. }
            | RepositoryError::ExpressionBuildFailed(_) => ERROR_UPDATING_ITEM,
        };
        ApiResponse::error(repository_error_to_status_code(error), message)
    }
}
