use thiserror::Error;

use crate::expression::ExpressionError;

/// Failures reported by a [`StoreClient`](super::StoreClient).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The write condition did not hold: the item is absent or its key differs.
    #[error("Conditional check failed")]
    ConditionCheckFailed,
    #[error("Table not found: {0}")]
    TableNotFound(String),
    #[error("Throughput exceeded: {0}")]
    Throttled(String),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Transport failure: {0}")]
    Transport(String),
    #[error("Store service error: {0}")]
    Service(String),
}

/// Errors that can occur during repository operations.
///
/// Store failures carry the name of the repository operation that issued the
/// call, for diagnostics.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("{operation}: write failed: {source}")]
    StoreWriteFailed {
        operation: &'static str,
        source: StoreError,
    },
    #[error("{operation}: read failed: {source}")]
    StoreReadFailed {
        operation: &'static str,
        source: StoreError,
    },
    #[error("{operation}: delete failed: {source}")]
    StoreDeleteFailed {
        operation: &'static str,
        source: StoreError,
    },
    #[error("{operation}: update failed: {source}")]
    StoreUpdateFailed {
        operation: &'static str,
        source: StoreError,
    },
    #[error("Expression build failed: {0}")]
    ExpressionBuildFailed(#[from] ExpressionError),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl RepositoryError {
    /// Whether an update was rejected because the item did not exist or its
    /// key did not match, as opposed to an infrastructure failure.
    pub fn is_condition_check_failed(&self) -> bool {
        matches!(
            self,
            RepositoryError::StoreUpdateFailed {
                source: StoreError::ConditionCheckFailed,
                ..
            }
        )
    }

    /// The underlying store failure, if any.
    pub fn store_error(&self) -> Option<&StoreError> {
        match self {
            RepositoryError::StoreWriteFailed { source, .. }
            | RepositoryError::StoreReadFailed { source, .. }
            | RepositoryError::StoreDeleteFailed { source, .. }
            | RepositoryError::StoreUpdateFailed { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;
