//! Pure functions for mapping repository errors to HTTP status codes.

use super::{RepositoryError, StoreError};

/// Maps a [`RepositoryError`] to an HTTP status code.
///
/// - `InvalidArgument` -> 400 (Bad Request)
/// - `ExpressionBuildFailed` -> 400 (Bad Request)
/// - `StoreUpdateFailed` with a failed condition -> 404 (Not Found)
/// - any store failure caused by throttling -> 503 (Service Unavailable)
/// - other store failures -> 500 (Internal Server Error)
/// - `Serialization` -> 500 (Internal Server Error)
///
/// # Examples
///
/// ```
/// use itemstore_core::storage::{repository_error_to_status_code, RepositoryError, StoreError};
///
/// let error = RepositoryError::StoreUpdateFailed {
///     operation: "update",
///     source: StoreError::ConditionCheckFailed,
/// };
/// assert_eq!(repository_error_to_status_code(&error), 404);
/// ```
pub fn repository_error_to_status_code(error: &RepositoryError) -> u16 {
    if error.is_condition_check_failed() {
        return 404;
    }
    match error {
        RepositoryError::InvalidArgument(_) => 400,
        RepositoryError::ExpressionBuildFailed(_) => 400,
        RepositoryError::Serialization(_) => 500,
        _ => match error.store_error() {
            Some(StoreError::Throttled(_)) => 503,
            _ => 500,
        },
    }
}
