//! DynamoDB error mapping.
//!
//! Maps AWS SDK errors to `StoreError` from `itemstore_core::storage`.
//! Failures that never reached the service (timeouts, dispatch and response
//! errors) are transport failures; service errors are mapped per operation.

use std::fmt::Debug;

use aws_sdk_dynamodb::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_dynamodb::operation::delete_item::DeleteItemError;
use aws_sdk_dynamodb::operation::get_item::GetItemError;
use aws_sdk_dynamodb::operation::put_item::PutItemError;
use aws_sdk_dynamodb::operation::query::QueryError;
use aws_sdk_dynamodb::operation::update_item::UpdateItemError;
use itemstore_core::storage::StoreError;

const VALIDATION_EXCEPTION: &str = "ValidationException";

fn map_sdk_error<E, R>(err: SdkError<E, R>, service: impl FnOnce(E) -> StoreError) -> StoreError
where
    E: std::error::Error + ProvideErrorMetadata + Send + Sync + 'static,
    R: Debug + Send + Sync + 'static,
{
    match err {
        SdkError::ServiceError(context) => {
            let err = context.into_err();
            if err.code() == Some(VALIDATION_EXCEPTION) {
                StoreError::Validation(err.message().unwrap_or_default().to_string())
            } else {
                service(err)
            }
        }
        SdkError::ConstructionFailure(_) => {
            StoreError::Validation(DisplayErrorContext(&err).to_string())
        }
        _ => StoreError::Transport(DisplayErrorContext(&err).to_string()),
    }
}

/// Map a GetItem SDK error to StoreError.
pub fn map_get_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<GetItemError, R>,
) -> StoreError {
    map_sdk_error(err, |err| match err {
        GetItemError::ResourceNotFoundException(e) => {
            StoreError::TableNotFound(e.message().unwrap_or_default().to_string())
        }
        GetItemError::ProvisionedThroughputExceededException(_) => {
            StoreError::Throttled("Throughput exceeded, please retry".to_string())
        }
        GetItemError::RequestLimitExceeded(_) => {
            StoreError::Throttled("Request limit exceeded, please retry".to_string())
        }
        GetItemError::InternalServerError(_) => {
            StoreError::Service("DynamoDB internal server error".to_string())
        }
        err => StoreError::Service(format!("GetItem failed: {}", DisplayErrorContext(&err))),
    })
}

/// Map a Query SDK error to StoreError.
pub fn map_query_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<QueryError, R>,
) -> StoreError {
    map_sdk_error(err, |err| match err {
        QueryError::ResourceNotFoundException(e) => {
            StoreError::TableNotFound(e.message().unwrap_or_default().to_string())
        }
        QueryError::ProvisionedThroughputExceededException(_) => {
            StoreError::Throttled("Throughput exceeded, please retry".to_string())
        }
        QueryError::RequestLimitExceeded(_) => {
            StoreError::Throttled("Request limit exceeded, please retry".to_string())
        }
        QueryError::InternalServerError(_) => {
            StoreError::Service("DynamoDB internal server error".to_string())
        }
        err => StoreError::Service(format!("Query failed: {}", DisplayErrorContext(&err))),
    })
}

/// Map a PutItem SDK error to StoreError.
pub fn map_put_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<PutItemError, R>,
) -> StoreError {
    map_sdk_error(err, |err| match err {
        PutItemError::ConditionalCheckFailedException(_) => StoreError::ConditionCheckFailed,
        PutItemError::ResourceNotFoundException(e) => {
            StoreError::TableNotFound(e.message().unwrap_or_default().to_string())
        }
        PutItemError::ProvisionedThroughputExceededException(_) => {
            StoreError::Throttled("Throughput exceeded, please retry".to_string())
        }
        PutItemError::RequestLimitExceeded(_) => {
            StoreError::Throttled("Request limit exceeded, please retry".to_string())
        }
        PutItemError::ItemCollectionSizeLimitExceededException(_) => {
            StoreError::Validation("Item collection size limit exceeded".to_string())
        }
        PutItemError::TransactionConflictException(_) => {
            StoreError::Service("Transaction conflict, please retry".to_string())
        }
        PutItemError::InternalServerError(_) => {
            StoreError::Service("DynamoDB internal server error".to_string())
        }
        err => StoreError::Service(format!("PutItem failed: {}", DisplayErrorContext(&err))),
    })
}

/// Map an UpdateItem SDK error to StoreError.
pub fn map_update_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<UpdateItemError, R>,
) -> StoreError {
    map_sdk_error(err, |err| match err {
        UpdateItemError::ConditionalCheckFailedException(_) => StoreError::ConditionCheckFailed,
        UpdateItemError::ResourceNotFoundException(e) => {
            StoreError::TableNotFound(e.message().unwrap_or_default().to_string())
        }
        UpdateItemError::ProvisionedThroughputExceededException(_) => {
            StoreError::Throttled("Throughput exceeded, please retry".to_string())
        }
        UpdateItemError::RequestLimitExceeded(_) => {
            StoreError::Throttled("Request limit exceeded, please retry".to_string())
        }
        UpdateItemError::ItemCollectionSizeLimitExceededException(_) => {
            StoreError::Validation("Item collection size limit exceeded".to_string())
        }
        UpdateItemError::TransactionConflictException(_) => {
            StoreError::Service("Transaction conflict, please retry".to_string())
        }
        UpdateItemError::InternalServerError(_) => {
            StoreError::Service("DynamoDB internal server error".to_string())
        }
        err => StoreError::Service(format!("UpdateItem failed: {}", DisplayErrorContext(&err))),
    })
}

/// Map a DeleteItem SDK error to StoreError.
pub fn map_delete_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<DeleteItemError, R>,
) -> StoreError {
    map_sdk_error(err, |err| match err {
        DeleteItemError::ConditionalCheckFailedException(_) => StoreError::ConditionCheckFailed,
        DeleteItemError::ResourceNotFoundException(e) => {
            StoreError::TableNotFound(e.message().unwrap_or_default().to_string())
        }
        DeleteItemError::ProvisionedThroughputExceededException(_) => {
            StoreError::Throttled("Throughput exceeded, please retry".to_string())
        }
        DeleteItemError::RequestLimitExceeded(_) => {
            StoreError::Throttled("Request limit exceeded, please retry".to_string())
        }
        DeleteItemError::ItemCollectionSizeLimitExceededException(_) => {
            StoreError::Validation("Item collection size limit exceeded".to_string())
        }
        DeleteItemError::TransactionConflictException(_) => {
            StoreError::Service("Transaction conflict, please retry".to_string())
        }
        DeleteItemError::InternalServerError(_) => {
            StoreError::Service("DynamoDB internal server error".to_string())
        }
        err => StoreError::Service(format!("DeleteItem failed: {}", DisplayErrorContext(&err))),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_dynamodb::types::error::{
        ConditionalCheckFailedException, ProvisionedThroughputExceededException,
        ResourceNotFoundException,
    };

    #[test]
    fn test_update_condition_failure() {
        let err = SdkError::<UpdateItemError, ()>::service_error(
            UpdateItemError::ConditionalCheckFailedException(
                ConditionalCheckFailedException::builder().build(),
            ),
            (),
        );
        assert_eq!(map_update_item_error(err), StoreError::ConditionCheckFailed);
    }

    #[test]
    fn test_update_timeout_is_transport() {
        let err = SdkError::<UpdateItemError, ()>::timeout_error("operation timed out");
        assert!(matches!(
            map_update_item_error(err),
            StoreError::Transport(_)
        ));
    }

    #[test]
    fn test_put_throughput_is_throttled() {
        let err = SdkError::<PutItemError, ()>::service_error(
            PutItemError::ProvisionedThroughputExceededException(
                ProvisionedThroughputExceededException::builder().build(),
            ),
            (),
        );
        assert!(matches!(map_put_item_error(err), StoreError::Throttled(_)));
    }

    #[test]
    fn test_get_missing_table() {
        let err = SdkError::<GetItemError, ()>::service_error(
            GetItemError::ResourceNotFoundException(
                ResourceNotFoundException::builder()
                    .message("Requested resource not found")
                    .build(),
            ),
            (),
        );
        assert_eq!(
            map_get_item_error(err),
            StoreError::TableNotFound("Requested resource not found".to_string())
        );
    }

    #[test]
    fn test_query_dispatch_failure_is_transport() {
        let err = SdkError::<QueryError, ()>::timeout_error("connect timeout");
        assert!(matches!(map_query_error(err), StoreError::Transport(_)));
    }

    #[test]
    fn test_delete_condition_failure() {
        let err = SdkError::<DeleteItemError, ()>::service_error(
            DeleteItemError::ConditionalCheckFailedException(
                ConditionalCheckFailedException::builder().build(),
            ),
            (),
        );
        assert_eq!(map_delete_item_error(err), StoreError::ConditionCheckFailed);
    }
}
