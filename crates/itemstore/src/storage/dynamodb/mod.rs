//! DynamoDB storage backend implementation.
//!
//! This module provides a DynamoDB-based implementation of the `StoreClient`
//! trait using `aws-sdk-dynamodb`.

mod client;
mod conversions;
mod error;

pub use client::DynamoDbStore;
