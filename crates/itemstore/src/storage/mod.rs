//! Store client implementations.
//!
//! This module provides concrete implementations of the `StoreClient` trait
//! defined in `itemstore_core::storage`, selected via feature flags.
//!
//! # Feature Flags
//!
//! - `dynamodb` (default): AWS DynamoDB store client using `aws-sdk-dynamodb`
//! - `inmemory` (default): in-memory store client for tests and local runs

#[cfg(feature = "dynamodb")]
pub mod dynamodb;

#[cfg(feature = "inmemory")]
pub mod inmemory;

#[cfg(feature = "dynamodb")]
pub use dynamodb::DynamoDbStore;

#[cfg(feature = "inmemory")]
pub use inmemory::InMemoryStore;
