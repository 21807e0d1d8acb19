//! In-memory storage backend for testing.
//!
//! This module provides an in-memory implementation of the `StoreClient` trait
//! that stores all data in maps wrapped in `Arc<RwLock<_>>`. It honors the
//! conditional update semantics of the real store, so repository behavior can
//! be exercised without network access.
//!
//! # Example
//!
//! ```rust,ignore
//! use itemstore::storage::inmemory::InMemoryStore;
//!
//! let store = InMemoryStore::new().with_table("payments", &["id"]);
//! // Use store for testing...
//! ```

mod store;

pub use store::{InMemoryStore, StoreOperation};
