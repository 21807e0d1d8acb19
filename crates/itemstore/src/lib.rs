//! Generic data-access layer over a DynamoDB table.
//!
//! The store-agnostic pieces live in `itemstore_core`; this crate adds the
//! repository, the store clients, logging and the CLI.

pub mod cli;
pub mod config;
pub mod logs;
pub mod metadata;
pub mod repository;
pub mod storage;

pub use config::Config;
pub use repository::TableRepository;
