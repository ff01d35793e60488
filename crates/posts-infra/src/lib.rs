//! # Posts Infrastructure
//!
//! Concrete implementations of the ports defined in `posts-core`.
//! This crate maps posts onto a single key-value table and provides the
//! table backends.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory table only
//! - `dynamodb` - DynamoDB table via the AWS SDK

pub mod database;

// Re-exports - In-Memory
pub use database::{InMemoryTable, SingleTablePostRepository};

// Re-exports - DynamoDB
#[cfg(feature = "dynamodb")]
pub use database::{DynamoConfig, DynamoTable};
