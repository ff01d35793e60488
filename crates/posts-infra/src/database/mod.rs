//! Single-table storage: schema, record codec, repository and table backends.

pub mod entity;
mod memory;
mod post_repo;
pub mod schema;

#[cfg(feature = "dynamodb")]
mod dynamodb;

pub use memory::InMemoryTable;
pub use post_repo::SingleTablePostRepository;

#[cfg(feature = "dynamodb")]
pub use dynamodb::{DynamoConfig, DynamoTable};
