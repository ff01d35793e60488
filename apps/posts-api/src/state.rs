//! Application state - shared across all handlers.

use std::sync::Arc;

use posts_core::ports::PostRepository;
use posts_infra::database::schema::KEY_SCHEMA;
use posts_infra::{InMemoryTable, SingleTablePostRepository};

use crate::config::StoreConfig;

#[cfg(feature = "dynamodb")]
use posts_infra::DynamoTable;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostRepository>,
}

impl AppState {
    /// Build the application state for the configured table backend.
    ///
    /// The table client is created once and reused by every request.
    pub async fn new(store: &StoreConfig) -> Self {
        let state = match store {
            StoreConfig::Memory => {
                tracing::warn!("Running with in-memory table - data is lost on restart");
                Self::in_memory()
            }
            #[cfg(feature = "dynamodb")]
            StoreConfig::DynamoDb(config) => {
                let table = Arc::new(DynamoTable::connect(config).await);
                Self {
                    posts: Arc::new(SingleTablePostRepository::new(table)),
                }
            }
        };

        tracing::info!("Application state initialized");

        state
    }

    /// State backed by a fresh in-memory table.
    pub fn in_memory() -> Self {
        let table = Arc::new(InMemoryTable::new(KEY_SCHEMA));
        Self {
            posts: Arc::new(SingleTablePostRepository::new(table)),
        }
    }
}
