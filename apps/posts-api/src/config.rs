//! Application configuration loaded from environment variables.

use std::env;

#[cfg(feature = "dynamodb")]
use posts_infra::DynamoConfig;

/// Where post records live.
#[derive(Debug, Clone)]
pub enum StoreConfig {
    /// Process-local table, lost on restart.
    Memory,
    #[cfg(feature = "dynamodb")]
    DynamoDb(DynamoConfig),
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub store: StoreConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            store: Self::parse_store(env::var("STORE_BACKEND").ok().as_deref()),
        }
    }

    /// Pick the table backend.
    /// Format: STORE_BACKEND=memory|dynamodb (default: dynamodb when compiled in)
    fn parse_store(backend: Option<&str>) -> StoreConfig {
        match backend.map(str::to_lowercase).as_deref() {
            Some("memory") => StoreConfig::Memory,
            #[cfg(feature = "dynamodb")]
            None | Some("dynamodb") => StoreConfig::DynamoDb(DynamoConfig::from_env()),
            #[cfg(not(feature = "dynamodb"))]
            None => StoreConfig::Memory,
            other => {
                tracing::warn!(
                    backend = ?other,
                    "Unsupported STORE_BACKEND, using in-memory table"
                );
                StoreConfig::Memory
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_backend() {
        assert!(matches!(
            AppConfig::parse_store(Some("MEMORY")),
            StoreConfig::Memory
        ));
    }

    #[test]
    fn test_unknown_backend_falls_back_to_memory() {
        assert!(matches!(
            AppConfig::parse_store(Some("postgres")),
            StoreConfig::Memory
        ));
    }

    #[cfg(feature = "dynamodb")]
    #[test]
    fn test_dynamodb_is_default() {
        assert!(matches!(
            AppConfig::parse_store(None),
            StoreConfig::DynamoDb(_)
        ));
    }
}
