//! Error types for repository callers and table backends.

use thiserror::Error;

/// Repository errors - the outcomes reported to the request router.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: &'static str, id: String },

    #[error("Store write failed: {0}")]
    StoreWrite(String),

    #[error("Store read failed: {0}")]
    StoreRead(String),
}

impl RepoError {
    pub fn post_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "post",
            id: id.into(),
        }
    }
}

/// Table-level errors raised by a [`TableStore`](crate::ports::TableStore).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store connection failed: {0}")]
    Connection(String),

    #[error("Read failed: {0}")]
    Read(String),

    #[error("Write failed: {0}")]
    Write(String),

    #[error("Condition check failed")]
    ConditionFailed,

    #[error("Malformed record: {0}")]
    Malformed(String),
}

impl StoreError {
    /// Map a failed read to the repository taxonomy.
    pub fn into_read(self) -> RepoError {
        RepoError::StoreRead(self.to_string())
    }

    /// Map a failed write to the repository taxonomy.
    pub fn into_write(self) -> RepoError {
        RepoError::StoreWrite(self.to_string())
    }
}
