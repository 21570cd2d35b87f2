//! Error types for relmon-state

use thiserror::Error;

/// Errors that can occur in the correlation cache layer
#[derive(Error, Debug)]
pub enum StorageError {
    /// Database connection error
    #[error("Database connection failed: {0}")]
    Connection(String),

    /// Query or write against the backend failed
    #[error("Storage backend error: {0}")]
    Backend(String),

    /// Schema setup error
    #[error("Schema setup failed: {0}")]
    SchemaSetup(String),

    /// Serialization error
    #[error("Serialization failed: {0}")]
    Serialization(String),
}

impl From<surrealdb::Error> for StorageError {
    fn from(err: surrealdb::Error) -> Self {
        StorageError::Backend(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_display() {
        let err = StorageError::Backend("write rejected".to_string());
        assert!(err.to_string().contains("Storage backend error"));
        assert!(err.to_string().contains("write rejected"));

        let err = StorageError::Connection("refused".to_string());
        assert!(err.to_string().contains("connection failed"));
    }
}
