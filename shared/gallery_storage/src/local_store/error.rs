//! Error types for local storage operations

use thiserror::Error;

/// Result type for local storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur while reading or writing persisted records
#[derive(Error, Debug)]
pub enum StorageError {
    /// Namespace contains characters that cannot be used as a record name
    #[error("Invalid namespace: {0}")]
    InvalidNamespace(String),

    /// Filesystem error
    #[error("I/O error on {namespace}: {source}")]
    Io {
        /// Namespace of the record being accessed
        namespace: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Serialization error for persisted records
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}
