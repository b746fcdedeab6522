// Storage error types

use thiserror::Error;

/// Result type alias for storage operations
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors surfaced by the record store adapter.
///
/// Callers treat every variant as terminal: nothing is retried at the
/// request level, the failure maps straight to a server error response.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Store unreachable or the driver rejected the operation
    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),

    /// Write rejected by the backend (dev-mode fault injection)
    #[error("write rejected: {0}")]
    WriteRejected(String),
}
