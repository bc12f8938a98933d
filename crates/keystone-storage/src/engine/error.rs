//! Storage error types.

use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur in storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The store could not be opened.
    #[error("failed to open database: {0}")]
    Open(String),

    /// The requested key does not exist.
    ///
    /// This is the only variant callers should treat as "absent" rather
    /// than as a failure.
    #[error("key not found")]
    NotFound,

    /// The session has already been closed.
    #[error("session is closed")]
    Closed,

    /// A transaction could not be started or committed.
    #[error("transaction error: {0}")]
    Transaction(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An internal backend error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl StorageError {
    /// Returns `true` if this error reports a missing key.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}
