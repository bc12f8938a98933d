//! Error types for the handle crate.

use std::sync::Arc;

use keystone_core::CoreError;
use keystone_storage::StorageError;
use thiserror::Error;

/// Result type for handle operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when using a [`Handle`](crate::Handle).
///
/// Every error is returned to the caller of the operation that hit it.
/// Nothing is retried. A missing key on read is not an error: `get`
/// returns `Ok(None)`.
#[derive(Debug, Error)]
pub enum Error {
    /// An encoding name is not registered.
    #[error("unknown encoding: {0}")]
    Configuration(String),

    /// A required argument was missing, or a batch entry was under-specified.
    #[error("validation error: {0}")]
    Validation(String),

    /// The requested lifecycle transition is not allowed.
    #[error("invalid state: {0}")]
    State(String),

    /// A read failed, or an operation was issued while the handle was not ready.
    #[error("read error: {message}")]
    Read {
        /// What failed.
        message: String,
        /// The engine error, if the engine was reached.
        #[source]
        source: Option<StorageError>,
    },

    /// A put, delete or batch failed in the engine.
    #[error("write error: {message}")]
    Write {
        /// What failed.
        message: String,
        /// The engine error.
        #[source]
        source: Option<StorageError>,
    },

    /// The storage engine failed to open.
    ///
    /// Shared because one failed open is reported to every waiter.
    #[error("storage open error: {0}")]
    StorageOpen(#[source] Arc<StorageError>),

    /// A key or value could not be encoded or decoded.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// The storage engine failed to close.
    #[error("close error: {0}")]
    Close(#[source] StorageError),
}

impl Error {
    /// The error returned for operations issued while the handle is not ready.
    #[must_use]
    pub fn not_ready() -> Self {
        Self::Read { message: "awaiting database".into(), source: None }
    }

    /// A read error wrapping an engine error.
    #[must_use]
    pub fn read(message: impl Into<String>, source: StorageError) -> Self {
        Self::Read { message: message.into(), source: Some(source) }
    }

    /// A write error wrapping an engine error.
    #[must_use]
    pub fn write(message: impl Into<String>, source: StorageError) -> Self {
        Self::Write { message: message.into(), source: Some(source) }
    }

    /// Returns `true` if this is the not-ready rejection.
    #[must_use]
    pub fn is_not_ready(&self) -> bool {
        matches!(self, Self::Read { source: None, .. })
    }
}

impl From<CoreError> for Error {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Configuration(name) => Self::Configuration(name),
            CoreError::Encoding(msg) => Self::Encoding(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn test_not_ready() {
        let err = Error::not_ready();
        assert!(err.is_not_ready());
        assert_eq!(err.to_string(), "read error: awaiting database");
        assert!(err.source().is_none());
    }

    #[test]
    fn test_wrapped_cause_is_source() {
        let err = Error::write("put failed", StorageError::Closed);
        assert!(!err.is_not_ready());
        assert_eq!(err.source().map(ToString::to_string), Some("session is closed".into()));
    }

    #[test]
    fn test_from_core_error() {
        assert!(matches!(Error::from(CoreError::Configuration("x".into())), Error::Configuration(_)));
        assert!(matches!(Error::from(CoreError::Encoding("x".into())), Error::Encoding(_)));
    }
}
