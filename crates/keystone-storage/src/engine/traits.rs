//! Core storage engine traits.
//!
//! This module defines the two traits a backend implements:
//!
//! - [`StorageEngine`] - Opens a location and returns a session
//! - [`Session`] - Byte-level key-value operations on an open store
//!
//! Both traits are object-safe so a handle can hold `Arc<dyn StorageEngine>`
//! chosen at runtime.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use super::{OpenOptions, StorageResult};

/// A single write inside a [`Session::batch`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOp {
    /// Insert or replace `key` with `value`.
    Put {
        /// The encoded key.
        key: Vec<u8>,
        /// The encoded value.
        value: Vec<u8>,
    },
    /// Remove `key` if present.
    Delete {
        /// The encoded key.
        key: Vec<u8>,
    },
}

impl BatchOp {
    /// Returns the key this operation targets.
    #[must_use]
    pub fn key(&self) -> &[u8] {
        match self {
            Self::Put { key, .. } | Self::Delete { key } => key,
        }
    }
}

/// A storage engine that can open sessions against locations.
///
/// Opening may be slow (file locks, recovery), so callers typically run
/// [`open`](Self::open) off their async executor.
///
/// # Example
///
/// ```ignore
/// use keystone_storage::{OpenOptions, StorageEngine};
///
/// fn example(engine: &dyn StorageEngine) -> StorageResult<()> {
///     let session = engine.open("./data".as_ref(), &OpenOptions::default())?;
///     session.put(b"key", b"value")?;
///     session.close()
/// }
/// ```
pub trait StorageEngine: Send + Sync + fmt::Debug {
    /// Open the store at `location`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Open`](super::StorageError::Open) if the store
    /// is missing and `create_if_missing` is false, exists and
    /// `error_if_exists` is true, or cannot be opened for any other reason.
    fn open(&self, location: &Path, options: &OpenOptions) -> StorageResult<Arc<dyn Session>>;
}

/// An open store.
///
/// Every method is synchronous and completes exactly once. Sessions must be
/// thread-safe because a handle may issue calls from any runtime thread.
pub trait Session: Send + Sync {
    /// Get the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`](super::StorageError::NotFound) if the
    /// key does not exist, or another error if the read fails.
    fn get(&self, key: &[u8]) -> StorageResult<Vec<u8>>;

    /// Store `value` under `key`, replacing any existing value.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails or the session is closed.
    fn put(&self, key: &[u8], value: &[u8]) -> StorageResult<()>;

    /// Remove `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails or the session is closed.
    fn delete(&self, key: &[u8]) -> StorageResult<()>;

    /// Apply `ops` as a single engine call.
    ///
    /// Whether the batch is atomic is a property of the backend; both bundled
    /// backends apply it all-or-nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails or the session is closed.
    fn batch(&self, ops: &[BatchOp]) -> StorageResult<()>;

    /// Close the session and release the store.
    ///
    /// Closing an already-closed session succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails to release its resources.
    fn close(&self) -> StorageResult<()>;
}

// ============================================================================
// Blanket Implementations
// ============================================================================

/// Implement `StorageEngine` for `Arc<E>` so one engine can back many handles.
impl<E: StorageEngine + ?Sized> StorageEngine for Arc<E> {
    fn open(&self, location: &Path, options: &OpenOptions) -> StorageResult<Arc<dyn Session>> {
        (**self).open(location, options)
    }
}
