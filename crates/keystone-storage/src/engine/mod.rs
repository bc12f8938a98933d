//! Storage engine traits and abstractions.
//!
//! This module defines what a backend must provide:
//!
//! - [`StorageEngine`] - Opens a location and returns a [`Session`]
//! - [`Session`] - get/put/delete/batch/close against one open store
//! - [`OpenOptions`] - Creation flags passed to [`StorageEngine::open`]
//!
//! # Error Handling
//!
//! All operations return [`StorageResult<T>`] which is an alias for
//! `Result<T, StorageError>`. See [`StorageError`] for the possible error variants.

mod error;
mod options;
mod traits;

pub use error::{StorageError, StorageResult};
pub use options::OpenOptions;
pub use traits::{BatchOp, Session, StorageEngine};
