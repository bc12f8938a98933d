//! Keystone Storage
//!
//! This crate provides the storage engine capability that a keystone
//! [`Handle`](../keystone/struct.Handle.html) drives, plus two backends.
//!
//! # Overview
//!
//! The storage layer is deliberately small: an engine opens a location and
//! hands back a [`Session`], and a session answers synchronous, byte-level
//! `get`/`put`/`delete`/`batch`/`close` calls. Encoding, lifecycle and
//! argument validation live above this layer.
//!
//! # Core Traits
//!
//! - [`StorageEngine`] - Opens a [`Session`] for a location
//! - [`Session`] - Byte-level key-value operations on one open store
//!
//! # Error Handling
//!
//! All storage operations return [`StorageResult<T>`], which is an alias for
//! `Result<T, StorageError>`. A missing key is reported as
//! [`StorageError::NotFound`], which callers are expected to treat as an
//! absent value rather than a failure.
//!
//! # Example
//!
//! ```ignore
//! use keystone_storage::{OpenOptions, StorageEngine};
//! use keystone_storage::backends::RedbEngine;
//!
//! let engine = RedbEngine::new();
//! let session = engine.open("./data".as_ref(), &OpenOptions::default())?;
//!
//! session.put(b"user:1", b"Alice")?;
//! assert_eq!(session.get(b"user:1")?, b"Alice".to_vec());
//! session.close()?;
//! ```
//!
//! # Modules
//!
//! - [`engine`] - Storage engine traits and abstractions
//! - [`backends`] - Concrete storage backend implementations

#![deny(clippy::unwrap_used)]

pub mod backends;
pub mod engine;

pub use engine::{BatchOp, OpenOptions, Session, StorageEngine, StorageError, StorageResult};
