//! Keystone
//!
//! An asynchronous key-value handle over a pluggable storage engine.
//!
//! # Overview
//!
//! A [`Handle`] binds one storage location to a [`Codec`]. Callers read and
//! write [`Value`]s; the codec turns them into bytes with the configured
//! encodings (`utf8` by default, `json`, `binary`, `hex`, `base64`, ...),
//! and the engine stores the bytes.
//!
//! The handle starts opening as soon as it is constructed. Operations issued
//! before the engine is ready are queued and replayed in order once it is.
//!
//! # Example
//!
//! ```ignore
//! use keystone::{BatchEntry, EncodingSelection, Handle, Options};
//!
//! let db = Handle::new("./data", Options::default());
//!
//! db.put("name", "Alice").await?;
//! assert_eq!(db.get("name").await?, Some("Alice".into()));
//!
//! // Per-call encodings
//! let json = EncodingSelection::new().value_encoding("json");
//! db.put_with("user:1", serde_json::json!({"age": 30}), &json).await?;
//!
//! // Atomic batches
//! db.batch(vec![BatchEntry::put("a", "1"), BatchEntry::del("name")]).await?;
//!
//! db.close().await?;
//! ```
//!
//! # Modules
//!
//! - [`handle`] - The [`Handle`] and its lifecycle
//! - [`config`] - [`Options`]
//! - [`status`] - Lifecycle states
//! - [`batch`] - [`ChainedBatch`]
//! - [`error`] - Error types

#![deny(clippy::unwrap_used)]

pub mod batch;
pub mod config;
mod deferred;
pub mod error;
pub mod handle;
pub mod status;

pub use batch::ChainedBatch;
pub use config::Options;
pub use error::{Error, Result};
pub use handle::Handle;
pub use status::Status;

pub use keystone_core::{
    BatchEntry, BatchKind, Codec, Encoded, Encoding, EncodingRegistry, EncodingSelection,
    EncodingSpec, Value,
};
pub use keystone_storage::backends::{MemoryEngine, RedbEngine};
pub use keystone_storage::{OpenOptions, Session, StorageEngine, StorageError};
