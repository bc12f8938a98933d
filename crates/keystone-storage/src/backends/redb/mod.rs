//! Redb storage backend.
//!
//! This module provides a storage backend implementation using Redb,
//! a pure-Rust embedded database. Redb provides ACID transactions and
//! works on all platforms without C dependencies.
//!
//! # Layout
//!
//! A location is a directory. The engine keeps one database file,
//! [`DATABASE_FILE`], inside it and stores every key in a single table.
//!
//! # Example
//!
//! ```ignore
//! use keystone_storage::backends::RedbEngine;
//! use keystone_storage::{OpenOptions, StorageEngine};
//!
//! let engine = RedbEngine::new();
//! let session = engine.open("./data".as_ref(), &OpenOptions::default())?;
//!
//! session.put(b"user:1", b"Alice")?;
//! assert_eq!(session.get(b"user:1")?, b"Alice".to_vec());
//! ```

mod engine;
mod session;

pub use engine::{RedbEngine, DATABASE_FILE};
pub use session::RedbSession;
