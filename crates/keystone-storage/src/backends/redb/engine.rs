//! Redb storage engine implementation.
//!
//! This module provides the `RedbEngine` type which implements the
//! `StorageEngine` trait using the Redb embedded database.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use redb::Database;
use tracing::debug;

use crate::engine::{OpenOptions, Session, StorageEngine, StorageError, StorageResult};

use super::session::RedbSession;

/// Name of the database file created inside each location directory.
pub const DATABASE_FILE: &str = "data.redb";

/// A storage engine backed by Redb.
///
/// The engine itself is stateless; every [`open`](StorageEngine::open) builds
/// a fresh [`redb::Database`]. Redb takes an exclusive file lock, so a
/// location can only be held by one session at a time.
#[derive(Debug, Clone, Copy, Default)]
pub struct RedbEngine;

impl RedbEngine {
    /// Create a new Redb engine.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl StorageEngine for RedbEngine {
    fn open(&self, location: &Path, options: &OpenOptions) -> StorageResult<Arc<dyn Session>> {
        let file = location.join(DATABASE_FILE);
        let exists = file.exists();

        if exists && options.error_if_exists {
            return Err(StorageError::Open(format!("{} exists (error_if_exists)", location.display())));
        }
        if !exists && !options.create_if_missing {
            return Err(StorageError::Open(format!(
                "{} does not exist (create_if_missing is false)",
                location.display()
            )));
        }

        fs::create_dir_all(location)?;

        let mut builder = Database::builder();
        builder.set_cache_size(options.cache_size);

        // Redb has no block compression; the flag is accepted so the same
        // options work across backends.
        debug!(location = %location.display(), compression = options.compression, "opening redb store");

        let db = builder.create(&file).map_err(|e| StorageError::Open(e.to_string()))?;

        Ok(Arc::new(RedbSession::new(db)))
    }
}
