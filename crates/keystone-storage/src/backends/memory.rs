//! In-memory storage backend.
//!
//! [`MemoryEngine`] keeps one ordered map per location. Maps outlive the
//! sessions that use them, so closing and reopening a location within the
//! same engine observes earlier writes. Nothing is persisted to disk.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use crate::engine::{BatchOp, OpenOptions, Session, StorageEngine, StorageError, StorageResult};

type Store = Arc<RwLock<BTreeMap<Vec<u8>, Vec<u8>>>>;

/// An ordered, in-process storage engine.
///
/// Cloning the engine shares its locations.
#[derive(Debug, Clone, Default)]
pub struct MemoryEngine {
    stores: Arc<Mutex<HashMap<PathBuf, Store>>>,
}

impl MemoryEngine {
    /// Create an engine with no locations.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if a store has been created at `location`.
    #[must_use]
    pub fn contains(&self, location: &Path) -> bool {
        self.stores.lock().map(|stores| stores.contains_key(location)).unwrap_or(false)
    }

    /// Remove the store at `location`, returning whether one existed.
    ///
    /// Sessions already holding the store keep their data.
    pub fn destroy(&self, location: &Path) -> bool {
        self.stores.lock().map(|mut stores| stores.remove(location).is_some()).unwrap_or(false)
    }
}

impl StorageEngine for MemoryEngine {
    fn open(&self, location: &Path, options: &OpenOptions) -> StorageResult<Arc<dyn Session>> {
        let mut stores =
            self.stores.lock().map_err(|_| StorageError::Internal("lock poisoned".into()))?;

        let store = match stores.get(location) {
            Some(_) if options.error_if_exists => {
                return Err(StorageError::Open(format!(
                    "{} exists (error_if_exists)",
                    location.display()
                )));
            }
            Some(store) => Arc::clone(store),
            None if !options.create_if_missing => {
                return Err(StorageError::Open(format!(
                    "{} does not exist (create_if_missing is false)",
                    location.display()
                )));
            }
            None => {
                let store = Store::default();
                stores.insert(location.to_path_buf(), Arc::clone(&store));
                store
            }
        };

        Ok(Arc::new(MemorySession { store, closed: AtomicBool::new(false) }))
    }
}

/// A session over one in-memory store.
#[derive(Debug)]
pub struct MemorySession {
    store: Store,
    closed: AtomicBool,
}

impl MemorySession {
    fn check_open(&self) -> StorageResult<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(StorageError::Closed);
        }
        Ok(())
    }

    fn poisoned<T>(_: T) -> StorageError {
        StorageError::Internal("lock poisoned".into())
    }
}

impl Session for MemorySession {
    fn get(&self, key: &[u8]) -> StorageResult<Vec<u8>> {
        self.check_open()?;
        let map = self.store.read().map_err(Self::poisoned)?;
        map.get(key).cloned().ok_or(StorageError::NotFound)
    }

    fn put(&self, key: &[u8], value: &[u8]) -> StorageResult<()> {
        self.check_open()?;
        let mut map = self.store.write().map_err(Self::poisoned)?;
        map.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &[u8]) -> StorageResult<()> {
        self.check_open()?;
        let mut map = self.store.write().map_err(Self::poisoned)?;
        map.remove(key);
        Ok(())
    }

    fn batch(&self, ops: &[BatchOp]) -> StorageResult<()> {
        self.check_open()?;
        // One write guard for the whole batch keeps it atomic to readers
        let mut map = self.store.write().map_err(Self::poisoned)?;
        for op in ops {
            match op {
                BatchOp::Put { key, value } => {
                    map.insert(key.clone(), value.clone());
                }
                BatchOp::Delete { key } => {
                    map.remove(key);
                }
            }
        }
        Ok(())
    }

    fn close(&self) -> StorageResult<()> {
        self.closed.store(true, Ordering::Release);
        Ok(())
    }
}
