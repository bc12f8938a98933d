//! Redb session implementation.
//!
//! Each operation runs in its own Redb transaction. Reads use a read
//! transaction; `put`, `delete` and `batch` each commit one write
//! transaction, which makes a batch atomic.

use std::sync::RwLock;

use redb::{Database, ReadableTable, TableDefinition, TableError};

use crate::engine::{BatchOp, Session, StorageError, StorageResult};

/// The single table holding every key of a location.
const DATA_TABLE: TableDefinition<&[u8], &[u8]> = TableDefinition::new("data");

/// An open Redb database.
///
/// The database is dropped on [`close`](Session::close), which releases the
/// file lock. Operations after close fail with [`StorageError::Closed`].
pub struct RedbSession {
    db: RwLock<Option<Database>>,
}

impl RedbSession {
    pub(crate) fn new(db: Database) -> Self {
        Self { db: RwLock::new(Some(db)) }
    }

    /// Run `f` against the open database.
    fn with_db<T>(&self, f: impl FnOnce(&Database) -> StorageResult<T>) -> StorageResult<T> {
        let guard = self.db.read().map_err(|_| StorageError::Internal("lock poisoned".into()))?;
        match guard.as_ref() {
            Some(db) => f(db),
            None => Err(StorageError::Closed),
        }
    }

    /// Run `f` inside one write transaction and commit it.
    fn write(
        &self,
        f: impl FnOnce(&mut redb::Table<'_, &'static [u8], &'static [u8]>) -> StorageResult<()>,
    ) -> StorageResult<()> {
        self.with_db(|db| {
            let tx = db.begin_write().map_err(|e| StorageError::Transaction(e.to_string()))?;
            {
                let mut table =
                    tx.open_table(DATA_TABLE).map_err(|e| StorageError::Internal(e.to_string()))?;
                f(&mut table)?;
            }
            tx.commit().map_err(|e| StorageError::Transaction(e.to_string()))
        })
    }
}

impl Session for RedbSession {
    fn get(&self, key: &[u8]) -> StorageResult<Vec<u8>> {
        self.with_db(|db| {
            let tx = db.begin_read().map_err(|e| StorageError::Transaction(e.to_string()))?;
            match tx.open_table(DATA_TABLE) {
                Ok(table) => match table.get(key) {
                    Ok(Some(value)) => Ok(value.value().to_vec()),
                    Ok(None) => Err(StorageError::NotFound),
                    Err(e) => Err(StorageError::Internal(e.to_string())),
                },
                // Nothing has been written yet
                Err(TableError::TableDoesNotExist(_)) => Err(StorageError::NotFound),
                Err(e) => Err(StorageError::Internal(e.to_string())),
            }
        })
    }

    fn put(&self, key: &[u8], value: &[u8]) -> StorageResult<()> {
        self.write(|table| {
            table.insert(key, value).map_err(|e| StorageError::Internal(e.to_string()))?;
            Ok(())
        })
    }

    fn delete(&self, key: &[u8]) -> StorageResult<()> {
        self.write(|table| {
            table.remove(key).map_err(|e| StorageError::Internal(e.to_string()))?;
            Ok(())
        })
    }

    fn batch(&self, ops: &[BatchOp]) -> StorageResult<()> {
        self.write(|table| {
            for op in ops {
                match op {
                    BatchOp::Put { key, value } => {
                        table
                            .insert(key.as_slice(), value.as_slice())
                            .map_err(|e| StorageError::Internal(e.to_string()))?;
                    }
                    BatchOp::Delete { key } => {
                        table
                            .remove(key.as_slice())
                            .map_err(|e| StorageError::Internal(e.to_string()))?;
                    }
                }
            }
            Ok(())
        })
    }

    fn close(&self) -> StorageResult<()> {
        let mut guard =
            self.db.write().map_err(|_| StorageError::Internal("lock poisoned".into()))?;
        // Dropping the database flushes and releases the file lock
        drop(guard.take());
        Ok(())
    }
}
