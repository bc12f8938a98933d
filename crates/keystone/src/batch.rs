//! Chained batches.

use keystone_core::{BatchEntry, EncodingSelection, Value};

use crate::error::Result;
use crate::handle::Handle;

/// A batch built up one operation at a time and written with
/// [`write`](Self::write).
///
/// Entries go through the same validation and encoding as
/// [`Handle::batch`].
///
/// # Examples
///
/// ```ignore
/// db.chained_batch()
///     .put("a", "1")
///     .put("b", "2")
///     .del("c")
///     .write()
///     .await?;
/// ```
#[derive(Debug)]
#[must_use = "a chained batch does nothing until written"]
pub struct ChainedBatch {
    handle: Handle,
    entries: Vec<BatchEntry>,
    options: EncodingSelection,
}

impl ChainedBatch {
    pub(crate) fn new(handle: Handle) -> Self {
        Self { handle, entries: Vec::new(), options: EncodingSelection::default() }
    }

    /// Queue a put.
    pub fn put(mut self, key: impl Into<Value>, value: impl Into<Value>) -> Self {
        self.entries.push(BatchEntry::put(key, value));
        self
    }

    /// Queue a delete.
    pub fn del(mut self, key: impl Into<Value>) -> Self {
        self.entries.push(BatchEntry::del(key));
        self
    }

    /// Queue a prepared entry, e.g. one with its own encodings.
    pub fn push(mut self, entry: BatchEntry) -> Self {
        self.entries.push(entry);
        self
    }

    /// Encodings applied to entries that don't choose their own.
    pub fn with_options(mut self, options: EncodingSelection) -> Self {
        self.options = options;
        self
    }

    /// Drop every queued entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of queued entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The queued entries, in order.
    #[must_use]
    pub fn entries(&self) -> &[BatchEntry] {
        &self.entries
    }

    /// Submit the queued entries as one atomic batch.
    ///
    /// # Errors
    ///
    /// See [`Handle::batch`].
    pub async fn write(self) -> Result<()> {
        self.handle.batch_with(self.entries, &self.options).await
    }
}
