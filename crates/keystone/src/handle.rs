//! The caller-facing database handle.
//!
//! A [`Handle`] owns the lifecycle of one storage engine session and applies
//! encodings to every key and value that crosses it.
//!
//! # Examples
//!
//! ```ignore
//! use keystone::{Handle, Options};
//!
//! let db = Handle::new("./data", Options::default().value_encoding("json"));
//!
//! // Operations issued before the engine is open are queued, not rejected
//! db.put("user:1", serde_json::json!({"name": "Alice"})).await?;
//! db.ready().await?;
//!
//! let user = db.get("user:1").await?;
//! db.close().await?;
//! ```

use std::fmt;
use std::mem;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;

use keystone_core::{
    BatchEntry, BatchKind, Codec, Encoded, EncodedEntry, EncodingSelection, Value,
};
use keystone_storage::backends::RedbEngine;
use keystone_storage::{BatchOp, Session, StorageEngine, StorageError, StorageResult};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::batch::ChainedBatch;
use crate::config::Options;
use crate::deferred::{DeferredError, DeferredResult, DeferredSession};
use crate::error::{Error, Result};
use crate::status::Status;

/// Where data operations are routed.
enum SessionRef {
    /// No session: never opened, closed, or the last open failed.
    Detached,
    /// Open in progress; operations are queued.
    Deferred(DeferredSession),
    /// The engine session.
    Live(Arc<dyn Session>),
}

/// The outcome of an open attempt, as seen by waiters.
#[derive(Debug, Clone)]
enum OpenSignal {
    Pending,
    Opened,
    Failed(Arc<StorageError>),
}

struct State {
    status: Status,
    session: SessionRef,
    /// Set by `close` while opening; honored once the open completes.
    pending_close: bool,
    /// Outcome of the most recent open attempt.
    open_signal: watch::Receiver<OpenSignal>,
    /// Engine error from a close requested while opening, until reported.
    close_error: Option<StorageError>,
}

struct Shared {
    location: PathBuf,
    options: Options,
    codec: Codec,
    engine: Arc<dyn StorageEngine>,
    state: Mutex<State>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs on the blocking pool: open the engine and settle the queue.
    fn complete_open(&self, prior: Status, signal: &watch::Sender<OpenSignal>) {
        let opened = self.engine.open(&self.location, &self.options.open_options());
        let mut state = self.lock();

        match opened {
            Ok(session) => {
                let placeholder =
                    mem::replace(&mut state.session, SessionRef::Live(Arc::clone(&session)));
                state.status = Status::Open;
                if let SessionRef::Deferred(queue) = placeholder {
                    let replayed = queue.replay(session.as_ref());
                    if replayed > 0 {
                        debug!(location = %self.location.display(), replayed, "replayed deferred operations");
                    }
                }
                info!(location = %self.location.display(), "database open");

                if mem::take(&mut state.pending_close) {
                    state.status = Status::Closing;
                    state.session = SessionRef::Detached;
                    drop(state);

                    debug!(location = %self.location.display(), "closing as requested while opening");
                    let closed = session.close();
                    if let Err(e) = &closed {
                        warn!(location = %self.location.display(), error = %e, "close after open failed");
                    }
                    let mut state = self.lock();
                    state.status = Status::Closed;
                    state.close_error = closed.err();
                    drop(state);
                    info!(location = %self.location.display(), "database closed");
                } else {
                    drop(state);
                }
                signal.send_replace(OpenSignal::Opened);
            }
            Err(e) => {
                let error = Arc::new(e);
                self.settle_failed(&mut state, prior, &error);
                drop(state);
                signal.send_replace(OpenSignal::Failed(error));
            }
        }
    }

    /// Restore `prior` after a failed open and fail everything queued.
    fn settle_failed(&self, state: &mut State, prior: Status, error: &Arc<StorageError>) {
        warn!(location = %self.location.display(), error = %error, "failed to open database");

        state.status = prior;
        state.pending_close = false;
        if let SessionRef::Deferred(queue) = mem::replace(&mut state.session, SessionRef::Detached)
        {
            let aborted = queue.abort(error);
            if aborted > 0 {
                debug!(location = %self.location.display(), aborted, "failed deferred operations");
            }
        }
    }
}

/// A handle to a key-value store.
///
/// `Handle` is cheap to clone; clones share the same session and lifecycle.
/// It is `Send + Sync` and can be used from many tasks at once.
///
/// # Lifecycle
///
/// Construction starts opening the store immediately. While it is opening,
/// data operations are queued and run, in order, once the engine is open.
/// After [`close`](Self::close) they are rejected with a read error until
/// the handle is reopened with [`open`](Self::open).
///
/// # Runtime
///
/// Engine calls are blocking, so they run on Tokio's blocking pool when a
/// runtime is available. A handle constructed outside a runtime opens on a
/// dedicated thread instead.
#[derive(Clone)]
pub struct Handle {
    shared: Arc<Shared>,
}

impl Handle {
    /// Create a handle backed by the default redb engine and start opening it.
    #[must_use]
    pub fn new(location: impl Into<PathBuf>, options: Options) -> Self {
        Self::with_engine(location, options, Arc::new(RedbEngine::new()))
    }

    /// Create a handle backed by `engine` and start opening it.
    ///
    /// Never fails: open errors are reported by [`ready`](Self::ready) and
    /// by operations queued while opening.
    #[must_use]
    pub fn with_engine(
        location: impl Into<PathBuf>,
        options: Options,
        engine: Arc<dyn StorageEngine>,
    ) -> Self {
        let codec = Codec::new(options.key_encoding.clone(), options.value_encoding.clone());
        let (_, idle) = watch::channel(OpenSignal::Pending);
        let handle = Self {
            shared: Arc::new(Shared {
                location: location.into(),
                options,
                codec,
                engine,
                state: Mutex::new(State {
                    status: Status::New,
                    session: SessionRef::Detached,
                    pending_close: false,
                    open_signal: idle,
                    close_error: None,
                }),
            }),
        };

        {
            let mut state = handle.shared.lock();
            handle.start_open(&mut state);
        }
        handle
    }

    /// Move to `Opening` and hand the engine open to another thread.
    fn start_open(&self, state: &mut State) -> watch::Receiver<OpenSignal> {
        let prior = state.status;
        state.status = Status::Opening;
        state.session = SessionRef::Deferred(DeferredSession::new());
        state.pending_close = false;

        let (signal_tx, signal_rx) = watch::channel(OpenSignal::Pending);
        state.open_signal = signal_rx.clone();

        debug!(location = %self.shared.location.display(), engine = ?self.shared.engine, "opening database");
        let shared = Arc::clone(&self.shared);
        let signal_tx = Arc::new(signal_tx);
        let task_signal = Arc::clone(&signal_tx);
        let task = move || shared.complete_open(prior, &task_signal);

        let spawned = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                runtime.spawn_blocking(task);
                Ok(())
            }
            Err(_) => thread::Builder::new().name("keystone-open".into()).spawn(task).map(drop),
        };
        if let Err(e) = spawned {
            let error = Arc::new(StorageError::Io(e));
            self.shared.settle_failed(state, prior, &error);
            signal_tx.send_replace(OpenSignal::Failed(error));
        }
        signal_rx
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Open the handle again after it was closed, or retry a failed open.
    ///
    /// Resolves once the engine is open.
    ///
    /// # Errors
    ///
    /// - [`Error::State`] if the handle is already open, opening or closing
    /// - [`Error::StorageOpen`] if the engine fails to open
    pub async fn open(&self) -> Result<()> {
        let signal = {
            let mut state = self.shared.lock();
            let status = state.status;
            match status {
                Status::Opening | Status::Open | Status::Closing => {
                    return Err(Error::State(format!("database is {status}")));
                }
                Status::New | Status::Closed => self.start_open(&mut state),
            }
        };
        wait_for_open(signal).await
    }

    /// Wait for the most recent open attempt to finish.
    ///
    /// # Errors
    ///
    /// - [`Error::StorageOpen`] if that attempt failed
    /// - [`Error::Close`] if a close requested while opening failed and has
    ///   not been reported yet
    pub async fn ready(&self) -> Result<()> {
        let signal = self.shared.lock().open_signal.clone();
        wait_for_open(signal).await?;
        self.take_close_error()
    }

    /// Close the handle.
    ///
    /// Closing an unopened or already closed handle does nothing. Closing
    /// while opening resolves immediately; the close runs once the open
    /// completes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Close`] if the engine fails to close, including a
    /// close requested while opening that has not been reported yet. The
    /// handle is `Closed` either way.
    pub async fn close(&self) -> Result<()> {
        let session = {
            let mut state = self.shared.lock();
            let status = state.status;
            match status {
                Status::Opening => {
                    debug!(location = %self.shared.location.display(), "close requested while opening");
                    state.pending_close = true;
                    return Ok(());
                }
                Status::New | Status::Closing | Status::Closed => {
                    return state.close_error.take().map_or(Ok(()), |e| Err(Error::Close(e)));
                }
                Status::Open => {
                    state.status = Status::Closing;
                    match mem::replace(&mut state.session, SessionRef::Detached) {
                        SessionRef::Live(session) => session,
                        SessionRef::Deferred(_) | SessionRef::Detached => {
                            state.status = Status::Closed;
                            return Ok(());
                        }
                    }
                }
            }
        };

        let shared = Arc::clone(&self.shared);
        let closed = run_blocking(move || {
            let result = session.close();
            shared.lock().status = Status::Closed;
            result
        })
        .await;
        info!(location = %self.shared.location.display(), "database closed");

        match closed {
            Ok(result) => result.map_err(Error::Close),
            Err(e) => {
                self.shared.lock().status = Status::Closed;
                Err(Error::Close(StorageError::Internal(e)))
            }
        }
    }

    // ========================================================================
    // Status
    // ========================================================================

    /// The current lifecycle state.
    #[must_use]
    pub fn status(&self) -> Status {
        self.shared.lock().status
    }

    /// Returns `true` if the engine session is installed.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.status() == Status::Open
    }

    /// Returns `true` while the engine is opening.
    #[must_use]
    pub fn is_opening(&self) -> bool {
        self.status() == Status::Opening
    }

    /// Returns `true` while closing or once closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        matches!(self.status(), Status::Closing | Status::Closed)
    }

    /// The location the engine was opened at.
    #[must_use]
    pub fn location(&self) -> &Path {
        &self.shared.location
    }

    /// The options this handle was created with.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.shared.options
    }

    /// The codec applying this handle's default encodings.
    #[must_use]
    pub fn codec(&self) -> &Codec {
        &self.shared.codec
    }

    // ========================================================================
    // Data operations
    // ========================================================================

    /// Read the value stored under `key`.
    ///
    /// Returns `Ok(None)` if the key does not exist.
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`] if the key is missing or empty
    /// - [`Error::Read`] if the handle is not ready or the engine read fails
    /// - [`Error::Configuration`] or [`Error::Encoding`] from the codec
    pub async fn get(&self, key: impl Into<Value>) -> Result<Option<Value>> {
        self.get_with(key, &EncodingSelection::default()).await
    }

    /// Read with per-call encodings.
    ///
    /// # Errors
    ///
    /// See [`get`](Self::get).
    pub async fn get_with(
        &self,
        key: impl Into<Value>,
        options: &EncodingSelection,
    ) -> Result<Option<Value>> {
        let key = require_key(key.into(), "get")?;
        self.check_ready()?;

        let call = Some(options);
        let codec = &self.shared.codec;
        let key = codec.encode_key(key, call, None)?.into_bytes();
        let as_bytes = codec.value_as_bytes(call)?;

        let stored = match self.dispatch("get", move |s| s.get(&key)).await? {
            Ok(bytes) => bytes,
            Err(StorageError::NotFound) => return Ok(None),
            Err(e) => return Err(Error::read("get failed", e)),
        };

        let encoded = Encoded::from_stored(stored, as_bytes)?;
        Ok(Some(codec.decode_value(encoded, call)?))
    }

    /// Returns `true` if a value is stored under `key`.
    ///
    /// # Errors
    ///
    /// See [`get`](Self::get).
    pub async fn exists(&self, key: impl Into<Value>) -> Result<bool> {
        Ok(self.get(key).await?.is_some())
    }

    /// Store `value` under `key`.
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`] if the key or value is missing
    /// - [`Error::Read`] if the handle is not ready
    /// - [`Error::Write`] if the engine write fails
    /// - [`Error::Configuration`] or [`Error::Encoding`] from the codec
    pub async fn put(&self, key: impl Into<Value>, value: impl Into<Value>) -> Result<()> {
        self.put_with(key, value, &EncodingSelection::default()).await
    }

    /// Store with per-call encodings.
    ///
    /// # Errors
    ///
    /// See [`put`](Self::put).
    pub async fn put_with(
        &self,
        key: impl Into<Value>,
        value: impl Into<Value>,
        options: &EncodingSelection,
    ) -> Result<()> {
        let key = require_key(key.into(), "put")?;
        let value = value.into();
        if value.is_null() {
            return Err(Error::Validation("put: value is required".into()));
        }
        self.check_ready()?;

        let call = Some(options);
        let key = self.shared.codec.encode_key(key, call, None)?.into_bytes();
        let value = self.shared.codec.encode_value(value, call, None)?.into_bytes();

        self.dispatch("put", move |s| s.put(&key, &value))
            .await?
            .map_err(|e| Error::write("put failed", e))
    }

    /// Remove `key`. Removing a missing key succeeds.
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`] if the key is missing or empty
    /// - [`Error::Read`] if the handle is not ready
    /// - [`Error::Write`] if the engine delete fails
    pub async fn del(&self, key: impl Into<Value>) -> Result<()> {
        self.del_with(key, &EncodingSelection::default()).await
    }

    /// Remove with per-call encodings.
    ///
    /// # Errors
    ///
    /// See [`del`](Self::del).
    pub async fn del_with(&self, key: impl Into<Value>, options: &EncodingSelection) -> Result<()> {
        let key = require_key(key.into(), "del")?;
        self.check_ready()?;

        let key = self.shared.codec.encode_key(key, Some(options), None)?.into_bytes();

        self.dispatch("del", move |s| s.delete(&key))
            .await?
            .map_err(|e| Error::write("del failed", e))
    }

    /// Apply `entries` atomically.
    ///
    /// Untyped entries with both key and value become puts. Each entry's own
    /// encodings take precedence over the handle defaults. An empty batch
    /// succeeds without reaching the engine.
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`] if an entry has no key, no inferable type, or
    ///   is a put without a value
    /// - [`Error::Read`] if the handle is not ready
    /// - [`Error::Write`] if the engine batch fails
    pub async fn batch(&self, entries: Vec<BatchEntry>) -> Result<()> {
        self.batch_with(entries, &EncodingSelection::default()).await
    }

    /// Apply a batch with per-call encodings.
    ///
    /// # Errors
    ///
    /// See [`batch`](Self::batch).
    pub async fn batch_with(
        &self,
        entries: Vec<BatchEntry>,
        options: &EncodingSelection,
    ) -> Result<()> {
        for (index, entry) in entries.iter().enumerate() {
            validate_batch_entry(index, entry)?;
        }
        self.check_ready()?;

        let ops = self
            .shared
            .codec
            .encode_batch(entries, Some(options))?
            .into_iter()
            .enumerate()
            .map(|(index, entry)| to_batch_op(index, entry))
            .collect::<Result<Vec<_>>>()?;

        if ops.is_empty() {
            return Ok(());
        }

        self.dispatch("batch", move |s| s.batch(&ops))
            .await?
            .map_err(|e| Error::write("batch failed", e))
    }

    /// Start a chained batch bound to this handle.
    #[must_use]
    pub fn chained_batch(&self) -> ChainedBatch {
        ChainedBatch::new(self.clone())
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn take_close_error(&self) -> Result<()> {
        self.shared.lock().close_error.take().map_or(Ok(()), |e| Err(Error::Close(e)))
    }

    fn check_ready(&self) -> Result<()> {
        if self.shared.lock().status.is_ready() {
            Ok(())
        } else {
            Err(Error::not_ready())
        }
    }

    /// Run `op` against the live session, or queue it while opening.
    ///
    /// The outer result carries lifecycle failures; the inner one is the
    /// engine's own answer.
    async fn dispatch<T, F>(&self, name: &'static str, op: F) -> Result<StorageResult<T>>
    where
        T: Send + 'static,
        F: FnOnce(&dyn Session) -> StorageResult<T> + Send + 'static,
    {
        enum Route<T, F> {
            Now(Arc<dyn Session>, F),
            Queued(DeferredResult<T>),
        }

        let route = {
            let mut state = self.shared.lock();
            if !state.status.is_ready() {
                return Err(Error::not_ready());
            }
            match &mut state.session {
                SessionRef::Live(session) => Route::Now(Arc::clone(session), op),
                SessionRef::Deferred(queue) => {
                    let route = Route::Queued(queue.enqueue(name, op));
                    debug!(op = name, queued = queue.len(), "deferred until open");
                    route
                }
                SessionRef::Detached => return Err(Error::not_ready()),
            }
        };

        match route {
            Route::Now(session, op) => Ok(run_blocking(move || op(session.as_ref()))
                .await
                .unwrap_or_else(|e| Err(StorageError::Internal(e)))),
            Route::Queued(result) => match result.await {
                Ok(Ok(value)) => Ok(Ok(value)),
                Ok(Err(DeferredError::Engine(e))) => Ok(Err(e)),
                Ok(Err(DeferredError::Unavailable(e))) => Err(Error::StorageOpen(e)),
                Err(_) => Err(Error::StorageOpen(Arc::new(StorageError::Internal(
                    "open task ended before running the operation".into(),
                )))),
            },
        }
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("location", &self.shared.location)
            .field("status", &self.status())
            .field("engine", &self.shared.engine)
            .finish_non_exhaustive()
    }
}

fn require_key(key: Value, op: &str) -> Result<Value> {
    if key.is_null() {
        return Err(Error::Validation(format!("{op}: key is required")));
    }
    if key.is_empty() {
        return Err(Error::Validation(format!("{op}: key cannot be empty")));
    }
    Ok(key)
}

fn validate_batch_entry(index: usize, entry: &BatchEntry) -> Result<()> {
    match &entry.key {
        None => return Err(Error::Validation(format!("batch entry {index}: key is required"))),
        Some(key) if key.is_null() => {
            return Err(Error::Validation(format!("batch entry {index}: key is required")));
        }
        Some(key) if key.is_empty() => {
            return Err(Error::Validation(format!("batch entry {index}: key cannot be empty")));
        }
        Some(_) => {}
    }

    match entry.resolved_kind() {
        None => Err(Error::Validation(format!(
            "batch entry {index}: type is required unless both key and value are given"
        ))),
        Some(BatchKind::Put) if entry.value.as_ref().map_or(true, Value::is_null) => {
            Err(Error::Validation(format!("batch entry {index}: put requires a value")))
        }
        Some(_) => Ok(()),
    }
}

fn to_batch_op(index: usize, entry: EncodedEntry) -> Result<BatchOp> {
    let EncodedEntry { kind, key, value } = entry;
    let Some(key) = key else {
        return Err(Error::Validation(format!("batch entry {index}: key is required")));
    };
    match (kind, value) {
        (Some(BatchKind::Put), Some(value)) => {
            Ok(BatchOp::Put { key: key.into_bytes(), value: value.into_bytes() })
        }
        (Some(BatchKind::Put), None) => {
            Err(Error::Validation(format!("batch entry {index}: put requires a value")))
        }
        (Some(BatchKind::Del), _) => Ok(BatchOp::Delete { key: key.into_bytes() }),
        (None, _) => Err(Error::Validation(format!(
            "batch entry {index}: type is required unless both key and value are given"
        ))),
    }
}

/// Run a blocking engine call off the async executor when there is one.
async fn run_blocking<T, F>(task: F) -> std::result::Result<T, String>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    match tokio::runtime::Handle::try_current() {
        Ok(runtime) => runtime.spawn_blocking(task).await.map_err(|e| e.to_string()),
        Err(_) => Ok(task()),
    }
}

async fn wait_for_open(mut signal: watch::Receiver<OpenSignal>) -> Result<()> {
    let outcome = signal
        .wait_for(|s| !matches!(s, OpenSignal::Pending))
        .await
        .map(|s| (*s).clone())
        .unwrap_or(OpenSignal::Pending);

    match outcome {
        OpenSignal::Opened => Ok(()),
        OpenSignal::Failed(e) => Err(Error::StorageOpen(e)),
        OpenSignal::Pending => Err(Error::StorageOpen(Arc::new(StorageError::Internal(
            "open task ended without reporting".into(),
        )))),
    }
}
