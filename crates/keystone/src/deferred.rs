//! The placeholder session installed while a handle is opening.
//!
//! Operations issued during `Opening` are captured here in arrival order.
//! When the engine opens, they are replayed against the real session; when
//! it fails, each one is completed with the open error.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use keystone_storage::{Session, StorageError, StorageResult};
use tokio::sync::oneshot;
use tracing::trace;

/// What a queued operation is eventually run against.
type Outcome<'a> = Result<&'a dyn Session, &'a Arc<StorageError>>;

/// Why a queued operation did not produce a value.
#[derive(Debug)]
pub(crate) enum DeferredError {
    /// The operation ran and the engine returned an error.
    Engine(StorageError),
    /// The engine never opened.
    Unavailable(Arc<StorageError>),
}

/// Receives the result of a queued operation.
pub(crate) type DeferredResult<T> = oneshot::Receiver<Result<T, DeferredError>>;

/// An operation waiting for the engine.
struct PendingOp {
    name: &'static str,
    run: Box<dyn for<'a> FnOnce(Outcome<'a>) + Send>,
}

/// Queue of operations waiting for the engine to open.
#[derive(Default)]
pub(crate) struct DeferredSession {
    pending: VecDeque<PendingOp>,
}

impl DeferredSession {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn len(&self) -> usize {
        self.pending.len()
    }

    /// Queue `op` and return a receiver for its result.
    pub(crate) fn enqueue<T, F>(&mut self, name: &'static str, op: F) -> DeferredResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&dyn Session) -> StorageResult<T> + Send + 'static,
    {
        let (result_tx, result_rx) = oneshot::channel();
        let run = move |outcome: Outcome<'_>| {
            let result = match outcome {
                Ok(session) => op(session).map_err(DeferredError::Engine),
                Err(error) => Err(DeferredError::Unavailable(Arc::clone(error))),
            };
            // The caller may have stopped waiting
            let _ = result_tx.send(result);
        };
        self.pending.push_back(PendingOp { name, run: Box::new(run) });
        result_rx
    }

    /// Run every queued operation against `session`, oldest first.
    ///
    /// Returns the number of operations run.
    pub(crate) fn replay(self, session: &dyn Session) -> usize {
        let count = self.pending.len();
        for op in self.pending {
            trace!(op = op.name, "replaying deferred operation");
            (op.run)(Ok(session));
        }
        count
    }

    /// Fail every queued operation with `error`.
    ///
    /// Returns the number of operations failed.
    pub(crate) fn abort(self, error: &Arc<StorageError>) -> usize {
        let count = self.pending.len();
        for op in self.pending {
            trace!(op = op.name, "aborting deferred operation");
            (op.run)(Err(error));
        }
        count
    }
}

impl fmt::Debug for DeferredSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<_> = self.pending.iter().map(|op| op.name).collect();
        f.debug_struct("DeferredSession").field("pending", &names).finish()
    }
}
