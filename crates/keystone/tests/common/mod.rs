//! Shared test engine.

#![allow(dead_code, clippy::expect_used)]

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use keystone::{MemoryEngine, OpenOptions, Session, StorageEngine, StorageError};
use keystone_storage::{BatchOp, StorageResult};

/// Releases an engine call that is blocked on it.
pub struct Gate(Sender<()>);

impl Gate {
    pub fn release(self) {
        let _ = self.0.send(());
    }
}

fn gate() -> (Gate, Arc<Mutex<Option<Receiver<()>>>>) {
    let (tx, rx) = mpsc::channel();
    (Gate(tx), Arc::new(Mutex::new(Some(rx))))
}

fn wait(slot: &Mutex<Option<Receiver<()>>>) {
    let rx = slot.lock().expect("gate lock").take();
    if let Some(rx) = rx {
        let _ = rx.recv();
    }
}

/// A memory engine that records every call and can hold or fail opens.
#[derive(Debug, Default)]
pub struct InstrumentedEngine {
    inner: MemoryEngine,
    opens: AtomicUsize,
    fail_opens: AtomicUsize,
    calls: Arc<Mutex<Vec<String>>>,
    open_gate: Arc<Mutex<Option<Receiver<()>>>>,
    close_gate: Arc<Mutex<Option<Receiver<()>>>>,
    fail_closes: Arc<AtomicUsize>,
    put_delay: Duration,
}

impl InstrumentedEngine {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// An engine whose first open blocks until the gate is released.
    pub fn gated() -> (Arc<Self>, Gate) {
        let (gate, slot) = gate();
        (Arc::new(Self { open_gate: slot, ..Self::default() }), gate)
    }

    /// An engine whose first `count` opens fail.
    pub fn failing(count: usize) -> Arc<Self> {
        Arc::new(Self { fail_opens: AtomicUsize::new(count), ..Self::default() })
    }

    /// An engine whose first open blocks on the gate and then fails.
    pub fn gated_failing() -> (Arc<Self>, Gate) {
        let (gate, slot) = gate();
        (Arc::new(Self { open_gate: slot, fail_opens: AtomicUsize::new(1), ..Self::default() }), gate)
    }

    /// An engine whose first session close blocks until the gate is released.
    pub fn close_gated() -> (Arc<Self>, Gate) {
        let (gate, slot) = gate();
        (Arc::new(Self { close_gate: slot, ..Self::default() }), gate)
    }

    /// An engine whose session puts each take `delay`.
    pub fn slow_puts(delay: Duration) -> Arc<Self> {
        Arc::new(Self { put_delay: delay, ..Self::default() })
    }

    /// An engine whose first open blocks on the gate and whose first session
    /// close fails.
    pub fn gated_close_failing() -> (Arc<Self>, Gate) {
        let (gate, slot) = gate();
        let engine =
            Self { open_gate: slot, fail_closes: Arc::new(AtomicUsize::new(1)), ..Self::default() };
        (Arc::new(engine), gate)
    }

    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    /// Session calls seen so far, e.g. `"put k"`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }
}

impl StorageEngine for InstrumentedEngine {
    fn open(&self, location: &Path, options: &OpenOptions) -> StorageResult<Arc<dyn Session>> {
        wait(&self.open_gate);
        self.opens.fetch_add(1, Ordering::SeqCst);

        let failing = self
            .fail_opens
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(StorageError::Open("injected failure".into()));
        }

        let inner = self.inner.open(location, options)?;
        Ok(Arc::new(InstrumentedSession {
            inner,
            calls: Arc::clone(&self.calls),
            close_gate: Arc::clone(&self.close_gate),
            fail_closes: Arc::clone(&self.fail_closes),
            put_delay: self.put_delay,
        }))
    }
}

struct InstrumentedSession {
    inner: Arc<dyn Session>,
    calls: Arc<Mutex<Vec<String>>>,
    close_gate: Arc<Mutex<Option<Receiver<()>>>>,
    fail_closes: Arc<AtomicUsize>,
    put_delay: Duration,
}

impl InstrumentedSession {
    fn record(&self, op: &str, key: &[u8]) {
        let call = if key.is_empty() {
            op.to_string()
        } else {
            format!("{op} {}", String::from_utf8_lossy(key))
        };
        self.calls.lock().expect("calls lock").push(call);
    }
}

impl Session for InstrumentedSession {
    fn get(&self, key: &[u8]) -> StorageResult<Vec<u8>> {
        self.record("get", key);
        self.inner.get(key)
    }

    fn put(&self, key: &[u8], value: &[u8]) -> StorageResult<()> {
        self.record("put", key);
        if !self.put_delay.is_zero() {
            thread::sleep(self.put_delay);
        }
        self.inner.put(key, value)
    }

    fn delete(&self, key: &[u8]) -> StorageResult<()> {
        self.record("del", key);
        self.inner.delete(key)
    }

    fn batch(&self, ops: &[BatchOp]) -> StorageResult<()> {
        self.record(&format!("batch {}", ops.len()), b"");
        self.inner.batch(ops)
    }

    fn close(&self) -> StorageResult<()> {
        wait(&self.close_gate);
        self.record("close", b"");
        let failing = self
            .fail_closes
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(StorageError::Internal("injected close failure".into()));
        }
        self.inner.close()
    }
}
