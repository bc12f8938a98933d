//! Compliance tests for storage engine implementations.
//!
//! These tests validate the `StorageEngine`/`Session` contract and are run
//! against every backend from its own test file.

#![allow(dead_code, clippy::expect_used)]

use std::path::PathBuf;
use std::sync::Arc;

use keystone_storage::{BatchOp, OpenOptions, Session, StorageEngine, StorageError, StorageResult};

/// A test harness trait for testing storage engine implementations.
///
/// Implementors provide an engine and a fresh location for each test.
pub trait TestHarness {
    /// The storage engine type being tested.
    type Engine: StorageEngine;

    /// Create a new storage engine for testing.
    fn create_engine() -> StorageResult<Self::Engine>;

    /// Return a location that has never been opened.
    fn fresh_location() -> PathBuf;
}

/// Run the standard test suite against a storage engine.
///
/// # Example
///
/// ```ignore
/// struct MemoryHarness;
///
/// impl TestHarness for MemoryHarness {
///     type Engine = MemoryEngine;
///     fn create_engine() -> StorageResult<Self::Engine> { Ok(MemoryEngine::new()) }
///     fn fresh_location() -> PathBuf { PathBuf::from("mem/test") }
/// }
///
/// #[test]
/// fn test_memory_compliance() {
///     run_test_suite::<MemoryHarness>();
/// }
/// ```
pub fn run_test_suite<H: TestHarness>() {
    test_basic_operations::<H>();
    test_not_found::<H>();
    test_batch_put_and_delete::<H>();
    test_batch_mixed_order::<H>();
    test_binary_keys::<H>();
    test_close_is_idempotent::<H>();
    test_reopen_persists::<H>();
    test_creation_flags::<H>();
}

fn open<H: TestHarness>(engine: &H::Engine, location: &PathBuf) -> Arc<dyn Session> {
    engine.open(location, &OpenOptions::default()).expect("failed to open")
}

/// Test basic get/put/delete operations.
fn test_basic_operations<H: TestHarness>() {
    let engine = H::create_engine().expect("failed to create engine");
    let session = open::<H>(&engine, &H::fresh_location());

    session.put(b"key1", b"value1").expect("failed to put");
    assert_eq!(session.get(b"key1").expect("failed to get"), b"value1".to_vec());

    // Overwrite
    session.put(b"key1", b"value1_updated").expect("failed to put");
    assert_eq!(session.get(b"key1").expect("failed to get"), b"value1_updated".to_vec());

    session.delete(b"key1").expect("failed to delete");
    assert!(session.get(b"key1").expect_err("key should be gone").is_not_found());

    session.close().expect("failed to close");
}

/// Missing keys report `NotFound`, and deleting them is not an error.
fn test_not_found<H: TestHarness>() {
    let engine = H::create_engine().expect("failed to create engine");
    let session = open::<H>(&engine, &H::fresh_location());

    assert!(matches!(session.get(b"never-written"), Err(StorageError::NotFound)));
    session.delete(b"never-written").expect("deleting a missing key should succeed");

    session.close().expect("failed to close");
}

/// Test that a batch of 100 puts and a batch of 100 deletes apply fully.
fn test_batch_put_and_delete<H: TestHarness>() {
    let engine = H::create_engine().expect("failed to create engine");
    let session = open::<H>(&engine, &H::fresh_location());

    let puts: Vec<BatchOp> = (0..100)
        .map(|i| BatchOp::Put {
            key: format!("key:{i:03}").into_bytes(),
            value: format!("value:{i:03}").into_bytes(),
        })
        .collect();
    session.batch(&puts).expect("failed to batch put");

    for i in 0..100 {
        let value = session.get(format!("key:{i:03}").as_bytes()).expect("failed to get");
        assert_eq!(value, format!("value:{i:03}").into_bytes());
    }

    let deletes: Vec<BatchOp> =
        puts.iter().map(|op| BatchOp::Delete { key: op.key().to_vec() }).collect();
    session.batch(&deletes).expect("failed to batch delete");

    for i in 0..100 {
        let result = session.get(format!("key:{i:03}").as_bytes());
        assert!(matches!(result, Err(StorageError::NotFound)));
    }

    session.close().expect("failed to close");
}

/// Operations inside one batch apply in order.
fn test_batch_mixed_order<H: TestHarness>() {
    let engine = H::create_engine().expect("failed to create engine");
    let session = open::<H>(&engine, &H::fresh_location());

    session
        .batch(&[
            BatchOp::Put { key: b"a".to_vec(), value: b"1".to_vec() },
            BatchOp::Delete { key: b"a".to_vec() },
            BatchOp::Put { key: b"b".to_vec(), value: b"1".to_vec() },
            BatchOp::Put { key: b"b".to_vec(), value: b"2".to_vec() },
        ])
        .expect("failed to batch");

    assert!(session.get(b"a").expect_err("a was deleted").is_not_found());
    assert_eq!(session.get(b"b").expect("failed to get"), b"2".to_vec());

    session.close().expect("failed to close");
}

/// Keys and values are opaque bytes.
fn test_binary_keys<H: TestHarness>() {
    let engine = H::create_engine().expect("failed to create engine");
    let session = open::<H>(&engine, &H::fresh_location());

    let key = [0x00, 0xFF, 0x10, 0x00];
    let value = [0xDE, 0xAD, 0xBE, 0xEF];
    session.put(&key, &value).expect("failed to put");
    assert_eq!(session.get(&key).expect("failed to get"), value.to_vec());

    session.close().expect("failed to close");
}

fn test_close_is_idempotent<H: TestHarness>() {
    let engine = H::create_engine().expect("failed to create engine");
    let session = open::<H>(&engine, &H::fresh_location());

    session.close().expect("first close failed");
    session.close().expect("second close failed");
    assert!(matches!(session.put(b"k", b"v"), Err(StorageError::Closed)));
}

/// Data written before close is visible after reopening the same location.
fn test_reopen_persists<H: TestHarness>() {
    let engine = H::create_engine().expect("failed to create engine");
    let location = H::fresh_location();

    let first = open::<H>(&engine, &location);
    first.put(b"durable", b"yes").expect("failed to put");
    first.close().expect("failed to close");

    let second = open::<H>(&engine, &location);
    assert_eq!(second.get(b"durable").expect("failed to get"), b"yes".to_vec());
    second.close().expect("failed to close");
}

fn test_creation_flags<H: TestHarness>() {
    let engine = H::create_engine().expect("failed to create engine");
    let location = H::fresh_location();

    let missing = engine.open(&location, &OpenOptions::new().create_if_missing(false));
    assert!(matches!(missing, Err(StorageError::Open(_))));

    let session = open::<H>(&engine, &location);
    session.close().expect("failed to close");

    let exists = engine.open(&location, &OpenOptions::new().error_if_exists(true));
    assert!(matches!(exists, Err(StorageError::Open(_))));
}
