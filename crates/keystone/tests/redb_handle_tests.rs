//! Integration tests for handles backed by the on-disk redb engine.

#![allow(clippy::expect_used)]

use keystone::{BatchEntry, Error, Handle, Options, Status, Value};
use serde_json::json;

#[tokio::test]
async fn test_data_survives_reopen() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let location = dir.path().join("db");

    let db = Handle::new(&location, Options::default().value_encoding("json"));
    db.put("config", json!({"retries": 3, "hosts": ["a", "b"]})).await.expect("put");
    db.batch(vec![BatchEntry::put("a", json!(1)), BatchEntry::put("b", json!(2))])
        .await
        .expect("batch");
    db.close().await.expect("close");

    let db = Handle::new(&location, Options::default().value_encoding("json"));
    db.ready().await.expect("reopen");
    assert_eq!(
        db.get("config").await.expect("get"),
        Some(Value::from(json!({"retries": 3, "hosts": ["a", "b"]})))
    );
    assert_eq!(db.get("b").await.expect("get"), Some(Value::from(json!(2))));
    db.close().await.expect("close");
}

#[tokio::test]
async fn test_reopen_same_handle() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let db = Handle::new(dir.path().join("db"), Options::default());

    db.put("k", "v").await.expect("put");
    db.close().await.expect("close");
    assert_eq!(db.status(), Status::Closed);

    db.open().await.expect("reopen");
    assert_eq!(db.get("k").await.expect("get"), Some(Value::from("v")));
    db.close().await.expect("close");
}

#[tokio::test]
async fn test_create_if_missing_false() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let db = Handle::new(dir.path().join("absent"), Options::default().create_if_missing(false));

    let err = db.ready().await.expect_err("open should fail");
    assert!(matches!(err, Error::StorageOpen(_)));
    assert_eq!(db.status(), Status::New);
    assert!(db.get("k").await.expect_err("not ready").is_not_ready());
}

#[tokio::test]
async fn test_error_if_exists() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let location = dir.path().join("db");

    let db = Handle::new(&location, Options::default());
    db.ready().await.expect("create");
    db.close().await.expect("close");

    let again = Handle::new(&location, Options::default().error_if_exists(true));
    assert!(matches!(again.ready().await, Err(Error::StorageOpen(_))));
}

#[tokio::test]
async fn test_second_handle_on_live_location_fails() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let location = dir.path().join("db");

    let first = Handle::new(&location, Options::default());
    first.ready().await.expect("open");

    let second = Handle::new(&location, Options::default());
    assert!(matches!(second.ready().await, Err(Error::StorageOpen(_))));

    first.close().await.expect("close");
    second.open().await.expect("open once released");
    second.close().await.expect("close");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_writers() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let db = Handle::new(dir.path().join("db"), Options::default());
    db.ready().await.expect("open");

    let tasks: Vec<_> = (0..8)
        .map(|t| {
            let db = db.clone();
            tokio::spawn(async move {
                for i in 0..25 {
                    db.put(format!("t{t}:{i}"), format!("{i}")).await.expect("put");
                }
            })
        })
        .collect();
    for task in tasks {
        task.await.expect("join");
    }

    for t in 0..8 {
        for i in 0..25 {
            let value = db.get(format!("t{t}:{i}")).await.expect("get");
            assert_eq!(value, Some(Value::from(format!("{i}"))));
        }
    }
    db.close().await.expect("close");
}
