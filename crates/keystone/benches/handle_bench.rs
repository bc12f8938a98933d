//! Benchmarks for handle operations.

#![allow(missing_docs, clippy::unwrap_used)]

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use tokio::runtime::Runtime;

use keystone::{BatchEntry, Handle, MemoryEngine, Options};

fn runtime() -> Runtime {
    tokio::runtime::Builder::new_multi_thread().enable_all().build().unwrap()
}

fn open_memory(rt: &Runtime, options: Options) -> Handle {
    rt.block_on(async {
        let db = Handle::with_engine("bench", options, Arc::new(MemoryEngine::new()));
        db.ready().await.unwrap();
        db
    })
}

/// Benchmark a put and get through each default encoding.
fn bench_put_get(c: &mut Criterion) {
    let rt = runtime();
    let mut group = c.benchmark_group("put_get");
    group.throughput(Throughput::Elements(1));

    for encoding in ["utf8", "json", "hex"] {
        let db = open_memory(&rt, Options::default().value_encoding(encoding));
        let value = if encoding == "json" { "\"value\"" } else { "cafe" };
        let db = &db;
        group.bench_function(encoding, |b| {
            b.to_async(&rt).iter(|| async move {
                db.put(black_box("key"), black_box(value)).await.unwrap();
                db.get(black_box("key")).await.unwrap()
            });
        });
    }

    group.finish();
}

/// Benchmark batches on the on-disk engine.
fn bench_batch(c: &mut Criterion) {
    let rt = runtime();
    let dir = tempfile::tempdir().unwrap();
    let db = rt.block_on(async {
        let db = Handle::new(dir.path().join("db"), Options::default());
        db.ready().await.unwrap();
        db
    });

    let handle = &db;
    let mut group = c.benchmark_group("handle_batch");
    for size in [10u64, 100, 1000] {
        group.throughput(Throughput::Elements(size));
        group.bench_function(format!("redb_{size}"), |b| {
            b.to_async(&rt).iter_batched(
                || {
                    (0..size)
                        .map(|i| BatchEntry::put(format!("key:{i:05}"), format!("value:{i:05}")))
                        .collect::<Vec<_>>()
                },
                |entries| async move { handle.batch(entries).await.unwrap() },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();

    rt.block_on(db.close()).unwrap();
}

criterion_group!(benches, bench_put_get, bench_batch);
criterion_main!(benches);
