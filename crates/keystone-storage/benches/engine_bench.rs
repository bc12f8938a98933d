//! Benchmarks for the storage backends.

#![allow(missing_docs, clippy::unwrap_used)]

use std::path::Path;

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};

use keystone_storage::backends::{MemoryEngine, RedbEngine};
use keystone_storage::{BatchOp, OpenOptions, StorageEngine};

/// Benchmark single key-value writes.
fn bench_put_single(c: &mut Criterion) {
    let mut group = c.benchmark_group("put_single");
    group.throughput(Throughput::Elements(1));

    let memory = MemoryEngine::new().open(Path::new("bench"), &OpenOptions::default()).unwrap();
    group.bench_function("memory", |b| {
        b.iter(|| memory.put(black_box(b"key"), black_box(b"value")).unwrap());
    });

    let dir = tempfile::tempdir().unwrap();
    let redb = RedbEngine::new().open(dir.path(), &OpenOptions::default()).unwrap();
    group.bench_function("redb", |b| {
        b.iter(|| redb.put(black_box(b"key"), black_box(b"value")).unwrap());
    });

    group.finish();
}

/// Benchmark batch writes.
fn bench_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch");
    let dir = tempfile::tempdir().unwrap();
    let redb = RedbEngine::new().open(dir.path(), &OpenOptions::default()).unwrap();

    for size in [10u64, 100, 1000] {
        group.throughput(Throughput::Elements(size));
        group.bench_function(format!("redb_batch_{size}"), |b| {
            b.iter_batched(
                || {
                    (0..size)
                        .map(|i| BatchOp::Put {
                            key: format!("key:{i:05}").into_bytes(),
                            value: format!("value:{i:05}").into_bytes(),
                        })
                        .collect::<Vec<_>>()
                },
                |ops| redb.batch(&ops).unwrap(),
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

/// Benchmark single key reads.
fn bench_get_single(c: &mut Criterion) {
    let mut group = c.benchmark_group("get_single");
    group.throughput(Throughput::Elements(1));

    let dir = tempfile::tempdir().unwrap();
    let redb = RedbEngine::new().open(dir.path(), &OpenOptions::default()).unwrap();
    redb.put(b"key", b"value").unwrap();

    group.bench_function("redb", |b| {
        b.iter(|| black_box(redb.get(black_box(b"key")).unwrap()));
    });

    group.finish();
}

criterion_group!(benches, bench_put_single, bench_batch, bench_get_single);
criterion_main!(benches);
