//! Benchmarks for tree writes, reads, and staleness checks
//!
//! Run with: cargo bench -p trellis-core --bench store_bench

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use serde_json::json;
use std::hint::black_box;

use trellis_core::path;
use trellis_core::reactive::Observer;
use trellis_core::store::Store;

/// A store holding `width` small user records under one keyed node.
fn make_store(width: usize) -> Store {
    let store = Store::new();
    for i in 0..width {
        store
            .write(
                path!["users", format!("user-{i}")],
                json!({"name": format!("name-{i}"), "active": i % 2 == 0}),
            )
            .unwrap();
    }
    store
}

fn bench_write(c: &mut Criterion) {
    let mut group = c.benchmark_group("store/write");

    for width in [16, 128, 1024] {
        let store = make_store(width);
        group.bench_with_input(BenchmarkId::new("one_leaf", width), &(), |b, _| {
            b.iter(|| {
                store
                    .write(path!["users", "user-0", "name"], json!("rewritten"))
                    .unwrap()
            })
        });
    }

    group.finish();
}

fn bench_read(c: &mut Criterion) {
    let mut group = c.benchmark_group("store/read");

    for width in [16, 128, 1024] {
        let store = make_store(width);
        let deep = path!["users", "user-0", "name"];
        group.bench_with_input(BenchmarkId::new("one_leaf", width), &(), |b, _| {
            b.iter(|| black_box(store.read(&deep, json!(null))))
        });
    }

    group.finish();
}

fn bench_staleness(c: &mut Criterion) {
    let mut group = c.benchmark_group("observer/is_stale");

    for deps in [4, 32, 256] {
        group.throughput(Throughput::Elements(deps as u64));
        let store = make_store(256);

        let mut observer = Observer::new();
        observer.begin_tracking();
        for i in 0..deps {
            observer.try_read(&store, &path!["users", format!("user-{i}"), "name"]);
        }
        observer.end_tracking();

        group.bench_with_input(BenchmarkId::new("all_fresh", deps), &(), |b, _| {
            b.iter(|| black_box(observer.is_stale(&store)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_write, bench_read, bench_staleness);
criterion_main!(benches);
