//! # Store Benchmarks
//!
//! Performance benchmarks for hbnb-core registry operations.
//!
//! Run with: `cargo bench -p hbnb-core`

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use hbnb_core::{FieldValue, Fields, Kind, Registry, store_from_bytes, store_to_bytes};
use std::hint::black_box;

/// Create a registry with N places, each carrying a handful of fields.
fn create_populated_registry(size: usize) -> Registry {
    let mut registry = Registry::new("bench.json");
    for i in 0..size {
        let mut fields = Fields::new();
        fields.insert("name".to_string(), FieldValue::from(format!("place {}", i)));
        fields.insert("max_guest".to_string(), FieldValue::Int(i as i64));
        fields.insert("latitude".to_string(), FieldValue::Float(37.77));
        registry.create(Kind::Place, fields).expect("create");
    }
    registry
}

// =============================================================================
// BENCHMARKS
// =============================================================================

fn bench_create(c: &mut Criterion) {
    let mut group = c.benchmark_group("create");

    for size in [100, 1000, 10000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter(|| black_box(create_populated_registry(size)));
        });
    }

    group.finish();
}

fn bench_encode_store(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_store");

    for size in [100, 1000, 10000].iter() {
        let registry = create_populated_registry(*size);

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| black_box(store_to_bytes(registry.all())));
        });
    }

    group.finish();
}

fn bench_decode_store(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_store");

    for size in [100, 1000, 10000].iter() {
        let registry = create_populated_registry(*size);
        let bytes = store_to_bytes(registry.all()).expect("encode");

        group.bench_with_input(BenchmarkId::from_parameter(size), &bytes, |b, bytes| {
            b.iter(|| black_box(store_from_bytes(bytes)));
        });
    }

    group.finish();
}

fn bench_count(c: &mut Criterion) {
    let mut group = c.benchmark_group("count");

    for size in [1000, 10000].iter() {
        let registry = create_populated_registry(*size);

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| black_box(registry.count(Kind::Place)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_create,
    bench_encode_store,
    bench_decode_store,
    bench_count,
);

criterion_main!(benches);
