//! Benchmarks for record generation and batch seeding.
//!
//! Tests:
//! - Per-entity record generation
//! - Full batch throughput against the in-memory and JSONL stores

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use docseed::batch::{self, BatchConfig, RecordCount};
use docseed::record_gen::{Entity, Generator};
use docseed::store::{JsonlStore, MemoryStore};
use std::hint::black_box;
use tempfile::TempDir;

/// Benchmark generating one record per entity
fn bench_generate_entity(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_entity");
    group.throughput(Throughput::Elements(1));

    for entity in Entity::ALL {
        group.bench_with_input(
            BenchmarkId::new("record", entity.collection()),
            &entity,
            |b, &entity| {
                let mut generator = Generator::new(42);
                b.iter(|| black_box(generator.generate_entity(black_box(entity))))
            },
        );
    }

    group.finish();
}

/// Benchmark generating a full iteration (one record per entity)
fn bench_generate_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_all");
    group.throughput(Throughput::Elements(Entity::ALL.len() as u64));

    group.bench_function("iteration", |b| {
        let mut generator = Generator::new(42);
        b.iter(|| black_box(generator.generate_all()))
    });

    group.finish();
}

/// Benchmark whole batches with varying iteration counts
fn bench_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch");
    group.sample_size(20);

    for iterations in [100, 1_000] {
        group.throughput(Throughput::Elements((iterations * Entity::ALL.len()) as u64));

        group.bench_with_input(
            BenchmarkId::new("memory", format!("{}_iterations", iterations)),
            &iterations,
            |b, &iterations| {
                let config = BatchConfig {
                    seed: 42,
                    count: RecordCount::Fixed(iterations),
                    ..Default::default()
                };
                b.iter(|| {
                    let mut store = MemoryStore::new();
                    let stats = batch::run(&config, &mut store).unwrap();
                    black_box(stats.total_documents)
                })
            },
        );

        group.bench_with_input(
            BenchmarkId::new("jsonl", format!("{}_iterations", iterations)),
            &iterations,
            |b, &iterations| {
                let config = BatchConfig {
                    seed: 42,
                    count: RecordCount::Fixed(iterations),
                    ..Default::default()
                };
                b.iter(|| {
                    let temp_dir = TempDir::new().unwrap();
                    let mut store = JsonlStore::new(temp_dir.path().to_path_buf(), "bench");
                    let stats = batch::run(&config, &mut store).unwrap();
                    black_box(stats.total_documents)
                })
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_generate_entity,
    bench_generate_all,
    bench_batch,
);

criterion_main!(benches);
