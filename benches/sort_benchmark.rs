use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rosterx::ingest::generator::{generate, GeneratorOptions};
use rosterx::{NoopObserver, ParallelOrderIndex, RecordStore};

/// Store of `count` generated students, rolls parsed to integers
fn numeric_store(count: usize) -> RecordStore<u64, String> {
    let mut store = RecordStore::with_capacity(count);
    for record in generate(GeneratorOptions { count, seed: Some(42) }) {
        let roll: u64 = record.roll().parse().unwrap_or_default();
        store.append(
            rosterx::Record::new(record.name(), roll, record.branch(), record.start_year())
                .with_enrolled(record.enrolled().to_vec())
                .with_completed(record.completed().clone()),
        );
    }
    store
}

/// Worker count sweep over a fixed roster
fn bench_workers(c: &mut Criterion) {
    let store = numeric_store(100_000);
    let mut group = c.benchmark_group("sort_by_workers");

    for workers in [2, 4, 8, 16].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(workers), workers, |b, &workers| {
            let mut index = ParallelOrderIndex::new();
            b.iter(|| {
                index
                    .build(store.snapshot(), black_box(workers), &NoopObserver)
                    .unwrap();
            });
        });
    }

    group.finish();
}

/// Roster size sweep at the default worker count
fn bench_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("sort_by_size");
    let workers = num_cpus::get().max(2);

    for size in [1_000, 10_000, 100_000].iter() {
        let store = numeric_store(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            let mut index = ParallelOrderIndex::new();
            b.iter(|| {
                index.build(store.snapshot(), workers, &NoopObserver).unwrap();
            });
        });
    }

    group.finish();
}

/// String rolls compare byte-wise, so they cost more than integers
fn bench_string_rolls(c: &mut Criterion) {
    let mut store: RecordStore<String, String> = RecordStore::new();
    store.extend(generate(GeneratorOptions { count: 100_000, seed: Some(42) }));

    c.bench_function("sort_string_rolls_100k", |b| {
        let mut index = ParallelOrderIndex::new();
        b.iter(|| {
            index.build(store.snapshot(), 8, &NoopObserver).unwrap();
        });
    });
}

criterion_group!(benches, bench_workers, bench_sizes, bench_string_rolls);
criterion_main!(benches);
