use criterion::{black_box, criterion_group, criterion_main, Criterion};
use keywarden::{KeyStore, Layout, Unit};

fn benchmark_validation_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("validation_scan");

    for store_size in [10usize, 100, 1000] {
        let dir = tempfile::tempdir().unwrap();
        let store = KeyStore::with_layout(dir.path(), Layout::Flat);

        let mut last_secret = String::new();
        for _ in 0..store_size {
            last_secret = store.issue(1, Unit::Years).unwrap().record.secret;
        }

        // Worst case for a hit: the matching record's scan position is
        // arbitrary, so this measures a typical partial walk.
        group.bench_with_input(
            criterion::BenchmarkId::new("hit", store_size),
            &store_size,
            |b, _| {
                b.iter(|| store.validate(black_box(&last_secret)));
            },
        );

        // A miss always walks the entire store.
        group.bench_with_input(
            criterion::BenchmarkId::new("miss", store_size),
            &store_size,
            |b, _| {
                b.iter(|| store.validate(black_box("no-such-key")));
            },
        );
    }
    group.finish();
}

criterion_group!(benches, benchmark_validation_scan);
criterion_main!(benches);
