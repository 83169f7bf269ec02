//! Insert throughput and query latency for both modes.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

use stream_quantiles::util::Xorshift;
use stream_quantiles::{Estimator, Mode, Quantile};

fn targeted_mode() -> Mode {
    Mode::Targeted(vec![
        Quantile::new(0.5, 0.01).expect("target"),
        Quantile::new(0.95, 0.001).expect("target"),
    ])
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");
    for size in [1_000u64, 10_000, 100_000] {
        group.throughput(Throughput::Elements(size));
        group.bench_function(format!("biased_{}", size), |b| {
            let mut gen = Xorshift::new(1972);
            b.iter(|| {
                let mut estimator = Estimator::new();
                for _ in 0..size {
                    estimator.insert(gen.next_u64() as f64);
                }
                estimator
            });
        });
        group.bench_function(format!("targeted_{}", size), |b| {
            let mut gen = Xorshift::new(1972);
            b.iter(|| {
                let mut estimator =
                    Estimator::with_mode(targeted_mode()).expect("config");
                for _ in 0..size {
                    estimator.insert(gen.next_u64() as f64);
                }
                estimator
            });
        });
    }
    group.finish();
}

fn bench_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("query");
    let mut gen = Xorshift::new(1972);
    let mut estimator = Estimator::new();
    for _ in 0..1_000_000 {
        estimator.insert(gen.next_u64() as f64);
    }
    estimator.flush().expect("band invariant");
    group.bench_function("biased_median_1000000", |b| {
        b.iter(|| estimator.query(black_box(0.5)).expect("query"));
    });
    group.bench_function("biased_p95_1000000", |b| {
        b.iter(|| estimator.query(black_box(0.95)).expect("query"));
    });
    group.finish();
}

criterion_group!(benches, bench_insert, bench_query);
criterion_main!(benches);
