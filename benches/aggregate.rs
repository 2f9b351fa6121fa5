use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use soilwatch::{compute_stats, filter_by_range, window_latest, TimeRange};
use soilwatch_types::{Field, Reading};

/// Readings one minute apart, pushed in shuffled order like a busy device.
fn readings(count: i64) -> Vec<Reading> {
    (0..count)
        .map(|i| {
            // Cheap deterministic shuffle
            let ts = (i * 7919) % count * 60_000;
            Reading::at(ts)
                .with(Field::Moisture, 30.0 + (i % 17) as f64)
                .with(Field::Temperature, 18.0 + (i % 11) as f64 / 2.0)
                .with(Field::Ec, 700.0 + (i % 50) as f64)
                .with(Field::Ph, 6.0 + (i % 9) as f64 / 10.0)
        })
        .collect()
}

/// Benchmark compute_stats with varying batch sizes
fn bench_compute_stats(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_stats");

    for count in [50i64, 500, 5_000, 50_000].iter() {
        let data = readings(*count);
        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &data, |b, data| {
            b.iter(|| black_box(compute_stats(black_box(data))));
        });
    }
    group.finish();
}

/// Benchmark filter_by_range over a quarter of the data
fn bench_filter_by_range(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter_by_range");

    for count in [500i64, 5_000, 50_000].iter() {
        let data = readings(*count);
        let range = TimeRange::new(0, count / 4 * 60_000);
        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &data, |b, data| {
            b.iter(|| black_box(filter_by_range(black_box(data), &range)));
        });
    }
    group.finish();
}

/// Benchmark the live path: latest 50 readings, then their stats
fn bench_live_batch(c: &mut Criterion) {
    let data = readings(5_000);

    c.bench_function("window_latest_then_stats", |b| {
        b.iter(|| {
            let latest = window_latest(black_box(&data), 50);
            black_box(compute_stats(&latest));
        });
    });
}

criterion_group!(benches, bench_compute_stats, bench_filter_by_range, bench_live_batch);
criterion_main!(benches);
