use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use market_dates::{apply_tenor_batch, resolve_dates, CivilDate, TenorOptions};

/// A trading-history style column: few distinct dates, many repeats.
fn repeated_column(rows: usize, distinct: i64) -> Vec<String> {
    (0..rows as i64)
        .map(|i| {
            let d = CivilDate::from_epoch_days(17_000 + i % distinct).unwrap();
            d.as_naive_date().format("%d/%m/%Y").to_string()
        })
        .collect()
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_dates");
    for rows in [1_000usize, 10_000, 100_000] {
        let column = repeated_column(rows, 500);
        group.bench_with_input(BenchmarkId::from_parameter(rows), &column, |b, column| {
            b.iter(|| resolve_dates(black_box(column)).unwrap())
        });
    }
    group.finish();
}

fn bench_tenor_batch(c: &mut Criterion) {
    let dates: Vec<CivilDate> = (0..10_000)
        .map(|i| CivilDate::from_epoch_days(15_000 + i).unwrap())
        .collect();
    let options = TenorOptions::default();
    c.bench_function("apply_tenor_batch_3m", |b| {
        b.iter(|| apply_tenor_batch(black_box(&dates), "3M", &options).unwrap())
    });
}

criterion_group!(benches, bench_resolve, bench_tenor_batch);
criterion_main!(benches);
