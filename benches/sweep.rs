//! Benchmarks for stratified single and sweep evaluation.
//!
//! Synthetic data: scores drawn from a fixed linear congruential sequence,
//! labels correlated with score, spread over a handful of strata.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use strateval::{evaluate_single, evaluate_sweep, SingleConfig, SweepConfig, Table, Value};

fn synthetic_table(rows: usize, strata: usize) -> Table {
    let mut table = Table::new(["GT", "Score", "site"]);
    let mut state: u64 = 0x2545_F491_4F6C_DD1D;
    for i in 0..rows {
        state = state.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
        let score = (state >> 11) as f64 / (1u64 << 53) as f64;
        state = state.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
        let noise = (state >> 11) as f64 / (1u64 << 53) as f64;
        let gt = score + 0.3 * (noise - 0.5) > 0.5;
        let row = vec![
            Value::from(gt),
            Value::from(score),
            Value::from(format!("site-{}", i % strata)),
        ];
        table.push_row(row).expect("row width matches the table");
    }
    table
}

fn bench_single(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate_single");
    let config = SingleConfig {
        common: strateval::EvalConfig {
            strata: vec!["site".into()],
            ..Default::default()
        },
        ..Default::default()
    };
    for &rows in &[1_000, 10_000] {
        let table = synthetic_table(rows, 8);
        group.bench_with_input(BenchmarkId::from_parameter(rows), &table, |b, table| {
            b.iter(|| evaluate_single(black_box(table), "GT", "Score", &config))
        });
    }
    group.finish();
}

fn bench_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate_sweep");
    group.sample_size(20);
    let mut default = SweepConfig::default();
    default.common.strata = vec!["site".into()];
    let mut pm = SweepConfig::pm_mode();
    pm.common.strata = vec!["site".into()];

    for &rows in &[1_000, 10_000] {
        let table = synthetic_table(rows, 8);
        group.bench_with_input(BenchmarkId::new("default", rows), &table, |b, table| {
            b.iter(|| evaluate_sweep(black_box(table), "GT", "Score", &default))
        });
        group.bench_with_input(BenchmarkId::new("pm_mode", rows), &table, |b, table| {
            b.iter(|| evaluate_sweep(black_box(table), "GT", "Score", &pm))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_single, bench_sweep);
criterion_main!(benches);
