//! Benchmark of the indicator aggregations on synthetic survey tables
//!
//! Run with: cargo bench --bench aggregation_benchmark

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use polars::prelude::*;
use rand::prelude::*;
use rand::SeedableRng;

use agelens::pipeline::{
    analyze, correlation_matrix, intersection_matrix, prepare_survey, Dimension, IndicatorGroup,
    ACTIVITY_COLUMNS, CHRONIC_COLUMNS, SERVICE_COLUMNS,
};

const AGES: [&str; 5] = ["18-54", "55-69", "70-85", "85+", "unknown"];
const DURATIONS: [&str; 5] = [
    "1-3 months",
    "3-6 months",
    "6-12 months",
    "1-2 years",
    "more than 2 years",
];

/// Survey frame with every indicator column plus age and duration.
/// Each indicator is ticked with its own rate so correlations are non-trivial.
fn generate_survey_dataframe(n_rows: usize, seed: u64) -> DataFrame {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let mut columns: Vec<Column> = Vec::new();

    for (i, name) in IndicatorGroup::all_columns().enumerate() {
        let rate = 0.05 + (i % 7) as f64 * 0.08;
        let values: Vec<String> = (0..n_rows)
            .map(|_| if rng.gen_bool(rate) { "1" } else { "0" }.to_string())
            .collect();
        columns.push(Column::new(name.into(), values));
    }

    let ages: Vec<&str> = (0..n_rows)
        .map(|_| *AGES.choose(&mut rng).unwrap_or(&"unknown"))
        .collect();
    columns.push(Column::new(Dimension::AgeRange.column().into(), ages));

    let durations: Vec<&str> = (0..n_rows)
        .map(|_| *DURATIONS.choose(&mut rng).unwrap_or(&"1-3 months"))
        .collect();
    columns.push(Column::new(Dimension::Duration.column().into(), durations));

    DataFrame::new(columns).expect("Failed to create DataFrame")
}

/// Chronic-condition correlation matrix for growing row counts
fn benchmark_correlation_by_rows(c: &mut Criterion) {
    let mut group = c.benchmark_group("chronic_correlation_by_rows");
    group.sample_size(20);

    for n_rows in [1_000, 10_000, 50_000] {
        let df = generate_survey_dataframe(n_rows, 42);
        group.throughput(Throughput::Elements(n_rows as u64));

        group.bench_with_input(BenchmarkId::new("matrix", n_rows), &df, |b, df| {
            b.iter(|| correlation_matrix(black_box(df), black_box(&CHRONIC_COLUMNS[..])));
        });
    }

    group.finish();
}

/// Service by activity co-occurrence via the indicator matrix product
fn benchmark_intersection_by_rows(c: &mut Criterion) {
    let mut group = c.benchmark_group("service_activity_intersection");
    group.sample_size(20);

    for n_rows in [1_000, 10_000, 50_000] {
        let df = generate_survey_dataframe(n_rows, 7);
        group.throughput(Throughput::Elements(
            (n_rows * SERVICE_COLUMNS.len() * ACTIVITY_COLUMNS.len()) as u64,
        ));

        group.bench_with_input(BenchmarkId::new("faer", n_rows), &df, |b, df| {
            b.iter(|| {
                intersection_matrix(
                    black_box(df),
                    black_box(&SERVICE_COLUMNS[..]),
                    black_box(&ACTIVITY_COLUMNS[..]),
                )
            });
        });
    }

    group.finish();
}

/// Every section and hypothesis on a prepared table
fn benchmark_full_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_analysis");
    group.sample_size(10);

    for n_rows in [5_000, 50_000] {
        let table = prepare_survey(generate_survey_dataframe(n_rows, 42))
            .expect("Failed to prepare survey");

        group.bench_with_input(BenchmarkId::new("analyze", n_rows), &table, |b, table| {
            b.iter(|| analyze(black_box(table)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_correlation_by_rows,
    benchmark_intersection_by_rows,
    benchmark_full_analysis,
);
criterion_main!(benches);
