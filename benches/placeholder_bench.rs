// ABOUTME: Criterion benchmarks for placeholder scanning and statement binding
// ABOUTME: Measures validation cost for short and long SQL with named and positional markers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Criterion benchmarks for placeholder scanning and binding.
//!
//! Binding runs on every call before the driver is touched, so its cost is
//! paid even by statements that are rejected.

#![allow(
    clippy::missing_docs_in_private_items,
    clippy::unwrap_used,
    missing_docs
)]

use bound_sql::binding;
use bound_sql::placeholders;
use bound_sql::{OperationKind, ParameterSet, PlaceholderStyle};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::fmt::Write;

const SHORT_NAMED: &str = "SELECT name FROM users WHERE id = :id";

fn wide_insert(columns: usize, style: PlaceholderStyle) -> String {
    let names: Vec<String> = (0..columns).map(|i| format!("c{i}")).collect();
    let mut sql = format!("INSERT INTO wide ({}) VALUES (", names.join(", "));
    for (i, name) in names.iter().enumerate() {
        if i > 0 {
            sql.push_str(", ");
        }
        match style {
            PlaceholderStyle::Named => write!(sql, ":{name}").unwrap(),
            PlaceholderStyle::Positional => sql.push('?'),
        }
    }
    sql.push(')');
    sql
}

fn wide_params(columns: usize, style: PlaceholderStyle) -> ParameterSet {
    match style {
        PlaceholderStyle::Named => {
            ParameterSet::named((0..columns).map(|i| (format!(":c{i}"), i as i64)))
        }
        PlaceholderStyle::Positional => ParameterSet::positional((0..columns).map(|i| i as i64)),
    }
}

fn bench_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("placeholder_scan");

    group.bench_function("short_named", |b| {
        b.iter(|| placeholders::scan(black_box(SHORT_NAMED)).unwrap());
    });

    let quoted = "SELECT note FROM users WHERE note <> 'a :fake ? marker' -- :also fake\n AND id = :id";
    group.bench_function("quoted_and_comment", |b| {
        b.iter(|| placeholders::scan(black_box(quoted)).unwrap());
    });

    for columns in [8_usize, 64, 256] {
        let sql = wide_insert(columns, PlaceholderStyle::Named);
        group.throughput(Throughput::Bytes(sql.len() as u64));
        group.bench_with_input(BenchmarkId::new("wide_named", columns), &sql, |b, sql| {
            b.iter(|| placeholders::scan(black_box(sql)).unwrap());
        });
    }

    group.finish();
}

fn bench_prepare(c: &mut Criterion) {
    let mut group = c.benchmark_group("statement_prepare");

    for style in [PlaceholderStyle::Named, PlaceholderStyle::Positional] {
        for columns in [8_usize, 64] {
            let sql = wide_insert(columns, style);
            let params = wide_params(columns, style);
            group.bench_with_input(
                BenchmarkId::new(style.to_string(), columns),
                &(sql, params),
                |b, (sql, params)| {
                    b.iter(|| {
                        binding::prepare(
                            OperationKind::Insert,
                            style,
                            black_box(sql),
                            black_box(params),
                            true,
                        )
                        .unwrap()
                    });
                },
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_scan, bench_prepare);
criterion_main!(benches);
