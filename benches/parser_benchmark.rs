//! Performance benchmarks for import parsing and aggregation
//!
//! Run with: cargo bench

use client_utilization::aggregator::AccountBook;
use client_utilization::models::AccountingMode;
use client_utilization::parser::ImportParser;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

/// Generate tab-delimited import text with the given number of rows.
fn generate_import_text(num_rows: usize, include_messy: bool) -> String {
    let mut lines = vec![
        "Account Owner\tAccount Name\tVolume Type\tStart Date\tEnd Date\tAnnual Qty\tTerm Qty\tUsage Date\tPeriod Qty\tConsumed Qty\tRemaining Qty".to_string(),
    ];

    for i in 0..num_rows {
        if include_messy && i % 10 == 5 {
            // Short row with an unparseable quantity every 10th entry
            lines.push(format!("Owner {}\tAccount {}\tEmail\tbad\tworse\tn/a", i % 7, i % 50));
        } else {
            lines.push(format!(
                "Owner {}\tAccount {}\t{}\t2023-01-01\t2024-01-01\t1,200,000\t2,400,000\t2023-{:02}-15\t{}\t{}\t{}",
                i % 7,
                i % 50,
                ["Email", "SMS", "Mobile App"][i % 3],
                i % 12 + 1,
                10_000 + i,
                100_000 + i * 10,
                1_000_000 - i * 10,
            ));
        }
    }

    lines.join("\n")
}

fn benchmark_parser(c: &mut Criterion) {
    let mut group = c.benchmark_group("import_parser");

    for size in [10, 100, 1000, 10000].iter() {
        let text = generate_import_text(*size, false);

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            let parser = ImportParser::new();
            b.iter(|| parser.parse(black_box(&text)));
        });
    }

    group.finish();
}

fn benchmark_lenient_recovery(c: &mut Criterion) {
    let mut group = c.benchmark_group("lenient_recovery");

    // 10% messy rows
    let text = generate_import_text(1000, true);

    group.bench_function("parse_with_messy_rows", |b| {
        let parser = ImportParser::new();
        b.iter(|| parser.parse(black_box(&text)));
    });

    group.finish();
}

fn benchmark_full_import(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_import");

    for size in [1000, 10000].iter() {
        let text = generate_import_text(*size, false);

        group.bench_with_input(BenchmarkId::new("import", size), size, |b, _| {
            b.iter(|| {
                let mut book = AccountBook::new(AccountingMode::Annual);
                book.import(black_box(&text)).unwrap();
                book
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_parser,
    benchmark_lenient_recovery,
    benchmark_full_import
);
criterion_main!(benches);
