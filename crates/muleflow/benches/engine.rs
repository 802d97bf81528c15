//! Benchmark suite for muleflow
//!
//! Run with: `cargo bench --package muleflow`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use muleflow::prelude::*;

/// Deterministic synthetic workload: a base mesh of transfers between a
/// bounded account population, seeded with one planted instance of each
/// pattern so every detector has work to do.
fn create_test_transactions(count: usize) -> Vec<Transaction> {
    let accounts = (count / 10).clamp(20, 1_500);
    let mut txs: Vec<Transaction> = (0..count)
        .map(|i| {
            Transaction::new(
                format!("tx{i:06}"),
                format!("acct{:04}", i % accounts),
                format!("acct{:04}", (i * 7 + 3) % accounts),
                ((i * 17) % 50_000) as f64 + 100.0,
                (i as i64) * 100_000,
            )
        })
        .collect();

    // Planted cycle.
    txs.push(Transaction::new("cyc1", "ring-a", "ring-b", 9_000.0, HOUR_MS));
    txs.push(Transaction::new("cyc2", "ring-b", "ring-c", 9_000.0, 2 * HOUR_MS));
    txs.push(Transaction::new("cyc3", "ring-c", "ring-a", 9_000.0, 3 * HOUR_MS));

    // Planted fan-in burst.
    for i in 0..12 {
        txs.push(Transaction::new(
            format!("smf{i:02}"),
            format!("mule{i:02}"),
            "collector",
            800.0,
            (i as i64) * HOUR_MS,
        ));
    }

    // Planted shell chain.
    for (i, pair) in [("sh-a", "sh-b"), ("sh-b", "sh-c"), ("sh-c", "sh-d"), ("sh-d", "sh-e")]
        .iter()
        .enumerate()
    {
        txs.push(Transaction::new(
            format!("shl{i}"),
            pair.0,
            pair.1,
            4_000.0,
            (i as i64 + 1) * HOUR_MS,
        ));
    }

    txs
}

fn analyze_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine/analyze");

    for size in [100, 1_000, 5_000, 20_000].iter() {
        let transactions = create_test_transactions(*size);

        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(
            BenchmarkId::new("transactions", size),
            size,
            |b, _| b.iter(|| analyze(black_box(&transactions))),
        );
    }

    group.finish();
}

fn graph_build_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("graph/build");

    for size in [1_000, 10_000, 100_000].iter() {
        let transactions = create_test_transactions(*size);

        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(
            BenchmarkId::new("transactions", size),
            size,
            |b, _| b.iter(|| FlowGraph::from_transactions(black_box(&transactions))),
        );
    }

    group.finish();
}

criterion_group!(benches, analyze_benchmark, graph_build_benchmark);
criterion_main!(benches);
