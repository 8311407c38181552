//! Criterion benchmarks for the ranking engine
//!
//! Covers table construction, flattening, and full CPU convergence runs
//! across graph sizes.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rapidrank::{rank_cpu, AdjacencyTable, FlatAdjacency, NodeId, RankConfig};
use std::hint::black_box;

/// Generate a scale-free-ish graph (simple LCG for reproducibility)
fn generate_arcs(num_nodes: u32, arcs_per_node: u32) -> Vec<(u32, u32)> {
    let mut arcs = Vec::new();
    let mut state = 12345_u64;

    for node in 0..num_nodes {
        for _ in 0..arcs_per_node {
            state = state.wrapping_mul(1_103_515_245).wrapping_add(12345);
            let target = (state % u64::from(num_nodes)) as u32;
            if target != node {
                arcs.push((node, target));
            }
        }
    }
    arcs
}

fn build_table(arcs: &[(u32, u32)]) -> AdjacencyTable {
    let mut table = AdjacencyTable::new();
    for &(from, to) in arcs {
        table.add_arc(NodeId(from), NodeId(to));
    }
    table
}

fn bench_table_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("table_construction");

    for size in [100, 1000, 10_000] {
        let arcs = generate_arcs(size, 4);
        group.bench_with_input(BenchmarkId::new("add_arc", size), &arcs, |b, arcs| {
            b.iter(|| black_box(build_table(black_box(arcs))));
        });
    }

    group.finish();
}

fn bench_flatten(c: &mut Criterion) {
    let mut group = c.benchmark_group("flatten");

    for size in [1000, 10_000] {
        let table = build_table(&generate_arcs(size, 4));
        group.bench_with_input(BenchmarkId::new("from_table", size), &table, |b, table| {
            b.iter(|| black_box(FlatAdjacency::from_table(black_box(table))));
        });
    }

    group.finish();
}

fn bench_cpu_rank(c: &mut Criterion) {
    let mut group = c.benchmark_group("cpu_rank");
    group.sample_size(20);

    let config = RankConfig {
        convergence: 1e-8,
        max_iterations: 200,
        ..RankConfig::default()
    };
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("runtime");

    for size in [1000, 10_000] {
        let table = build_table(&generate_arcs(size, 4));
        group.bench_with_input(BenchmarkId::new("converge", size), &table, |b, table| {
            b.iter(|| {
                let solution = runtime.block_on(rank_cpu(table, &config)).expect("rank");
                black_box(solution)
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_table_construction,
    bench_flatten,
    bench_cpu_rank
);
criterion_main!(benches);
