//! Benchmarks for NSW construction and search.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::prelude::*;
use strata::nsw::{GraphNode, NavigableSmallWorld};

fn random_points(n: usize, seed: u64) -> Vec<GraphNode> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|i| {
            GraphNode::new(
                i as u32,
                [rng.random_range(-100.0..100.0), rng.random_range(-100.0..100.0)],
            )
        })
        .collect()
}

fn build(points: &[GraphNode], k: usize) -> NavigableSmallWorld {
    let mut nsw = NavigableSmallWorld::with_k(k).expect("k >= 1");
    for &p in points {
        nsw.add_node(p);
    }
    nsw
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("nsw_build");
    group.sample_size(20);

    for n in [500, 2_000] {
        let points = random_points(n, 42);
        group.throughput(Throughput::Elements(n as u64));
        for k in [2, 8] {
            group.bench_with_input(BenchmarkId::new(format!("k{k}"), n), &points, |bench, points| {
                bench.iter(|| black_box(build(points, k).len()))
            });
        }
    }

    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("nsw_search");
    let points = random_points(5_000, 42);
    let queries = random_points(100, 7);

    for k in [2, 8] {
        let nsw = build(&points, k);
        group.throughput(Throughput::Elements(queries.len() as u64));
        group.bench_with_input(BenchmarkId::new("top10", k), &queries, |bench, queries| {
            bench.iter(|| {
                for q in queries {
                    black_box(nsw.search_similar_nodes(q.vector, 10));
                }
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_build, bench_search);
criterion_main!(benches);
