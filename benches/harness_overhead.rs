//! Harness overhead benchmarks
//!
//! Measures what the harness itself costs around the store call:
//! - Median reduction over latency samples
//! - Statistics aggregation over a full matrix
//! - In-memory traversal at growing depth limits
//!
//! Run with: cargo bench --bench harness_overhead

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use reach_bench::experiment::{ExperimentMatrix, ExperimentResult, Sweep};
use reach_bench::metrics::StructuralCounts;
use reach_bench::query::{median, QueryDescriptor};
use reach_bench::stats::StatisticsAggregator;
use reach_bench::store::{ConnectionRule, MemoryGraphStore, ReachabilityStore};

/// Random-ish graph: every vertex links to three others
fn create_test_store(vertices: i64) -> MemoryGraphStore {
    let mut builder = MemoryGraphStore::builder();
    for id in 0..vertices {
        builder = builder
            .edge(id, (id * 7 + 1) % vertices)
            .edge(id, (id * 13 + 5) % vertices)
            .edge(id, (id + 1) % vertices)
            .vertex(id, format!("Person {id}"));
    }
    builder.build().unwrap()
}

#[allow(clippy::cast_precision_loss)]
fn create_test_matrix(seeds: i64, depths: &[u32], iterations: usize) -> ExperimentMatrix {
    let mut matrix = ExperimentMatrix::new();
    for seed in 0..seeds {
        for &depth in depths {
            let descriptor =
                QueryDescriptor::new(vec![seed], depth, ConnectionRule::default()).unwrap();
            let latencies = (0..iterations)
                .map(|i| (seed as f64).mul_add(0.5, i as f64))
                .collect();
            let counts = StructuralCounts {
                node_count: depth as usize * 3,
                edge_count: depth as usize * 4,
            };
            matrix.push(
                Sweep::SingleSeed,
                ExperimentResult::new(descriptor, latencies, counts).unwrap(),
            );
        }
    }
    matrix
}

fn bench_median(c: &mut Criterion) {
    let mut group = c.benchmark_group("median");

    for size in [5usize, 100, 10_000] {
        #[allow(clippy::cast_precision_loss)]
        let samples: Vec<f64> = (0..size).map(|i| ((i * 7919) % 1000) as f64).collect();
        group.bench_with_input(BenchmarkId::from_parameter(size), &samples, |b, samples| {
            b.iter(|| median(black_box(samples)));
        });
    }

    group.finish();
}

fn bench_aggregation(c: &mut Criterion) {
    let depths = [0, 1, 3, 5, 10, 30, 50];
    let mut group = c.benchmark_group("aggregate_matrix");

    for seeds in [10i64, 100] {
        let matrix = create_test_matrix(seeds, &depths, 5);
        group.bench_with_input(BenchmarkId::from_parameter(seeds), &matrix, |b, matrix| {
            b.iter(|| StatisticsAggregator::aggregate(black_box(matrix)));
        });
    }

    group.finish();
}

fn bench_traversal(c: &mut Criterion) {
    let store = create_test_store(10_000);
    let rule = ConnectionRule::default();
    let mut group = c.benchmark_group("bounded_reachability");

    for depth in [0u32, 1, 3, 5] {
        group.bench_with_input(BenchmarkId::new("depth", depth), &depth, |b, &depth| {
            b.iter(|| {
                store
                    .bounded_reachability(black_box(&[42]), &rule, depth)
                    .unwrap()
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_median, bench_aggregation, bench_traversal);
criterion_main!(benches);
