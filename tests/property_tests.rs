//! Property-based tests for reach-bench
//!
//! - Median invariants over arbitrary latency samples
//! - Structural count invariants over arbitrary graphs
//! - Run with ProptestConfig::with_cases(100)

use proptest::prelude::*;
use reach_bench::metrics::StructuralCounts;
use reach_bench::query::median;
use reach_bench::store::{ConnectionRule, MemoryGraphStore, ReachabilityStore};
use rustc_hash::FxHashSet;

// ============================================================================
// Property Test Generators (Strategies)
// ============================================================================

/// Non-empty latency samples in milliseconds
fn arb_latencies() -> impl Strategy<Value = Vec<f64>> {
    proptest::collection::vec(0.0f64..10_000.0, 1..50)
}

/// Small random edge lists so cycles and shared destinations are common
fn arb_edges() -> impl Strategy<Value = Vec<(i64, i64)>> {
    proptest::collection::vec((0i64..20, 0i64..20), 0..60)
}

fn store_from(edges: &[(i64, i64)]) -> MemoryGraphStore {
    let mut builder = MemoryGraphStore::builder().edges(edges.iter().copied());
    for id in 0..20 {
        builder = builder.vertex(id, id.to_string());
    }
    builder.build().unwrap()
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property: the median lies between the sample minimum and maximum
    #[test]
    fn prop_median_within_bounds(samples in arb_latencies()) {
        let m = median(&samples).unwrap();
        let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
        let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        prop_assert!(m >= min && m <= max);
    }

    /// Property: odd-length samples have an actual element as median
    #[test]
    fn prop_odd_median_is_sample_element(
        mut samples in arb_latencies().prop_filter("odd length", |v| v.len() % 2 == 1)
    ) {
        let m = median(&samples).unwrap();
        prop_assert!(samples.contains(&m));
        samples.sort_by(f64::total_cmp);
        prop_assert_eq!(m, samples[samples.len() / 2]);
    }

    /// Property: the median does not depend on sample order
    #[test]
    fn prop_median_order_independent(samples in arb_latencies()) {
        let mut reversed = samples.clone();
        reversed.reverse();
        prop_assert_eq!(median(&samples), median(&reversed));
    }

    /// Property: distinct destinations never exceed traversed edges
    #[test]
    fn prop_node_count_at_most_edge_count(
        edges in arb_edges(),
        seed in 0i64..20,
        depth in 0u32..8,
    ) {
        let store = store_from(&edges);
        let rows = store
            .bounded_reachability(&[seed], &ConnectionRule::default(), depth)
            .unwrap();
        let counts = StructuralCounts::from_rows(&rows);
        prop_assert!(counts.node_count <= counts.edge_count);
        prop_assert_eq!(counts.edge_count, rows.len());
    }

    /// Property: hop numbers stay within the depth bound
    #[test]
    fn prop_rows_respect_depth_bound(
        edges in arb_edges(),
        seed in 0i64..20,
        depth in 0u32..8,
    ) {
        let store = store_from(&edges);
        let rows = store
            .bounded_reachability(&[seed], &ConnectionRule::default(), depth)
            .unwrap();
        prop_assert!(rows.iter().all(|r| r.depth <= depth));
    }

    /// Property: raising the depth limit never shrinks the traversal
    #[test]
    fn prop_edge_count_monotonic_in_depth(
        edges in arb_edges(),
        seed in 0i64..20,
        depth in 0u32..8,
    ) {
        let store = store_from(&edges);
        let rule = ConnectionRule::default();
        let shallow = store.bounded_reachability(&[seed], &rule, depth).unwrap();
        let deep = store.bounded_reachability(&[seed], &rule, depth + 1).unwrap();
        prop_assert!(shallow.len() <= deep.len());
    }

    /// Property: a record is reported at most once per seed and root
    #[test]
    fn prop_no_duplicate_records_for_single_root(
        edges in arb_edges(),
        seed in 0i64..20,
        depth in 0u32..8,
    ) {
        // keep one outgoing record per vertex so each seed has at most one root
        let mut seen_sources = FxHashSet::default();
        let unique_roots: Vec<_> = edges
            .iter()
            .copied()
            .filter(|(from, _)| seen_sources.insert(*from))
            .collect();
        let store = store_from(&unique_roots);
        let rows = store
            .bounded_reachability(&[seed], &ConnectionRule::default(), depth)
            .unwrap();
        let mut records = FxHashSet::default();
        prop_assert!(rows.iter().all(|r| records.insert(r.record.row)));
    }
}
