//! Statistics aggregation over a finished experiment matrix
//!
//! Depth statistics are computed over the per-seed *median* latencies of the
//! single-seed sweep, never over raw iteration samples. Scaling-sweep rows are
//! reported one per seed-set size with no cross-size averaging.

use crate::experiment::{ExperimentMatrix, ExperimentResult};
use crate::query::median;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Summary of all single-seed cells sharing one max depth
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepthSummary {
    /// Max depth of the group
    pub max_depth: u32,
    /// Number of contributing cells (one per seed that succeeded)
    pub cell_count: usize,
    /// Mean of per-seed median latencies (ms)
    pub avg_latency: f64,
    /// Median of per-seed median latencies (ms)
    pub median_latency: f64,
    /// Smallest per-seed median latency (ms)
    pub min_latency: f64,
    /// Largest per-seed median latency (ms)
    pub max_latency: f64,
    /// Mean distinct destination count
    pub avg_node_count: f64,
    /// Mean traversed edge count
    pub avg_edge_count: f64,
}

/// One seed-scaling row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedCountSummary {
    /// Seed-set size
    pub num_start_values: usize,
    /// Max depth used for the row
    pub max_depth: u32,
    /// Median latency of the cell (ms)
    pub median_latency: f64,
    /// Distinct destination count
    pub node_count: usize,
    /// Traversed edge count
    pub edge_count: usize,
}

/// Latency-vs-depth point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepthLatency {
    /// Independent variable
    pub max_depth: u32,
    /// Mean of per-seed median latencies (ms)
    pub avg_latency: f64,
}

/// Latency-vs-seed-count point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedCountLatency {
    /// Independent variable
    pub num_start_values: usize,
    /// Median latency of the cell (ms)
    pub median_latency: f64,
}

/// Everything derived from the matrix
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Aggregates {
    /// Per-depth summaries, ascending depth
    pub by_depth: Vec<DepthSummary>,
    /// Per-seed-count rows, ascending size
    pub by_seed_count: Vec<SeedCountSummary>,
    /// Scalability view: latency against max depth
    pub latency_vs_depth: Vec<DepthLatency>,
    /// Scalability view: latency against seed-set size
    pub latency_vs_seed_count: Vec<SeedCountLatency>,
}

/// Groups raw results and computes summary statistics.
pub struct StatisticsAggregator;

impl StatisticsAggregator {
    /// Aggregate a finished matrix.
    #[must_use]
    pub fn aggregate(matrix: &ExperimentMatrix) -> Aggregates {
        let by_depth = Self::summarize_depths(matrix.single_seed_sweep());
        let by_seed_count = Self::summarize_seed_counts(matrix.seed_scaling_sweep());

        let latency_vs_depth = by_depth
            .iter()
            .map(|s| DepthLatency {
                max_depth: s.max_depth,
                avg_latency: s.avg_latency,
            })
            .collect();
        let latency_vs_seed_count = by_seed_count
            .iter()
            .map(|s| SeedCountLatency {
                num_start_values: s.num_start_values,
                median_latency: s.median_latency,
            })
            .collect();

        Aggregates {
            by_depth,
            by_seed_count,
            latency_vs_depth,
            latency_vs_seed_count,
        }
    }

    fn summarize_depths(results: &[ExperimentResult]) -> Vec<DepthSummary> {
        let mut groups: BTreeMap<u32, Vec<&ExperimentResult>> = BTreeMap::new();
        for result in results {
            groups.entry(result.max_depth()).or_default().push(result);
        }

        groups
            .into_iter()
            .filter_map(|(max_depth, group)| {
                let medians: Vec<f64> = group.iter().map(|r| r.median_latency()).collect();
                let nodes: Vec<f64> = group.iter().map(|r| as_f64(r.node_count())).collect();
                let edges: Vec<f64> = group.iter().map(|r| as_f64(r.edge_count())).collect();
                Some(DepthSummary {
                    max_depth,
                    cell_count: group.len(),
                    avg_latency: mean(&medians)?,
                    median_latency: median(&medians)?,
                    min_latency: medians.iter().copied().fold(f64::INFINITY, f64::min),
                    max_latency: medians.iter().copied().fold(f64::NEG_INFINITY, f64::max),
                    avg_node_count: mean(&nodes)?,
                    avg_edge_count: mean(&edges)?,
                })
            })
            .collect()
    }

    fn summarize_seed_counts(results: &[ExperimentResult]) -> Vec<SeedCountSummary> {
        let mut rows: Vec<SeedCountSummary> = results
            .iter()
            .map(|r| SeedCountSummary {
                num_start_values: r.num_start_values(),
                max_depth: r.max_depth(),
                median_latency: r.median_latency(),
                node_count: r.node_count(),
                edge_count: r.edge_count(),
            })
            .collect();
        rows.sort_by_key(|row| row.num_start_values);
        rows
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / as_f64(values.len()))
}

#[allow(clippy::cast_precision_loss)]
fn as_f64(n: usize) -> f64 {
    n as f64
}
