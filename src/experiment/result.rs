//! Experiment Result - outcome of one experiment cell

use crate::error::FailureKind;
use crate::metrics::StructuralCounts;
use crate::query::{median, QueryDescriptor};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which sweep a cell belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Sweep {
    /// One seed, varying max depth
    SingleSeed,
    /// Growing seed set, fixed max depth
    SeedScaling,
}

impl fmt::Display for Sweep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SingleSeed => f.write_str("single-seed"),
            Self::SeedScaling => f.write_str("seed-scaling"),
        }
    }
}

/// Experiment Result records the timing and structure of one cell.
///
/// `median_latency` is always the median of `raw_latencies`, and the counts come
/// from a separate untimed query, never from the timed iterations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperimentResult {
    #[serde(flatten)]
    descriptor: QueryDescriptor,
    num_start_values: usize,
    median_latency: f64,
    raw_latencies: Vec<f64>,
    node_count: usize,
    edge_count: usize,
}

impl ExperimentResult {
    /// Create a result from raw per-iteration latencies (milliseconds).
    ///
    /// # Errors
    /// Returns error if `latencies` is empty
    pub fn new(
        descriptor: QueryDescriptor,
        latencies: Vec<f64>,
        counts: StructuralCounts,
    ) -> Result<Self> {
        let median_latency = median(&latencies).ok_or_else(|| {
            Error::InvalidInput("an experiment result needs at least one latency".to_string())
        })?;
        Ok(Self {
            num_start_values: descriptor.seed_count(),
            descriptor,
            median_latency,
            raw_latencies: latencies,
            node_count: counts.node_count,
            edge_count: counts.edge_count,
        })
    }

    /// The query this cell ran.
    #[must_use]
    pub const fn descriptor(&self) -> &QueryDescriptor {
        &self.descriptor
    }

    /// Seed-set size.
    #[must_use]
    pub const fn num_start_values(&self) -> usize {
        self.num_start_values
    }

    /// Max depth of the query.
    #[must_use]
    pub const fn max_depth(&self) -> u32 {
        self.descriptor.max_depth()
    }

    /// Median latency in milliseconds.
    #[must_use]
    pub const fn median_latency(&self) -> f64 {
        self.median_latency
    }

    /// Per-iteration latencies in milliseconds, in execution order.
    #[must_use]
    pub fn raw_latencies(&self) -> &[f64] {
        &self.raw_latencies
    }

    /// Distinct destination vertices.
    #[must_use]
    pub const fn node_count(&self) -> usize {
        self.node_count
    }

    /// Traversed edge records.
    #[must_use]
    pub const fn edge_count(&self) -> usize {
        self.edge_count
    }
}

/// A cell whose query failed. Kept apart from successful results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailedCell {
    /// Sweep the cell belonged to
    pub sweep: Sweep,
    /// The query that failed
    pub descriptor: QueryDescriptor,
    /// Failure classification
    pub kind: FailureKind,
    /// Error message from the store
    pub message: String,
}
