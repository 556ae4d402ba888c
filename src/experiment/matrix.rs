//! Experiment matrix storage and cell enumeration
//!
//! Enumeration is kept apart from execution: the functions here only decide
//! which descriptors a sweep visits and in what order.

use super::{ExperimentResult, Sweep};
use crate::config::ScalingVariant;
use crate::query::QueryDescriptor;
use crate::seed::SeedPoint;
use crate::store::ConnectionRule;
use crate::Result;
use serde::{Deserialize, Serialize};

/// One cell waiting to be executed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedCell {
    /// Sweep the cell belongs to
    pub sweep: Sweep,
    /// Query to run
    pub descriptor: QueryDescriptor,
}

/// Single-seed sweep cells: every seed, then every depth, in the given order.
///
/// Yields `seeds.len() * depths.len()` cells.
pub fn single_seed_cells<'a>(
    seeds: &'a [SeedPoint],
    depths: &'a [u32],
    rule: &'a ConnectionRule,
) -> impl Iterator<Item = Result<PlannedCell>> + 'a {
    seeds.iter().flat_map(move |seed| {
        depths.iter().map(move |&depth| {
            QueryDescriptor::new(vec![seed.id()], depth, rule.clone()).map(|descriptor| {
                PlannedCell {
                    sweep: Sweep::SingleSeed,
                    descriptor,
                }
            })
        })
    })
}

/// Seed-scaling sweep cells at a fixed depth.
///
/// [`ScalingVariant::FixedFullSet`] yields one cell with every seed;
/// [`ScalingVariant::IncrementalPrefix`] yields one cell per prefix length
/// `1..=seeds.len()`, in increasing order.
pub fn scaling_cells<'a>(
    seeds: &'a [SeedPoint],
    depth: u32,
    variant: ScalingVariant,
    rule: &'a ConnectionRule,
) -> impl Iterator<Item = Result<PlannedCell>> + 'a {
    let sizes = match variant {
        ScalingVariant::FixedFullSet => seeds.len()..=seeds.len(),
        ScalingVariant::IncrementalPrefix => 1..=seeds.len(),
    };
    sizes.filter(|&size| size > 0).map(move |size| {
        let ids = seeds[..size].iter().map(SeedPoint::id).collect();
        QueryDescriptor::new(ids, depth, rule.clone()).map(|descriptor| PlannedCell {
            sweep: Sweep::SeedScaling,
            descriptor,
        })
    })
}

/// Results of both sweeps. Append-only while the run is in progress.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperimentMatrix {
    single_seed_sweep: Vec<ExperimentResult>,
    seed_scaling_sweep: Vec<ExperimentResult>,
}

impl ExperimentMatrix {
    /// Create an empty matrix.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a result to the given sweep.
    pub fn push(&mut self, sweep: Sweep, result: ExperimentResult) {
        match sweep {
            Sweep::SingleSeed => self.single_seed_sweep.push(result),
            Sweep::SeedScaling => self.seed_scaling_sweep.push(result),
        }
    }

    /// Single-seed sweep results, in execution order (seed-major).
    #[must_use]
    pub fn single_seed_sweep(&self) -> &[ExperimentResult] {
        &self.single_seed_sweep
    }

    /// Seed-scaling sweep results, in execution order.
    #[must_use]
    pub fn seed_scaling_sweep(&self) -> &[ExperimentResult] {
        &self.seed_scaling_sweep
    }

    /// Total number of successful results.
    #[must_use]
    pub fn len(&self) -> usize {
        self.single_seed_sweep.len() + self.seed_scaling_sweep.len()
    }

    /// Whether no result has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
