//! Experiment runner - drives a run through its phases
//!
//! Phases run strictly in order and are never re-entered:
//!
//! ```text
//! SeedSelection -> SingleSeedSweep -> SeedScalingSweep (optional) -> Aggregation -> Report
//! ```
//!
//! Exactly one query is in flight at any time. Concurrent queries would
//! contend inside the store and distort the latency figures.

use super::{
    scaling_cells, single_seed_cells, ExperimentMatrix, ExperimentResult, FailedCell, PlannedCell,
    Sweep,
};
use crate::config::HarnessConfig;
use crate::metrics::MetricsCollector;
use crate::query::SampledExecutor;
use crate::report::{ProgressObserver, Report, ReportEmitter, RunMetadata};
use crate::seed::{SeedSelection, SeedSelector};
use crate::stats::StatisticsAggregator;
use crate::store::ReachabilityStore;
use crate::{Error, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Run phases, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunPhase {
    /// Resolving seed vertices
    SeedSelection,
    /// Every seed at every configured depth
    SingleSeedSweep,
    /// Growing seed sets at the scaling depth
    SeedScalingSweep,
    /// Computing summary statistics
    Aggregation,
    /// Assembling the final report
    Report,
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::SeedSelection => "Selecting seed points",
            Self::SingleSeedSweep => "Single seed tests (maxDepth gradient)",
            Self::SeedScalingSweep => "Seed set scaling tests",
            Self::Aggregation => "Aggregating statistics",
            Self::Report => "Building report",
        };
        f.write_str(label)
    }
}

/// Accumulates everything the final report needs while the run progresses.
///
/// Owned by a single run and passed through each phase; nothing is shared
/// across runs.
#[derive(Debug)]
pub struct RunAccumulator {
    metadata: RunMetadata,
    matrix: ExperimentMatrix,
}

impl RunAccumulator {
    /// Start accumulating for a run whose seeds are already resolved.
    #[must_use]
    pub fn new(config: &HarnessConfig, selection: SeedSelection) -> Self {
        Self {
            metadata: RunMetadata {
                seed_points: selection.seeds,
                timestamp: Utc::now(),
                total_experiment_count: 0,
                total_queries_run: 0,
                iterations_per_cell: config.iterations_per_cell,
                config: config.clone(),
                seed_warnings: selection.warnings,
                failed_cells: Vec::new(),
            },
            matrix: ExperimentMatrix::new(),
        }
    }

    /// Run metadata gathered so far.
    #[must_use]
    pub const fn metadata(&self) -> &RunMetadata {
        &self.metadata
    }

    /// Results gathered so far.
    #[must_use]
    pub const fn matrix(&self) -> &ExperimentMatrix {
        &self.matrix
    }

    /// Record a successful cell.
    pub fn record_result(&mut self, sweep: Sweep, result: ExperimentResult) {
        self.metadata.total_experiment_count += 1;
        self.metadata.total_queries_run += result.raw_latencies().len();
        self.matrix.push(sweep, result);
    }

    /// Record a failed cell.
    pub fn record_failure(&mut self, failure: FailedCell) {
        self.metadata.total_experiment_count += 1;
        self.metadata.failed_cells.push(failure);
    }

    /// Split into the finished metadata and matrix.
    #[must_use]
    pub fn finish(self) -> (RunMetadata, ExperimentMatrix) {
        (self.metadata, self.matrix)
    }
}

/// Orchestrates seed selection, both sweeps, aggregation and reporting.
pub struct ExperimentRunner<'a, S: ?Sized> {
    store: &'a S,
    config: HarnessConfig,
}

impl<'a, S: ReachabilityStore + ?Sized> ExperimentRunner<'a, S> {
    /// Create a runner. The config is validated before anything touches the store.
    ///
    /// # Errors
    /// Returns [`Error::InvalidConfiguration`] if the config is unusable
    pub fn new(store: &'a S, config: HarnessConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { store, config })
    }

    /// The configuration this runner uses.
    #[must_use]
    pub const fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Run the whole experiment matrix.
    ///
    /// Per-cell store failures are recorded in the report and the run
    /// continues. Anything else stops the run.
    ///
    /// # Errors
    /// - [`Error::NoSeedsResolved`] before any query runs
    /// - store errors raised during seed selection
    pub fn run(&self, observer: &mut dyn ProgressObserver) -> Result<Report> {
        let mut phase = PhaseTracker::default();

        phase.enter(RunPhase::SeedSelection, observer)?;
        let selection = SeedSelector::new(self.store).select(&self.config.seed_mode())?;
        tracing::info!(
            seeds = selection.seeds.len(),
            warnings = selection.warnings.len(),
            "seed selection complete"
        );
        for seed in &selection.seeds {
            observer.seed_selected(seed);
        }
        let mut acc = RunAccumulator::new(&self.config, selection);

        phase.enter(RunPhase::SingleSeedSweep, observer)?;
        let seeds = acc.metadata().seed_points.clone();
        let rule = &self.config.connection_rule;
        for cell in single_seed_cells(&seeds, &self.config.depths, rule) {
            self.run_cell(cell?, &mut acc, observer)?;
        }

        if self.config.scaling_sweep_enabled {
            phase.enter(RunPhase::SeedScalingSweep, observer)?;
            let cells = scaling_cells(
                &seeds,
                self.config.scaling_depth,
                self.config.scaling_sweep_variant,
                rule,
            );
            for cell in cells {
                self.run_cell(cell?, &mut acc, observer)?;
            }
        }

        phase.enter(RunPhase::Aggregation, observer)?;
        let aggregates = StatisticsAggregator::aggregate(acc.matrix());

        phase.enter(RunPhase::Report, observer)?;
        let (metadata, matrix) = acc.finish();
        if !metadata.failed_cells.is_empty() {
            tracing::warn!(
                failed = metadata.failed_cells.len(),
                total = metadata.total_experiment_count,
                "some experiment cells failed"
            );
        }
        Ok(ReportEmitter::emit(metadata, matrix, aggregates))
    }

    /// Execute one cell: timed pass, then untimed counting pass.
    ///
    /// Store failures are isolated to the cell; other errors propagate.
    fn run_cell(
        &self,
        cell: PlannedCell,
        acc: &mut RunAccumulator,
        observer: &mut dyn ProgressObserver,
    ) -> Result<()> {
        let PlannedCell { sweep, descriptor } = cell;

        let outcome = SampledExecutor::new(self.store)
            .run(&descriptor, self.config.iterations_per_cell)
            .and_then(|sample| {
                let counts = MetricsCollector::new(self.store).measure(&descriptor)?;
                ExperimentResult::new(descriptor.clone(), sample.raw_ms, counts)
            });

        match outcome {
            Ok(result) => {
                tracing::debug!(
                    %sweep,
                    %descriptor,
                    median_ms = result.median_latency(),
                    edges = result.edge_count(),
                    nodes = result.node_count(),
                    "cell complete"
                );
                observer.cell_completed(sweep, &result);
                acc.record_result(sweep, result);
                Ok(())
            }
            Err(err) => {
                let Some(kind) = err.cell_failure_kind() else {
                    return Err(err);
                };
                tracing::warn!(%sweep, %descriptor, error = %err, "cell failed, continuing");
                let failure = FailedCell {
                    sweep,
                    descriptor,
                    kind,
                    message: err.to_string(),
                };
                observer.cell_failed(&failure);
                acc.record_failure(failure);
                Ok(())
            }
        }
    }
}

/// Enforces forward-only phase transitions.
#[derive(Debug, Default)]
struct PhaseTracker {
    current: Option<RunPhase>,
}

impl PhaseTracker {
    fn enter(&mut self, next: RunPhase, observer: &mut dyn ProgressObserver) -> Result<()> {
        if let Some(current) = self.current {
            if next <= current {
                return Err(Error::Other(format!(
                    "phase {next:?} cannot follow {current:?}"
                )));
            }
        }
        tracing::info!(phase = ?next, "entering phase");
        observer.phase_started(next);
        self.current = Some(next);
        Ok(())
    }
}
