//! Experiment matrix: records, cell enumeration and the run state machine
//!
//! ## Schema Overview
//!
//! ```text
//! Report
//!   ├── RunMetadata (seed points, counts, warnings, failed cells)
//!   ├── ExperimentMatrix
//!   │     ├──< ExperimentResult (single-seed sweep: seed x depth)
//!   │     └──< ExperimentResult (seed-scaling sweep: by seed-set size)
//!   └── Aggregates
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use reach_bench::config::HarnessConfig;
//! use reach_bench::experiment::ExperimentRunner;
//! use reach_bench::report::NoopObserver;
//! use reach_bench::store::MemoryGraphStore;
//!
//! # fn main() -> reach_bench::Result<()> {
//! let store = MemoryGraphStore::builder()
//!     .edges([(1, 2), (2, 3), (3, 1)])
//!     .vertex(1, "a")
//!     .vertex(2, "b")
//!     .build()?;
//! let config = HarnessConfig::builder()
//!     .explicit_seed_ids([1, 2])
//!     .depths([0, 1])
//!     .iterations_per_cell(3)
//!     .build()?;
//!
//! let report = ExperimentRunner::new(&store, config)?.run(&mut NoopObserver)?;
//! assert_eq!(report.metadata().total_experiment_count, 5); // 2 x 2 + 1
//! # Ok(())
//! # }
//! ```

mod matrix;
mod result;
mod runner;

pub use matrix::{scaling_cells, single_seed_cells, ExperimentMatrix, PlannedCell};
pub use result::{ExperimentResult, FailedCell, Sweep};
pub use runner::{ExperimentRunner, RunAccumulator, RunPhase};
