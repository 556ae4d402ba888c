//! # reach-bench: Bounded Reachability Benchmark Harness
//!
//! Measures how bounded-depth graph reachability queries behave as the depth
//! limit grows and as the seed set grows. Traversal itself is delegated to
//! the store through [`store::ReachabilityStore`]; this crate owns the
//! experiment design around it:
//!
//! - **Seed selection**: random sample or explicit ids ([`seed`])
//! - **Sampled timing**: repeated cold runs reduced to a median ([`query`])
//! - **Structural counts**: nodes and edges reached, measured untimed ([`metrics`])
//! - **Experiment matrix**: depth gradient x seeds, plus seed-set scaling ([`experiment`])
//! - **Aggregation and reporting**: per-depth statistics, scalability views,
//!   one JSON report ([`stats`], [`report`])
//!
//! ## Example Usage
//!
//! ```rust
//! use reach_bench::config::HarnessConfig;
//! use reach_bench::experiment::ExperimentRunner;
//! use reach_bench::report::NoopObserver;
//! use reach_bench::store::MemoryGraphStore;
//!
//! # fn main() -> reach_bench::Result<()> {
//! let store = MemoryGraphStore::builder()
//!     .edges([(1, 2), (2, 3), (3, 4)])
//!     .vertex(1, "Ada Lovelace")
//!     .vertex(2, "Alan Turing")
//!     .build()?;
//!
//! let config = HarnessConfig::builder()
//!     .seed_count(2)
//!     .depths([0, 1, 3])
//!     .iterations_per_cell(3)
//!     .random_seed(7)
//!     .build()?;
//!
//! let report = ExperimentRunner::new(&store, config)?.run(&mut NoopObserver)?;
//! assert_eq!(report.matrix().single_seed_sweep().len(), 6);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod config;
pub mod error;
pub mod experiment;
pub mod metrics;
pub mod query;
pub mod report;
pub mod seed;
pub mod stats;
pub mod storage;
pub mod store;

pub use error::{Error, FailureKind, Result};
