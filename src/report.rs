//! Report assembly and progress output
//!
//! The [`Report`] is the only artifact a run persists. Progress lines are a
//! side channel delivered through [`ProgressObserver`] at phase and cell
//! boundaries, never from inside a timed region.

use crate::config::HarnessConfig;
use crate::experiment::{ExperimentMatrix, ExperimentResult, FailedCell, RunPhase, Sweep};
use crate::seed::{SeedPoint, SeedResolutionWarning};
use crate::stats::Aggregates;
use crate::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// File name prefix of reports written without an explicit path
pub const REPORT_FILE_PREFIX: &str = "reach_bench_results_";

/// Run-level facts recorded alongside the results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunMetadata {
    /// Resolved seeds, in selection order
    pub seed_points: Vec<SeedPoint>,
    /// When the run started
    pub timestamp: DateTime<Utc>,
    /// Cells attempted across all phases, failed ones included
    pub total_experiment_count: usize,
    /// Timed query iterations executed by successful cells
    pub total_queries_run: usize,
    /// Timed repetitions per cell
    pub iterations_per_cell: usize,
    /// Configuration the run used
    pub config: HarnessConfig,
    /// Explicit seed ids that did not resolve
    pub seed_warnings: Vec<SeedResolutionWarning>,
    /// Cells whose query failed
    pub failed_cells: Vec<FailedCell>,
}

/// Final benchmark report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    metadata: RunMetadata,
    matrix: ExperimentMatrix,
    aggregates: Aggregates,
}

impl Report {
    /// Run metadata.
    #[must_use]
    pub const fn metadata(&self) -> &RunMetadata {
        &self.metadata
    }

    /// Raw results of both sweeps.
    #[must_use]
    pub const fn matrix(&self) -> &ExperimentMatrix {
        &self.matrix
    }

    /// Summary statistics.
    #[must_use]
    pub const fn aggregates(&self) -> &Aggregates {
        &self.aggregates
    }

    /// Cells that failed, kept apart from the successful results.
    #[must_use]
    pub fn failed_cells(&self) -> &[FailedCell] {
        &self.metadata.failed_cells
    }

    /// Load a report previously written with [`ReportEmitter::write_json`].
    ///
    /// # Errors
    /// Returns error if the file cannot be read or is not a report
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path.as_ref())?;
        ReportEmitter::read_json(std::io::BufReader::new(file))
    }
}

/// Builds and renders reports.
pub struct ReportEmitter;

impl ReportEmitter {
    /// Assemble the final report.
    #[must_use]
    pub const fn emit(
        metadata: RunMetadata,
        matrix: ExperimentMatrix,
        aggregates: Aggregates,
    ) -> Report {
        Report {
            metadata,
            matrix,
            aggregates,
        }
    }

    /// Write the report as pretty-printed JSON.
    ///
    /// # Errors
    /// Returns error if serialization or the write fails
    pub fn write_json<W: Write>(report: &Report, mut writer: W) -> Result<()> {
        serde_json::to_writer_pretty(&mut writer, report)?;
        writeln!(writer)?;
        Ok(())
    }

    /// Parse a report from JSON.
    ///
    /// # Errors
    /// Returns error if the input is not a serialized report
    pub fn read_json<R: Read>(reader: R) -> Result<Report> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Timestamped report path inside `dir`.
    ///
    /// Names sort chronologically, so the newest report is the last one.
    #[must_use]
    pub fn default_path(dir: &Path, report: &Report) -> PathBuf {
        let stamp = report.metadata.timestamp.format("%Y%m%dT%H%M%SZ");
        dir.join(format!("{REPORT_FILE_PREFIX}{stamp}.json"))
    }

    /// Most recent timestamped report in `dir`, if any.
    ///
    /// # Errors
    /// Returns error if the directory cannot be listed
    pub fn latest_in(dir: &Path) -> Result<Option<PathBuf>> {
        let mut latest: Option<PathBuf> = None;
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            let is_report = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| {
                    name.starts_with(REPORT_FILE_PREFIX)
                        && Path::new(name).extension().is_some_and(|ext| ext == "json")
                });
            if is_report && latest.as_ref().map_or(true, |current| path > *current) {
                latest = Some(path);
            }
        }
        Ok(latest)
    }

    /// Write the human-readable statistics summary.
    ///
    /// # Errors
    /// Returns error if the write fails
    pub fn write_summary<W: Write>(report: &Report, mut w: W) -> Result<()> {
        let metadata = report.metadata();
        let aggregates = report.aggregates();

        writeln!(w, "\n=== STATISTICS SUMMARY ===")?;
        writeln!(w, "\nTest Configuration:")?;
        writeln!(w, "  Timestamp: {}", metadata.timestamp.to_rfc3339())?;
        writeln!(w, "  Total tests: {}", metadata.total_experiment_count)?;
        writeln!(w, "  Start points: {}", metadata.seed_points.len())?;
        writeln!(w, "\n--- Single Start Value Tests ---")?;
        for s in &aggregates.by_depth {
            writeln!(w, "\nmaxDepth={} ({} cells):", s.max_depth, s.cell_count)?;
            writeln!(
                w,
                "  Latency - Avg: {:.2}ms, Median: {:.2}ms, Min: {:.2}ms, Max: {:.2}ms",
                s.avg_latency, s.median_latency, s.min_latency, s.max_latency
            )?;
            writeln!(
                w,
                "  Avg Edges: {:.0}, Avg Nodes: {:.0}",
                s.avg_edge_count, s.avg_node_count
            )?;
        }

        if !aggregates.by_seed_count.is_empty() {
            writeln!(
                w,
                "\n--- Multiple Start Value Tests (maxDepth={}) ---",
                metadata.config.scaling_depth
            )?;
            for row in &aggregates.by_seed_count {
                writeln!(
                    w,
                    "  {} start value(s): {:.2}ms ({} edges, {} nodes)",
                    row.num_start_values, row.median_latency, row.edge_count, row.node_count
                )?;
            }
        }

        writeln!(w, "\n--- Scalability Analysis ---")?;
        writeln!(w, "\nLatency vs maxDepth:")?;
        for point in &aggregates.latency_vs_depth {
            writeln!(
                w,
                "  maxDepth {:>2}: {:>10.2}ms",
                point.max_depth, point.avg_latency
            )?;
        }
        if !aggregates.latency_vs_seed_count.is_empty() {
            writeln!(
                w,
                "\nLatency vs Number of Start Values (maxDepth={}):",
                metadata.config.scaling_depth
            )?;
            for point in &aggregates.latency_vs_seed_count {
                writeln!(
                    w,
                    "  {:>2} starts: {:>10.2}ms",
                    point.num_start_values, point.median_latency
                )?;
            }
        }

        if !metadata.seed_warnings.is_empty() {
            writeln!(w, "\nSeed warnings: {}", metadata.seed_warnings.len())?;
            for warning in &metadata.seed_warnings {
                writeln!(w, "  {}", warning.message)?;
            }
        }
        if !metadata.failed_cells.is_empty() {
            writeln!(w, "\nFailed cells: {}", metadata.failed_cells.len())?;
            for failure in &metadata.failed_cells {
                writeln!(
                    w,
                    "  [{}] {}: {}",
                    failure.sweep, failure.descriptor, failure.message
                )?;
            }
        }

        writeln!(w, "\nTotal tests executed: {}", metadata.total_experiment_count)?;
        writeln!(w, "Total queries run: {}", metadata.total_queries_run)?;
        Ok(())
    }

    /// Render the statistics summary to a string.
    #[must_use]
    pub fn render_summary(report: &Report) -> String {
        let mut buf = Vec::new();
        if let Err(err) = Self::write_summary(report, &mut buf) {
            tracing::debug!(error = %err, "summary rendering stopped early");
        }
        String::from_utf8_lossy(&buf).into_owned()
    }
}

/// Receives progress notifications at phase and cell boundaries.
///
/// All methods default to doing nothing.
pub trait ProgressObserver {
    /// A phase is starting.
    fn phase_started(&mut self, _phase: RunPhase) {}

    /// A seed was resolved.
    fn seed_selected(&mut self, _seed: &SeedPoint) {}

    /// A cell finished successfully.
    fn cell_completed(&mut self, _sweep: Sweep, _result: &ExperimentResult) {}

    /// A cell's query failed.
    fn cell_failed(&mut self, _failure: &FailedCell) {}
}

/// Observer that ignores every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ProgressObserver for NoopObserver {}

/// Writes one human-readable line per phase and per cell.
#[derive(Debug)]
pub struct ConsoleProgress<W: Write> {
    out: W,
}

impl<W: Write> ConsoleProgress<W> {
    /// Create a progress writer over any sink (usually stdout).
    pub const fn new(out: W) -> Self {
        Self { out }
    }

    /// Recover the sink.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: std::fmt::Arguments<'_>) {
        if let Err(err) = writeln!(self.out, "{text}") {
            tracing::debug!(error = %err, "progress output failed");
        }
    }
}

impl<W: Write> ProgressObserver for ConsoleProgress<W> {
    fn phase_started(&mut self, phase: RunPhase) {
        self.line(format_args!("\n=== {phase} ==="));
    }

    fn seed_selected(&mut self, seed: &SeedPoint) {
        self.line(format_args!(
            "  Selected: {} ({})",
            seed.id(),
            seed.display_name()
        ));
    }

    fn cell_completed(&mut self, _sweep: Sweep, result: &ExperimentResult) {
        self.line(format_args!(
            "  {}: {:.2}ms ({} edges, {} nodes)",
            result.descriptor(),
            result.median_latency(),
            result.edge_count(),
            result.node_count()
        ));
    }

    fn cell_failed(&mut self, failure: &FailedCell) {
        self.line(format_args!(
            "  {}: FAILED ({:?}) {}",
            failure.descriptor, failure.kind, failure.message
        ));
    }
}
