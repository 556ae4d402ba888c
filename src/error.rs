//! Error types for reach-bench
//!
//! Two classes of failure matter to a run: fatal ones that stop the harness
//! before or between phases, and per-cell query failures that are recorded in
//! the report while the rest of the matrix keeps going.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// reach-bench error types
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration rejected at startup, before seed selection
    #[error("Invalid configuration: {0}\nFix the config file or CLI flags and re-run")]
    InvalidConfiguration(String),

    /// No seed vertex could be resolved, so no experiment can run
    #[error("No seeds resolved: none of the {requested} requested seed ids exist in the store")]
    NoSeedsResolved {
        /// Number of ids the caller asked for
        requested: usize,
    },

    /// Store connection is down or timed out
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// Store accepted the query but failed to answer it
    #[error("Query failed: {0}")]
    QueryFailure(String),

    /// Malformed argument passed to a library call
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Storage error (Parquet/Arrow loading)
    #[error("Storage error: {0}")]
    StorageError(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Arrow error
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Failure kind if this error only invalidates the current experiment cell.
    ///
    /// Returns `None` for errors that must abort the whole run.
    #[must_use]
    pub const fn cell_failure_kind(&self) -> Option<FailureKind> {
        match self {
            Self::StoreUnavailable(_) => Some(FailureKind::StoreUnavailable),
            Self::QueryFailure(_) => Some(FailureKind::QueryFailure),
            _ => None,
        }
    }

    /// Whether the runner may record this error against one cell and continue.
    #[must_use]
    pub const fn is_cell_recoverable(&self) -> bool {
        self.cell_failure_kind().is_some()
    }
}

/// Kind of a per-cell failure, as recorded in the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureKind {
    /// Connectivity lost or timed out
    StoreUnavailable,
    /// Query rejected or errored inside the store
    QueryFailure,
}
