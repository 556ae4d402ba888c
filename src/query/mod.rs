//! Query descriptors and timed execution
//!
//! A [`QueryDescriptor`] is an immutable value naming one bounded
//! reachability query: seed set, max depth, connection rule. Descriptors are
//! built by the experiment runner and consumed by the
//! [`SampledExecutor`] (timed) and the
//! [`MetricsCollector`](crate::metrics::MetricsCollector) (untimed).

mod executor;

pub use executor::{median, LatencySample, SampledExecutor};

use crate::store::{ConnectionRule, VertexId};
use crate::{Error, Result};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One bounded reachability query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryDescriptor {
    seed_ids: Vec<VertexId>,
    max_depth: u32,
    connection_rule: ConnectionRule,
}

impl QueryDescriptor {
    /// Create a descriptor.
    ///
    /// # Errors
    /// Returns error if `seed_ids` is empty or contains duplicates
    pub fn new(seed_ids: Vec<VertexId>, max_depth: u32, rule: ConnectionRule) -> Result<Self> {
        if seed_ids.is_empty() {
            return Err(Error::InvalidInput(
                "Query descriptor needs at least one seed".to_string(),
            ));
        }
        let mut seen = FxHashSet::default();
        if let Some(dup) = seed_ids.iter().find(|id| !seen.insert(**id)) {
            return Err(Error::InvalidInput(format!(
                "Duplicate seed id in descriptor: {dup}"
            )));
        }
        Ok(Self {
            seed_ids,
            max_depth,
            connection_rule: rule,
        })
    }

    /// Seed ids, in order.
    #[must_use]
    pub fn seed_ids(&self) -> &[VertexId] {
        &self.seed_ids
    }

    /// Number of seeds (the seed-scaling sweep's independent variable).
    #[must_use]
    pub fn seed_count(&self) -> usize {
        self.seed_ids.len()
    }

    /// Hop ceiling.
    #[must_use]
    pub const fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Connection rule.
    #[must_use]
    pub const fn connection_rule(&self) -> &ConnectionRule {
        &self.connection_rule
    }
}

impl fmt::Display for QueryDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.seed_ids.as_slice() {
            [single] => write!(f, "seed={single}")?,
            many => write!(f, "seeds={}", many.len())?,
        }
        write!(
            f,
            " maxDepth={} {}->{}",
            self.max_depth, self.connection_rule.connect_from, self.connection_rule.connect_to
        )
    }
}
