//! Structural result accounting, computed outside the timed path

use crate::query::QueryDescriptor;
use crate::store::{ReachRow, ReachabilityStore};
use crate::Result;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// Structural size of one traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuralCounts {
    /// Distinct destination vertices across all returned edge records
    pub node_count: usize,
    /// Returned edge records, summed over every seed
    pub edge_count: usize,
}

impl StructuralCounts {
    /// Count edges and distinct destinations in a set of traversal rows.
    #[must_use]
    pub fn from_rows(rows: &[ReachRow]) -> Self {
        let destinations: FxHashSet<_> = rows.iter().map(|row| row.record.target).collect();
        Self {
            node_count: destinations.len(),
            edge_count: rows.len(),
        }
    }
}

/// Issues a separate, untimed query pass to count what a descriptor reaches.
pub struct MetricsCollector<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S: ReachabilityStore + ?Sized> MetricsCollector<'a, S> {
    /// Create a collector over a store.
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Run the descriptor once and count its result.
    ///
    /// # Errors
    /// Returns any store error raised by the query
    pub fn measure(&self, descriptor: &QueryDescriptor) -> Result<StructuralCounts> {
        let rows = self.store.bounded_reachability(
            descriptor.seed_ids(),
            descriptor.connection_rule(),
            descriptor.max_depth(),
        )?;
        Ok(StructuralCounts::from_rows(&rows))
    }
}
