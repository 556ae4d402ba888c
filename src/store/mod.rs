//! External graph store boundary
//!
//! The harness never traverses a graph itself. Everything it measures goes
//! through [`ReachabilityStore::bounded_reachability`], a single query call
//! that returns every record reachable from a seed set within `max_depth`
//! hops along a [`ConnectionRule`].
//!
//! The store owns its connection/session lifecycle. The harness holds a
//! shared reference for the whole run and only issues read-only queries.
//!
//! # Example
//!
//! ```rust
//! use reach_bench::store::{ConnectionRule, MemoryGraphStore, ReachabilityStore};
//!
//! # fn main() -> reach_bench::Result<()> {
//! let store = MemoryGraphStore::builder()
//!     .edge_columns("person1_id", "person2_id")
//!     .vertex(1, "Ada Lovelace")
//!     .edge(1, 2)
//!     .edge(2, 3)
//!     .build()?;
//!
//! let rule = ConnectionRule::new("person2_id", "person1_id");
//! let rows = store.bounded_reachability(&[1], &rule, 0)?;
//! assert_eq!(rows.len(), 1); // 2 -> 3 at depth 0
//! # Ok(())
//! # }
//! ```

mod memory;

pub use memory::{MemoryGraphStore, MemoryGraphStoreBuilder};

use crate::seed::SeedPoint;
use crate::Result;
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// Vertex identifier as stored in the edge collection
pub type VertexId = i64;

/// Which record fields link one hop to the next.
///
/// A record matches at the next hop when its `connect_to` field equals the
/// `connect_from` field of a record reached at the previous hop.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionRule {
    /// Field whose value is followed outward
    pub connect_from: String,
    /// Field matched against the followed value
    pub connect_to: String,
}

impl ConnectionRule {
    /// Create a connection rule from the two field names.
    #[must_use]
    pub fn new(connect_from: impl Into<String>, connect_to: impl Into<String>) -> Self {
        Self {
            connect_from: connect_from.into(),
            connect_to: connect_to.into(),
        }
    }
}

impl Default for ConnectionRule {
    /// LDBC `person_knows_person`: follow `person2_id` into `person1_id`.
    fn default() -> Self {
        Self::new("person2_id", "person1_id")
    }
}

/// One edge record returned by a traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeRecord {
    /// Position of the record in the store's edge collection
    pub row: usize,
    /// Value of the rule's `connect_to` field
    pub source: VertexId,
    /// Value of the rule's `connect_from` field (the vertex this edge reaches)
    pub target: VertexId,
}

/// One traversal result row: which seed reached which record, at which hop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReachRow {
    /// Seed the traversal started from
    pub seed_id: VertexId,
    /// Reached record
    pub record: EdgeRecord,
    /// Hop at which the record was reached (0-based)
    pub depth: u32,
}

/// The capability the harness consumes from a graph-capable data store.
///
/// All methods are synchronous and read-only. Implementations report
/// connectivity problems as [`Error::StoreUnavailable`](crate::Error::StoreUnavailable)
/// and rejected queries as [`Error::QueryFailure`](crate::Error::QueryFailure).
pub trait ReachabilityStore {
    /// Size of the vertex population seeds are drawn from.
    ///
    /// # Errors
    /// Returns error if the store cannot be reached
    fn vertex_count(&self) -> Result<usize>;

    /// Draw up to `count` distinct vertices uniformly at random.
    ///
    /// Returns the whole population when it is smaller than `count`.
    ///
    /// # Errors
    /// Returns error if the store cannot be reached
    fn sample_vertices(&self, count: usize, rng: &mut dyn RngCore) -> Result<Vec<SeedPoint>>;

    /// Look up vertices by id. Unknown ids are omitted; order follows `ids`.
    ///
    /// # Errors
    /// Returns error if the store cannot be reached
    fn find_vertices(&self, ids: &[VertexId]) -> Result<Vec<SeedPoint>>;

    /// Run one bounded reachability query and materialize every row.
    ///
    /// # Errors
    /// Returns error if the store cannot be reached or rejects the query
    fn bounded_reachability(
        &self,
        seed_ids: &[VertexId],
        rule: &ConnectionRule,
        max_depth: u32,
    ) -> Result<Vec<ReachRow>>;
}

impl<S: ReachabilityStore + ?Sized> ReachabilityStore for &S {
    fn vertex_count(&self) -> Result<usize> {
        (**self).vertex_count()
    }

    fn sample_vertices(&self, count: usize, rng: &mut dyn RngCore) -> Result<Vec<SeedPoint>> {
        (**self).sample_vertices(count, rng)
    }

    fn find_vertices(&self, ids: &[VertexId]) -> Result<Vec<SeedPoint>> {
        (**self).find_vertices(ids)
    }

    fn bounded_reachability(
        &self,
        seed_ids: &[VertexId],
        rule: &ConnectionRule,
        max_depth: u32,
    ) -> Result<Vec<ReachRow>> {
        (**self).bounded_reachability(seed_ids, rule, max_depth)
    }
}
