//! In-memory graph store.
//!
//! Holds an edge collection column-wise with a hash index per column, plus
//! the vertex population seeds are drawn from. Traversal follows graph-lookup
//! semantics: the records matching a seed are roots, and each root's
//! `connect_from` value starts its own breadth-first expansion.

use super::{ConnectionRule, EdgeRecord, ReachRow, ReachabilityStore, VertexId};
use crate::seed::SeedPoint;
use crate::storage::Collection;
use crate::{Error, Result};
use rand::RngCore;
use rustc_hash::{FxHashMap, FxHashSet};

/// In-memory [`ReachabilityStore`] over a columnar edge collection.
///
/// Read-only once built; every query is computed from scratch.
#[derive(Debug)]
pub struct MemoryGraphStore {
    columns: FxHashMap<String, Vec<VertexId>>,
    indexes: FxHashMap<String, FxHashMap<VertexId, Vec<usize>>>,
    row_count: usize,
    vertices: Vec<SeedPoint>,
    vertex_positions: FxHashMap<VertexId, usize>,
}

impl MemoryGraphStore {
    /// Create a builder for a store with two edge columns.
    #[must_use]
    pub fn builder() -> MemoryGraphStoreBuilder {
        MemoryGraphStoreBuilder::default()
    }

    /// Build a store from loaded Arrow collections.
    ///
    /// # Arguments
    /// * `edges` - Edge collection
    /// * `edge_columns` - Integer columns of `edges` usable in a [`ConnectionRule`]
    /// * `vertices` - Vertex collection seeds are drawn from
    /// * `id_column` - Vertex id column
    /// * `name_columns` - Columns joined with a space into the display name
    ///
    /// # Errors
    /// Returns error if a column is missing, has the wrong type, or holds nulls
    pub fn from_collections(
        edges: &Collection,
        edge_columns: &[&str],
        vertices: &Collection,
        id_column: &str,
        name_columns: &[&str],
    ) -> Result<Self> {
        let mut columns = FxHashMap::default();
        for &name in edge_columns {
            columns.insert(name.to_string(), edges.id_column(name)?);
        }

        let ids = vertices.id_column(id_column)?;
        let names = name_columns
            .iter()
            .map(|name| vertices.text_column(name))
            .collect::<Result<Vec<_>>>()?;

        let points = ids.iter().enumerate().map(|(i, &id)| {
            let parts: Vec<&str> = names
                .iter()
                .filter_map(|column| column[i].as_deref())
                .filter(|part| !part.is_empty())
                .collect();
            let display = if parts.is_empty() {
                id.to_string()
            } else {
                parts.join(" ")
            };
            SeedPoint::new(id, display)
        });

        Self::from_parts(columns, edges.num_rows(), points)
    }

    fn from_parts(
        columns: FxHashMap<String, Vec<VertexId>>,
        row_count: usize,
        points: impl IntoIterator<Item = SeedPoint>,
    ) -> Result<Self> {
        let mut indexes = FxHashMap::default();
        for (name, values) in &columns {
            if values.len() != row_count {
                return Err(Error::StorageError(format!(
                    "Column {name} has {} rows, expected {row_count}",
                    values.len()
                )));
            }
            let mut index: FxHashMap<VertexId, Vec<usize>> = FxHashMap::default();
            for (row, &value) in values.iter().enumerate() {
                index.entry(value).or_default().push(row);
            }
            indexes.insert(name.clone(), index);
        }

        let mut vertices = Vec::new();
        let mut vertex_positions = FxHashMap::default();
        for point in points {
            if vertex_positions.contains_key(&point.id()) {
                continue;
            }
            vertex_positions.insert(point.id(), vertices.len());
            vertices.push(point);
        }

        tracing::debug!(
            edges = row_count,
            vertices = vertices.len(),
            columns = columns.len(),
            "built in-memory graph store"
        );

        Ok(Self {
            columns,
            indexes,
            row_count,
            vertices,
            vertex_positions,
        })
    }

    /// Number of edge records.
    #[must_use]
    pub const fn edge_count(&self) -> usize {
        self.row_count
    }

    fn column(&self, name: &str) -> Result<&[VertexId]> {
        self.columns
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| Error::QueryFailure(format!("Unknown connection field: {name}")))
    }
}

impl ReachabilityStore for MemoryGraphStore {
    fn vertex_count(&self) -> Result<usize> {
        Ok(self.vertices.len())
    }

    fn sample_vertices(&self, count: usize, rng: &mut dyn RngCore) -> Result<Vec<SeedPoint>> {
        let amount = count.min(self.vertices.len());
        Ok(rand::seq::index::sample(rng, self.vertices.len(), amount)
            .into_iter()
            .map(|i| self.vertices[i].clone())
            .collect())
    }

    fn find_vertices(&self, ids: &[VertexId]) -> Result<Vec<SeedPoint>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.vertex_positions.get(id))
            .map(|&i| self.vertices[i].clone())
            .collect())
    }

    fn bounded_reachability(
        &self,
        seed_ids: &[VertexId],
        rule: &ConnectionRule,
        max_depth: u32,
    ) -> Result<Vec<ReachRow>> {
        let from = self.column(&rule.connect_from)?;
        let to = self.column(&rule.connect_to)?;
        let index = self
            .indexes
            .get(&rule.connect_to)
            .ok_or_else(|| Error::QueryFailure(format!("No index on {}", rule.connect_to)))?;

        let mut rows = Vec::new();
        for &seed_id in seed_ids {
            let Some(roots) = index.get(&seed_id) else {
                continue;
            };
            for &root in roots {
                // Each value is expanded at most once per root, so each record
                // is emitted at most once per root as well.
                let mut expanded: FxHashSet<VertexId> = FxHashSet::default();
                let mut frontier = vec![from[root]];
                for depth in 0..=max_depth {
                    let mut next = Vec::new();
                    for value in frontier {
                        if !expanded.insert(value) {
                            continue;
                        }
                        let Some(matches) = index.get(&value) else {
                            continue;
                        };
                        for &row in matches {
                            rows.push(ReachRow {
                                seed_id,
                                record: EdgeRecord {
                                    row,
                                    source: to[row],
                                    target: from[row],
                                },
                                depth,
                            });
                            next.push(from[row]);
                        }
                    }
                    if next.is_empty() {
                        break;
                    }
                    frontier = next;
                }
            }
        }
        Ok(rows)
    }
}

/// Builder for [`MemoryGraphStore`] with one two-column edge collection.
#[derive(Debug)]
pub struct MemoryGraphStoreBuilder {
    first_column: String,
    second_column: String,
    edges: Vec<(VertexId, VertexId)>,
    vertices: Vec<SeedPoint>,
}

impl Default for MemoryGraphStoreBuilder {
    fn default() -> Self {
        let rule = ConnectionRule::default();
        Self {
            first_column: rule.connect_to,
            second_column: rule.connect_from,
            edges: Vec::new(),
            vertices: Vec::new(),
        }
    }
}

impl MemoryGraphStoreBuilder {
    /// Name the two edge columns (defaults: `person1_id`, `person2_id`).
    #[must_use]
    pub fn edge_columns(mut self, first: impl Into<String>, second: impl Into<String>) -> Self {
        self.first_column = first.into();
        self.second_column = second.into();
        self
    }

    /// Add an edge record `(first, second)`.
    #[must_use]
    pub fn edge(mut self, first: VertexId, second: VertexId) -> Self {
        self.edges.push((first, second));
        self
    }

    /// Add many edge records.
    #[must_use]
    pub fn edges(mut self, edges: impl IntoIterator<Item = (VertexId, VertexId)>) -> Self {
        self.edges.extend(edges);
        self
    }

    /// Add a vertex to the seed population.
    #[must_use]
    pub fn vertex(mut self, id: VertexId, display_name: impl Into<String>) -> Self {
        self.vertices.push(SeedPoint::new(id, display_name));
        self
    }

    /// Build the store.
    ///
    /// # Errors
    /// Returns error if both columns have the same name
    pub fn build(self) -> Result<MemoryGraphStore> {
        if self.first_column == self.second_column {
            return Err(Error::InvalidInput(format!(
                "Edge columns must differ, got {} twice",
                self.first_column
            )));
        }
        let row_count = self.edges.len();
        let (first, second): (Vec<_>, Vec<_>) = self.edges.into_iter().unzip();
        let mut columns = FxHashMap::default();
        columns.insert(self.first_column, first);
        columns.insert(self.second_column, second);
        MemoryGraphStore::from_parts(columns, row_count, self.vertices)
    }
}
