//! Seed selection - resolves the traversal origins for a run

use crate::store::{ReachabilityStore, VertexId};
use crate::{Error, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// A vertex used as a traversal origin.
///
/// Created once during seed selection and then only referenced by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedPoint {
    id: VertexId,
    display_name: String,
}

impl SeedPoint {
    /// Create a seed point.
    #[must_use]
    pub fn new(id: VertexId, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
        }
    }

    /// Vertex id.
    #[must_use]
    pub const fn id(&self) -> VertexId {
        self.id
    }

    /// Human-readable name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }
}

/// How seeds are chosen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedMode {
    /// Uniform random sample of `count` distinct vertices
    Random {
        /// Requested sample size
        count: usize,
        /// Fixed RNG seed for reproducible sampling
        rng_seed: Option<u64>,
    },
    /// Caller-supplied ids, resolved against the store in the given order
    Explicit(Vec<VertexId>),
}

/// A requested seed id that the store does not know.
///
/// Recoverable: the run continues with the ids that did resolve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedResolutionWarning {
    /// Id that failed to resolve
    pub id: VertexId,
    /// What went wrong
    pub message: String,
}

/// Outcome of seed selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedSelection {
    /// Resolved seeds, in selection order, no duplicates
    pub seeds: Vec<SeedPoint>,
    /// Ids dropped during explicit resolution
    pub warnings: Vec<SeedResolutionWarning>,
}

/// Resolves the initial vertex set for the experiment matrix.
pub struct SeedSelector<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S: ReachabilityStore + ?Sized> SeedSelector<'a, S> {
    /// Create a selector over a store.
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Select seeds.
    ///
    /// # Errors
    /// - [`Error::NoSeedsResolved`] if explicit mode resolves zero ids
    /// - [`Error::InvalidConfiguration`] for a zero-size random request
    /// - any store error raised while sampling or resolving
    pub fn select(&self, mode: &SeedMode) -> Result<SeedSelection> {
        match mode {
            SeedMode::Random { count, rng_seed } => self.select_random(*count, *rng_seed),
            SeedMode::Explicit(ids) => self.select_explicit(ids),
        }
    }

    fn select_random(&self, count: usize, rng_seed: Option<u64>) -> Result<SeedSelection> {
        if count == 0 {
            return Err(Error::InvalidConfiguration(
                "seedCount must be at least 1".to_string(),
            ));
        }
        let mut rng = rng_seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        let seeds = dedup_by_id(self.store.sample_vertices(count, &mut rng)?);

        if seeds.len() < count {
            tracing::info!(
                requested = count,
                available = seeds.len(),
                "vertex population smaller than requested sample, using all of it"
            );
        }
        if seeds.is_empty() {
            return Err(Error::NoSeedsResolved { requested: count });
        }

        Ok(SeedSelection {
            seeds,
            warnings: Vec::new(),
        })
    }

    fn select_explicit(&self, ids: &[VertexId]) -> Result<SeedSelection> {
        let mut unique = Vec::with_capacity(ids.len());
        let mut seen = FxHashSet::default();
        for &id in ids {
            if seen.insert(id) {
                unique.push(id);
            }
        }

        let seeds = dedup_by_id(self.store.find_vertices(&unique)?);
        let found: FxHashSet<VertexId> = seeds.iter().map(SeedPoint::id).collect();

        let warnings: Vec<_> = unique
            .iter()
            .filter(|id| !found.contains(id))
            .map(|&id| SeedResolutionWarning {
                id,
                message: format!("seed id {id} not found in store, skipping"),
            })
            .collect();
        for warning in &warnings {
            tracing::warn!(id = warning.id, "{}", warning.message);
        }

        if seeds.is_empty() {
            return Err(Error::NoSeedsResolved {
                requested: ids.len(),
            });
        }

        Ok(SeedSelection { seeds, warnings })
    }
}

fn dedup_by_id(points: Vec<SeedPoint>) -> Vec<SeedPoint> {
    let mut seen = FxHashSet::default();
    points.into_iter().filter(|p| seen.insert(p.id())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryGraphStore;

    fn store() -> MemoryGraphStore {
        MemoryGraphStore::builder()
            .vertex(10, "Ada Lovelace")
            .vertex(20, "Alan Turing")
            .vertex(30, "Grace Hopper")
            .build()
            .unwrap()
    }

    #[test]
    fn test_explicit_partial_resolution_warns() {
        let store = store();
        let selection = SeedSelector::new(&store)
            .select(&SeedMode::Explicit(vec![20, 99, 10]))
            .unwrap();

        assert_eq!(selection.seeds.len(), 2);
        assert_eq!(selection.seeds[0].display_name(), "Alan Turing");
        assert_eq!(selection.warnings.len(), 1);
        assert_eq!(selection.warnings[0].id, 99);
    }

    #[test]
    fn test_explicit_nothing_resolves() {
        let store = store();
        let err = SeedSelector::new(&store)
            .select(&SeedMode::Explicit(vec![1, 2, 3]))
            .unwrap_err();

        assert!(matches!(err, Error::NoSeedsResolved { requested: 3 }));
    }

    #[test]
    fn test_explicit_duplicates_collapse() {
        let store = store();
        let selection = SeedSelector::new(&store)
            .select(&SeedMode::Explicit(vec![10, 10, 30]))
            .unwrap();

        let ids: Vec<_> = selection.seeds.iter().map(SeedPoint::id).collect();
        assert_eq!(ids, vec![10, 30]);
        assert!(selection.warnings.is_empty());
    }

    #[test]
    fn test_random_is_reproducible_with_seed() {
        let store = store();
        let selector = SeedSelector::new(&store);
        let mode = SeedMode::Random {
            count: 2,
            rng_seed: Some(42),
        };

        let a = selector.select(&mode).unwrap();
        let b = selector.select(&mode).unwrap();
        assert_eq!(a.seeds.len(), 2);
        assert_eq!(a, b);
    }

    #[test]
    fn test_random_small_population_returns_all() {
        let store = store();
        let selection = SeedSelector::new(&store)
            .select(&SeedMode::Random {
                count: 10,
                rng_seed: Some(1),
            })
            .unwrap();
        assert_eq!(selection.seeds.len(), 3);
    }

    #[test]
    fn test_random_empty_population() {
        let store = MemoryGraphStore::builder().build().unwrap();
        let err = SeedSelector::new(&store)
            .select(&SeedMode::Random {
                count: 5,
                rng_seed: None,
            })
            .unwrap_err();
        assert!(matches!(err, Error::NoSeedsResolved { .. }));
    }
}
