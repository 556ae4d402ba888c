//! Harness configuration
//!
//! Loaded from a JSON file (camelCase keys) or assembled with
//! [`HarnessConfig::builder`], then checked with [`HarnessConfig::validate`]
//! before any store access.
//!
//! ```json
//! {
//!   "seedCount": 10,
//!   "depths": [0, 1, 3, 5, 10, 30, 50],
//!   "iterationsPerCell": 5,
//!   "scalingSweepEnabled": true,
//!   "scalingSweepVariant": "incremental-prefix",
//!   "scalingDepth": 3
//! }
//! ```

use crate::seed::SeedMode;
use crate::store::{ConnectionRule, VertexId};
use crate::{Error, Result};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default max-depth gradient
pub const DEFAULT_DEPTHS: [u32; 7] = [0, 1, 3, 5, 10, 30, 50];

/// Shape of the seed-set scaling sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScalingVariant {
    /// One cell using every resolved seed
    #[default]
    FixedFullSet,
    /// One cell per prefix length `1..=N` of the resolved seed list
    IncrementalPrefix,
}

/// Everything a run needs to know before it starts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HarnessConfig {
    /// Random sample size (ignored when `explicit_seed_ids` is set)
    pub seed_count: usize,
    /// Max-depth gradient for the single-seed sweep, in run order
    pub depths: Vec<u32>,
    /// Timed repetitions per experiment cell
    pub iterations_per_cell: usize,
    /// Whether the seed-set scaling sweep runs at all
    pub scaling_sweep_enabled: bool,
    /// Which scaling sweep to run
    pub scaling_sweep_variant: ScalingVariant,
    /// Fixed max depth for the scaling sweep
    pub scaling_depth: u32,
    /// Seeds to use instead of random sampling
    pub explicit_seed_ids: Option<Vec<VertexId>>,
    /// Fields linking one hop to the next
    pub connection_rule: ConnectionRule,
    /// RNG seed for reproducible sampling
    pub random_seed: Option<u64>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            seed_count: 10,
            depths: DEFAULT_DEPTHS.to_vec(),
            iterations_per_cell: 5,
            scaling_sweep_enabled: true,
            scaling_sweep_variant: ScalingVariant::FixedFullSet,
            scaling_depth: 3,
            explicit_seed_ids: None,
            connection_rule: ConnectionRule::default(),
            random_seed: None,
        }
    }
}

impl HarnessConfig {
    /// Create a builder starting from the defaults.
    #[must_use]
    pub fn builder() -> HarnessConfigBuilder {
        HarnessConfigBuilder::default()
    }

    /// Load a config file. Missing keys take their default values.
    ///
    /// # Errors
    /// Returns error if the file cannot be read or is not valid JSON
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Reject configurations no run could use.
    ///
    /// # Errors
    /// Returns [`Error::InvalidConfiguration`] describing the first problem found
    pub fn validate(&self) -> Result<()> {
        if self.depths.is_empty() {
            return Err(invalid("depths must list at least one max depth"));
        }
        let mut seen = FxHashSet::default();
        if let Some(dup) = self.depths.iter().find(|d| !seen.insert(**d)) {
            return Err(invalid(format!("depth {dup} listed more than once")));
        }
        if self.iterations_per_cell == 0 {
            return Err(invalid("iterationsPerCell must be at least 1"));
        }
        match &self.explicit_seed_ids {
            Some(ids) if ids.is_empty() => {
                return Err(invalid("explicitSeedIds is present but empty"));
            }
            None if self.seed_count == 0 => {
                return Err(invalid("seedCount must be at least 1"));
            }
            _ => {}
        }
        let rule = &self.connection_rule;
        if rule.connect_from.is_empty() || rule.connect_to.is_empty() {
            return Err(invalid("connectionRule fields must be non-empty"));
        }
        Ok(())
    }

    /// Seed selection mode implied by this config.
    #[must_use]
    pub fn seed_mode(&self) -> SeedMode {
        self.explicit_seed_ids.as_ref().map_or(
            SeedMode::Random {
                count: self.seed_count,
                rng_seed: self.random_seed,
            },
            |ids| SeedMode::Explicit(ids.clone()),
        )
    }
}

fn invalid(message: impl Into<String>) -> Error {
    Error::InvalidConfiguration(message.into())
}

/// Builder for [`HarnessConfig`].
#[derive(Debug, Default)]
pub struct HarnessConfigBuilder {
    config: HarnessConfig,
}

impl HarnessConfigBuilder {
    /// Random sample size.
    #[must_use]
    pub const fn seed_count(mut self, count: usize) -> Self {
        self.config.seed_count = count;
        self
    }

    /// Max-depth gradient.
    #[must_use]
    pub fn depths(mut self, depths: impl Into<Vec<u32>>) -> Self {
        self.config.depths = depths.into();
        self
    }

    /// Timed repetitions per cell.
    #[must_use]
    pub const fn iterations_per_cell(mut self, iterations: usize) -> Self {
        self.config.iterations_per_cell = iterations;
        self
    }

    /// Enable or skip the scaling sweep.
    #[must_use]
    pub const fn scaling_sweep_enabled(mut self, enabled: bool) -> Self {
        self.config.scaling_sweep_enabled = enabled;
        self
    }

    /// Scaling sweep shape.
    #[must_use]
    pub const fn scaling_sweep_variant(mut self, variant: ScalingVariant) -> Self {
        self.config.scaling_sweep_variant = variant;
        self
    }

    /// Scaling sweep max depth.
    #[must_use]
    pub const fn scaling_depth(mut self, depth: u32) -> Self {
        self.config.scaling_depth = depth;
        self
    }

    /// Use these seeds instead of random sampling.
    #[must_use]
    pub fn explicit_seed_ids(mut self, ids: impl Into<Vec<VertexId>>) -> Self {
        self.config.explicit_seed_ids = Some(ids.into());
        self
    }

    /// Connection rule.
    #[must_use]
    pub fn connection_rule(mut self, rule: ConnectionRule) -> Self {
        self.config.connection_rule = rule;
        self
    }

    /// RNG seed for reproducible sampling.
    #[must_use]
    pub const fn random_seed(mut self, seed: u64) -> Self {
        self.config.random_seed = Some(seed);
        self
    }

    /// Validate and build.
    ///
    /// # Errors
    /// Returns [`Error::InvalidConfiguration`] if the result fails validation
    pub fn build(self) -> Result<HarnessConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
