//! Growth configuration
//!
//! Loadable from YAML or JSON:
//!
//! ```yaml
//! levels:
//!   3: 1000
//!   4: 1000
//! connections_per_node: 2
//! jump_probability: 0.1
//! probability_distribution: [1.0, 0.8, 0.6, 0.4]
//! seed: 42
//! ```

use super::kernel::{normalize_distribution, validate_distribution, DegreeBucketKernel, DEFAULT_DISTRIBUTION};
use super::{GrowthError, GrowthResult, LevelPlan};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// First logical level index of a uniform plan, matching the seed depth of
/// a business group / product family / product offering hierarchy.
pub const DEFAULT_FIRST_LEVEL: u32 = 3;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),

    #[error(transparent)]
    Invalid(#[from] GrowthError),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Parameters for one extension run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrowthConfig {
    /// Logical level index -> number of nodes to create
    pub levels: LevelPlan,
    /// Distinct parents drawn from the level below for each new node
    pub connections_per_node: usize,
    /// Chance that a new node gets one random long-range edge
    pub jump_probability: f64,
    /// Attachment weights for in-degree 0, 1-2, 3-4, 5+
    pub probability_distribution: Vec<f64>,
    /// Fixed random seed; entropy when absent
    pub seed: Option<u64>,
}

impl Default for GrowthConfig {
    fn default() -> Self {
        Self {
            levels: LevelPlan::new(),
            connections_per_node: 2,
            jump_probability: 0.1,
            probability_distribution: DEFAULT_DISTRIBUTION.to_vec(),
            seed: None,
        }
    }
}

impl GrowthConfig {
    /// Same node count for `num_levels` consecutive levels starting at `first_level`.
    ///
    /// Fails when the last level index would not fit in a `u32`.
    pub fn uniform(first_level: u32, num_levels: u32, nodes_per_level: usize) -> GrowthResult<Self> {
        let end = first_level.checked_add(num_levels).ok_or_else(|| {
            GrowthError::InvalidParameter(format!(
                "{} levels starting at level {} exceed the largest level index",
                num_levels, first_level
            ))
        })?;
        Ok(Self {
            levels: (first_level..end).map(|level| (level, nodes_per_level)).collect(),
            ..Self::default()
        })
    }

    /// Explicit node count per logical level
    pub fn with_levels(levels: LevelPlan) -> Self {
        Self {
            levels,
            ..Self::default()
        }
    }

    pub fn with_connections_per_node(mut self, connections_per_node: usize) -> Self {
        self.connections_per_node = connections_per_node;
        self
    }

    pub fn with_jump_probability(mut self, jump_probability: f64) -> Self {
        self.jump_probability = jump_probability;
        self
    }

    pub fn with_distribution(mut self, distribution: Vec<f64>) -> Self {
        self.probability_distribution = distribution;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check every parameter without touching a graph
    pub fn validate(&self) -> GrowthResult<()> {
        validate_connections(self.connections_per_node)?;
        validate_probability(self.jump_probability)?;
        validate_distribution(&self.probability_distribution)
    }

    /// The configured distribution scaled to sum to 1
    pub fn normalized_distribution(&self) -> GrowthResult<Vec<f64>> {
        normalize_distribution(&self.probability_distribution)
    }

    /// Kernel built from the normalized distribution
    pub fn kernel(&self) -> GrowthResult<DegreeBucketKernel> {
        DegreeBucketKernel::normalized(&self.probability_distribution)
    }

    /// Total number of nodes the plan will create
    pub fn planned_nodes(&self) -> usize {
        self.levels.values().sum()
    }

    /// Load from a `.yaml`/`.yml` or `.json` file and validate
    pub fn from_path(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        let config: GrowthConfig = match extension.as_str() {
            "yaml" | "yml" => serde_yaml::from_str(&text)?,
            "json" => serde_json::from_str(&text)?,
            other => return Err(ConfigError::UnsupportedFormat(other.to_string())),
        };
        config.validate()?;
        Ok(config)
    }
}

pub(crate) fn validate_connections(connections_per_node: usize) -> GrowthResult<()> {
    if connections_per_node == 0 {
        return Err(GrowthError::InvalidParameter(
            "connections_per_node must be at least 1".to_string(),
        ));
    }
    Ok(())
}

pub(crate) fn validate_probability(jump_probability: f64) -> GrowthResult<()> {
    if !(0.0..=1.0).contains(&jump_probability) {
        return Err(GrowthError::InvalidParameter(format!(
            "jump_probability must be within [0, 1], got {}",
            jump_probability
        )));
    }
    Ok(())
}
