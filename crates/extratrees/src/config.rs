//! Hyperparameter configuration for ExtraTrees training

use crate::errors::{ExtraTreesError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use tracing::info;

/// Prefix for environment variable overrides
pub const ENV_PREFIX: &str = "EML_EXTRATREES_";

/// When the feature pool is reshuffled during tree building
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FeatureSampling {
    /// Fresh feature subset before every split search
    #[default]
    PerNode,
    /// One feature subset shared by every node of a tree
    PerTree,
}

impl FromStr for FeatureSampling {
    type Err = ExtraTreesError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "per_node" | "node" => Ok(Self::PerNode),
            "per_tree" | "tree" => Ok(Self::PerTree),
            other => Err(ExtraTreesError::InvalidConfig(format!(
                "unknown feature sampling mode '{other}'"
            ))),
        }
    }
}

/// ExtraTrees training configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreesConfig {
    /// Number of trees in the ensemble
    pub n_trees: usize,
    /// Depth at which a node always becomes a leaf
    pub max_depth: usize,
    /// Minimum rows on each side of a split
    pub min_samples_leaf: usize,
    /// Accepted for compatibility; threshold search tries every adjacent
    /// pair of distinct values instead
    pub n_thresholds: usize,
    /// Fraction of rows used per tree, in (0, 1]
    pub subsample_ratio: f32,
    /// Fraction of features considered per split search, in (0, 1]
    pub feature_subsample_ratio: f32,
    /// Node array capacity shared by all trees
    pub max_nodes: usize,
    /// Training row capacity
    pub max_samples: usize,
    /// Seed for row and feature shuffling
    pub rng_seed: u32,
    /// Feature pool reshuffle policy
    pub feature_sampling: FeatureSampling,
}

impl Default for TreesConfig {
    fn default() -> Self {
        Self {
            n_trees: 10,
            max_depth: 10,
            min_samples_leaf: 1,
            n_thresholds: 10,
            subsample_ratio: 1.0,
            feature_subsample_ratio: 1.0,
            max_nodes: 1000,
            max_samples: 1000,
            rng_seed: 42,
            feature_sampling: FeatureSampling::PerNode,
        }
    }
}

impl TreesConfig {
    /// Check every hyperparameter against its accepted range
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(ExtraTreesError::InvalidConfig(msg));

        if self.n_trees == 0 {
            return invalid("n_trees must be at least 1".into());
        }
        if self.min_samples_leaf == 0 {
            return invalid("min_samples_leaf must be at least 1".into());
        }
        if self.n_thresholds == 0 {
            return invalid("n_thresholds must be at least 1".into());
        }
        for (name, ratio) in [
            ("subsample_ratio", self.subsample_ratio),
            ("feature_subsample_ratio", self.feature_subsample_ratio),
        ] {
            if !ratio.is_finite() || ratio <= 0.0 || ratio > 1.0 {
                return invalid(format!("{name} must be in (0, 1], got {ratio}"));
            }
        }
        let index_limit = i16::MAX as usize;
        if self.max_nodes == 0 || self.max_nodes > index_limit {
            return invalid(format!(
                "max_nodes must be in [1, {index_limit}], got {}",
                self.max_nodes
            ));
        }
        if self.max_samples == 0 || self.max_samples > index_limit {
            return invalid(format!(
                "max_samples must be in [1, {index_limit}], got {}",
                self.max_samples
            ));
        }
        if self.n_trees > self.max_nodes {
            return invalid(format!(
                "n_trees ({}) cannot exceed max_nodes ({})",
                self.n_trees, self.max_nodes
            ));
        }
        Ok(())
    }

    /// Number of rows each tree is built from
    pub fn subsample_size(&self, n_samples: usize) -> usize {
        let size = (n_samples as f32 * self.subsample_ratio).round() as usize;
        size.clamp(1, n_samples.max(1))
    }

    /// Number of features examined per split search
    pub fn feature_subset_size(&self, n_features: usize) -> usize {
        let size = (n_features as f32 * self.feature_subsample_ratio) as usize;
        size.clamp(1, n_features.max(1))
    }

    /// Parse a configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ExtraTreesError::ConfigParse(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {}", path.display());

        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;

        info!("Configuration loaded successfully");
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).map_err(|e| {
            ExtraTreesError::ConfigParse(format!("Failed to serialize config: {e}"))
        })?;

        std::fs::write(path, content)?;
        info!("Configuration saved to: {}", path.display());
        Ok(())
    }

    /// Apply `EML_EXTRATREES_*` environment variables on top of this config.
    ///
    /// Returns the keys that were overridden.
    pub fn apply_env_overrides(&mut self) -> Result<Vec<String>> {
        info!("Loading configuration overrides from environment variables");
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup.
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<Vec<String>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut applied = Vec::new();
        let mut ov = Overrides {
            lookup: &lookup,
            applied: &mut applied,
        };

        ov.apply("n_trees", &mut self.n_trees)?;
        ov.apply("max_depth", &mut self.max_depth)?;
        ov.apply("min_samples_leaf", &mut self.min_samples_leaf)?;
        ov.apply("n_thresholds", &mut self.n_thresholds)?;
        ov.apply("subsample_ratio", &mut self.subsample_ratio)?;
        ov.apply("feature_subsample_ratio", &mut self.feature_subsample_ratio)?;
        ov.apply("max_nodes", &mut self.max_nodes)?;
        ov.apply("max_samples", &mut self.max_samples)?;
        ov.apply("rng_seed", &mut self.rng_seed)?;
        ov.apply("feature_sampling", &mut self.feature_sampling)?;

        if !applied.is_empty() {
            info!("Applied configuration overrides: {:?}", applied);
        }
        Ok(applied)
    }
}

struct Overrides<'a, F> {
    lookup: &'a F,
    applied: &'a mut Vec<String>,
}

impl<F> Overrides<'_, F>
where
    F: Fn(&str) -> Option<String>,
{
    fn apply<T>(&mut self, field: &str, slot: &mut T) -> Result<()>
    where
        T: FromStr,
    {
        let key = format!("{ENV_PREFIX}{}", field.to_ascii_uppercase());
        if let Some(raw) = (self.lookup)(&key) {
            *slot = raw.trim().parse().map_err(|_| {
                ExtraTreesError::InvalidConfig(format!("{key}: cannot parse '{raw}'"))
            })?;
            self.applied.push(field.to_string());
        }
        Ok(())
    }
}
