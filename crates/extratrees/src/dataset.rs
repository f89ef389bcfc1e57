//! Integer CSV datasets for training and evaluation
//!
//! Every column is an `i16`; the last column is the class label. Rows are
//! stored row-major so they can be handed straight to the trainer.

use anyhow::{Context, Result};
use std::path::Path;

use crate::deterministic::{shuffle_indices, LcgRng};

/// Labelled dataset with integer features
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dataset {
    pub features: Vec<i16>,
    pub labels: Vec<i16>,
    pub n_features: usize,
}

impl Dataset {
    /// Build from a row-major feature buffer.
    pub fn new(features: Vec<i16>, labels: Vec<i16>, n_features: usize) -> Result<Self> {
        if n_features == 0 {
            anyhow::bail!("Dataset must have at least one feature");
        }
        if features.len() != labels.len() * n_features {
            anyhow::bail!(
                "Expected {} feature values for {} rows, got {}",
                labels.len() * n_features,
                labels.len(),
                features.len()
            );
        }
        Ok(Self {
            features,
            labels,
            n_features,
        })
    }

    /// Load `feature,...,feature,label` rows from a CSV file
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read CSV file {}", path.as_ref().display()))?;
        Self::from_csv_str(&content)
    }

    /// Parse CSV text; blank lines and `#` comments are skipped
    pub fn from_csv_str(content: &str) -> Result<Self> {
        let mut features = Vec::new();
        let mut labels = Vec::new();
        let mut n_features = 0;

        for (line_idx, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let parts: Vec<&str> = line.split(',').map(|s| s.trim()).collect();
            if parts.len() < 2 {
                anyhow::bail!("Line {}: expected at least 2 columns", line_idx + 1);
            }

            if n_features == 0 {
                n_features = parts.len() - 1;
            } else if parts.len() - 1 != n_features {
                anyhow::bail!(
                    "Line {}: expected {} features, got {}",
                    line_idx + 1,
                    n_features,
                    parts.len() - 1
                );
            }

            for (i, part) in parts.iter().take(n_features).enumerate() {
                let val = part.parse::<i16>().with_context(|| {
                    format!("Line {}, column {}: invalid integer", line_idx + 1, i + 1)
                })?;
                features.push(val);
            }

            let label = parts[n_features]
                .parse::<i16>()
                .with_context(|| format!("Line {}: invalid label", line_idx + 1))?;
            if label < 0 {
                anyhow::bail!("Line {}: negative label {}", line_idx + 1, label);
            }
            labels.push(label);
        }

        if labels.is_empty() {
            anyhow::bail!("Dataset is empty");
        }

        Self::new(features, labels, n_features)
    }

    /// Deterministically permute rows using `seed`
    pub fn shuffle(&mut self, seed: u32) {
        let mut order: Vec<usize> = (0..self.len()).collect();
        let mut rng = LcgRng::new(seed);
        shuffle_indices(&mut order, &mut rng);

        let mut features = Vec::with_capacity(self.features.len());
        let mut labels = Vec::with_capacity(self.labels.len());
        for &row in &order {
            features.extend_from_slice(self.row(row));
            labels.push(self.labels[row]);
        }

        self.features = features;
        self.labels = labels;
    }

    /// Split into the first `n` rows and the remainder
    pub fn split_at(&self, n: usize) -> (Dataset, Dataset) {
        let n = n.min(self.len());
        let cut = n * self.n_features;
        let head = Dataset {
            features: self.features[..cut].to_vec(),
            labels: self.labels[..n].to_vec(),
            n_features: self.n_features,
        };
        let tail = Dataset {
            features: self.features[cut..].to_vec(),
            labels: self.labels[n..].to_vec(),
            n_features: self.n_features,
        };
        (head, tail)
    }

    /// Feature values of row `i`
    pub fn row(&self, i: usize) -> &[i16] {
        &self.features[i * self.n_features..(i + 1) * self.n_features]
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// One past the largest label
    pub fn n_classes(&self) -> usize {
        self.labels
            .iter()
            .copied()
            .max()
            .map_or(0, |max| max.max(0) as usize + 1)
    }

    /// Per-feature `(min, max)` over all rows
    pub fn feature_stats(&self) -> Vec<(i16, i16)> {
        let mut stats = vec![(i16::MAX, i16::MIN); self.n_features];

        for row in self.features.chunks_exact(self.n_features) {
            for (i, &val) in row.iter().enumerate() {
                stats[i].0 = stats[i].0.min(val);
                stats[i].1 = stats[i].1.max(val);
            }
        }

        stats
    }
}
