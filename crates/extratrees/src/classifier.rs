//! Owning ExtraTrees classifier
//!
//! Bundles a [`Model`] with a [`Workspace`] sized to match, so callers only
//! deal with feature buffers and labels.

use crate::config::TreesConfig;
use crate::errors::Result;
use crate::model::Model;
use crate::predict;
use crate::trainer;
use crate::workspace::Workspace;

/// ExtraTrees classifier over `i16` features
#[derive(Debug, Clone)]
pub struct ExtraTrees {
    model: Model,
    workspace: Workspace,
}

impl ExtraTrees {
    /// Allocate model and workspace for `n_features` inputs and `n_classes`
    /// labels. No further allocation happens during training.
    pub fn new(n_features: usize, n_classes: usize, config: TreesConfig) -> Result<Self> {
        let model = Model::new(n_features, n_classes, &config)?;
        let workspace = Workspace::new(n_features, n_classes, config.max_samples);
        Ok(Self { model, workspace })
    }

    /// Train on a row-major `labels.len() x n_features` matrix.
    pub fn train(&mut self, features: &[i16], labels: &[i16]) -> Result<()> {
        trainer::train(&mut self.model, &mut self.workspace, features, labels)
    }

    pub fn predict(&self, features: &[i16]) -> Result<usize> {
        predict::predict(&self.model, features)
    }

    /// Predict into caller-owned `probabilities` and `votes` buffers, both of
    /// length `n_classes`.
    pub fn predict_proba(
        &self,
        features: &[i16],
        probabilities: &mut [f32],
        votes: &mut [u16],
    ) -> Result<usize> {
        predict::predict_proba(&self.model, features, probabilities, votes)
    }

    pub fn n_features(&self) -> usize {
        self.model.n_features()
    }

    pub fn n_classes(&self) -> usize {
        self.model.n_classes()
    }

    pub fn n_trees(&self) -> usize {
        self.model.n_trees()
    }

    pub fn n_nodes_used(&self) -> usize {
        self.model.n_nodes_used()
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn config(&self) -> &TreesConfig {
        self.model.config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ExtraTreesError;

    #[test]
    fn test_introspection() {
        let clf = ExtraTrees::new(3, 4, TreesConfig::default()).unwrap();
        assert_eq!(clf.n_features(), 3);
        assert_eq!(clf.n_classes(), 4);
        assert_eq!(clf.n_trees(), 10);
        assert_eq!(clf.n_nodes_used(), 0);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = TreesConfig {
            feature_subsample_ratio: 2.0,
            ..TreesConfig::default()
        };
        assert!(matches!(
            ExtraTrees::new(2, 2, config),
            Err(ExtraTreesError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_train_then_predict() {
        let mut clf = ExtraTrees::new(
            1,
            2,
            TreesConfig {
                n_trees: 3,
                ..TreesConfig::default()
            },
        )
        .unwrap();
        clf.train(&[0, 1, 2, 20, 21, 22], &[0, 0, 0, 1, 1, 1]).unwrap();

        assert_eq!(clf.predict(&[1]).unwrap(), 0);
        assert_eq!(clf.predict(&[21]).unwrap(), 1);
        assert_eq!(clf.n_nodes_used(), 9);
    }
}
