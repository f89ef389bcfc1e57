//! ExtraTrees ensemble training
//!
//! Builds `n_trees` trees one after another into the model's shared node
//! array. Each tree sees a fresh Fisher-Yates permutation of all rows and
//! is grown from the first `subsample_size` of them. Training is fully
//! deterministic for a given `(features, labels, config)`.

use crate::builder::TreeBuilder;
use crate::deterministic::shuffle_indices;
use crate::errors::{ExtraTreesError, Result};
use crate::model::Model;
use crate::split::TrainingData;
use crate::workspace::Workspace;
use tracing::{debug, info};

/// Train `model` on a row-major `features` matrix and its `labels`.
///
/// On error the model is left partially built and refuses prediction until
/// a later training call succeeds.
pub fn train(
    model: &mut Model,
    workspace: &mut Workspace,
    features: &[i16],
    labels: &[i16],
) -> Result<()> {
    check_inputs(model, workspace, features, labels)?;

    let n_samples = labels.len();
    let config = model.config().clone();
    let subsample_size = config.subsample_size(n_samples);

    model.reset();
    workspace.reset(config.rng_seed, n_samples);

    info!(
        n_trees = model.n_trees(),
        n_samples, subsample_size, "Training ExtraTrees ensemble"
    );

    let data = TrainingData::new(features, labels, model.n_features());

    for tree in 0..model.n_trees() {
        model.set_tree_start(tree, model.n_nodes_used());
        shuffle_indices(&mut workspace.sample_indices[..n_samples], &mut workspace.rng);

        let root = TreeBuilder::new(model, workspace, data, subsample_size).build()?;

        debug!(
            tree,
            root,
            nodes_used = model.n_nodes_used(),
            "Built tree {}/{}",
            tree + 1,
            model.n_trees()
        );
    }

    model.mark_trained();
    info!(
        nodes_used = model.n_nodes_used(),
        max_nodes = model.max_nodes(),
        "Training complete"
    );
    Ok(())
}

fn check_inputs(
    model: &Model,
    workspace: &Workspace,
    features: &[i16],
    labels: &[i16],
) -> Result<()> {
    let n_samples = labels.len();
    if n_samples == 0 {
        return Err(ExtraTreesError::EmptyTrainingSet);
    }

    let expected = n_samples * model.n_features();
    if features.len() != expected {
        return Err(ExtraTreesError::DimensionMismatch {
            what: "features",
            expected,
            actual: features.len(),
        });
    }

    // The config cap is validated to fit `i16` row indices; a larger
    // workspace does not lift it.
    let max_samples = workspace.max_samples().min(model.config().max_samples);
    if n_samples > max_samples {
        return Err(ExtraTreesError::TooManySamples {
            n_samples,
            max_samples,
        });
    }
    if workspace.n_features() != model.n_features() {
        return Err(ExtraTreesError::DimensionMismatch {
            what: "workspace features",
            expected: model.n_features(),
            actual: workspace.n_features(),
        });
    }
    if workspace.n_classes() != model.n_classes() {
        return Err(ExtraTreesError::DimensionMismatch {
            what: "workspace classes",
            expected: model.n_classes(),
            actual: workspace.n_classes(),
        });
    }

    let n_classes = model.n_classes();
    if let Some((index, &label)) = labels
        .iter()
        .enumerate()
        .find(|&(_, &label)| label < 0 || label as usize >= n_classes)
    {
        return Err(ExtraTreesError::LabelOutOfRange {
            index,
            label,
            n_classes,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TreesConfig;
    use crate::model::Node;

    fn setup(config: &TreesConfig, n_features: usize, n_classes: usize) -> (Model, Workspace) {
        let model = Model::new(n_features, n_classes, config).unwrap();
        let workspace = Workspace::new(n_features, n_classes, config.max_samples);
        (model, workspace)
    }

    #[test]
    fn test_pure_root_gives_one_leaf_per_tree() {
        let config = TreesConfig {
            n_trees: 4,
            ..TreesConfig::default()
        };
        let (mut model, mut ws) = setup(&config, 1, 2);

        train(&mut model, &mut ws, &[3, 1, 4, 1, 5], &[1, 1, 1, 1, 1]).unwrap();

        assert_eq!(model.n_nodes_used(), 4);
        assert_eq!(model.tree_starts(), &[0, 1, 2, 3]);
        assert!(model.nodes().iter().all(|n| *n == Node::leaf(1)));
        assert!(model.is_trained());
    }

    #[test]
    fn test_retraining_discards_previous_nodes() {
        let config = TreesConfig {
            n_trees: 2,
            ..TreesConfig::default()
        };
        let (mut model, mut ws) = setup(&config, 1, 2);

        train(&mut model, &mut ws, &[0, 0, 10, 10], &[0, 0, 1, 1]).unwrap();
        let first = model.fingerprint();
        train(&mut model, &mut ws, &[0, 0, 10, 10], &[0, 0, 1, 1]).unwrap();

        assert_eq!(model.n_nodes_used(), 6);
        assert_eq!(model.fingerprint(), first);
    }

    #[test]
    fn test_rejects_dimension_mismatch() {
        let (mut model, mut ws) = setup(&TreesConfig::default(), 2, 2);

        let err = train(&mut model, &mut ws, &[1, 2, 3], &[0, 1]).unwrap_err();
        assert!(matches!(
            err,
            ExtraTreesError::DimensionMismatch {
                what: "features",
                expected: 4,
                actual: 3
            }
        ));
    }

    #[test]
    fn test_rejects_bad_labels_and_empty_input() {
        let (mut model, mut ws) = setup(&TreesConfig::default(), 1, 2);

        let err = train(&mut model, &mut ws, &[1, 2], &[0, 2]).unwrap_err();
        assert!(matches!(
            err,
            ExtraTreesError::LabelOutOfRange { index: 1, label: 2, .. }
        ));

        let err = train(&mut model, &mut ws, &[], &[]).unwrap_err();
        assert!(matches!(err, ExtraTreesError::EmptyTrainingSet));
    }

    #[test]
    fn test_rejects_more_rows_than_capacity() {
        let config = TreesConfig {
            max_samples: 3,
            ..TreesConfig::default()
        };
        let (mut model, mut ws) = setup(&config, 1, 2);

        let err = train(&mut model, &mut ws, &[0, 1, 2, 3], &[0, 1, 0, 1]).unwrap_err();
        assert!(matches!(
            err,
            ExtraTreesError::TooManySamples {
                n_samples: 4,
                max_samples: 3
            }
        ));
    }

    #[test]
    fn test_oversized_workspace_does_not_lift_row_limit() {
        let config = TreesConfig::default();
        let mut model = Model::new(1, 2, &config).unwrap();
        // Row indices are i16; a workspace this large cannot index every row.
        let mut ws = Workspace::new(1, 2, 40_000);

        let features: Vec<i16> = (0..40_000).map(|i| (i % 100) as i16).collect();
        let labels: Vec<i16> = (0..40_000).map(|i| (i % 2) as i16).collect();

        let err = train(&mut model, &mut ws, &features, &labels).unwrap_err();
        assert!(matches!(
            err,
            ExtraTreesError::TooManySamples {
                n_samples: 40_000,
                max_samples: 1000
            }
        ));
        assert!(!model.is_trained());
    }

    #[test]
    fn test_capacity_exhaustion_fails_training() {
        let config = TreesConfig {
            n_trees: 2,
            max_nodes: 5,
            ..TreesConfig::default()
        };
        let (mut model, mut ws) = setup(&config, 1, 2);
        let features: Vec<i16> = (0..8).collect();
        let labels: Vec<i16> = (0..8).map(|i| i % 2).collect();

        let err = train(&mut model, &mut ws, &features, &labels).unwrap_err();
        assert!(matches!(
            err,
            ExtraTreesError::NodeCapacityExhausted {
                node_index: 5,
                max_nodes: 5
            }
        ));
        assert!(!model.is_trained());
    }
}
