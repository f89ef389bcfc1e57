//! Majority-vote ensemble prediction

use crate::errors::{ExtraTreesError, Result};
use crate::model::Model;
use tracing::warn;

/// Floor on the hop budget per tree during traversal.
///
/// The actual cap is `max(MIN_TRAVERSAL_STEPS, max_depth + 1)`, so a
/// well-formed tree is never cut short.
pub const MIN_TRAVERSAL_STEPS: usize = 20;

/// Walk every tree for `features`, fill `votes` and `probabilities`, and
/// return the winning class.
///
/// `probabilities[c] = votes[c] / n_trees`. The winner is the lowest class
/// index holding the most votes; an all-zero vote vector yields class 0.
pub fn predict_proba(
    model: &Model,
    features: &[i16],
    probabilities: &mut [f32],
    votes: &mut [u16],
) -> Result<usize> {
    check_query(model, features)?;
    let n_classes = model.n_classes();
    for (what, len) in [("probabilities", probabilities.len()), ("votes", votes.len())] {
        if len != n_classes {
            return Err(ExtraTreesError::DimensionMismatch {
                what,
                expected: n_classes,
                actual: len,
            });
        }
    }

    tally_votes(model, features, votes);

    let n_trees = model.n_trees() as f32;
    for (p, &v) in probabilities.iter_mut().zip(votes.iter()) {
        *p = v as f32 / n_trees;
    }

    Ok(plurality(votes))
}

/// Class-only prediction
pub fn predict(model: &Model, features: &[i16]) -> Result<usize> {
    check_query(model, features)?;
    let mut votes = vec![0u16; model.n_classes()];
    tally_votes(model, features, &mut votes);
    Ok(plurality(&votes))
}

fn check_query(model: &Model, features: &[i16]) -> Result<()> {
    if !model.is_trained() {
        return Err(ExtraTreesError::NotTrained);
    }
    if features.len() != model.n_features() {
        return Err(ExtraTreesError::FeatureCountMismatch {
            expected: model.n_features(),
            actual: features.len(),
        });
    }
    Ok(())
}

fn tally_votes(model: &Model, features: &[i16], votes: &mut [u16]) {
    votes.fill(0);
    let step_cap = MIN_TRAVERSAL_STEPS.max(model.config().max_depth + 1);

    for (tree, &root) in model.tree_starts().iter().enumerate() {
        let mut index = usize::try_from(root).ok();
        let mut steps = 0;

        while let Some(node) = index.and_then(|i| model.node(i)) {
            if node.is_leaf() {
                break;
            }
            if steps >= step_cap {
                warn!(tree, ?index, step_cap, "tree traversal exceeded step cap");
                break;
            }
            let Some(&value) = features.get(node.feature as usize) else {
                break;
            };
            let next = if value <= node.value {
                node.left
            } else {
                node.right
            };
            // A negative child leaves the node array and casts no vote.
            index = usize::try_from(next).ok();
            steps += 1;
        }

        // A truncated walk still votes with whatever node it stopped on.
        if let Some(node) = index.and_then(|i| model.node(i)) {
            let class = node.value;
            if class >= 0 && (class as usize) < votes.len() {
                votes[class as usize] += 1;
            }
        }
    }
}

fn plurality(votes: &[u16]) -> usize {
    let mut max_votes = 0u16;
    let mut winner = 0usize;
    for (class, &count) in votes.iter().enumerate() {
        if count > max_votes {
            max_votes = count;
            winner = class;
        }
    }
    winner
}
