//! Stack-driven construction of a single tree
//!
//! Pending nodes are kept on the workspace's bounded task stack instead of
//! the call stack. The right child is pushed before the left, so left
//! subtrees are finished first and node numbering follows pre-order
//! allocation of sibling pairs.

use crate::config::FeatureSampling;
use crate::deterministic::shuffle_indices;
use crate::errors::{ExtraTreesError, Result};
use crate::impurity::{fill_histogram, majority_class};
use crate::model::{Model, Node};
use crate::split::{find_best_split, partition, TrainingData};
use crate::workspace::{NodeTask, Workspace};
use tracing::warn;

/// Builds one tree into the shared node arena
pub struct TreeBuilder<'a> {
    model: &'a mut Model,
    workspace: &'a mut Workspace,
    data: TrainingData<'a>,
    subsample_size: usize,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(
        model: &'a mut Model,
        workspace: &'a mut Workspace,
        data: TrainingData<'a>,
        subsample_size: usize,
    ) -> Self {
        Self {
            model,
            workspace,
            data,
            subsample_size,
        }
    }

    /// Build a tree over `sample_indices[..subsample_size]`.
    ///
    /// The root goes at the current high-water mark, whose index is
    /// returned. Fails if a node index falls outside the node array or the
    /// task stack overflows; nodes already written are left in place.
    pub fn build(self) -> Result<usize> {
        let Self {
            model,
            workspace,
            data,
            subsample_size,
        } = self;

        let max_nodes = model.max_nodes();
        let max_depth = model.config().max_depth;
        let min_samples_leaf = model.config().min_samples_leaf;
        let sampling = model.config().feature_sampling;
        let n_subset = model.config().feature_subset_size(model.n_features());

        workspace.reset_features();
        if sampling == FeatureSampling::PerTree {
            shuffle_indices(&mut workspace.feature_indices, &mut workspace.rng);
        }

        let root = model.n_nodes_used();
        workspace.stack.clear();
        workspace.push_task(NodeTask {
            node_index: root,
            start: 0,
            end: subsample_size,
            depth: 0,
        })?;

        while let Some(task) = workspace.pop_task() {
            let NodeTask {
                node_index,
                start,
                end,
                depth,
            } = task;

            if node_index >= max_nodes {
                return Err(ExtraTreesError::NodeCapacityExhausted {
                    node_index,
                    max_nodes,
                });
            }

            let should_stop = depth >= max_depth
                || end - start < 2 * min_samples_leaf
                || is_pure(&data, &workspace.sample_indices[start..end]);
            if should_stop {
                write_leaf(model, workspace, &data, task);
                continue;
            }

            if sampling == FeatureSampling::PerNode {
                shuffle_indices(&mut workspace.feature_indices, &mut workspace.rng);
            }

            let split = find_best_split(
                &data,
                &workspace.sample_indices[start..end],
                &workspace.feature_indices[..n_subset],
                min_samples_leaf,
                &mut workspace.counts,
            );
            let Some(split) = split else {
                write_leaf(model, workspace, &data, task);
                continue;
            };

            let split_point = start
                + partition(
                    &data,
                    &mut workspace.sample_indices[start..end],
                    split.feature,
                    split.threshold,
                );
            if split_point == start || split_point == end {
                write_leaf(model, workspace, &data, task);
                continue;
            }

            let left = model.n_nodes_used().max(node_index + 1);
            if left + 1 >= max_nodes {
                warn!(
                    node_index,
                    max_nodes, "node capacity reached, truncating branch to a leaf"
                );
                write_leaf(model, workspace, &data, task);
                continue;
            }
            let right = left + 1;

            model.write_node(
                node_index,
                Node::split(split.feature as i16, split.threshold, left as i16, right as i16),
            );
            model.reserve_through(right);

            workspace.push_task(NodeTask {
                node_index: right,
                start: split_point,
                end,
                depth: depth + 1,
            })?;
            workspace.push_task(NodeTask {
                node_index: left,
                start,
                end: split_point,
                depth: depth + 1,
            })?;
        }

        Ok(root)
    }
}

fn is_pure(data: &TrainingData<'_>, rows: &[i16]) -> bool {
    match rows.split_first() {
        Some((&first, rest)) => {
            let label = data.label(first);
            rest.iter().all(|&row| data.label(row) == label)
        }
        None => true,
    }
}

fn write_leaf(
    model: &mut Model,
    workspace: &mut Workspace,
    data: &TrainingData<'_>,
    task: NodeTask,
) {
    let counts = &mut workspace.counts.parent;
    fill_histogram(counts, data.labels, &workspace.sample_indices[task.start..task.end]);
    let class = majority_class(counts);
    model.write_node(task.node_index, Node::leaf(class as i16));
}
