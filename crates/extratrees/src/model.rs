//! Ensemble model: one shared node arena plus per-tree root indices
//!
//! All trees live in a single pre-allocated node array. A node is either a
//! split (`feature >= 0`, `value` is the threshold, `<=` goes left) or a leaf
//! (`feature == LEAF_FEATURE`, `value` is the class label).

use crate::config::TreesConfig;
use crate::errors::{ExtraTreesError, Result};

/// Feature sentinel marking a leaf node
pub const LEAF_FEATURE: i16 = -1;

/// A decision tree node (internal or leaf)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Node {
    /// Feature index to split on (`LEAF_FEATURE` for leaves)
    pub feature: i16,
    /// Split threshold for internal nodes, class label for leaves
    pub value: i16,
    /// Left child index (-1 for leaves)
    pub left: i16,
    /// Right child index (-1 for leaves)
    pub right: i16,
}

impl Node {
    /// Create a new leaf node
    pub fn leaf(class: i16) -> Self {
        Self {
            feature: LEAF_FEATURE,
            value: class,
            left: -1,
            right: -1,
        }
    }

    /// Create a new internal (split) node
    pub fn split(feature: i16, threshold: i16, left: i16, right: i16) -> Self {
        Self {
            feature,
            value: threshold,
            left,
            right,
        }
    }

    /// Check if this node is a leaf
    pub fn is_leaf(&self) -> bool {
        self.feature == LEAF_FEATURE
    }
}

/// Trained ExtraTrees ensemble
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    nodes: Vec<Node>,
    tree_starts: Vec<i16>,
    n_nodes_used: usize,
    n_features: usize,
    n_classes: usize,
    config: TreesConfig,
    trained: bool,
}

impl Model {
    /// Allocate an untrained model with `config.max_nodes` node slots.
    pub fn new(n_features: usize, n_classes: usize, config: &TreesConfig) -> Result<Self> {
        config.validate()?;
        if n_features == 0 || n_features > i16::MAX as usize {
            return Err(ExtraTreesError::InvalidConfig(format!(
                "n_features must be in [1, {}], got {n_features}",
                i16::MAX
            )));
        }
        if n_classes == 0 || n_classes > i16::MAX as usize {
            return Err(ExtraTreesError::InvalidConfig(format!(
                "n_classes must be in [1, {}], got {n_classes}",
                i16::MAX
            )));
        }

        Ok(Self {
            nodes: vec![Node::default(); config.max_nodes],
            tree_starts: vec![0; config.n_trees],
            n_nodes_used: 0,
            n_features,
            n_classes,
            config: config.clone(),
            trained: false,
        })
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    pub fn n_trees(&self) -> usize {
        self.tree_starts.len()
    }

    /// Node high-water mark
    pub fn n_nodes_used(&self) -> usize {
        self.n_nodes_used
    }

    pub fn max_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// The populated prefix of the node array
    pub fn nodes(&self) -> &[Node] {
        &self.nodes[..self.n_nodes_used]
    }

    /// Root node index of each tree
    pub fn tree_starts(&self) -> &[i16] {
        &self.tree_starts
    }

    pub fn config(&self) -> &TreesConfig {
        &self.config
    }

    /// True after a training call that completed without error
    pub fn is_trained(&self) -> bool {
        self.trained
    }

    /// Hex BLAKE3 digest over shape, roots and used nodes.
    ///
    /// Two models with the same fingerprint predict identically.
    pub fn fingerprint(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&(self.n_features as u64).to_le_bytes());
        hasher.update(&(self.n_classes as u64).to_le_bytes());
        hasher.update(&(self.n_nodes_used as u64).to_le_bytes());
        for root in &self.tree_starts {
            hasher.update(&root.to_le_bytes());
        }
        for node in self.nodes() {
            hasher.update(&node.feature.to_le_bytes());
            hasher.update(&node.value.to_le_bytes());
            hasher.update(&node.left.to_le_bytes());
            hasher.update(&node.right.to_le_bytes());
        }
        hex::encode(hasher.finalize().as_bytes())
    }

    /// Validate tree structure
    pub fn validate(&self) -> Result<()> {
        let used = self.n_nodes_used;
        let bad = |msg: String| Err(ExtraTreesError::InvalidConfig(msg));

        if used > self.nodes.len() {
            return bad(format!(
                "{used} nodes used exceeds capacity {}",
                self.nodes.len()
            ));
        }

        for (tree, &root) in self.tree_starts.iter().enumerate() {
            if root < 0 || root as usize >= used {
                return bad(format!("Tree {tree} has invalid root: {root}"));
            }
        }

        for (i, node) in self.nodes().iter().enumerate() {
            if node.is_leaf() {
                if node.value < 0 || node.value as usize >= self.n_classes {
                    return bad(format!("Leaf node {i} has invalid class: {}", node.value));
                }
                continue;
            }

            if node.feature < 0 || node.feature as usize >= self.n_features {
                return bad(format!(
                    "Internal node {i} has invalid feature index: {}",
                    node.feature
                ));
            }
            for (side, child) in [("left", node.left), ("right", node.right)] {
                if child < 0 || child as usize >= used {
                    return bad(format!("Node {i} has invalid {side} child: {child}"));
                }
            }
            if node.left == node.right {
                return bad(format!("Node {i} has identical children: {}", node.left));
            }
        }

        Ok(())
    }

    /// Discard any previous training and start a fresh high-water mark
    pub(crate) fn reset(&mut self) {
        self.n_nodes_used = 0;
        self.trained = false;
    }

    pub(crate) fn mark_trained(&mut self) {
        self.trained = true;
    }

    pub(crate) fn set_tree_start(&mut self, tree: usize, root: usize) {
        self.tree_starts[tree] = root as i16;
    }

    /// Write `node` at `index`, advancing the high-water mark past it
    pub(crate) fn write_node(&mut self, index: usize, node: Node) {
        self.nodes[index] = node;
        if index >= self.n_nodes_used {
            self.n_nodes_used = index + 1;
        }
    }

    /// Claim slots up to and including `index` for nodes written later
    pub(crate) fn reserve_through(&mut self, index: usize) {
        self.n_nodes_used = self.n_nodes_used.max(index + 1);
    }

    pub(crate) fn node(&self, index: usize) -> Option<&Node> {
        self.nodes().get(index)
    }

    /// Assemble a model from explicit parts.
    ///
    /// Used to build fixed ensembles for inference checks; the result is
    /// marked trained only if it validates.
    pub fn from_parts(
        n_features: usize,
        n_classes: usize,
        config: &TreesConfig,
        nodes: &[Node],
        tree_starts: &[i16],
    ) -> Result<Self> {
        let config = TreesConfig {
            n_trees: tree_starts.len(),
            max_nodes: nodes.len().max(1),
            ..config.clone()
        };
        let mut model = Self::new(n_features, n_classes, &config)?;
        model.nodes[..nodes.len()].copy_from_slice(nodes);
        model.n_nodes_used = nodes.len();
        model.tree_starts.copy_from_slice(tree_starts);
        model.validate()?;
        model.trained = true;
        Ok(model)
    }
}
