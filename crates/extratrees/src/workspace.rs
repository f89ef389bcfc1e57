//! Reusable scratch state for one training call
//!
//! Every buffer is sized once at construction. Training never grows them.

use crate::deterministic::LcgRng;
use crate::errors::{ExtraTreesError, Result};
use crate::split::ClassCounts;
use heapless::Vec as StackVec;

/// Maximum number of pending node-build tasks
pub const STACK_CAPACITY: usize = 98;

/// A node waiting to be split or turned into a leaf
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeTask {
    pub node_index: usize,
    pub start: usize,
    pub end: usize,
    pub depth: usize,
}

/// Mutable training context shared by every tree of one training call
#[derive(Debug, Clone)]
pub struct Workspace {
    pub(crate) sample_indices: Vec<i16>,
    pub(crate) feature_indices: Vec<i16>,
    pub(crate) counts: ClassCounts,
    pub(crate) stack: StackVec<NodeTask, STACK_CAPACITY>,
    pub(crate) rng: LcgRng,
}

impl Workspace {
    pub fn new(n_features: usize, n_classes: usize, max_samples: usize) -> Self {
        Self {
            sample_indices: vec![0; max_samples],
            feature_indices: (0..n_features as i16).collect(),
            counts: ClassCounts::new(n_classes),
            stack: StackVec::new(),
            rng: LcgRng::new(0),
        }
    }

    /// Training row capacity
    pub fn max_samples(&self) -> usize {
        self.sample_indices.len()
    }

    pub fn n_features(&self) -> usize {
        self.feature_indices.len()
    }

    pub fn n_classes(&self) -> usize {
        self.counts.n_classes()
    }

    /// Current RNG state
    pub fn rng_state(&self) -> u32 {
        self.rng.state()
    }

    /// Re-seed and fill the first `n_samples` row slots with `0..n_samples`
    pub(crate) fn reset(&mut self, seed: u32, n_samples: usize) {
        self.rng = LcgRng::new(seed);
        for (i, slot) in self.sample_indices[..n_samples].iter_mut().enumerate() {
            *slot = i as i16;
        }
        self.stack.clear();
    }

    /// Restore the feature pool to `0..n_features`
    pub(crate) fn reset_features(&mut self) {
        for (i, slot) in self.feature_indices.iter_mut().enumerate() {
            *slot = i as i16;
        }
    }

    pub(crate) fn push_task(&mut self, task: NodeTask) -> Result<()> {
        self.stack
            .push(task)
            .map_err(|_| ExtraTreesError::StackOverflow {
                capacity: STACK_CAPACITY,
            })
    }

    pub(crate) fn pop_task(&mut self) -> Option<NodeTask> {
        self.stack.pop()
    }
}
