//! Fixed-memory ExtraTrees for microcontroller-class targets
//!
//! Trains an ensemble of randomized decision trees over `i16` feature
//! matrices inside buffers sized once at construction, and predicts by
//! majority vote.
//!
//! Modules:
//! - `config`: Hyperparameters, TOML loading and environment overrides
//! - `deterministic`: LCG random source and Fisher-Yates shuffle
//! - `impurity`: Gini impurity over class histograms
//! - `split`: Threshold search and in-place row partitioning
//! - `builder`: Stack-driven single-tree construction
//! - `trainer`: Ensemble training over the shared node arena
//! - `predict`: Majority-vote inference
//! - `classifier`: Owning model + workspace facade
//! - `dataset` / `evaluation`: CSV loading and scoring helpers
//!
//! ```rust
//! use eml_extratrees::{ExtraTrees, TreesConfig};
//!
//! let config = TreesConfig { n_trees: 1, max_depth: 2, ..TreesConfig::default() };
//! let mut clf = ExtraTrees::new(1, 2, config)?;
//! clf.train(&[0, 0, 10, 10], &[0, 0, 1, 1])?;
//!
//! let mut probabilities = [0.0f32; 2];
//! let mut votes = [0u16; 2];
//! let class = clf.predict_proba(&[0], &mut probabilities, &mut votes)?;
//! assert_eq!(class, 0);
//! assert_eq!(probabilities, [1.0, 0.0]);
//! # Ok::<(), eml_extratrees::ExtraTreesError>(())
//! ```

pub mod builder;
pub mod classifier;
pub mod config;
pub mod dataset;
pub mod deterministic;
pub mod errors;
pub mod evaluation;
pub mod impurity;
pub mod model;
pub mod predict;
pub mod split;
pub mod trainer;
pub mod workspace;

pub use builder::TreeBuilder;
pub use classifier::ExtraTrees;
pub use config::{FeatureSampling, TreesConfig};
pub use dataset::Dataset;
pub use deterministic::{shuffle_indices, LcgRng};
pub use errors::{ExtraTreesError, Result};
pub use evaluation::{accuracy, evaluate, ConfusionMatrix};
pub use impurity::gini;
pub use model::{Model, Node, LEAF_FEATURE};
pub use predict::{predict, predict_proba, MIN_TRAVERSAL_STEPS};
pub use split::{find_best_split, partition, ClassCounts, Split, TrainingData};
pub use trainer::train;
pub use workspace::{NodeTask, Workspace, STACK_CAPACITY};

/// Crate version string
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
