//! Error types for the ExtraTrees engine

use thiserror::Error;

/// Errors that can occur while configuring, training or querying a model
#[derive(Error, Debug)]
pub enum ExtraTreesError {
    /// Hyperparameters out of their accepted range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A caller-supplied buffer has the wrong length
    #[error("Dimension mismatch for {what}: expected {expected}, got {actual}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Prediction input does not match the trained feature count
    #[error("Feature count mismatch: model has {expected} features, got {actual}")]
    FeatureCountMismatch { expected: usize, actual: usize },

    /// More training rows than the workspace was sized for
    #[error("Too many samples: {n_samples} exceeds capacity {max_samples}")]
    TooManySamples { n_samples: usize, max_samples: usize },

    /// Training called without any rows
    #[error("Training set is empty")]
    EmptyTrainingSet,

    /// A label that is not a valid class index
    #[error("Label {label} at row {index} is outside [0, {n_classes})")]
    LabelOutOfRange {
        index: usize,
        label: i16,
        n_classes: usize,
    },

    /// Prediction requested before a successful training call
    #[error("Model is not trained")]
    NotTrained,

    /// Node array ran out of slots while building a tree
    #[error("Node capacity exhausted: node {node_index} does not fit in {max_nodes} slots")]
    NodeCapacityExhausted { node_index: usize, max_nodes: usize },

    /// Too many pending node-build tasks
    #[error("Build stack overflow: more than {capacity} pending nodes")]
    StackOverflow { capacity: usize },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be parsed or written
    #[error("Configuration parse error: {0}")]
    ConfigParse(String),
}

/// Result type for ExtraTrees operations
pub type Result<T> = std::result::Result<T, ExtraTreesError>;
