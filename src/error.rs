use thiserror::Error;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, NetworkError>;

/// Everything that can go wrong while building, querying or training a network.
///
/// None of these are retried internally: each one is a caller bug or bad
/// input, surfaced at the call that detected it.
#[derive(Error, Debug)]
pub enum NetworkError {
    /// A layer was declared with a zero input or output dimension.
    #[error("invalid layer shape {inputs}x{outputs}: both dimensions must be positive")]
    InvalidShape { inputs: usize, outputs: usize },

    /// A network was assembled from zero layers.
    #[error("network layout is empty")]
    EmptyLayout,

    /// A vector length disagrees with the dimension declared at `context`.
    #[error("shape mismatch at {context}: expected {expected}, got {actual}")]
    ShapeMismatch {
        context: String,
        expected: usize,
        actual: usize,
    },

    /// A backward pass or update ran without the step that must precede it.
    #[error("stale state in layer {layer}: {operation} called out of order")]
    StaleState { layer: usize, operation: &'static str },

    #[error("invalid hyperparameter: {0}")]
    InvalidHyperparameter(String),

    /// Training or evaluation was handed zero examples.
    #[error("dataset is empty")]
    EmptyDataset,

    /// The cost function cannot be paired with the output layer's activation.
    #[error("cost {cost} requires a {required} output layer, got {actual}")]
    IncompatibleCost {
        cost: &'static str,
        required: &'static str,
        actual: String,
    },

    #[error("invalid initializer: {0}")]
    InvalidInitializer(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl NetworkError {
    pub(crate) fn shape_mismatch(context: impl Into<String>, expected: usize, actual: usize) -> Self {
        NetworkError::ShapeMismatch {
            context: context.into(),
            expected,
            actual,
        }
    }
}
