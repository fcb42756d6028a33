//! Error types for the evaluation runner.

use thiserror::Error;

/// Result type for evaluation operations.
pub type Result<T> = std::result::Result<T, EvalError>;

/// Error types that can occur while running an evaluation.
///
/// The runner performs no recovery of its own: any fault raised by the
/// dataset, the model, serialization or the filesystem surfaces to the
/// caller as one of these variants.
#[derive(Error, Debug)]
pub enum EvalError {
    /// Error during JSON parsing or serialization.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error during I/O operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid annotation data.
    #[error("Invalid annotation: {0}")]
    InvalidAnnotation(String),

    /// Invalid bounding box coordinates.
    #[error("Invalid bounding box: {0}")]
    InvalidBoundingBox(String),

    /// Empty or structurally invalid dataset.
    #[error("Empty dataset: {0}")]
    EmptyDataset(String),

    /// Invalid confidence threshold.
    #[error("Invalid threshold: {0}")]
    InvalidThreshold(String),

    /// Model output that does not line up with the input batch.
    #[error("Malformed model output: {0}")]
    ModelOutput(String),

    /// Error reported by the dataset while producing a sample.
    #[error("Dataset error: {0}")]
    Dataset(String),
}
