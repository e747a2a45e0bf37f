//! Error types for digitnet.

use thiserror::Error;

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Every fault the core can report. None of these are recovered internally;
/// they are propagated to the caller with enough context to diagnose.
#[derive(Error, Debug)]
pub enum Error {
    /// Operand shapes violate an operation's precondition.
    #[error("{op}: expected shape {expected:?}, got {actual:?}")]
    DimensionMismatch {
        op: &'static str,
        expected: (usize, usize),
        actual: (usize, usize),
    },

    /// Element access outside the declared shape.
    #[error("index ({row}, {col}) out of range for {rows}x{cols} matrix")]
    IndexOutOfRange {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    /// Malformed or missing training data.
    #[error("data load failed: {0}")]
    DataLoad(String),

    /// A class label that cannot be one-hot encoded over the output layer.
    #[error("label {label} is out of range for {num_classes} classes")]
    InvalidLabel { label: usize, num_classes: usize },

    /// `backward` was called without a matching `forward` in the same step.
    #[error("backward called without a preceding forward pass")]
    BackwardWithoutForward,

    /// Invalid network or training configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn mismatch(
        op: &'static str,
        expected: (usize, usize),
        actual: (usize, usize),
    ) -> Error {
        Error::DimensionMismatch { op, expected, actual }
    }
}
