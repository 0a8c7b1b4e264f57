//! Error types for the signal pipeline

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The price series is too short for any indicator row to become
    /// fully defined, or warm-up trimming dropped every row.
    #[error("insufficient history: need at least {required} bars, got {got}")]
    InsufficientHistory { required: usize, got: usize },

    /// Malformed input or a failed indicator computation. The run aborts;
    /// no partial signal is produced.
    #[error("indicator computation failed: {0}")]
    IndicatorComputation(String),

    /// Unexpected classifier failure. The pipeline downgrades the known
    /// degenerate cases (single-class labels, too few rows) to the
    /// neutral-probability fallback before this can fire.
    #[error("model fitting failed: {0}")]
    ModelFitting(String),
}

pub type Result<T> = std::result::Result<T, Error>;
