use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum NetworkError {
    #[error("invalid topology: a network needs at least two positive layer sizes")]
    InvalidTopology,

    #[error("shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("invalid training config: {reason}")]
    InvalidTrainingConfig { reason: &'static str },
}
