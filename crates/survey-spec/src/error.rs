use thiserror::Error;

/// Failure values produced by the casters, the answer dispatcher, and the
/// wire codec. These are returned, never panicked, so callers can inspect
/// partial results without unwinding.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnswerError {
    #[error("invalid value type: {0}")]
    InvalidType(String),
    #[error("value out of range: {0}")]
    OutOfRange(String),
    #[error("timestamp is not an integer")]
    NotInteger,
    #[error("number is NaN or infinite")]
    NaNOrInfinite,
    #[error("required field is empty: {0}")]
    EmptyRequired(String),
    #[error("unsupported question type: {0}")]
    UnsupportedType(String),
    #[error("answer shape mismatch: {0}")]
    ShapeMismatch(String),
    #[error("sequence element {index} is smaller than its predecessor")]
    SequenceOutOfOrder { index: usize },
}
