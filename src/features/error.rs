use thiserror::Error;

/// Disagreement between the extractor's feature layout and a consumer's.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FeatureError {
    #[error("feature dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("feature order mismatch at index {index}: expected '{expected}', got '{actual}'")]
    OrderMismatch {
        index: usize,
        expected: String,
        actual: String,
    },
}
