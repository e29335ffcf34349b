use thiserror::Error;

/// Failures of the external embedding provider.
///
/// All of these are recoverable: the pipeline falls back to lexical-only candidates.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("embedding request failed: {message}")]
    Request { message: String },

    #[error("embedding provider returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("invalid embedding response: {reason}")]
    InvalidResponse { reason: String },

    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("embedding call timed out after {after_ms} ms")]
    Timeout { after_ms: u64 },

    #[error("invalid embedder configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl From<reqwest::Error> for EmbeddingError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return EmbeddingError::Timeout { after_ms: 0 };
        }
        EmbeddingError::Request {
            message: err.to_string(),
        }
    }
}
