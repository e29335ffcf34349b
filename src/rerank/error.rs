use std::path::PathBuf;

use thiserror::Error;

use crate::features::FeatureError;

/// Reranker construction failures. All are configuration errors.
#[derive(Debug, Error)]
pub enum RerankError {
    #[error("failed to read model '{path}': {source}")]
    ModelIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse model '{path}': {source}")]
    ModelParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("model feature layout does not match the extractor: {0}")]
    Schema(#[from] FeatureError),

    #[error("invalid model: {reason}")]
    InvalidModel { reason: String },

    #[error("invalid rule weights: {reason}")]
    InvalidWeights { reason: String },
}

/// External judge failures. Always recovered by the rule-based fallback.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum JudgeError {
    #[error("judge request failed: {message}")]
    Request { message: String },

    #[error("judge quota exhausted: {message}")]
    Quota { message: String },

    #[error("judge timed out after {after_ms}ms")]
    Timeout { after_ms: u64 },

    #[error("malformed judge response: {reason}")]
    MalformedResponse { reason: String },
}

impl JudgeError {
    pub fn is_retryable(&self) -> bool {
        !matches!(self, JudgeError::MalformedResponse { .. })
    }
}
