use std::path::PathBuf;
use thiserror::Error;

/// Errors building a [`super::QueryAnalyzer`] from configuration.
///
/// Analysis itself never fails; only a bad vocabulary does.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("failed to read vocabulary {path}: {source}")]
    VocabularyIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse vocabulary {path}: {source}")]
    VocabularyParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}
