use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// No usable records after normalization.
    #[error("catalog contains no usable assessments")]
    Empty,
}

pub type CatalogResult<T> = Result<T, CatalogError>;
