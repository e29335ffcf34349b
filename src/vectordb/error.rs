use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by vector index operations.
pub enum VectorDbError {
    /// Could not connect to the Qdrant endpoint.
    #[error("failed to connect to Qdrant at '{url}': {message}")]
    ConnectionFailed {
        /// Endpoint URL.
        url: String,
        /// Error message.
        message: String,
    },

    /// Collection does not exist.
    #[error("collection not found: {collection}")]
    CollectionNotFound {
        /// Collection name.
        collection: String,
    },

    /// Search failed.
    #[error("failed to search in '{collection}': {message}")]
    SearchFailed {
        /// Collection name.
        collection: String,
        /// Error message.
        message: String,
    },

    /// Vector dimension mismatch.
    #[error("invalid vector dimension: expected {expected}, got {actual}")]
    InvalidDimension {
        /// Expected dimension.
        expected: usize,
        /// Actual dimension.
        actual: usize,
    },

    /// Embedding matrix bytes are not a whole number of f16 rows.
    #[error("invalid embedding byte length: expected a multiple of {row_bytes} bytes, got {actual}")]
    InvalidEmbeddingBytesLength {
        /// Bytes per row.
        row_bytes: usize,
        /// Actual byte length.
        actual: usize,
    },

    /// The matrix does not have one row per catalog row.
    #[error("index has {actual} rows but the catalog has {expected}")]
    RowCountMismatch { expected: usize, actual: usize },

    #[error("failed to open index {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
