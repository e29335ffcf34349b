use thiserror::Error;

use crate::assembly::AssemblyError;
use crate::catalog::CatalogError;
use crate::config::ConfigError;
use crate::embedding::EmbeddingError;
use crate::query::QueryError;
use crate::rerank::RerankError;
use crate::retrieval::RetrievalError;
use crate::vectordb::VectorDbError;

/// Startup failures. Request-time service errors never surface here.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("catalog: {0}")]
    Catalog(#[from] CatalogError),

    #[error("vector index: {0}")]
    Index(#[from] VectorDbError),

    #[error("embedder: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("query analyzer: {0}")]
    Query(#[from] QueryError),

    #[error("candidate generation: {0}")]
    Retrieval(#[from] RetrievalError),

    #[error("reranker: {0}")]
    Rerank(#[from] RerankError),

    #[error("result assembly: {0}")]
    Assembly(#[from] AssemblyError),

    #[error("embedder dimension {embedder} does not match index dimension {index}")]
    DimensionMismatch { embedder: usize, index: usize },

    #[error("http client: {0}")]
    HttpClient(#[from] reqwest::Error),
}
