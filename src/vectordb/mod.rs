//! Vector index backends for the semantic half of candidate generation.

pub mod error;
pub mod memory;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod qdrant;
pub mod similarity;

#[cfg(test)]
mod tests;

use async_trait::async_trait;

pub use error::VectorDbError;
pub use memory::InMemoryVectorIndex;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockVectorIndex;
pub use qdrant::QdrantVectorIndex;
pub use similarity::{cosine_similarity, f32_to_embedding_bytes};

/// One nearest-neighbour result keyed by canonical catalog id.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorHit {
    pub id: String,
    pub score: f32,
}

/// Read-only nearest-neighbour lookup.
///
/// Implementations return at most `limit` hits, one per id, best first with
/// ties broken by id.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Backend name for logs.
    fn name(&self) -> &'static str;

    fn dimension(&self) -> usize;

    async fn search(&self, query: &[f32], limit: usize) -> Result<Vec<VectorHit>, VectorDbError>;
}
