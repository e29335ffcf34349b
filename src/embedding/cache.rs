use std::sync::Arc;

use async_trait::async_trait;
use moka::sync::Cache;
use tracing::debug;

use super::QueryEmbedder;
use super::error::EmbeddingError;
use crate::hashing::hash_embedding_key;

/// Memoizes query embeddings in a bounded in-process cache.
///
/// Failures are not cached.
pub struct CachedEmbedder {
    inner: Arc<dyn QueryEmbedder>,
    cache: Cache<u64, Arc<Vec<f32>>>,
}

impl CachedEmbedder {
    pub fn new(inner: Arc<dyn QueryEmbedder>, capacity: u64) -> Self {
        Self {
            inner,
            cache: Cache::new(capacity),
        }
    }

    pub fn entry_count(&self) -> u64 {
        self.cache.run_pending_tasks();
        self.cache.entry_count()
    }
}

#[async_trait]
impl QueryEmbedder for CachedEmbedder {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn dimension(&self) -> usize {
        self.inner.dimension()
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let key = hash_embedding_key(self.inner.name(), text);
        if let Some(hit) = self.cache.get(&key) {
            debug!(key, "Embedding cache hit");
            return Ok(hit.as_ref().clone());
        }

        let embedding = self.inner.embed(text).await?;
        self.cache.insert(key, Arc::new(embedding.clone()));
        Ok(embedding)
    }
}
