use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use super::QueryEmbedder;
use super::error::EmbeddingError;
use crate::hashing::hash_to_u64;

/// Deterministic bag-of-words embedder for tests.
///
/// Each lowercase token is hashed into one signed bucket; the vector is
/// L2-normalized. Texts sharing words get positive cosine similarity.
pub struct MockEmbedder {
    dimension: usize,
    failing: AtomicBool,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl MockEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            failing: AtomicBool::new(false),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Sleeps before answering (for timeout tests).
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The vector `embed` would return, computed synchronously.
    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0.0f32; self.dimension];
        if self.dimension == 0 {
            return v;
        }

        let lowered = text.to_lowercase();
        for token in lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| t.len() > 1)
        {
            let h = hash_to_u64(token.as_bytes());
            let bucket = (h % self.dimension as u64) as usize;
            let sign = if (h >> 63) & 1 == 0 { 1.0 } else { -1.0 };
            v[bucket] += sign;
        }

        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            v.iter_mut().for_each(|x| *x /= norm);
        }
        v
    }
}

#[async_trait]
impl QueryEmbedder for MockEmbedder {
    fn name(&self) -> &str {
        "mock"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(EmbeddingError::Api {
                status: 429,
                message: "quota exceeded".to_string(),
            });
        }
        Ok(self.embed_text(text))
    }
}
