//! Query embedding providers.
//!
//! - [`HttpEmbedder`] calls an OpenAI-compatible embeddings endpoint.
//! - [`CachedEmbedder`] memoizes repeated queries.
//! - `MockEmbedder` (tests / `mock` feature) hashes words into a fixed-size vector.
//!
//! Callers bound every [`QueryEmbedder::embed`] call with [`embed_with_timeout`].

pub mod cache;
mod error;
pub mod http;
#[cfg(any(test, feature = "mock"))]
pub mod mock;


use std::time::Duration;

use async_trait::async_trait;

pub use cache::CachedEmbedder;
pub use error::EmbeddingError;
pub use http::HttpEmbedder;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockEmbedder;

/// Turns query text into a dense vector.
#[async_trait]
pub trait QueryEmbedder: Send + Sync {
    /// Model or provider name (also part of cache keys).
    fn name(&self) -> &str;

    fn dimension(&self) -> usize;

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;
}

/// Runs `embed` under a deadline; the in-flight call is dropped on expiry.
pub async fn embed_with_timeout(
    embedder: &dyn QueryEmbedder,
    text: &str,
    timeout: Duration,
) -> Result<Vec<f32>, EmbeddingError> {
    match tokio::time::timeout(timeout, embedder.embed(text)).await {
        Ok(result) => result,
        Err(_) => Err(EmbeddingError::Timeout {
            after_ms: timeout.as_millis() as u64,
        }),
    }
}
