//! OpenAI-compatible `/embeddings` client.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::QueryEmbedder;
use super::error::EmbeddingError;

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: Vec<&'a str>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    #[serde(default)]
    index: usize,
    embedding: Vec<f32>,
}

/// Embeds query text through an HTTP embedding endpoint.
#[derive(Debug, Clone)]
pub struct HttpEmbedder {
    client: reqwest::Client,
    url: String,
    model: String,
    api_key: Option<String>,
    dimension: usize,
}

impl HttpEmbedder {
    /// `url` is the full endpoint, e.g. `https://api.example.com/v1/embeddings`.
    pub fn new(
        url: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
        dimension: usize,
        timeout: Duration,
    ) -> Result<Self, EmbeddingError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| EmbeddingError::InvalidConfig {
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            url: url.into(),
            model: model.into(),
            api_key,
            dimension,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

/// Picks the first embedding by index and checks its dimension.
pub(crate) fn first_embedding(
    body: &str,
    expected_dim: usize,
) -> Result<Vec<f32>, EmbeddingError> {
    let response: EmbeddingResponse =
        serde_json::from_str(body).map_err(|e| EmbeddingError::InvalidResponse {
            reason: e.to_string(),
        })?;

    let data = response
        .data
        .into_iter()
        .min_by_key(|d| d.index)
        .ok_or_else(|| EmbeddingError::InvalidResponse {
            reason: "no embeddings in response".to_string(),
        })?;

    if data.embedding.len() != expected_dim {
        return Err(EmbeddingError::DimensionMismatch {
            expected: expected_dim,
            actual: data.embedding.len(),
        });
    }
    Ok(data.embedding)
}

#[async_trait]
impl QueryEmbedder for HttpEmbedder {
    fn name(&self) -> &str {
        &self.model
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let request = EmbeddingRequest {
            model: &self.model,
            input: vec![text],
        };

        let mut builder = self.client.post(&self.url).json(&request);
        if let Some(ref key) = self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(EmbeddingError::Api {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        let embedding = first_embedding(&body, self.dimension)?;
        debug!(model = %self.model, dim = embedding.len(), "Query embedded");
        Ok(embedding)
    }
}
