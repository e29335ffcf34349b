use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use qdrant_client::Qdrant;
use qdrant_client::qdrant::{ScoredPoint, SearchPointsBuilder};
use tracing::debug;

use super::error::VectorDbError;
use super::{VectorHit, VectorIndex};
use crate::catalog::canonicalize;

/// Payload key holding the catalog URL of each point.
pub const URL_PAYLOAD_KEY: &str = "url";

#[derive(Clone)]
/// Nearest-neighbour search against a Qdrant collection.
pub struct QdrantVectorIndex {
    client: Qdrant,
    url: String,
    collection: String,
    dimension: usize,
}

impl QdrantVectorIndex {
    /// Connects and checks that the collection exists.
    pub async fn connect(
        url: &str,
        collection: &str,
        dimension: usize,
    ) -> Result<Self, VectorDbError> {
        let client =
            Qdrant::from_url(url)
                .build()
                .map_err(|e| VectorDbError::ConnectionFailed {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;

        let exists = client.collection_exists(collection).await.map_err(|e| {
            VectorDbError::ConnectionFailed {
                url: url.to_string(),
                message: e.to_string(),
            }
        })?;
        if !exists {
            return Err(VectorDbError::CollectionNotFound {
                collection: collection.to_string(),
            });
        }

        Ok(Self {
            client,
            url: url.to_string(),
            collection: collection.to_string(),
            dimension,
        })
    }

    /// Returns the configured URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }
}

/// Maps a scored point to a hit keyed by canonical id; points without a URL are skipped.
pub(crate) fn hit_from_scored_point(point: &ScoredPoint) -> Option<VectorHit> {
    let url = point
        .payload
        .get(URL_PAYLOAD_KEY)
        .and_then(|v| v.as_str())?;
    let id = canonicalize(url);
    if id.is_empty() {
        return None;
    }
    Some(VectorHit {
        id,
        score: point.score,
    })
}

/// Keeps the best score per id, ordered by score then id.
pub(crate) fn collapse_hits(hits: impl IntoIterator<Item = VectorHit>) -> Vec<VectorHit> {
    let mut best: HashMap<String, f32> = HashMap::new();
    for hit in hits {
        best.entry(hit.id)
            .and_modify(|s| *s = s.max(hit.score))
            .or_insert(hit.score);
    }
    let mut out: Vec<VectorHit> = best
        .into_iter()
        .map(|(id, score)| VectorHit { id, score })
        .collect();
    out.sort_by(|a, b| match b.score.total_cmp(&a.score) {
        Ordering::Equal => a.id.cmp(&b.id),
        other => other,
    });
    out
}

#[async_trait]
impl VectorIndex for QdrantVectorIndex {
    fn name(&self) -> &'static str {
        "qdrant"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn search(&self, query: &[f32], limit: usize) -> Result<Vec<VectorHit>, VectorDbError> {
        if query.len() != self.dimension {
            return Err(VectorDbError::InvalidDimension {
                expected: self.dimension,
                actual: query.len(),
            });
        }

        let request =
            SearchPointsBuilder::new(&self.collection, query.to_vec(), limit as u64).with_payload(true);

        let response = self
            .client
            .search_points(request)
            .await
            .map_err(|e| VectorDbError::SearchFailed {
                collection: self.collection.clone(),
                message: e.to_string(),
            })?;

        debug!(
            collection = %self.collection,
            points = response.result.len(),
            "Qdrant search complete"
        );

        let mut hits = collapse_hits(response.result.iter().filter_map(hit_from_scored_point));
        hits.truncate(limit);
        Ok(hits)
    }
}
