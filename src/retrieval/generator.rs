use tracing::{debug, warn};

use super::blend::{BlendWeights, merge_rankings};
use super::candidate::{CandidatePool, RetrievalMode};
use super::error::RetrievalError;
use super::lexical::{EntryText, lexical_score};
use crate::catalog::CatalogStore;
use crate::constants::{DEFAULT_POOL_SIZE, DEFAULT_VECTOR_TOP_M, MAX_RESULTS};
use crate::query::QueryContext;
use crate::vectordb::VectorIndex;

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    /// Pool size K handed to feature extraction.
    pub pool_size: usize,
    /// Neighbours requested from the vector index (M).
    pub vector_top_m: usize,
    pub weights: BlendWeights,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            pool_size: DEFAULT_POOL_SIZE,
            vector_top_m: DEFAULT_VECTOR_TOP_M,
            weights: BlendWeights::default(),
        }
    }
}

impl GeneratorConfig {
    pub fn validate(&self) -> Result<(), RetrievalError> {
        if self.pool_size <= MAX_RESULTS {
            return Err(RetrievalError::PoolTooSmall {
                pool_size: self.pool_size,
                output_size: MAX_RESULTS,
            });
        }
        if self.vector_top_m == 0 {
            return Err(RetrievalError::PoolTooSmall {
                pool_size: self.vector_top_m,
                output_size: 1,
            });
        }
        self.weights.validate()
    }
}

/// Hybrid semantic + lexical candidate generation.
#[derive(Debug, Clone, Default)]
pub struct CandidateGenerator {
    config: GeneratorConfig,
}

impl CandidateGenerator {
    pub fn new(config: GeneratorConfig) -> Result<Self, RetrievalError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Scores every catalog entry lexically; keeps entries with a positive score.
    pub fn lexical_ranking(&self, ctx: &QueryContext, catalog: &CatalogStore) -> Vec<(String, f32)> {
        catalog
            .iter()
            .filter_map(|a| {
                let score = lexical_score(ctx, &EntryText::new(a));
                (score > 0.0).then(|| (a.id.clone(), score))
            })
            .collect()
    }

    /// Builds the candidate pool.
    ///
    /// `query_vector` is `None` when embedding failed or was skipped; either
    /// that or a failing index degrades to lexical-only ranking.
    pub async fn generate(
        &self,
        ctx: &QueryContext,
        catalog: &CatalogStore,
        index: Option<&dyn VectorIndex>,
        query_vector: Option<&[f32]>,
    ) -> CandidatePool {
        let (vector_hits, mode) = match (index, query_vector) {
            (Some(index), Some(vector)) => {
                match index.search(vector, self.config.vector_top_m).await {
                    Ok(hits) => {
                        let known: Vec<(String, f32)> = hits
                            .into_iter()
                            .filter(|h| catalog.get(&h.id).is_some())
                            .map(|h| (h.id, h.score))
                            .collect();
                        (known, RetrievalMode::Hybrid)
                    }
                    Err(e) => {
                        warn!(index = index.name(), error = %e, "Vector search failed; using lexical ranking only");
                        (
                            Vec::new(),
                            RetrievalMode::LexicalOnly {
                                reason: e.to_string(),
                            },
                        )
                    }
                }
            }
            (None, _) => (
                Vec::new(),
                RetrievalMode::LexicalOnly {
                    reason: "vector index unavailable".to_string(),
                },
            ),
            (Some(_), None) => (
                Vec::new(),
                RetrievalMode::LexicalOnly {
                    reason: "query embedding unavailable".to_string(),
                },
            ),
        };

        let lexical_hits = self.lexical_ranking(ctx, catalog);
        let candidates = merge_rankings(
            &vector_hits,
            &lexical_hits,
            &self.config.weights,
            self.config.pool_size,
        );

        debug!(
            vector_hits = vector_hits.len(),
            lexical_hits = lexical_hits.len(),
            pool = candidates.len(),
            hybrid = mode.is_hybrid(),
            "Candidate pool built"
        );

        CandidatePool { candidates, mode }
    }
}
