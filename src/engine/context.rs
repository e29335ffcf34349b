use std::sync::Arc;

use tracing::{info, warn};

use super::error::EngineError;
use crate::catalog::CatalogStore;
use crate::config::{Config, ConfigError};
use crate::constants::DEFAULT_EMBEDDING_CACHE_CAPACITY;
use crate::embedding::{CachedEmbedder, HttpEmbedder, QueryEmbedder};
use crate::query::{QueryAnalyzer, Vocabulary};
use crate::vectordb::{InMemoryVectorIndex, QdrantVectorIndex, VectorIndex};

/// Process-wide, read-only state shared by all requests.
///
/// Built once by [`RecommenderContext::load`] (or from parts in tests) and
/// passed explicitly; nothing here is mutated while requests run.
pub struct RecommenderContext {
    catalog: CatalogStore,
    analyzer: QueryAnalyzer,
    index: Option<Arc<dyn VectorIndex>>,
    embedder: Option<Arc<dyn QueryEmbedder>>,
}

impl std::fmt::Debug for RecommenderContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecommenderContext")
            .field("catalog_entries", &self.catalog.len())
            .field("index", &self.index.as_ref().map(|i| i.name()))
            .field("embedder", &self.embedder.as_ref().map(|e| e.name().to_string()))
            .finish()
    }
}

impl RecommenderContext {
    /// Context without vector search; requests rank lexically until an index is attached.
    pub fn from_parts(catalog: CatalogStore, analyzer: QueryAnalyzer) -> Self {
        Self {
            catalog,
            analyzer,
            index: None,
            embedder: None,
        }
    }

    pub fn with_index(mut self, index: Arc<dyn VectorIndex>) -> Self {
        self.index = Some(index);
        self
    }

    pub fn with_embedder(mut self, embedder: Arc<dyn QueryEmbedder>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// Loads catalog, vocabulary, index and embedder as configured.
    pub async fn load(config: &Config) -> Result<Self, EngineError> {
        config.validate()?;

        let catalog = CatalogStore::load(&config.catalog_path)?;

        let vocabulary = match &config.vocabulary_path {
            Some(path) => Vocabulary::load(path)?,
            None => Vocabulary::default(),
        };
        let analyzer = QueryAnalyzer::new(vocabulary)?;

        let index: Arc<dyn VectorIndex> = match (&config.qdrant_url, &config.index_path) {
            (Some(url), _) => Arc::new(
                QdrantVectorIndex::connect(url, &config.qdrant_collection, config.embedding_dim)
                    .await?,
            ),
            (None, Some(path)) => Arc::new(InMemoryVectorIndex::open(
                path,
                config.embedding_dim,
                catalog.row_ids().to_vec(),
            )?),
            (None, None) => {
                return Err(EngineError::Config(ConfigError::MissingEnvVar {
                    name: "RECOMMENDER_INDEX_PATH",
                }));
            }
        };

        let mut context = Self::from_parts(catalog, analyzer).with_index(index);

        match &config.embedding_url {
            Some(url) => {
                let http = HttpEmbedder::new(
                    url.clone(),
                    config.embedding_model.clone(),
                    config.embedding_api_key.clone(),
                    config.embedding_dim,
                    config.embedding_timeout,
                )?;
                context = context.with_embedder(Arc::new(CachedEmbedder::new(
                    Arc::new(http),
                    DEFAULT_EMBEDDING_CACHE_CAPACITY,
                )));
            }
            None => warn!("No embedding endpoint configured; ranking will be lexical only"),
        }

        context.validate()?;
        info!(
            entries = context.catalog.len(),
            fingerprint = %context.catalog.fingerprint(),
            index = context.index.as_ref().map(|i| i.name()),
            "Recommender context loaded"
        );
        Ok(context)
    }

    /// Embedder and index must agree on the vector dimension.
    pub fn validate(&self) -> Result<(), EngineError> {
        if let (Some(index), Some(embedder)) = (&self.index, &self.embedder) {
            if index.dimension() != embedder.dimension() {
                return Err(EngineError::DimensionMismatch {
                    embedder: embedder.dimension(),
                    index: index.dimension(),
                });
            }
        }
        Ok(())
    }

    /// True once the catalog and the vector index are loaded.
    pub fn is_ready(&self) -> bool {
        !self.catalog.is_empty() && self.index.is_some()
    }

    pub fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    pub fn analyzer(&self) -> &QueryAnalyzer {
        &self.analyzer
    }

    pub fn index(&self) -> Option<&dyn VectorIndex> {
        self.index.as_deref()
    }

    pub fn embedder(&self) -> Option<&dyn QueryEmbedder> {
        self.embedder.as_deref()
    }
}
