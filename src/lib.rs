//! Assessment recommender library crate (used by the server binary and integration tests).
//!
//! Given a free-text query or job description, recommends 1 to 10 catalog
//! assessments:
//!
//! ```text
//! query ─► QueryAnalyzer ─► CandidateGenerator ─► FeatureExtractor ─► Reranker ─► ResultAssembler
//!                              │        │
//!                         VectorIndex  CatalogStore
//! ```
//!
//! # Public API Surface
//!
//! ## Core Types
//! - [`Config`], [`ConfigError`] - Environment configuration
//! - [`RecommenderContext`] - Loaded catalog, index and embedder
//! - [`Recommender`], [`Recommendation`] - The request pipeline
//!
//! ## Stages
//! - [`QueryAnalyzer`], [`QueryContext`] - Query parsing
//! - [`CandidateGenerator`], [`CandidatePool`] - Hybrid retrieval
//! - [`FeatureExtractor`], [`FeatureVector`] - Ranking features
//! - [`Reranker`] - Learned, rule-based or judged scoring
//! - [`ResultAssembler`], [`RankedResult`] - Final list
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod assembly;
pub mod catalog;
pub mod config;
pub mod constants;
pub mod embedding;
pub mod engine;
pub mod evaluation;
pub mod features;
pub mod gateway;
pub mod hashing;
pub mod query;
pub mod rerank;
pub mod retrieval;
pub mod vectordb;

pub use assembly::{AssemblyConfig, AssemblyError, RankedResult, ResultAssembler};
pub use catalog::{Assessment, AssessmentRecord, CatalogError, CatalogStore, TestType, canonicalize};
pub use config::{Config, ConfigError};
pub use constants::{MAX_RESULTS, MIN_RESULTS};
pub use embedding::{CachedEmbedder, EmbeddingError, HttpEmbedder, QueryEmbedder};
pub use engine::{EngineError, PipelineConfig, Recommendation, Recommender, RecommenderContext};
pub use evaluation::{EvaluationReport, LabeledQuery, evaluate_batch, recall_at_k};
pub use features::{FEATURE_DIM, Feature, FeatureError, FeatureExtractor, FeatureSchema, FeatureVector};
pub use hashing::{catalog_fingerprint, hash_to_u64};
pub use query::{QueryAnalyzer, QueryContext, Vocabulary};
pub use rerank::{
    JudgeConfig, JudgeError, RerankError, RerankOutcome, Reranker, RerankerKind, RuleReranker,
    RuleWeights,
};
pub use retrieval::{BlendWeights, Candidate, CandidateGenerator, CandidatePool, RetrievalMode};
pub use vectordb::{InMemoryVectorIndex, QdrantVectorIndex, VectorDbError, VectorIndex};

#[cfg(any(test, feature = "mock"))]
pub use embedding::MockEmbedder;
#[cfg(any(test, feature = "mock"))]
pub use rerank::MockJudge;
#[cfg(any(test, feature = "mock"))]
pub use vectordb::MockVectorIndex;
