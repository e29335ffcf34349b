use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use tempfile::TempDir;

use super::*;
use crate::catalog::CatalogStore;
use crate::config::Config;
use crate::embedding::MockEmbedder;
use crate::query::QueryAnalyzer;
use crate::rerank::{RerankOutcome, Reranker, RerankerKind};
use crate::retrieval::RetrievalMode;
use crate::vectordb::{InMemoryVectorIndex, f32_to_embedding_bytes};

const DIM: usize = 32;

fn catalog_json() -> String {
    serde_json::json!([
        {"url": "https://x.com/view/java-8-new/", "name": "Java 8 (New)",
         "description": "Java class design and collections.", "duration": 18, "test_type": ["K"]},
        {"url": "https://x.com/view/opq32r/", "name": "Occupational Personality Questionnaire OPQ32r",
         "description": "Personality and behavior at work.", "duration": 25, "test_type": ["P"]},
        {"url": "https://x.com/view/unlabelled/", "name": "Unlabelled", "description": "", "test_type": []},
        {"url": "https://x.com/view/verify-numerical/", "name": "Verify Numerical Ability",
         "description": "Numerical reasoning.", "duration": 20, "test_type": ["A"]}
    ])
    .to_string()
}

fn text_of(catalog: &CatalogStore, id: &str) -> String {
    catalog
        .get(id)
        .map(|a| format!("{} {}", a.name, a.description))
        .unwrap_or_default()
}

/// Catalog file plus an F16 index with one row per file row (dropped rows included).
fn write_fixture(dir: &TempDir) -> (PathBuf, PathBuf) {
    let catalog_path = dir.path().join("catalog.json");
    std::fs::write(&catalog_path, catalog_json()).unwrap();

    let catalog = CatalogStore::from_json(&catalog_json()).unwrap();
    let embedder = MockEmbedder::new(DIM);
    let index_path = dir.path().join("index.f16");
    let mut file = std::fs::File::create(&index_path).unwrap();
    for id in catalog.row_ids() {
        let vector = embedder.embed_text(&text_of(&catalog, id));
        file.write_all(&f32_to_embedding_bytes(&vector)).unwrap();
    }
    (catalog_path, index_path)
}

fn config_for(catalog_path: PathBuf, index_path: Option<PathBuf>) -> Config {
    Config {
        catalog_path,
        index_path,
        embedding_dim: DIM,
        ..Config::default()
    }
}

fn lexical_context() -> Arc<RecommenderContext> {
    let catalog = CatalogStore::from_json(&catalog_json()).unwrap();
    Arc::new(RecommenderContext::from_parts(
        catalog,
        QueryAnalyzer::with_defaults().unwrap(),
    ))
}

fn offline_pipeline() -> PipelineConfig {
    PipelineConfig {
        fetch_timeout: None,
        ..PipelineConfig::default()
    }
}

#[test]
fn test_context_readiness() {
    let catalog = CatalogStore::from_json(&catalog_json()).unwrap();
    let context = RecommenderContext::from_parts(catalog, QueryAnalyzer::with_defaults().unwrap());
    assert!(!context.is_ready());

    let index = InMemoryVectorIndex::from_vectors(vec!["java-8-new".to_string()], &[vec![1.0; DIM]]).unwrap();
    let context = context.with_index(Arc::new(index));
    assert!(context.is_ready());
}

#[test]
fn test_context_rejects_dimension_mismatch() {
    let catalog = CatalogStore::from_json(&catalog_json()).unwrap();
    let index = InMemoryVectorIndex::from_vectors(vec!["java-8-new".to_string()], &[vec![1.0; DIM]]).unwrap();
    let context = RecommenderContext::from_parts(catalog, QueryAnalyzer::with_defaults().unwrap())
        .with_index(Arc::new(index))
        .with_embedder(Arc::new(MockEmbedder::new(DIM * 2)));
    assert!(matches!(
        context.validate(),
        Err(EngineError::DimensionMismatch { .. })
    ));
}

#[tokio::test]
async fn test_load_from_files() {
    let dir = TempDir::new().unwrap();
    let (catalog_path, index_path) = write_fixture(&dir);

    let context = RecommenderContext::load(&config_for(catalog_path, Some(index_path)))
        .await
        .unwrap();
    assert!(context.is_ready());
    assert_eq!(context.catalog().len(), 3);
    assert!(context.embedder().is_none());
}

#[tokio::test]
async fn test_load_rejects_misaligned_index() {
    let dir = TempDir::new().unwrap();
    let (catalog_path, _) = write_fixture(&dir);
    let short = dir.path().join("short.f16");
    std::fs::write(&short, f32_to_embedding_bytes(&vec![0.5; DIM])).unwrap();

    let err = RecommenderContext::load(&config_for(catalog_path, Some(short)))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Index(_)));
}

#[tokio::test]
async fn test_load_requires_an_index() {
    let dir = TempDir::new().unwrap();
    let (catalog_path, _) = write_fixture(&dir);
    assert!(RecommenderContext::load(&config_for(catalog_path, None)).await.is_err());
}

#[tokio::test]
async fn test_load_rejects_missing_catalog() {
    let dir = TempDir::new().unwrap();
    let (_, index_path) = write_fixture(&dir);
    let missing = dir.path().join("nope.json");
    assert!(RecommenderContext::load(&config_for(missing, Some(index_path))).await.is_err());
}

#[test]
fn test_pipeline_config_from_config() {
    let config = Config {
        pool_size: 25,
        judge_retries: 5,
        ..Config::default()
    };
    let pipeline = PipelineConfig::from_config(&config);
    assert_eq!(pipeline.generator.pool_size, 25);
    assert_eq!(pipeline.judge.retries, 5);
    assert!(pipeline.validate().is_ok());
}

#[test]
fn test_recommender_from_config_selects_variant() {
    let judge = Config {
        reranker: RerankerKind::Judge,
        ..Config::default()
    };
    let recommender = Recommender::from_config(lexical_context(), &judge).unwrap();
    assert_eq!(recommender.reranker().kind(), RerankerKind::Judge);

    // No model file configured: learned falls back to rules.
    let learned = Config::default();
    let recommender = Recommender::from_config(lexical_context(), &learned).unwrap();
    assert_eq!(recommender.reranker().kind(), RerankerKind::Rules);
}

#[tokio::test]
async fn test_recommend_lexical_only() {
    let recommender = Recommender::new(lexical_context(), Reranker::default(), offline_pipeline()).unwrap();
    let rec = recommender.recommend("Java developer").await;

    assert!(matches!(rec.retrieval, RetrievalMode::LexicalOnly { .. }));
    assert_eq!(rec.rerank, RerankOutcome::Rules);
    assert_eq!(rec.ids().first().copied(), Some("java-8-new"));
    assert_eq!(rec.records.len(), rec.results.len());
    assert_eq!(rec.records[0].name, "Java 8 (New)");
    assert_eq!(rec.records[0].test_type, vec!["Knowledge & Skills".to_string()]);
}

#[tokio::test]
async fn test_recommend_hybrid_and_embedding_failure() {
    let catalog = CatalogStore::from_json(&catalog_json()).unwrap();
    let embedder = Arc::new(MockEmbedder::new(DIM));
    let ids: Vec<String> = catalog.iter().map(|a| a.id.clone()).collect();
    let vectors: Vec<Vec<f32>> = ids.iter().map(|id| embedder.embed_text(&text_of(&catalog, id))).collect();
    let index = InMemoryVectorIndex::from_vectors(ids, &vectors).unwrap();

    let context = Arc::new(
        RecommenderContext::from_parts(catalog, QueryAnalyzer::with_defaults().unwrap())
            .with_index(Arc::new(index))
            .with_embedder(embedder.clone()),
    );
    let recommender = Recommender::new(context, Reranker::default(), offline_pipeline()).unwrap();

    let hybrid = recommender.recommend("personality questionnaire").await;
    assert_eq!(hybrid.retrieval, RetrievalMode::Hybrid);
    assert_eq!(hybrid.ids().first().copied(), Some("opq32r"));

    embedder.set_failing(true);
    let degraded = recommender.recommend("personality questionnaire").await;
    assert!(matches!(degraded.retrieval, RetrievalMode::LexicalOnly { .. }));
    assert_eq!(degraded.ids().first().copied(), Some("opq32r"));
}

#[tokio::test]
async fn test_recommend_empty_query() {
    let recommender = Recommender::new(lexical_context(), Reranker::default(), offline_pipeline()).unwrap();
    let rec = recommender.recommend("   ").await;
    assert!(rec.results.is_empty());
    assert!(rec.records.is_empty());
}

#[tokio::test]
async fn test_url_query_without_fetcher_is_analyzed_as_text() {
    let recommender = Recommender::new(lexical_context(), Reranker::default(), offline_pipeline()).unwrap();
    let rec = recommender
        .recommend("https://jobs.example.com/java-developer")
        .await;
    assert_eq!(rec.query.raw, "https://jobs.example.com/java-developer");
}
