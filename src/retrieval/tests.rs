use super::*;
use crate::catalog::CatalogStore;
use crate::embedding::MockEmbedder;
use crate::query::QueryAnalyzer;
use crate::vectordb::{InMemoryVectorIndex, MockVectorIndex};

fn catalog() -> CatalogStore {
    let json = serde_json::json!([
        {"url": "https://x.com/view/java-8-new/", "name": "Java 8 (New)",
         "description": "Multi-choice test of Java class design.", "duration": 18,
         "test_type": ["K"]},
        {"url": "https://x.com/view/interpersonal-communications/", "name": "Interpersonal Communications",
         "description": "Measures how well candidates collaborate and communicate with stakeholders.",
         "duration": 15, "test_type": ["P"]},
        {"url": "https://x.com/view/verify-numerical/", "name": "Verify Numerical Ability",
         "description": "Numerical reasoning test.", "duration": 20, "test_type": ["A"]},
        {"url": "https://x.com/view/gardening/", "name": "Landscape Gardening",
         "description": "Plants and soil.", "duration": 30, "test_type": ["K"]}
    ]);
    CatalogStore::from_json(&json.to_string()).unwrap()
}

fn index_for(catalog: &CatalogStore, embedder: &MockEmbedder) -> InMemoryVectorIndex {
    let vectors: Vec<Vec<f32>> = catalog
        .iter()
        .map(|a| embedder.embed_text(&format!("{} {}", a.name, a.description)))
        .collect();
    let ids = catalog.iter().map(|a| a.id.clone()).collect();
    InMemoryVectorIndex::from_vectors(ids, &vectors).unwrap()
}

fn pair(id: &str, score: f32) -> (String, f32) {
    (id.to_string(), score)
}

#[test]
fn test_blend_weights_validation() {
    assert!(BlendWeights::default().validate().is_ok());
    assert!(
        BlendWeights {
            semantic: 0.3,
            lexical: 0.7
        }
        .validate()
        .is_err()
    );
    assert!(
        BlendWeights {
            semantic: f32::NAN,
            lexical: 0.1
        }
        .validate()
        .is_err()
    );
    assert!(
        BlendWeights {
            semantic: 0.5,
            lexical: -0.1
        }
        .validate()
        .is_err()
    );
}

#[test]
fn test_merge_scores_shared_ids_once() {
    let weights = BlendWeights::default();
    let merged = merge_rankings(
        &[pair("a", 0.9), pair("b", 0.5)],
        &[pair("b", 1.0), pair("c", 0.4)],
        &weights,
        10,
    );

    assert_eq!(merged.len(), 3);
    let b = merged.iter().find(|c| c.id == "b").unwrap();
    assert_eq!(b.provenance, Provenance::Both);
    assert!((b.blend_score - (0.7 * 0.5 + 0.3 * 1.0)).abs() < 1e-6);

    let c = merged.iter().find(|c| c.id == "c").unwrap();
    assert_eq!(c.provenance, Provenance::Lexical);
    assert_eq!(c.semantic_score, 0.0);
}

#[test]
fn test_merge_keeps_best_score_per_path() {
    let merged = merge_rankings(
        &[pair("a", 0.2), pair("a", 0.8)],
        &[],
        &BlendWeights::default(),
        10,
    );
    assert_eq!(merged.len(), 1);
    assert!((merged[0].semantic_score - 0.8).abs() < 1e-6);
    assert_eq!(merged[0].provenance, Provenance::Vector);
}

#[test]
fn test_merge_ties_break_by_id_and_truncate() {
    let merged = merge_rankings(
        &[pair("zeta", 0.5), pair("alpha", 0.5), pair("mid", 0.5)],
        &[],
        &BlendWeights::default(),
        2,
    );
    let ids: Vec<&str> = merged.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["alpha", "mid"]);
}

#[test]
fn test_merge_is_independent_of_input_order() {
    let weights = BlendWeights::default();
    let a = merge_rankings(
        &[pair("x", 0.4), pair("y", 0.6)],
        &[pair("y", 0.1), pair("z", 0.9)],
        &weights,
        10,
    );
    let b = merge_rankings(
        &[pair("y", 0.6), pair("x", 0.4)],
        &[pair("z", 0.9), pair("y", 0.1)],
        &weights,
        10,
    );
    assert_eq!(a, b);
}

#[test]
fn test_lexical_score_prefers_name_matches() {
    let catalog = catalog();
    let ctx = QueryAnalyzer::with_defaults().unwrap().analyze("Java developer");

    let java = lexical_score(&ctx, &EntryText::new(catalog.get("java-8-new").unwrap()));
    let garden = lexical_score(&ctx, &EntryText::new(catalog.get("gardening").unwrap()));

    assert!(java > 0.3, "java score {java}");
    assert_eq!(garden, 0.0);
    assert!(java <= 1.0);
}

#[test]
fn test_lexical_score_zero_for_empty_query() {
    let catalog = catalog();
    let ctx = QueryAnalyzer::with_defaults().unwrap().analyze("");
    for a in catalog.iter() {
        assert_eq!(lexical_score(&ctx, &EntryText::new(a)), 0.0);
    }
}

#[test]
fn test_generator_rejects_small_pool() {
    let config = GeneratorConfig {
        pool_size: 5,
        ..Default::default()
    };
    assert!(matches!(
        CandidateGenerator::new(config),
        Err(RetrievalError::PoolTooSmall { .. })
    ));
}

#[tokio::test]
async fn test_generate_hybrid() {
    let catalog = catalog();
    let embedder = MockEmbedder::new(64);
    let index = index_for(&catalog, &embedder);
    let ctx = QueryAnalyzer::with_defaults().unwrap().analyze("Java developer");
    let vector = embedder.embed_text(&ctx.expanded_text);

    let pool = CandidateGenerator::default()
        .generate(&ctx, &catalog, Some(&index), Some(&vector))
        .await;

    assert_eq!(pool.mode, RetrievalMode::Hybrid);
    assert_eq!(pool.candidates[0].id, "java-8-new");
    assert_eq!(pool.candidates[0].provenance, Provenance::Both);

    let ids: std::collections::HashSet<_> = pool.candidates.iter().map(|c| &c.id).collect();
    assert_eq!(ids.len(), pool.len());
    assert!(pool.candidates.windows(2).all(|w| compare_ranked(&w[0], &w[1]).is_le()));
}

#[tokio::test]
async fn test_generate_falls_back_when_index_fails() {
    let catalog = catalog();
    let embedder = MockEmbedder::new(64);
    let index = MockVectorIndex::new(index_for(&catalog, &embedder));
    index.set_failing(true);

    let ctx = QueryAnalyzer::with_defaults().unwrap().analyze("Java developer");
    let vector = embedder.embed_text(&ctx.expanded_text);

    let pool = CandidateGenerator::default()
        .generate(&ctx, &catalog, Some(&index), Some(&vector))
        .await;

    assert!(matches!(pool.mode, RetrievalMode::LexicalOnly { .. }));
    assert!(!pool.is_empty());
    assert_eq!(pool.candidates[0].id, "java-8-new");
    assert!(pool.candidates.iter().all(|c| c.provenance == Provenance::Lexical));
}

#[tokio::test]
async fn test_generate_without_vector_is_lexical_only() {
    let catalog = catalog();
    let ctx = QueryAnalyzer::with_defaults()
        .unwrap()
        .analyze("numerical reasoning");

    let pool = CandidateGenerator::default()
        .generate(&ctx, &catalog, None, None)
        .await;

    assert!(!pool.mode.is_hybrid());
    assert_eq!(pool.candidates[0].id, "verify-numerical");
}

#[tokio::test]
async fn test_generate_drops_ids_unknown_to_catalog() {
    let catalog = catalog();
    let index = InMemoryVectorIndex::from_vectors(
        vec!["ghost".to_string(), "java-8-new".to_string()],
        &[vec![1.0, 0.0], vec![0.9, 0.1]],
    )
    .unwrap();
    let ctx = QueryAnalyzer::with_defaults().unwrap().analyze("");

    let pool = CandidateGenerator::default()
        .generate(&ctx, &catalog, Some(&index), Some(&[1.0, 0.0]))
        .await;

    let ids: Vec<&str> = pool.candidates.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["java-8-new"]);
}

#[tokio::test]
async fn test_generate_empty_query_without_vector_is_empty() {
    let catalog = catalog();
    let ctx = QueryAnalyzer::with_defaults().unwrap().analyze("");
    let pool = CandidateGenerator::default()
        .generate(&ctx, &catalog, None, None)
        .await;
    assert!(pool.is_empty());
}
