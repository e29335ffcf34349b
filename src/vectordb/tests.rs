use super::qdrant::{collapse_hits, hit_from_scored_point};
use super::similarity::f32_to_f16_vec;
use super::*;
use std::collections::HashMap;
use std::io::Write;

fn ids(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn small_index() -> InMemoryVectorIndex {
    InMemoryVectorIndex::from_vectors(
        ids(&["alpha", "beta", "gamma", "delta"]),
        &[
            vec![1.0, 0.0, 0.0],
            vec![0.0, 1.0, 0.0],
            vec![0.7, 0.7, 0.0],
            vec![0.7, 0.7, 0.0],
        ],
    )
    .unwrap()
}

#[test]
fn test_cosine_similarity_basics() {
    assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
    assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
    assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    assert_eq!(cosine_similarity(&[1.0], &[1.0, 0.0]), 0.0);
}

#[test]
fn test_f16_bytes_are_little_endian() {
    let bytes = f32_to_embedding_bytes(&[1.0, -2.0]);
    assert_eq!(bytes.len(), 4);
    assert_eq!(bytes, [0x00, 0x3c, 0x00, 0xc0]);
    assert_eq!(f32_to_f16_vec(&[1.0])[0].to_f32(), 1.0);
}

#[test]
fn test_nearest_orders_by_score_then_id() {
    let index = small_index();
    let hits = index.nearest(&[0.6, 0.6, 0.0], 10).unwrap();

    let order: Vec<&str> = hits.iter().map(|h| h.id.as_str()).collect();
    // delta and gamma tie exactly; the id breaks the tie.
    assert_eq!(order[0], "delta");
    assert_eq!(order[1], "gamma");
    assert_eq!(hits.len(), 4);
}

#[test]
fn test_nearest_truncates_to_limit() {
    let index = small_index();
    assert_eq!(index.nearest(&[1.0, 0.0, 0.0], 2).unwrap().len(), 2);
    assert!(index.nearest(&[1.0, 0.0, 0.0], 0).unwrap().is_empty());
}

#[test]
fn test_nearest_rejects_wrong_dimension() {
    let index = small_index();
    let err = index.nearest(&[1.0, 0.0], 3).unwrap_err();
    assert!(matches!(
        err,
        VectorDbError::InvalidDimension {
            expected: 3,
            actual: 2
        }
    ));
}

#[test]
fn test_duplicate_ids_keep_best_row_and_skip_empty_ids() {
    let index = InMemoryVectorIndex::from_vectors(
        ids(&["same", "same", ""]),
        &[vec![1.0, 0.0], vec![0.0, 1.0], vec![1.0, 0.0]],
    )
    .unwrap();

    let hits = index.nearest(&[0.0, 1.0], 10).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, "same");
    assert!((hits[0].score - 1.0).abs() < 1e-3);
}

#[test]
fn test_from_vectors_validates_shape() {
    assert!(matches!(
        InMemoryVectorIndex::from_vectors(ids(&["a"]), &[vec![1.0], vec![2.0]]),
        Err(VectorDbError::RowCountMismatch { .. })
    ));
    assert!(matches!(
        InMemoryVectorIndex::from_vectors(ids(&["a", "b"]), &[vec![1.0, 0.0], vec![2.0]]),
        Err(VectorDbError::InvalidDimension { .. })
    ));
}

#[test]
fn test_open_memory_mapped_matrix() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    for row in [[1.0f32, 0.0], [0.0, 1.0]] {
        file.write_all(&f32_to_embedding_bytes(&row)).unwrap();
    }
    file.flush().unwrap();

    let index = InMemoryVectorIndex::open(file.path(), 2, ids(&["x", "y"])).unwrap();
    assert_eq!(index.row_count(), 2);

    let hits = index.nearest(&[0.0, 1.0], 1).unwrap();
    assert_eq!(hits[0].id, "y");
}

#[test]
fn test_open_rejects_row_count_mismatch() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&f32_to_embedding_bytes(&[1.0, 0.0])).unwrap();
    file.flush().unwrap();

    let err = InMemoryVectorIndex::open(file.path(), 2, ids(&["x", "y"])).unwrap_err();
    assert!(matches!(
        err,
        VectorDbError::RowCountMismatch {
            expected: 2,
            actual: 1
        }
    ));
}

#[test]
fn test_open_rejects_partial_rows() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&f32_to_embedding_bytes(&[1.0, 0.0, 0.5])).unwrap();
    file.flush().unwrap();

    let err = InMemoryVectorIndex::open(file.path(), 2, ids(&["x"])).unwrap_err();
    assert!(matches!(
        err,
        VectorDbError::InvalidEmbeddingBytesLength { row_bytes: 4, .. }
    ));
}

#[test]
fn test_open_missing_file() {
    let err = InMemoryVectorIndex::open(std::path::Path::new("/no/index.f16"), 2, vec![])
        .unwrap_err();
    assert!(matches!(err, VectorDbError::Io { .. }));
}

#[tokio::test]
async fn test_trait_search_matches_nearest() {
    let index = small_index();
    let direct = index.nearest(&[0.0, 1.0, 0.0], 3).unwrap();
    let via_trait = VectorIndex::search(&index, &[0.0, 1.0, 0.0], 3).await.unwrap();
    assert_eq!(direct, via_trait);
    assert_eq!(index.name(), "in-memory");
}

#[tokio::test]
async fn test_mock_index_can_fail() {
    let mock = MockVectorIndex::new(small_index());
    assert!(mock.search(&[1.0, 0.0, 0.0], 2).await.is_ok());

    mock.set_failing(true);
    assert!(matches!(
        mock.search(&[1.0, 0.0, 0.0], 2).await,
        Err(VectorDbError::SearchFailed { .. })
    ));
    assert_eq!(mock.call_count(), 2);
}

#[test]
fn test_scored_point_mapping_canonicalizes_url() {
    let mut payload = HashMap::new();
    payload.insert(
        "url".to_string(),
        qdrant_client::qdrant::Value::from(
            "https://www.shl.com/solutions/products/product-catalog/view/java-8-new/".to_string(),
        ),
    );
    let point = qdrant_client::qdrant::ScoredPoint {
        payload,
        score: 0.8,
        ..Default::default()
    };

    let hit = hit_from_scored_point(&point).unwrap();
    assert_eq!(hit.id, "java-8-new");
    assert_eq!(hit.score, 0.8);

    let empty = qdrant_client::qdrant::ScoredPoint::default();
    assert!(hit_from_scored_point(&empty).is_none());
}

#[test]
fn test_collapse_hits_keeps_max_per_id() {
    let hits = collapse_hits(vec![
        VectorHit {
            id: "b".into(),
            score: 0.5,
        },
        VectorHit {
            id: "a".into(),
            score: 0.2,
        },
        VectorHit {
            id: "a".into(),
            score: 0.5,
        },
    ]);
    assert_eq!(
        hits,
        vec![
            VectorHit {
                id: "a".into(),
                score: 0.5
            },
            VectorHit {
                id: "b".into(),
                score: 0.5
            },
        ]
    );
}
