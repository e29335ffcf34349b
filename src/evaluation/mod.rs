//! Recall@K over labeled queries, run through the full pipeline.
//!
//! Relevant URLs are canonicalized against the catalog before matching, so
//! alternate spellings of an entry's URL count as the same entry.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::engine::Recommender;

/// A query with the URLs a human judged relevant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledQuery {
    pub query: String,
    pub relevant: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryRecall {
    pub query: String,
    pub recall: f32,
    pub hits: usize,
    pub relevant: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationReport {
    pub k: usize,
    pub per_query: Vec<QueryRecall>,
    /// Mean over queries with at least one relevant entry.
    pub mean_recall: f32,
}

/// Fraction of `relevant` found in the first `k` of `predicted`; 0 when nothing is relevant.
pub fn recall_at_k<S: AsRef<str>>(predicted: &[S], relevant: &HashSet<String>, k: usize) -> f32 {
    if relevant.is_empty() {
        return 0.0;
    }
    hits_at_k(predicted, relevant, k) as f32 / relevant.len() as f32
}

/// Distinct relevant ids among the first `k` predictions.
pub fn hits_at_k<S: AsRef<str>>(predicted: &[S], relevant: &HashSet<String>, k: usize) -> usize {
    let mut found: HashSet<&str> = HashSet::new();
    for id in predicted.iter().take(k) {
        let id: &str = id.as_ref();
        if relevant.contains(id) {
            found.insert(id);
        }
    }
    found.len()
}

/// Groups `(query, url)` rows into labeled queries, first-seen order.
pub fn group_labeled_pairs<I, Q, U>(rows: I) -> Vec<LabeledQuery>
where
    I: IntoIterator<Item = (Q, U)>,
    Q: Into<String>,
    U: Into<String>,
{
    let mut grouped: Vec<LabeledQuery> = Vec::new();
    for (query, url) in rows {
        let query = query.into();
        let url = url.into();
        match grouped.iter_mut().find(|g| g.query == query) {
            Some(group) => {
                if !group.relevant.contains(&url) {
                    group.relevant.push(url);
                }
            }
            None => grouped.push(LabeledQuery {
                query,
                relevant: vec![url],
            }),
        }
    }
    grouped
}

/// Runs every query and reports per-query and mean Recall@K.
pub async fn evaluate_batch(recommender: &Recommender, queries: &[LabeledQuery], k: usize) -> EvaluationReport {
    let catalog = recommender.context().catalog();
    let mut per_query = Vec::with_capacity(queries.len());

    for labeled in queries {
        let relevant: HashSet<String> = labeled
            .relevant
            .iter()
            .map(|url| catalog.canonical_id(url))
            .collect();
        let recommendation = recommender.recommend(&labeled.query).await;
        let predicted = recommendation.ids();
        let recall = recall_at_k(predicted.as_slice(), &relevant, k);
        let hits = hits_at_k(predicted.as_slice(), &relevant, k);

        per_query.push(QueryRecall {
            query: labeled.query.clone(),
            recall,
            hits,
            relevant: relevant.len(),
        });
    }

    let scored: Vec<f32> = per_query
        .iter()
        .filter(|q| q.relevant > 0)
        .map(|q| q.recall)
        .collect();
    let mean_recall = if scored.is_empty() {
        0.0
    } else {
        scored.iter().sum::<f32>() / scored.len() as f32
    };

    info!(queries = per_query.len(), k, mean_recall, "Evaluation finished");
    EvaluationReport {
        k,
        per_query,
        mean_recall,
    }
}
