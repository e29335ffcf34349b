//! Weighted merge of the vector and lexical rankings.
//!
//! Pure functions; no catalog or network access.

use std::collections::BTreeMap;

use super::candidate::{Candidate, Provenance, compare_ranked};
use super::error::RetrievalError;
use crate::constants::{DEFAULT_LEXICAL_WEIGHT, DEFAULT_SEMANTIC_WEIGHT};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlendWeights {
    pub semantic: f32,
    pub lexical: f32,
}

impl Default for BlendWeights {
    fn default() -> Self {
        Self {
            semantic: DEFAULT_SEMANTIC_WEIGHT,
            lexical: DEFAULT_LEXICAL_WEIGHT,
        }
    }
}

impl BlendWeights {
    /// Both weights finite and non-negative, semantic strictly heavier.
    pub fn validate(&self) -> Result<(), RetrievalError> {
        let ok = self.semantic.is_finite()
            && self.lexical.is_finite()
            && self.lexical >= 0.0
            && self.semantic > self.lexical;
        if ok {
            Ok(())
        } else {
            Err(RetrievalError::InvalidWeights {
                semantic: self.semantic,
                lexical: self.lexical,
            })
        }
    }

    #[inline]
    pub fn blend_score(&self, semantic: f32, lexical: f32) -> f32 {
        self.semantic * semantic + self.lexical * lexical
    }
}

/// Merges two scored lists keyed by canonical id.
///
/// A repeated id within one list keeps its best score. An id found by both
/// paths is scored once from both components. Output is ranked by
/// [`compare_ranked`] and truncated to `limit`.
pub fn merge_rankings(
    vector: &[(String, f32)],
    lexical: &[(String, f32)],
    weights: &BlendWeights,
    limit: usize,
) -> Vec<Candidate> {
    let mut merged: BTreeMap<&str, (Option<f32>, Option<f32>)> = BTreeMap::new();

    for (id, score) in vector {
        let slot = merged.entry(id.as_str()).or_default();
        slot.0 = Some(slot.0.map_or(*score, |s| s.max(*score)));
    }
    for (id, score) in lexical {
        let slot = merged.entry(id.as_str()).or_default();
        slot.1 = Some(slot.1.map_or(*score, |s| s.max(*score)));
    }

    let mut candidates: Vec<Candidate> = merged
        .into_iter()
        .filter_map(|(id, (semantic, lexical))| {
            let provenance = Provenance::from_paths(semantic.is_some(), lexical.is_some())?;
            let semantic_score = semantic.unwrap_or(0.0);
            let lexical_score = lexical.unwrap_or(0.0);
            Some(Candidate {
                id: id.to_string(),
                semantic_score,
                lexical_score,
                blend_score: weights.blend_score(semantic_score, lexical_score),
                provenance,
            })
        })
        .collect();

    candidates.sort_by(compare_ranked);
    candidates.truncate(limit);
    candidates
}
