use std::cmp::Ordering;

/// Which retrieval path surfaced a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provenance {
    Vector,
    Lexical,
    Both,
}

impl Provenance {
    pub fn from_paths(vector: bool, lexical: bool) -> Option<Self> {
        match (vector, lexical) {
            (true, true) => Some(Provenance::Both),
            (true, false) => Some(Provenance::Vector),
            (false, true) => Some(Provenance::Lexical),
            (false, false) => None,
        }
    }
}

/// One entry of a request's candidate pool.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Canonical catalog id.
    pub id: String,
    /// Cosine similarity from the vector path; 0 when not reached by it.
    pub semantic_score: f32,
    /// Bounded keyword overlap in [0, 1].
    pub lexical_score: f32,
    pub blend_score: f32,
    pub provenance: Provenance,
}

/// Blend score descending, then id ascending.
pub fn compare_ranked(a: &Candidate, b: &Candidate) -> Ordering {
    match b.blend_score.total_cmp(&a.blend_score) {
        Ordering::Equal => a.id.cmp(&b.id),
        other => other,
    }
}

/// How the pool was produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetrievalMode {
    Hybrid,
    /// The vector path was unavailable or failed.
    LexicalOnly { reason: String },
}

impl RetrievalMode {
    pub fn is_hybrid(&self) -> bool {
        matches!(self, RetrievalMode::Hybrid)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CandidatePool {
    /// Ranked by [`compare_ranked`], at most K entries, unique ids.
    pub candidates: Vec<Candidate>,
    pub mode: RetrievalMode,
}

impl CandidatePool {
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}
