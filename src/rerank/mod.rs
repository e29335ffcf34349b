//! Candidate scoring strategies.
//!
//! | Variant | Input | Failure mode |
//! |---------|-------|--------------|
//! | [`LearnedReranker`] | feature vectors | none at request time |
//! | [`RuleReranker`] | feature vectors + query | none |
//! | [`JudgeReranker`] | query text + candidate listing | falls back to rules |
//!
//! The variant is chosen by configuration ([`RerankerKind`]).

pub mod error;
pub mod judge;
pub mod learned;
pub mod rules;


use std::fmt;
use std::path::Path;
use std::str::FromStr;

use tracing::warn;

pub use error::{JudgeError, RerankError};
#[cfg(any(test, feature = "mock"))]
pub use judge::MockJudge;
pub use judge::{
    GenaiJudge, JudgeCandidate, JudgeConfig, JudgePrompt, JudgeReranker, RelevanceJudge,
    parse_ranked_urls,
};
pub use learned::{LearnedReranker, Node, Tree, TreeEnsemble, sigmoid};
pub use rules::{RuleReranker, RuleWeights};

use crate::catalog::CatalogStore;
use crate::features::FeaturedCandidate;
use crate::query::QueryContext;
use crate::retrieval::Candidate;

/// Configured scoring strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RerankerKind {
    Learned,
    Rules,
    Judge,
}

impl RerankerKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RerankerKind::Learned => "learned",
            RerankerKind::Rules => "rules",
            RerankerKind::Judge => "judge",
        }
    }
}

impl FromStr for RerankerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "learned" | "model" => Ok(RerankerKind::Learned),
            "rules" | "rule" | "rule-based" => Ok(RerankerKind::Rules),
            "judge" | "llm" => Ok(RerankerKind::Judge),
            other => Err(format!("unknown reranker '{other}' (expected learned, rules or judge)")),
        }
    }
}

impl fmt::Display for RerankerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One query's pool as seen by a reranker.
#[derive(Debug, Clone, Copy)]
pub struct RerankInput<'a> {
    pub query: &'a QueryContext,
    pub items: &'a [FeaturedCandidate],
    pub catalog: &'a CatalogStore,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub candidate: Candidate,
    /// Relevance; higher is better. Comparable only within one request.
    pub score: f32,
}

/// Which strategy produced the scores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RerankOutcome {
    Learned,
    Rules,
    Judged,
    /// The judge was configured but failed; scores are rule-based.
    JudgeFallback { reason: String },
}

impl RerankOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            RerankOutcome::Learned => "learned",
            RerankOutcome::Rules => "rules",
            RerankOutcome::Judged => "judge",
            RerankOutcome::JudgeFallback { .. } => "judge_fallback",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reranked {
    /// Same candidates as the input, in no particular order.
    pub scored: Vec<ScoredCandidate>,
    pub outcome: RerankOutcome,
}

#[derive(Debug)]
pub enum Reranker {
    Learned(LearnedReranker),
    Rules(RuleReranker),
    Judge(JudgeReranker),
}

impl Reranker {
    /// Learned model from `model_path`, or rules when no model file exists.
    ///
    /// A model file that exists but does not load is an error.
    pub fn learned_or_rules(model_path: Option<&Path>, rules: RuleReranker) -> Result<Self, RerankError> {
        match model_path {
            Some(path) if path.is_file() => Ok(Reranker::Learned(LearnedReranker::load(path)?)),
            Some(path) => {
                warn!(path = %path.display(), "Ranking model not found; using rule-based scoring");
                Ok(Reranker::Rules(rules))
            }
            None => {
                warn!("No ranking model configured; using rule-based scoring");
                Ok(Reranker::Rules(rules))
            }
        }
    }

    pub fn kind(&self) -> RerankerKind {
        match self {
            Reranker::Learned(_) => RerankerKind::Learned,
            Reranker::Rules(_) => RerankerKind::Rules,
            Reranker::Judge(_) => RerankerKind::Judge,
        }
    }

    pub async fn rerank(&self, input: &RerankInput<'_>) -> Reranked {
        match self {
            Reranker::Learned(model) => Reranked {
                scored: model.score_all(input),
                outcome: RerankOutcome::Learned,
            },
            Reranker::Rules(rules) => Reranked {
                scored: rules.score_all(input),
                outcome: RerankOutcome::Rules,
            },
            Reranker::Judge(judge) => judge.rerank(input).await,
        }
    }
}

impl Default for Reranker {
    fn default() -> Self {
        Reranker::Rules(RuleReranker::default())
    }
}
