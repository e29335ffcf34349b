//! External relevance judge with a mandatory rule-based fallback.

pub mod llm;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod prompt;

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

pub use llm::GenaiJudge;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockJudge;
pub use prompt::{JudgeCandidate, JudgePrompt, parse_ranked_urls};

use super::error::JudgeError;
use super::learned::sigmoid;
use super::rules::RuleReranker;
use super::{RerankInput, RerankOutcome, Reranked, ScoredCandidate};
use crate::catalog::CatalogStore;
use crate::constants::{DEFAULT_JUDGE_MAX_CANDIDATES, DEFAULT_JUDGE_RETRIES, DEFAULT_JUDGE_TIMEOUT};

const RETRY_BACKOFF: Duration = Duration::from_millis(100);

/// A text-reasoning service that orders candidates for a query.
#[async_trait]
pub trait RelevanceJudge: Send + Sync {
    fn name(&self) -> &str;

    /// Returns the raw reply; parsing is the caller's job.
    async fn judge(&self, prompt: &JudgePrompt) -> Result<String, JudgeError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct JudgeConfig {
    /// Deadline per attempt.
    pub timeout: Duration,
    /// Attempts after the first.
    pub retries: u32,
    pub max_candidates: usize,
}

impl Default for JudgeConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_JUDGE_TIMEOUT,
            retries: DEFAULT_JUDGE_RETRIES,
            max_candidates: DEFAULT_JUDGE_MAX_CANDIDATES,
        }
    }
}

pub struct JudgeReranker {
    judge: Arc<dyn RelevanceJudge>,
    rules: RuleReranker,
    config: JudgeConfig,
}

impl std::fmt::Debug for JudgeReranker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JudgeReranker")
            .field("judge", &self.judge.name())
            .field("config", &self.config)
            .finish()
    }
}

impl JudgeReranker {
    pub fn new(judge: Arc<dyn RelevanceJudge>, rules: RuleReranker, config: JudgeConfig) -> Self {
        Self {
            judge,
            rules,
            config,
        }
    }

    pub fn rules(&self) -> &RuleReranker {
        &self.rules
    }

    /// Judged order when the judge answers, the rule-based result otherwise.
    pub async fn rerank(&self, input: &RerankInput<'_>) -> Reranked {
        let rule_scores = self.rules.score_all(input);
        // Nothing to judge; report what actually ran.
        if rule_scores.is_empty() {
            return Reranked {
                scored: rule_scores,
                outcome: RerankOutcome::Rules,
            };
        }

        let prompt = self.build_prompt(input, &rule_scores);
        match self.judge_with_retries(&prompt, input).await {
            Ok(order) => {
                debug!(judged = order.len(), pool = rule_scores.len(), "Judge ranking applied");
                Reranked {
                    scored: apply_judgement(&order, rule_scores),
                    outcome: RerankOutcome::Judged,
                }
            }
            Err(e) => {
                warn!(judge = self.judge.name(), error = %e, "Judge failed; using rule-based scores");
                Reranked {
                    scored: rule_scores,
                    outcome: RerankOutcome::JudgeFallback {
                        reason: e.to_string(),
                    },
                }
            }
        }
    }

    /// The best `max_candidates` by rule score, best first.
    fn build_prompt(&self, input: &RerankInput<'_>, rule_scores: &[ScoredCandidate]) -> JudgePrompt {
        let mut ranked: Vec<&ScoredCandidate> = rule_scores.iter().collect();
        ranked.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.candidate.id.cmp(&b.candidate.id))
        });
        let candidates = ranked
            .into_iter()
            .take(self.config.max_candidates)
            .filter_map(|s| input.catalog.get(&s.candidate.id))
            .map(JudgeCandidate::from)
            .collect();
        JudgePrompt {
            query: input.query.text.clone(),
            candidates,
        }
    }

    async fn judge_with_retries(
        &self,
        prompt: &JudgePrompt,
        input: &RerankInput<'_>,
    ) -> Result<Vec<String>, JudgeError> {
        let pool: HashSet<&str> = input.items.iter().map(|i| i.candidate.id.as_str()).collect();
        let attempts = self.config.retries + 1;
        let mut last_error = JudgeError::Request {
            message: "no attempt made".to_string(),
        };

        for attempt in 1..=attempts {
            let reply = match tokio::time::timeout(self.config.timeout, self.judge.judge(prompt)).await {
                Ok(reply) => reply,
                Err(_) => Err(JudgeError::Timeout {
                    after_ms: self.config.timeout.as_millis() as u64,
                }),
            };

            let error = match reply {
                Ok(text) => {
                    let order = resolve_ids(&parse_ranked_urls(&text), input.catalog, &pool);
                    if !order.is_empty() {
                        return Ok(order);
                    }
                    JudgeError::MalformedResponse {
                        reason: "no candidate URLs in reply".to_string(),
                    }
                }
                Err(e) => e,
            };

            warn!(attempt, attempts, error = %error, "Judge attempt failed");
            let retry = error.is_retryable() && attempt < attempts;
            last_error = error;
            if !retry {
                break;
            }
            tokio::time::sleep(RETRY_BACKOFF * attempt).await;
        }

        Err(last_error)
    }
}

/// Maps reply URLs to pool ids, first mention wins.
fn resolve_ids(urls: &[String], catalog: &CatalogStore, pool: &HashSet<&str>) -> Vec<String> {
    let mut seen = HashSet::new();
    urls.iter()
        .map(|url| catalog.canonical_id(url))
        .filter(|id| pool.contains(id.as_str()))
        .filter(|id| seen.insert(id.clone()))
        .collect()
}

/// Judged candidates score `1 - pos / 2n` (above 0.5, in judged order);
/// the rest keep their rule order below 0.5.
fn apply_judgement(order: &[String], rule_scores: Vec<ScoredCandidate>) -> Vec<ScoredCandidate> {
    let n = order.len() as f32;
    rule_scores
        .into_iter()
        .map(|mut s| {
            s.score = match order.iter().position(|id| *id == s.candidate.id) {
                Some(pos) => 1.0 - pos as f32 / (2.0 * n),
                None => 0.5 * sigmoid(s.score),
            };
            s
        })
        .collect()
}
