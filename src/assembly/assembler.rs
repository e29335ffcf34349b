use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use super::error::AssemblyError;
use crate::catalog::{Assessment, CatalogStore};
use crate::constants::{MAX_RESULTS, MIN_RESULTS};
use crate::query::QueryContext;
use crate::rerank::ScoredCandidate;

/// One entry of the final list.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedResult {
    pub id: String,
    pub score: f32,
    /// 1-based.
    pub rank: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssemblyConfig {
    pub min_results: usize,
    pub max_results: usize,
    /// Entries scoring below this are dropped while more than `min_results` remain.
    pub score_floor: Option<f32>,
    /// Reserve a slot per detected domain on multi-domain queries.
    pub balance: bool,
}

impl Default for AssemblyConfig {
    fn default() -> Self {
        Self {
            min_results: MIN_RESULTS,
            max_results: MAX_RESULTS,
            score_floor: None,
            balance: true,
        }
    }
}

impl AssemblyConfig {
    pub fn validate(&self) -> Result<(), AssemblyError> {
        if self.min_results == 0 || self.min_results > self.max_results || self.max_results > MAX_RESULTS {
            return Err(AssemblyError::InvalidBounds {
                min: self.min_results,
                max: self.max_results,
                limit: MAX_RESULTS,
            });
        }
        if let Some(floor) = self.score_floor {
            if !floor.is_finite() {
                return Err(AssemblyError::InvalidFloor(floor));
            }
        }
        Ok(())
    }
}

struct Entry<'a> {
    assessment: &'a Assessment,
    score: f32,
}

fn by_score(a: &Entry<'_>, b: &Entry<'_>) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.assessment.id.cmp(&b.assessment.id))
}

/// Filters, balances and truncates scored candidates into the final list.
#[derive(Debug, Clone, Default)]
pub struct ResultAssembler {
    config: AssemblyConfig,
}

impl ResultAssembler {
    pub fn new(config: AssemblyConfig) -> Result<Self, AssemblyError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AssemblyConfig {
        &self.config
    }

    pub fn assemble(
        &self,
        query: &QueryContext,
        scored: &[ScoredCandidate],
        catalog: &CatalogStore,
    ) -> Vec<RankedResult> {
        // Dedup by canonical id, keeping the best score.
        let mut best: HashMap<&str, Entry<'_>> = HashMap::new();
        for s in scored {
            let Some(assessment) = catalog.get(&s.candidate.id) else {
                continue;
            };
            let slot = best.entry(assessment.id.as_str()).or_insert(Entry {
                assessment,
                score: s.score,
            });
            if s.score > slot.score {
                slot.score = s.score;
            }
        }

        let before_filter = best.len();
        let mut entries: Vec<Entry<'_>> = best
            .into_values()
            .filter(|e| within_ceiling(query.max_duration, e.assessment.duration_minutes))
            .collect();
        entries.sort_by(by_score);

        let selected = self.select(query, entries);
        let results: Vec<RankedResult> = selected
            .into_iter()
            .enumerate()
            .map(|(i, e)| RankedResult {
                id: e.assessment.id.clone(),
                score: e.score,
                rank: i + 1,
            })
            .collect();

        debug!(
            scored = scored.len(),
            unique = before_filter,
            returned = results.len(),
            ceiling = ?query.max_duration,
            "Results assembled"
        );
        results
    }

    /// `entries` must already be in score order.
    fn select<'a>(&self, query: &QueryContext, entries: Vec<Entry<'a>>) -> Vec<Entry<'a>> {
        let max = self.config.max_results;

        let mut reserved: BTreeSet<usize> = BTreeSet::new();
        if self.config.balance && query.requires_balance() {
            for domain in &query.domains {
                let top = entries
                    .iter()
                    .position(|e| e.assessment.test_types.iter().any(|t| domain.covers(*t)));
                if let Some(i) = top {
                    if reserved.len() < max {
                        reserved.insert(i);
                    }
                }
            }
        }

        let mut open = max - reserved.len();
        let mut selected: Vec<(Entry<'a>, bool)> = entries
            .into_iter()
            .enumerate()
            .filter_map(|(i, e)| {
                if reserved.contains(&i) {
                    Some((e, true))
                } else if open > 0 {
                    open -= 1;
                    Some((e, false))
                } else {
                    None
                }
            })
            .collect();

        if let Some(floor) = self.config.score_floor {
            let min = self.config.min_results;
            while selected.len() > min {
                // Domain reservations survive the floor.
                let Some(drop) = selected
                    .iter()
                    .rposition(|(e, reserved)| !reserved && e.score < floor)
                else {
                    break;
                };
                selected.remove(drop);
            }
        }

        selected.into_iter().map(|(e, _)| e).collect()
    }
}

/// Unknown durations always pass.
fn within_ceiling(ceiling: Option<u32>, duration: Option<u32>) -> bool {
    match (ceiling, duration) {
        (Some(max), Some(d)) => d <= max,
        _ => true,
    }
}
