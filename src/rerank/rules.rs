//! Hand-weighted linear scorer. Always available; the fallback for the other variants.

use crate::catalog::Assessment;
use crate::features::{Feature, FeaturedCandidate};
use crate::query::text::{contains_phrase, normalize};
use crate::query::{QueryContext, Seniority};

use super::error::RerankError;
use super::{RerankInput, ScoredCandidate};

const ENTRY_MARKERS: &[&str] = &["entry level", "entry", "graduate", "junior", "0 2 years"];
const SENIOR_MARKERS: &[&str] = &["senior", "manager", "professional", "advanced", "executive"];
const REMOTE_TERM: &str = "remote";

#[derive(Debug, Clone, PartialEq)]
pub struct RuleWeights {
    /// Retrieval blend score carried into the rule score.
    pub blend: f32,
    pub name_keyword: f32,
    pub desc_keyword: f32,
    pub exact_name: f32,
    pub skill_in_name: f32,
    pub role_in_name: f32,
    /// Applied only when the query states a duration ceiling.
    pub duration: f32,
    /// Applied only when the query names test types.
    pub test_type: f32,
    pub skill_match: f32,
    pub seniority: f32,
    pub remote: f32,
}

impl Default for RuleWeights {
    fn default() -> Self {
        Self {
            blend: 0.40,
            name_keyword: 0.35,
            desc_keyword: 0.10,
            exact_name: 0.20,
            skill_in_name: 0.30,
            role_in_name: 0.25,
            duration: 0.15,
            test_type: 0.10,
            skill_match: 0.10,
            seniority: 0.10,
            remote: 0.05,
        }
    }
}

impl RuleWeights {
    pub fn validate(&self) -> Result<(), RerankError> {
        let all = [
            ("blend", self.blend),
            ("name_keyword", self.name_keyword),
            ("desc_keyword", self.desc_keyword),
            ("exact_name", self.exact_name),
            ("skill_in_name", self.skill_in_name),
            ("role_in_name", self.role_in_name),
            ("duration", self.duration),
            ("test_type", self.test_type),
            ("skill_match", self.skill_match),
            ("seniority", self.seniority),
            ("remote", self.remote),
        ];
        if let Some((name, value)) = all.iter().find(|(_, w)| !w.is_finite() || *w < 0.0) {
            return Err(RerankError::InvalidWeights {
                reason: format!("{name} must be finite and non-negative, got {value}"),
            });
        }
        // Name matches must outweigh description matches.
        if self.name_keyword < self.desc_keyword {
            return Err(RerankError::InvalidWeights {
                reason: format!(
                    "name_keyword ({}) must not be below desc_keyword ({})",
                    self.name_keyword, self.desc_keyword
                ),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct RuleReranker {
    weights: RuleWeights,
}

impl RuleReranker {
    pub fn new(weights: RuleWeights) -> Result<Self, RerankError> {
        weights.validate()?;
        Ok(Self { weights })
    }

    pub fn weights(&self) -> &RuleWeights {
        &self.weights
    }

    pub fn score(&self, query: &QueryContext, item: &FeaturedCandidate, assessment: &Assessment) -> f32 {
        let w = &self.weights;
        let f = &item.features;

        let mut score = w.blend * f.get(Feature::BlendScore)
            + w.name_keyword * f.get(Feature::NameKeywordRatio)
            + w.desc_keyword * f.get(Feature::DescKeywordRatio)
            + w.exact_name * f.get(Feature::ExactNameMatch)
            + w.skill_in_name * f.get(Feature::SkillNameMatches).min(1.0)
            + w.role_in_name * f.get(Feature::RoleNameMatches).min(1.0)
            + w.skill_match * f.get(Feature::SkillMatch);

        if query.max_duration.is_some() {
            score += w.duration * f.get(Feature::DurationMatch);
        }
        if !query.test_type_hints.is_empty() {
            score += w.test_type * f.get(Feature::TestTypeMatch);
        }
        if let Some(seniority) = query.seniority {
            if matches_seniority(seniority, &assessment.name) {
                score += w.seniority;
            }
        }
        if assessment.remote_support && query.keywords.contains(REMOTE_TERM) {
            score += w.remote;
        }
        score
    }

    /// Scores every item whose assessment is in the catalog, input order kept.
    pub fn score_all(&self, input: &RerankInput<'_>) -> Vec<ScoredCandidate> {
        input
            .items
            .iter()
            .filter_map(|item| {
                let assessment = input.catalog.get(&item.candidate.id)?;
                Some(ScoredCandidate {
                    candidate: item.candidate.clone(),
                    score: self.score(input.query, item, assessment),
                })
            })
            .collect()
    }
}

fn matches_seniority(seniority: Seniority, name: &str) -> bool {
    let name = normalize(name);
    let markers = match seniority {
        Seniority::Entry => ENTRY_MARKERS,
        Seniority::Senior => SENIOR_MARKERS,
    };
    markers.iter().any(|m| contains_phrase(&name, m))
}
