use crate::catalog::{Assessment, CatalogStore};
use crate::query::{Domain, QueryContext};
use crate::retrieval::{Candidate, CandidatePool, EntryText};

use super::schema::{Feature, FeatureSchema, FeatureVector};

/// Keywords longer than this count toward `exact_name_match`.
const EXACT_MATCH_MIN_CHARS: usize = 4;
const NAME_LENGTH_SCALE: f32 = 100.0;
const DESC_LENGTH_SCALE: f32 = 500.0;
/// Neutral value for an unknown duration under a ceiling.
const UNKNOWN_DURATION_MATCH: f32 = 0.5;

/// A pool entry paired with its features.
#[derive(Debug, Clone, PartialEq)]
pub struct FeaturedCandidate {
    pub candidate: Candidate,
    pub features: FeatureVector,
}

/// Computes [`FeatureVector`]s. Stateless and side-effect free.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureExtractor {
    schema: FeatureSchema,
}

impl FeatureExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn extract(
        &self,
        ctx: &QueryContext,
        candidate: &Candidate,
        assessment: &Assessment,
    ) -> FeatureVector {
        let entry = EntryText::new(assessment);
        let mut v = FeatureVector::default();

        v.set(Feature::SemanticScore, candidate.semantic_score);
        v.set(Feature::BlendScore, candidate.blend_score);

        let (name_matches, desc_matches) = entry.keyword_matches(ctx);
        let keyword_count = ctx.keywords.len();
        v.set(Feature::NameKeywordMatches, name_matches as f32);
        v.set(Feature::DescKeywordMatches, desc_matches as f32);
        v.set(Feature::NameKeywordRatio, ratio(name_matches, keyword_count));
        v.set(Feature::DescKeywordRatio, ratio(desc_matches, keyword_count));

        let exact = ctx
            .keywords
            .iter()
            .any(|kw| kw.chars().count() > EXACT_MATCH_MIN_CHARS && entry.name_has_token(kw));
        v.set(Feature::ExactNameMatch, indicator(exact));

        v.set(Feature::DurationMatch, duration_match(ctx.max_duration, assessment.duration_minutes));

        let hinted = ctx
            .test_type_hints
            .iter()
            .filter(|t| assessment.has_test_type(**t))
            .count();
        if ctx.test_type_hints.is_empty() {
            v.set(Feature::TestTypeMatch, 1.0);
        } else {
            v.set(Feature::TestTypeMatch, indicator(hinted > 0));
            v.set(
                Feature::TestTypeMatchRatio,
                ratio(hinted, ctx.test_type_hints.len()),
            );
        }

        let skill_name_matches = ctx
            .skills
            .iter()
            .filter(|s| s.terms.iter().any(|t| entry.name_has_phrase(t)))
            .count();
        let role_name_matches = ctx.roles.iter().filter(|r| entry.name_has_phrase(r)).count();
        v.set(Feature::SkillNameMatches, skill_name_matches as f32);
        v.set(Feature::RoleNameMatches, role_name_matches as f32);

        let skill_match = ctx.skills.iter().any(|s| {
            let in_text = s
                .terms
                .iter()
                .any(|t| entry.name_has_phrase(t) || entry.description_has_phrase(t));
            // Non-technical groups name a kind of assessment, so the category alone counts.
            let by_category = !matches!(s.domain, Some(Domain::Technical) | None)
                && s.test_types.iter().any(|t| assessment.has_test_type(*t));
            in_text || by_category
        });
        v.set(Feature::SkillMatch, indicator(skill_match));

        v.set(Feature::RemoteSupport, indicator(assessment.remote_support));
        v.set(Feature::AdaptiveSupport, indicator(assessment.adaptive_support));
        v.set(
            Feature::NameLength,
            assessment.name.chars().count() as f32 / NAME_LENGTH_SCALE,
        );
        v.set(
            Feature::DescLength,
            assessment.description.chars().count() as f32 / DESC_LENGTH_SCALE,
        );

        v
    }

    /// Features for every pool entry still present in the catalog, pool order kept.
    pub fn extract_pool(
        &self,
        ctx: &QueryContext,
        pool: &CandidatePool,
        catalog: &CatalogStore,
    ) -> Vec<FeaturedCandidate> {
        pool.candidates
            .iter()
            .filter_map(|c| {
                let assessment = catalog.get(&c.id)?;
                Some(FeaturedCandidate {
                    candidate: c.clone(),
                    features: self.extract(ctx, c, assessment),
                })
            })
            .collect()
    }
}

#[inline]
fn indicator(b: bool) -> f32 {
    if b { 1.0 } else { 0.0 }
}

#[inline]
fn ratio(part: usize, whole: usize) -> f32 {
    if whole == 0 {
        0.0
    } else {
        part as f32 / whole as f32
    }
}

/// 1 without a ceiling or when the known duration fits, 0 when it exceeds,
/// a neutral 0.5 when the duration is unknown.
pub fn duration_match(ceiling: Option<u32>, duration: Option<u32>) -> f32 {
    match (ceiling, duration) {
        (None, _) => 1.0,
        (Some(max), Some(d)) => indicator(d <= max),
        (Some(_), None) => UNKNOWN_DURATION_MATCH,
    }
}
