use std::fmt;

use super::error::FeatureError;

/// Number of features produced per (query, candidate) pair.
pub const FEATURE_DIM: usize = 17;

/// One named feature. Discriminants are the positions in a [`FeatureVector`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    SemanticScore = 0,
    BlendScore,
    NameKeywordMatches,
    NameKeywordRatio,
    DescKeywordMatches,
    DescKeywordRatio,
    ExactNameMatch,
    DurationMatch,
    TestTypeMatch,
    TestTypeMatchRatio,
    SkillNameMatches,
    RoleNameMatches,
    SkillMatch,
    RemoteSupport,
    AdaptiveSupport,
    NameLength,
    DescLength,
}

impl Feature {
    pub const ALL: [Feature; FEATURE_DIM] = [
        Feature::SemanticScore,
        Feature::BlendScore,
        Feature::NameKeywordMatches,
        Feature::NameKeywordRatio,
        Feature::DescKeywordMatches,
        Feature::DescKeywordRatio,
        Feature::ExactNameMatch,
        Feature::DurationMatch,
        Feature::TestTypeMatch,
        Feature::TestTypeMatchRatio,
        Feature::SkillNameMatches,
        Feature::RoleNameMatches,
        Feature::SkillMatch,
        Feature::RemoteSupport,
        Feature::AdaptiveSupport,
        Feature::NameLength,
        Feature::DescLength,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Name used in model artifacts.
    pub fn name(self) -> &'static str {
        match self {
            Feature::SemanticScore => "semantic_score",
            Feature::BlendScore => "blend_score",
            Feature::NameKeywordMatches => "name_keyword_matches",
            Feature::NameKeywordRatio => "name_keyword_ratio",
            Feature::DescKeywordMatches => "desc_keyword_matches",
            Feature::DescKeywordRatio => "desc_keyword_ratio",
            Feature::ExactNameMatch => "exact_name_match",
            Feature::DurationMatch => "duration_match",
            Feature::TestTypeMatch => "test_type_match",
            Feature::TestTypeMatchRatio => "test_type_match_ratio",
            Feature::SkillNameMatches => "skill_name_matches",
            Feature::RoleNameMatches => "role_name_matches",
            Feature::SkillMatch => "skill_match",
            Feature::RemoteSupport => "remote_support",
            Feature::AdaptiveSupport => "adaptive_support",
            Feature::NameLength => "name_length",
            Feature::DescLength => "desc_length",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fixed-length feature values in [`Feature::ALL`] order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    values: [f32; FEATURE_DIM],
}

impl Default for FeatureVector {
    fn default() -> Self {
        Self {
            values: [0.0; FEATURE_DIM],
        }
    }
}

impl FeatureVector {
    #[inline]
    pub fn get(&self, feature: Feature) -> f32 {
        self.values[feature.index()]
    }

    #[inline]
    pub fn set(&mut self, feature: Feature, value: f32) {
        self.values[feature.index()] = value;
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    pub fn len(&self) -> usize {
        FEATURE_DIM
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Named view, in schema order.
    pub fn named(&self) -> impl Iterator<Item = (Feature, f32)> + '_ {
        Feature::ALL.into_iter().map(|f| (f, self.get(f)))
    }
}

/// The ordered feature layout consumers are built against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeatureSchema;

impl FeatureSchema {
    pub fn dimension(&self) -> usize {
        FEATURE_DIM
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> {
        Feature::ALL.into_iter().map(Feature::name)
    }

    /// Checks an externally declared layout (e.g. a model artifact's
    /// `feature_names`) against this one. Length is checked before order.
    pub fn validate<S: AsRef<str>>(&self, expected: &[S]) -> Result<(), FeatureError> {
        if expected.len() != FEATURE_DIM {
            return Err(FeatureError::DimensionMismatch {
                expected: FEATURE_DIM,
                actual: expected.len(),
            });
        }
        for (index, (ours, theirs)) in self.names().zip(expected).enumerate() {
            if ours != theirs.as_ref() {
                return Err(FeatureError::OrderMismatch {
                    index,
                    expected: ours.to_string(),
                    actual: theirs.as_ref().to_string(),
                });
            }
        }
        Ok(())
    }
}
