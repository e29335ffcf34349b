//! Bounded bag-of-words overlap between a query and a catalog entry.

use std::collections::HashSet;

use crate::catalog::Assessment;
use crate::query::QueryContext;
use crate::query::text::{contains_phrase, normalize};

const NAME_WEIGHT: f32 = 0.45;
const DESCRIPTION_WEIGHT: f32 = 0.20;
const TERM_WEIGHT: f32 = 0.35;
/// A vocabulary term found only in the description counts half.
const DESCRIPTION_TERM_CREDIT: f32 = 0.5;

/// Normalized text of one entry, computed once per scoring pass.
#[derive(Debug, Clone)]
pub struct EntryText {
    pub name: String,
    pub description: String,
    name_tokens: HashSet<String>,
    description_tokens: HashSet<String>,
}

impl EntryText {
    pub fn new(assessment: &Assessment) -> Self {
        let name = normalize(&assessment.name);
        let description = normalize(&assessment.description);
        let name_tokens = name.split(' ').filter(|t| !t.is_empty()).map(str::to_string).collect();
        let description_tokens = description
            .split(' ')
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();
        Self {
            name,
            description,
            name_tokens,
            description_tokens,
        }
    }

    pub fn name_has_token(&self, token: &str) -> bool {
        self.name_tokens.contains(token)
    }

    pub fn description_has_token(&self, token: &str) -> bool {
        self.description_tokens.contains(token)
    }

    pub fn name_has_phrase(&self, phrase: &str) -> bool {
        contains_phrase(&self.name, phrase)
    }

    pub fn description_has_phrase(&self, phrase: &str) -> bool {
        contains_phrase(&self.description, phrase)
    }

    /// Query keywords present in the name / description.
    pub fn keyword_matches(&self, ctx: &QueryContext) -> (usize, usize) {
        ctx.keywords.iter().fold((0, 0), |(n, d), kw| {
            (
                n + usize::from(self.name_has_token(kw)),
                d + usize::from(self.description_has_token(kw)),
            )
        })
    }
}

/// Lexical relevance of an entry for a query, in [0, 1].
///
/// Zero when the query has no keywords and no vocabulary matches.
pub fn lexical_score(ctx: &QueryContext, entry: &EntryText) -> f32 {
    let keyword_count = ctx.keywords.len();
    let group_count = ctx.skills.len() + ctx.roles.len();
    if keyword_count == 0 && group_count == 0 {
        return 0.0;
    }

    let (name_matches, desc_matches) = entry.keyword_matches(ctx);
    let (name_ratio, desc_ratio) = if keyword_count == 0 {
        (0.0, 0.0)
    } else {
        (
            name_matches as f32 / keyword_count as f32,
            desc_matches as f32 / keyword_count as f32,
        )
    };

    let term_score = if group_count == 0 {
        0.0
    } else {
        let mut credit = 0.0f32;
        for skill in &ctx.skills {
            credit += term_credit(entry, skill.terms.iter().map(String::as_str));
        }
        for role in &ctx.roles {
            credit += term_credit(entry, std::iter::once(role.as_str()));
        }
        credit / group_count as f32
    };

    (NAME_WEIGHT * name_ratio + DESCRIPTION_WEIGHT * desc_ratio + TERM_WEIGHT * term_score)
        .clamp(0.0, 1.0)
}

fn term_credit<'a>(entry: &EntryText, mut terms: impl Iterator<Item = &'a str> + Clone) -> f32 {
    if terms.clone().any(|t| entry.name_has_phrase(t)) {
        1.0
    } else if terms.any(|t| entry.description_has_phrase(t)) {
        DESCRIPTION_TERM_CREDIT
    } else {
        0.0
    }
}
