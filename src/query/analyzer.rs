use std::collections::{BTreeSet, HashSet};

use regex::{Regex, RegexBuilder};
use tracing::debug;

use super::duration::DurationParser;
use super::error::QueryError;
use super::text::{collapse_whitespace, contains_phrase, normalize};
use super::vocabulary::{Domain, Vocabulary};
use crate::catalog::TestType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Seniority {
    Entry,
    Senior,
}

/// A vocabulary skill group detected in the query.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchedSkill {
    pub name: String,
    /// Normalized trigger/synonym terms of the group.
    pub terms: Vec<String>,
    pub domain: Option<Domain>,
    pub test_types: Vec<TestType>,
}

/// Structured view of one request's query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryContext {
    /// Input as received (or the fetched page text for URL input).
    pub raw: String,
    /// Boilerplate-stripped, whitespace-collapsed text.
    pub text: String,
    /// Lowercase, punctuation-free form of `text` used for matching.
    pub normalized: String,
    /// `text` plus synonyms of matched skills; what gets embedded.
    pub expanded_text: String,
    /// Distinct content words of the query (stop words and numbers removed).
    pub keywords: BTreeSet<String>,
    pub skills: Vec<MatchedSkill>,
    /// Normalized role group names.
    pub roles: Vec<String>,
    pub max_duration: Option<u32>,
    pub test_type_hints: BTreeSet<TestType>,
    pub domains: BTreeSet<Domain>,
    pub seniority: Option<Seniority>,
}

impl QueryContext {
    /// Multi-domain queries reserve result slots per domain.
    pub fn requires_balance(&self) -> bool {
        self.domains.len() >= 2
    }

    /// True when no derived signal was extracted.
    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty() && self.skills.is_empty() && self.roles.is_empty()
    }

    /// All terms of all matched skill groups.
    pub fn skill_terms(&self) -> impl Iterator<Item = &str> {
        self.skills
            .iter()
            .flat_map(|s| s.terms.iter().map(String::as_str))
    }

    pub fn skill_test_types(&self) -> BTreeSet<TestType> {
        self.skills
            .iter()
            .flat_map(|s| s.test_types.iter().copied())
            .collect()
    }
}

struct CompiledGroup {
    name: String,
    terms: Vec<String>,
}

/// Turns raw query text into a [`QueryContext`]. Never fails on input.
pub struct QueryAnalyzer {
    vocabulary: Vocabulary,
    durations: DurationParser,
    boilerplate: Vec<Regex>,
    stop_words: HashSet<String>,
    skill_terms: Vec<Vec<String>>,
    roles: Vec<CompiledGroup>,
    aliases: Vec<(String, TestType)>,
    entry_terms: Vec<String>,
    senior_terms: Vec<String>,
}

fn normalized_all(items: &[String]) -> Vec<String> {
    items
        .iter()
        .map(|t| normalize(t))
        .filter(|t| !t.is_empty())
        .collect()
}

impl QueryAnalyzer {
    pub fn new(vocabulary: Vocabulary) -> Result<Self, QueryError> {
        let durations = DurationParser::new(&vocabulary.minute_units, &vocabulary.hour_units)?;

        let boilerplate = vocabulary
            .boilerplate_patterns
            .iter()
            .map(|p| {
                RegexBuilder::new(p)
                    .case_insensitive(true)
                    .dot_matches_new_line(true)
                    .build()
                    .map_err(|e| QueryError::InvalidPattern {
                        pattern: p.clone(),
                        reason: e.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let skill_terms = vocabulary
            .skill_groups
            .iter()
            .map(|g| normalized_all(&g.terms))
            .collect();

        let roles = vocabulary
            .roles
            .iter()
            .map(|r| CompiledGroup {
                name: normalize(&r.name),
                terms: normalized_all(&r.terms),
            })
            .collect();

        let aliases = vocabulary
            .test_type_aliases
            .iter()
            .map(|a| (normalize(&a.alias), a.test_type))
            .filter(|(a, _)| !a.is_empty())
            .collect();

        Ok(Self {
            stop_words: normalized_all(&vocabulary.stop_words).into_iter().collect(),
            entry_terms: normalized_all(&vocabulary.entry_terms),
            senior_terms: normalized_all(&vocabulary.senior_terms),
            durations,
            boilerplate,
            skill_terms,
            roles,
            aliases,
            vocabulary,
        })
    }

    /// Analyzer over the built-in vocabulary.
    pub fn with_defaults() -> Result<Self, QueryError> {
        Self::new(Vocabulary::default())
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Removes careers-page boilerplate from job-description text.
    pub fn strip_boilerplate(&self, text: &str) -> String {
        let mut cleaned = text.to_string();
        for re in &self.boilerplate {
            cleaned = re.replace_all(&cleaned, " ").into_owned();
        }
        collapse_whitespace(&cleaned)
    }

    pub fn analyze(&self, raw: &str) -> QueryContext {
        let text = self.strip_boilerplate(raw);
        let normalized = normalize(&text).replace("java script", "javascript");

        let keywords: BTreeSet<String> = normalized
            .split(' ')
            .filter(|w| w.chars().count() >= 2)
            .filter(|w| !w.chars().all(|c| c.is_ascii_digit()))
            .filter(|w| !self.stop_words.contains(*w))
            .map(str::to_string)
            .collect();

        let mut skills = Vec::new();
        for (group, terms) in self.vocabulary.skill_groups.iter().zip(&self.skill_terms) {
            if terms.iter().any(|t| contains_phrase(&normalized, t)) {
                skills.push(MatchedSkill {
                    name: group.name.clone(),
                    terms: terms.clone(),
                    domain: group.domain,
                    test_types: group.test_types.clone(),
                });
            }
        }

        let roles: Vec<String> = self
            .roles
            .iter()
            .filter(|r| r.terms.iter().any(|t| contains_phrase(&normalized, t)))
            .map(|r| r.name.clone())
            .collect();

        let test_type_hints: BTreeSet<TestType> = self
            .aliases
            .iter()
            .filter(|(a, _)| contains_phrase(&normalized, a))
            .map(|(_, t)| *t)
            .collect();

        let domains: BTreeSet<Domain> = skills.iter().filter_map(|s| s.domain).collect();

        let seniority = if self.entry_terms.iter().any(|t| contains_phrase(&normalized, t)) {
            Some(Seniority::Entry)
        } else if self.senior_terms.iter().any(|t| contains_phrase(&normalized, t)) {
            Some(Seniority::Senior)
        } else {
            None
        };

        let max_duration = self.durations.parse(&text);
        let expanded_text = self.expand(&text, &normalized, &skills, &roles);

        debug!(
            keywords = keywords.len(),
            skills = skills.len(),
            roles = roles.len(),
            ?max_duration,
            ?domains,
            "Query analyzed"
        );

        QueryContext {
            raw: raw.to_string(),
            text,
            normalized,
            expanded_text,
            keywords,
            skills,
            roles,
            max_duration,
            test_type_hints,
            domains,
            seniority,
        }
    }

    fn expand(
        &self,
        text: &str,
        normalized: &str,
        skills: &[MatchedSkill],
        roles: &[String],
    ) -> String {
        let mut parts = vec![text.to_string()];
        let mut seen: HashSet<&str> = HashSet::new();
        let limit = self.vocabulary.max_expansion_terms;

        for skill in skills {
            for term in skill.terms.iter().take(limit) {
                if !contains_phrase(normalized, term) && seen.insert(term) {
                    parts.push(term.clone());
                }
            }
        }
        for role in roles {
            if !contains_phrase(normalized, role) && seen.insert(role) {
                parts.push(role.clone());
            }
        }

        collapse_whitespace(&parts.join(" "))
    }
}
