//! Query analysis: keywords, skills, roles, duration ceiling and test-type hints.
//!
//! Analysis never fails. Empty or unrecognizable input produces a
//! [`QueryContext`] with empty derived fields and candidate generation then
//! relies on semantic similarity alone.

pub mod analyzer;
pub mod duration;
pub mod error;
pub mod fetch;
pub mod text;
pub mod vocabulary;

#[cfg(test)]
mod tests;

pub use analyzer::{MatchedSkill, QueryAnalyzer, QueryContext, Seniority};
pub use duration::DurationParser;
pub use error::QueryError;
pub use fetch::{JdFetcher, html_to_text, looks_like_url};
pub use vocabulary::{Domain, RoleGroup, SkillGroup, TestTypeAlias, Vocabulary};
