//! Catalog record types.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Closed set of assessment categories.
///
/// Ordered by code so sets of test types iterate deterministically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TestType {
    /// Ability & Aptitude
    A,
    /// Biodata & Situational Judgement
    B,
    /// Competencies
    C,
    /// Development & 360
    D,
    /// Assessment Exercises
    E,
    /// Knowledge & Skills
    K,
    /// Personality & Behavior
    P,
    /// Simulations
    S,
}

impl TestType {
    pub const ALL: [TestType; 8] = [
        TestType::A,
        TestType::B,
        TestType::C,
        TestType::D,
        TestType::E,
        TestType::K,
        TestType::P,
        TestType::S,
    ];

    pub fn code(self) -> char {
        match self {
            TestType::A => 'A',
            TestType::B => 'B',
            TestType::C => 'C',
            TestType::D => 'D',
            TestType::E => 'E',
            TestType::K => 'K',
            TestType::P => 'P',
            TestType::S => 'S',
        }
    }

    /// Human-readable label used in catalog files and responses.
    pub fn label(self) -> &'static str {
        match self {
            TestType::A => "Ability & Aptitude",
            TestType::B => "Biodata & Situational Judgement",
            TestType::C => "Competencies",
            TestType::D => "Development & 360",
            TestType::E => "Assessment Exercises",
            TestType::K => "Knowledge & Skills",
            TestType::P => "Personality & Behavior",
            TestType::S => "Simulations",
        }
    }

    pub fn from_code(code: char) -> Option<Self> {
        let upper = code.to_ascii_uppercase();
        Self::ALL.into_iter().find(|t| t.code() == upper)
    }

    /// Accepts a single-letter code or a label, case-insensitively.
    ///
    /// British spelling of "Behaviour" is accepted.
    pub fn from_label(label: &str) -> Option<Self> {
        let trimmed = label.trim();
        let mut chars = trimmed.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Self::from_code(c);
        }

        let normalized = trimmed.to_lowercase().replace("behaviour", "behavior");
        Self::ALL
            .into_iter()
            .find(|t| t.label().to_lowercase() == normalized)
    }
}

impl fmt::Display for TestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One catalog entry. Immutable after load.
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    /// Canonical identifier (slug after `/view/`, or the normalized URL).
    pub id: String,
    /// URL as published in the catalog; returned to callers unchanged.
    pub url: String,
    pub name: String,
    pub description: String,
    /// `None` when the catalog did not state a duration (or stated 0).
    pub duration_minutes: Option<u32>,
    /// Never empty.
    pub test_types: BTreeSet<TestType>,
    pub remote_support: bool,
    pub adaptive_support: bool,
    /// Other spellings of `url` that resolve to `id`.
    pub alternate_urls: Vec<String>,
}

impl Assessment {
    pub fn has_test_type(&self, test_type: TestType) -> bool {
        self.test_types.contains(&test_type)
    }

    pub fn test_type_labels(&self) -> Vec<String> {
        self.test_types.iter().map(|t| t.label().to_string()).collect()
    }
}

/// `"Yes"` / `"No"` strings or plain booleans.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum Flag {
    Bool(bool),
    Text(String),
}

impl Flag {
    pub(crate) fn as_bool(&self) -> bool {
        match self {
            Flag::Bool(b) => *b,
            Flag::Text(s) => matches!(s.trim().to_ascii_lowercase().as_str(), "yes" | "true" | "y"),
        }
    }
}

/// A single label or a list of labels.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    pub(crate) fn into_vec(self) -> Vec<String> {
        match self {
            OneOrMany::One(s) => vec![s],
            OneOrMany::Many(v) => v,
        }
    }
}

/// Record shape of the persisted catalog file.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawAssessment {
    pub url: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default)]
    pub test_type: Option<OneOrMany>,
    #[serde(default)]
    pub remote_support: Option<Flag>,
    #[serde(default)]
    pub adaptive_support: Option<Flag>,
    #[serde(default)]
    pub alternate_urls: Vec<String>,
}

/// Response record for one recommended assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentRecord {
    pub url: String,
    pub name: String,
    pub adaptive_support: String,
    pub description: String,
    /// Minutes; `0` when the catalog does not state a duration.
    pub duration: u32,
    pub remote_support: String,
    pub test_type: Vec<String>,
}

fn yes_no(flag: bool) -> String {
    if flag { "Yes" } else { "No" }.to_string()
}

impl From<&Assessment> for AssessmentRecord {
    fn from(a: &Assessment) -> Self {
        Self {
            url: a.url.clone(),
            name: a.name.clone(),
            adaptive_support: yes_no(a.adaptive_support),
            description: a.description.clone(),
            duration: a.duration_minutes.unwrap_or(0),
            remote_support: yes_no(a.remote_support),
            test_type: a.test_type_labels(),
        }
    }
}
