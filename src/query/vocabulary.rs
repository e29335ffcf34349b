//! Curated skill / role vocabulary.
//!
//! The word lists are configuration data. [`Vocabulary::default`] ships a
//! built-in set; [`Vocabulary::load`] replaces it from a JSON file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::QueryError;
use crate::catalog::TestType;

/// Coarse area a query term belongs to; drives the balance requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    Technical,
    Behavioral,
    Cognitive,
}

impl Domain {
    /// Test types that represent this domain in a result list.
    pub fn test_types(self) -> &'static [TestType] {
        match self {
            Domain::Technical => &[TestType::K, TestType::S],
            Domain::Behavioral => &[TestType::P, TestType::C, TestType::B],
            Domain::Cognitive => &[TestType::A],
        }
    }

    pub fn covers(self, test_type: TestType) -> bool {
        self.test_types().contains(&test_type)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillGroup {
    pub name: String,
    /// Phrases that trigger the group; also used as expansion synonyms.
    pub terms: Vec<String>,
    #[serde(default)]
    pub domain: Option<Domain>,
    /// Test types associated with the skill.
    #[serde(default)]
    pub test_types: Vec<TestType>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleGroup {
    pub name: String,
    pub terms: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestTypeAlias {
    pub alias: String,
    pub test_type: TestType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vocabulary {
    pub skill_groups: Vec<SkillGroup>,
    pub roles: Vec<RoleGroup>,
    pub test_type_aliases: Vec<TestTypeAlias>,
    pub minute_units: Vec<String>,
    pub hour_units: Vec<String>,
    /// Case-insensitive, dot-matches-newline regexes removed from job descriptions.
    pub boilerplate_patterns: Vec<String>,
    pub stop_words: Vec<String>,
    pub entry_terms: Vec<String>,
    pub senior_terms: Vec<String>,
    /// Synonyms appended per matched skill group when expanding the query.
    pub max_expansion_terms: usize,
}

impl Vocabulary {
    pub fn load(path: &Path) -> Result<Self, QueryError> {
        let bytes = std::fs::read(path).map_err(|source| QueryError::VocabularyIo {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_slice(&bytes).map_err(|source| QueryError::VocabularyParse {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn skill(name: &str, terms: &[&str], domain: Option<Domain>, test_types: &[TestType]) -> SkillGroup {
    SkillGroup {
        name: name.to_string(),
        terms: strings(terms),
        domain,
        test_types: test_types.to_vec(),
    }
}

fn role(name: &str, terms: &[&str]) -> RoleGroup {
    RoleGroup {
        name: name.to_string(),
        terms: strings(terms),
    }
}

fn alias(alias: &str, test_type: TestType) -> TestTypeAlias {
    TestTypeAlias {
        alias: alias.to_string(),
        test_type,
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        use Domain::{Behavioral, Cognitive, Technical};
        use TestType::{A, B, C, D, E, K, P, S};

        let skill_groups = vec![
            skill("java", &["java", "j2ee", "j2se", "jdk", "jvm", "spring", "hibernate", "core java"], Some(Technical), &[K]),
            skill("python", &["python", "django", "flask", "pandas", "numpy", "data science"], Some(Technical), &[K]),
            skill("sql", &["sql", "database", "mysql", "postgresql", "oracle", "sql server", "ssas"], Some(Technical), &[K]),
            skill("javascript", &["javascript", "js", "node", "react", "angular", "vue", "frontend"], Some(Technical), &[K]),
            skill("html", &["html", "css", "htmlcss", "web", "markup"], Some(Technical), &[K]),
            skill("selenium", &["selenium", "automation", "test automation", "web automation"], Some(Technical), &[K, S]),
            skill("excel", &["excel", "spreadsheet", "ms excel", "microsoft excel", "excel 365"], Some(Technical), &[K, S]),
            skill("qa", &["qa", "quality assurance", "manual testing", "automation testing"], Some(Technical), &[K]),
            skill("programming", &["programming", "coding", "software", "technical"], Some(Technical), &[K]),
            skill("communication", &["communication", "written", "english", "business communication"], Some(Behavioral), &[P, C]),
            skill("collaboration", &["collaborate", "collaborates", "collaboration", "collaborative", "teamwork", "team player", "interpersonal", "stakeholder", "stakeholders"], Some(Behavioral), &[P, C]),
            skill("personality", &["personality", "behavior", "behaviour", "behavioral", "behavioural", "traits", "opq", "opq32", "occupational personality"], Some(Behavioral), &[P]),
            skill("leadership", &["leadership", "leader", "executive", "coo", "ceo", "cfo", "enterprise leadership"], Some(Behavioral), &[P, C]),
            skill("situational", &["situational", "judgement", "judgment", "situational judgement"], Some(Behavioral), &[B]),
            skill("cognitive", &["cognitive", "reasoning", "aptitude", "ability", "intelligence", "deductive"], Some(Cognitive), &[A]),
            skill("numerical", &["numerical", "math", "mathematics", "quantitative", "arithmetic", "calculation", "verify numerical"], Some(Cognitive), &[A]),
            skill("verbal", &["verbal", "comprehension", "reading", "verify verbal"], Some(Cognitive), &[A]),
            skill("inductive", &["inductive", "inductive reasoning", "pattern recognition", "abstract reasoning"], Some(Cognitive), &[A]),
            skill("data analyst", &["data analyst", "data analysis", "analytics", "business intelligence", "tableau"], None, &[]),
            skill("sales", &["sales", "selling", "salesperson", "account manager", "sales representative"], None, &[]),
            skill("marketing", &["marketing", "digital marketing", "advertising", "digital advertising", "brand"], None, &[]),
            skill("admin", &["admin", "administrative", "administrator", "clerical", "bank administrative"], None, &[]),
        ];

        let roles = vec![
            role("developer", &["developer", "programmer", "coder", "engineer", "software engineer"]),
            role("analyst", &["analyst", "data analyst", "business analyst"]),
            role("manager", &["manager", "supervisor", "lead", "director", "management"]),
            role("admin", &["admin", "administrative", "administrator", "assistant", "clerical"]),
            role("sales", &["sales", "salesperson", "account manager", "selling"]),
            role("executive", &["executive", "coo", "ceo", "cfo", "senior executive"]),
            role("consultant", &["consultant", "consulting", "advisor", "advisory"]),
            role("professional", &["professional", "specialist", "expert"]),
        ];

        let test_type_aliases = vec![
            alias("personality", P),
            alias("behavior", P),
            alias("behaviour", P),
            alias("behavioral", P),
            alias("behavioural", P),
            alias("cognitive", A),
            alias("aptitude", A),
            alias("reasoning", A),
            alias("ability", A),
            alias("numerical", A),
            alias("verbal", A),
            alias("knowledge", K),
            alias("skill", K),
            alias("skills", K),
            alias("technical", K),
            alias("situational", B),
            alias("judgement", B),
            alias("judgment", B),
            alias("biodata", B),
            alias("competency", C),
            alias("competencies", C),
            alias("360", D),
            alias("assessment exercise", E),
            alias("exercises", E),
            alias("simulation", S),
            alias("simulations", S),
        ];

        Self {
            skill_groups,
            roles,
            test_type_aliases,
            minute_units: strings(&["minutes", "minute", "mins", "min"]),
            hour_units: strings(&["hours", "hour", "hrs", "hr"]),
            boilerplate_patterns: strings(&[
                r"About Us.*?is an equal opportunity employer\.?",
                r"#CareersAt\w+.*",
                r"Get In Touch.*",
                r"What \w+ Can Offer You.*",
            ]),
            stop_words: strings(&[
                "the", "a", "an", "for", "and", "or", "to", "in", "of", "is", "are", "with", "who",
                "that", "this", "on", "at", "by", "be", "as", "from", "can", "will", "should",
                "need", "want", "looking", "hiring", "test", "tests", "assessment", "assessments",
                "under", "within", "max", "about", "minutes", "minute", "mins", "min", "hours",
                "hour", "hrs", "our", "their", "they", "we", "you", "your", "also", "which",
                "some", "job", "role", "candidates", "candidate", "new",
            ]),
            entry_terms: strings(&["entry", "entry level", "graduate", "junior", "fresher", "new graduate", "0 2 years"]),
            senior_terms: strings(&["senior", "experienced", "advanced", "expert", "5+ years"]),
            max_expansion_terms: 8,
        }
    }
}
