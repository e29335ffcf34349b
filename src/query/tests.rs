use super::*;
use crate::catalog::TestType;
use std::io::Write;

fn analyzer() -> QueryAnalyzer {
    QueryAnalyzer::with_defaults().unwrap()
}

#[test]
fn test_empty_query_yields_empty_context() {
    let ctx = analyzer().analyze("");
    assert!(ctx.is_empty());
    assert!(ctx.max_duration.is_none());
    assert!(ctx.test_type_hints.is_empty());
    assert!(!ctx.requires_balance());
    assert_eq!(ctx.expanded_text, "");
}

#[test]
fn test_punctuation_only_query_does_not_fail() {
    let ctx = analyzer().analyze("?!... ---");
    assert!(ctx.is_empty());
}

#[test]
fn test_java_and_collaboration_span_two_domains() {
    let ctx = analyzer().analyze("Java developer who collaborates with business teams");

    let names: Vec<&str> = ctx.skills.iter().map(|s| s.name.as_str()).collect();
    assert!(names.contains(&"java"));
    assert!(names.contains(&"collaboration"));
    assert!(ctx.domains.contains(&Domain::Technical));
    assert!(ctx.domains.contains(&Domain::Behavioral));
    assert!(ctx.requires_balance());
    assert_eq!(ctx.roles, vec!["developer".to_string()]);
    assert!(ctx.keywords.contains("java"));
    assert!(ctx.keywords.contains("collaborates"));
    assert!(!ctx.keywords.contains("who"));
}

#[test]
fn test_javascript_does_not_trigger_java() {
    let ctx = analyzer().analyze("JavaScript frontend engineer");
    let names: Vec<&str> = ctx.skills.iter().map(|s| s.name.as_str()).collect();
    assert!(names.contains(&"javascript"));
    assert!(!names.contains(&"java"));

    let split = analyzer().analyze("Java Script engineer");
    assert!(split.skills.iter().any(|s| s.name == "javascript"));
}

#[test]
fn test_duration_and_seniority() {
    let ctx = analyzer().analyze("entry-level test under 15 minutes");
    assert_eq!(ctx.max_duration, Some(15));
    assert_eq!(ctx.seniority, Some(Seniority::Entry));

    let senior = analyzer().analyze("Senior data analyst, 1 hour max");
    assert_eq!(senior.max_duration, Some(60));
    assert_eq!(senior.seniority, Some(Seniority::Senior));
}

#[test]
fn test_test_type_hints_from_aliases() {
    let ctx = analyzer().analyze("personality and cognitive assessment for managers");
    assert!(ctx.test_type_hints.contains(&TestType::P));
    assert!(ctx.test_type_hints.contains(&TestType::A));
    assert!(!ctx.test_type_hints.contains(&TestType::K));
}

#[test]
fn test_expansion_appends_synonyms_once() {
    let ctx = analyzer().analyze("python");
    assert!(ctx.expanded_text.starts_with("python"));
    assert!(ctx.expanded_text.contains("django"));
    assert_eq!(ctx.expanded_text.matches("python").count(), 1);
}

#[test]
fn test_boilerplate_is_stripped() {
    let jd = "We need a Java engineer. About Us SHL is a leader... \
              SHL is an equal opportunity employer. Must know SQL. #CareersAtSHL apply now";
    let ctx = analyzer().analyze(jd);
    assert!(ctx.text.contains("Java engineer"));
    assert!(ctx.text.contains("Must know SQL"));
    assert!(!ctx.text.contains("About Us"));
    assert!(!ctx.text.contains("apply now"));
}

#[test]
fn test_analysis_is_deterministic() {
    let a = analyzer();
    let q = "Hiring a sales manager with excellent communication, 30-40 minutes";
    assert_eq!(a.analyze(q), a.analyze(q));
    assert_eq!(a.analyze(q).max_duration, Some(40));
}

#[test]
fn test_custom_vocabulary_from_file() {
    let vocab = serde_json::json!({
        "skill_groups": [
            {"name": "rust", "terms": ["rust", "cargo"], "domain": "technical", "test_types": ["K"]}
        ]
    });
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(vocab.to_string().as_bytes()).unwrap();

    let loaded = Vocabulary::load(file.path()).unwrap();
    assert_eq!(loaded.skill_groups.len(), 1);
    // Unspecified sections keep their defaults.
    assert!(!loaded.minute_units.is_empty());

    let ctx = QueryAnalyzer::new(loaded).unwrap().analyze("Rust engineer");
    assert_eq!(ctx.skills[0].name, "rust");
    assert_eq!(ctx.skills[0].test_types, vec![TestType::K]);
    assert!(ctx.skills.iter().all(|s| s.name != "java"));
}

#[test]
fn test_invalid_boilerplate_pattern_is_rejected() {
    let vocab = Vocabulary {
        boilerplate_patterns: vec!["(unclosed".to_string()],
        ..Vocabulary::default()
    };
    assert!(matches!(
        QueryAnalyzer::new(vocab),
        Err(QueryError::InvalidPattern { .. })
    ));
}

#[test]
fn test_missing_vocabulary_file() {
    assert!(matches!(
        Vocabulary::load(std::path::Path::new("/no/vocab.json")),
        Err(QueryError::VocabularyIo { .. })
    ));
}

#[test]
fn test_domain_test_types() {
    assert!(Domain::Technical.covers(TestType::K));
    assert!(Domain::Behavioral.covers(TestType::P));
    assert!(Domain::Cognitive.covers(TestType::A));
    assert!(!Domain::Cognitive.covers(TestType::K));
}

#[test]
fn test_looks_like_url() {
    assert!(looks_like_url("https://jobs.example.com/123"));
    assert!(looks_like_url("  http://a.b/c  "));
    assert!(!looks_like_url("see https://jobs.example.com/123"));
    assert!(!looks_like_url("java developer"));
}

#[test]
fn test_html_to_text() {
    let html = r#"<html><head><style>.x{}</style><script>var a = "<b>";</script></head>
        <body><h1>Java&nbsp;Developer</h1><p>Knows &amp; loves SQL</p></body></html>"#;
    assert_eq!(html_to_text(html), "Java Developer Knows & loves SQL");
}
