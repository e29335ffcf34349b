//! Shared fixtures: a small synthetic catalog spanning every domain, with an
//! in-memory index built from the mock embedder.

#![allow(dead_code)]

use std::sync::Arc;

use recommender::catalog::CatalogStore;
use recommender::embedding::MockEmbedder;
use recommender::engine::{PipelineConfig, Recommender, RecommenderContext};
use recommender::query::QueryAnalyzer;
use recommender::rerank::{Reranker, RuleReranker, RuleWeights};
use recommender::vectordb::InMemoryVectorIndex;

pub const DIM: usize = 48;
pub const BASE: &str = "https://catalog.example.com/solutions/products/product-catalog/view";

/// (slug, name, description, duration, test types)
const ENTRIES: &[(&str, &str, &str, Option<u32>, &[&str])] = &[
    ("java-8-new", "Java 8 (New)", "Multi-choice test of Java class design, collections and exceptions.", Some(18), &["K"]),
    ("core-java-entry-level-new", "Core Java (Entry Level) (New)", "Entry level Java programming knowledge.", Some(13), &["K"]),
    ("core-java-advanced-level-new", "Core Java (Advanced Level) (New)", "Advanced Java concurrency and JVM internals.", Some(13), &["K"]),
    ("java-frameworks-new", "Java Frameworks (New)", "Spring and Hibernate knowledge.", Some(30), &["K"]),
    ("automata-fix-new", "Automata Fix (New)", "Coding simulation: fix bugs in Java or Python code.", Some(20), &["S", "K"]),
    ("python-new", "Python (New)", "Python programming and standard library.", Some(11), &["K"]),
    ("sql-server-new", "SQL Server (New)", "Database queries and administration.", Some(15), &["K"]),
    ("javascript-new", "JavaScript (New)", "Frontend JavaScript language knowledge.", Some(16), &["K"]),
    ("selenium-new", "Selenium (New)", "Web test automation with Selenium.", Some(10), &["K"]),
    ("interpersonal-communications", "Interpersonal Communications", "How well candidates collaborate and communicate with stakeholders.", Some(15), &["K"]),
    ("business-communication-adaptive", "Business Communication (adaptive)", "Written and spoken business communication.", Some(25), &["K", "P"]),
    ("occupational-personality-questionnaire-opq32r", "Occupational Personality Questionnaire OPQ32r", "Personality and behavior at work, teamwork and collaboration styles.", Some(25), &["P"]),
    ("teamwork-and-collaboration-solution", "Teamwork and Collaboration Solution", "Assesses collaborative behaviour in teams.", Some(20), &["C", "P"]),
    ("graduate-situational-judgement", "Graduate Situational Judgement", "Situational judgement scenarios for graduates.", Some(30), &["B"]),
    ("enterprise-leadership-report", "Enterprise Leadership Report", "Leadership potential for executives.", None, &["P", "C"]),
    ("verify-numerical-ability", "Verify Numerical Ability", "Numerical reasoning with tables and charts.", Some(20), &["A"]),
    ("verify-verbal-ability", "Verify Verbal Ability", "Verbal reasoning and comprehension.", Some(17), &["A"]),
    ("verify-inductive-reasoning", "Verify Inductive Reasoning", "Abstract pattern recognition.", Some(24), &["A"]),
    ("entry-level-sales-solution", "Entry Level Sales Solution", "Sales aptitude for entry level applicants.", Some(45), &["A", "P"]),
    ("entry-level-customer-serv", "Entry Level Customer Service", "Customer service judgement for entry level roles.", Some(10), &["B", "P"]),
    ("entry-level-admin-test", "Entry Level Administrative Test", "Clerical and administrative tasks for entry level staff.", Some(20), &["K"]),
    ("entry-level-cashier", "Entry Level Cashier", "Cash handling and arithmetic for entry level cashiers.", None, &["A", "K"]),
    ("ms-excel-365", "MS Excel (New)", "Microsoft Excel spreadsheet skills.", Some(35), &["K", "S"]),
    ("data-entry-new", "Data Entry (New)", "Typing speed and accuracy.", Some(8), &["S"]),
    ("landscape-gardening", "Landscape Gardening", "Plants and soil.", Some(30), &["K"]),
];

pub fn url_for(slug: &str) -> String {
    format!("{BASE}/{slug}/")
}

pub fn catalog_json() -> String {
    let rows: Vec<serde_json::Value> = ENTRIES
        .iter()
        .map(|(slug, name, description, duration, types)| {
            serde_json::json!({
                "url": url_for(slug),
                "name": name,
                "description": description,
                "duration": duration,
                "test_type": types,
                "remote_support": "Yes",
                "adaptive_support": "No",
            })
        })
        .collect();
    serde_json::Value::Array(rows).to_string()
}

pub fn catalog() -> CatalogStore {
    CatalogStore::from_json(&catalog_json()).unwrap()
}

fn entry_text(catalog: &CatalogStore, id: &str) -> String {
    catalog
        .get(id)
        .map(|a| format!("{} {}", a.name, a.description))
        .unwrap_or_default()
}

/// Catalog, index and embedder wired together; retrieval runs hybrid.
pub fn hybrid_context() -> (Arc<RecommenderContext>, Arc<MockEmbedder>) {
    let catalog = catalog();
    let embedder = Arc::new(MockEmbedder::new(DIM));
    let ids: Vec<String> = catalog.iter().map(|a| a.id.clone()).collect();
    let vectors: Vec<Vec<f32>> = ids
        .iter()
        .map(|id| embedder.embed_text(&entry_text(&catalog, id)))
        .collect();
    let index = InMemoryVectorIndex::from_vectors(ids, &vectors).unwrap();

    let context = RecommenderContext::from_parts(catalog, QueryAnalyzer::with_defaults().unwrap())
        .with_index(Arc::new(index))
        .with_embedder(embedder.clone());
    (Arc::new(context), embedder)
}

/// No URL fetching; queries are always analyzed as text.
pub fn offline_pipeline() -> PipelineConfig {
    PipelineConfig {
        fetch_timeout: None,
        ..PipelineConfig::default()
    }
}

pub fn rules() -> RuleReranker {
    RuleReranker::new(RuleWeights::default()).unwrap()
}

pub fn rule_recommender(context: Arc<RecommenderContext>) -> Recommender {
    Recommender::new(context, Reranker::Rules(rules()), offline_pipeline()).unwrap()
}
