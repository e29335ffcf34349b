use super::*;
use std::io::Write;

const JAVA_URL: &str =
    "https://www.shl.com/solutions/products/product-catalog/view/java-8-new/";
const OPQ_URL: &str = "https://www.shl.com/products/product-catalog/view/opq32r";

fn sample_json() -> String {
    serde_json::json!([
        {
            "url": JAVA_URL,
            "name": "Java 8 (New)",
            "description": "Measures knowledge of Java class design and exceptions.",
            "duration": 18,
            "test_type": ["Knowledge & Skills"],
            "remote_support": "Yes",
            "adaptive_support": "Yes"
        },
        {
            "url": OPQ_URL,
            "name": "Occupational Personality Questionnaire OPQ32r",
            "description": "Personality questionnaire.",
            "duration": 0,
            "test_type": "P",
            "remote_support": true,
            "adaptive_support": false,
            "alternate_urls": ["https://www.shl.com/opq-legacy"]
        },
        {
            "url": "https://www.shl.com/products/product-catalog/view/mystery",
            "name": "Mystery",
            "test_type": ["Unknown"]
        },
        {
            "url": "https://www.shl.com/products/product-catalog/view/java-8-new",
            "name": "Java 8 duplicate",
            "test_type": ["K"],
            "alternate_urls": ["https://old.example.com/java8"]
        }
    ])
    .to_string()
}

#[test]
fn test_canonicalize_extracts_slug() {
    assert_eq!(canonicalize(JAVA_URL), "java-8-new");
    assert_eq!(canonicalize(OPQ_URL), "opq32r");
    assert_eq!(canonicalize("  https://X.com/A/View/Foo%28new%29/  "), "foo(new)");
}

#[test]
fn test_canonicalize_decodes_percent_sequences() {
    assert_eq!(
        canonicalize("https://a.com/view/core%20java%2dentry%20level"),
        "core java-entry level"
    );
}

#[test]
fn test_canonicalize_is_idempotent() {
    for url in [
        JAVA_URL,
        OPQ_URL,
        "https://www.shl.com/solutions/products/other/",
        "plain-slug",
        "",
        "https://www.shl.com/products/product-catalog/view/java%20",
        "https://www.shl.com/products/product-catalog/view/%20java%20/",
        "https://www.shl.com/products/product-catalog/view/java%20/%20/",
        "https://www.shl.com/x/solutions/solutions/products/products/y",
        "https://İ/products/product-catalog/view/été",
    ] {
        let once = canonicalize(url);
        assert_eq!(canonicalize(&once), once, "not idempotent for {url}");
    }
    assert_eq!(
        canonicalize("https://www.shl.com/products/product-catalog/view/java%20"),
        "java"
    );
}

#[test]
fn test_alternate_spelling_handles_non_ascii() {
    // 'İ' lower-cases to a longer byte sequence.
    let alt = alternate_spelling("https://İ/products/product-catalog/view/été").unwrap();
    assert!(alt.ends_with("/solutions/products/product-catalog/view/été"));
    let back = alternate_spelling("https://İ/solutions/products/product-catalog/view/été").unwrap();
    assert!(back.ends_with("/products/product-catalog/view/été"));
    assert!(!back.contains("/solutions/"));
}

#[test]
fn test_canonical_id_is_stable_for_unknown_urls() {
    let store = CatalogStore::from_json(&sample_json()).unwrap();
    for url in [
        "https://İ/products/product-catalog/view/été",
        "https://www.shl.com/products/product-catalog/view/java%20",
    ] {
        let once = store.canonical_id(url);
        assert_eq!(store.canonical_id(&once), once, "{url}");
    }
    assert!(store.resolve("https://İ/solutions/products/product-catalog/view/été").is_none());
}

#[test]
fn test_canonicalize_merges_solutions_prefix_without_view() {
    assert_eq!(
        canonicalize("https://www.shl.com/solutions/products/foo/"),
        canonicalize("https://www.shl.com/products/foo")
    );
}

#[test]
fn test_alternate_spelling_round_trips() {
    let alt = alternate_spelling(JAVA_URL).unwrap();
    assert_eq!(
        alt,
        "https://www.shl.com/products/product-catalog/view/java-8-new/"
    );
    assert_eq!(alternate_spelling(&alt).unwrap(), JAVA_URL);
    assert!(alternate_spelling("https://example.com/x").is_none());
}

#[test]
fn test_url_variants_deduplicate() {
    let alternates = vec![OPQ_URL.to_string()];
    let variants = url_variants(OPQ_URL, &alternates);
    assert_eq!(variants.len(), 2);
}

#[test]
fn test_test_type_from_label() {
    assert_eq!(TestType::from_label("K"), Some(TestType::K));
    assert_eq!(TestType::from_label("k"), Some(TestType::K));
    assert_eq!(
        TestType::from_label("personality & behaviour"),
        Some(TestType::P)
    );
    assert_eq!(
        TestType::from_label(" Ability & Aptitude "),
        Some(TestType::A)
    );
    assert_eq!(TestType::from_label("Unknown"), None);
    assert_eq!(TestType::from_label("Z"), None);
}

#[test]
fn test_store_drops_untyped_and_merges_duplicates() {
    let store = CatalogStore::from_json(&sample_json()).unwrap();

    assert_eq!(store.len(), 2);
    assert_eq!(store.row_ids().len(), 4);
    assert_eq!(store.row_ids()[2], "mystery");
    assert!(store.get("mystery").is_none());

    let java = store.get("java-8-new").unwrap();
    assert_eq!(java.name, "Java 8 (New)");
    assert!(
        java.alternate_urls
            .iter()
            .any(|u| u == "https://old.example.com/java8")
    );
}

#[test]
fn test_store_normalizes_fields() {
    let store = CatalogStore::from_json(&sample_json()).unwrap();

    let java = store.get("java-8-new").unwrap();
    assert_eq!(java.duration_minutes, Some(18));
    assert!(java.remote_support);
    assert!(java.adaptive_support);

    let opq = store.get("opq32r").unwrap();
    assert_eq!(opq.duration_minutes, None);
    assert!(opq.remote_support);
    assert!(!opq.adaptive_support);
    assert!(opq.has_test_type(TestType::P));
}

#[test]
fn test_resolve_any_spelling() {
    let store = CatalogStore::from_json(&sample_json()).unwrap();

    for url in [
        JAVA_URL,
        "https://www.shl.com/products/product-catalog/view/java-8-new",
        "HTTPS://WWW.SHL.COM/SOLUTIONS/PRODUCTS/PRODUCT-CATALOG/VIEW/JAVA-8-NEW",
        "java-8-new",
        "https://old.example.com/java8/",
    ] {
        let first = store.resolve(url).map(|a| a.id.clone());
        let second = store.resolve(url).map(|a| a.id.clone());
        assert_eq!(first.as_deref(), Some("java-8-new"), "failed for {url}");
        assert_eq!(first, second);
    }

    assert_eq!(
        store.resolve("https://www.shl.com/opq-legacy").unwrap().id,
        "opq32r"
    );
    assert!(store.resolve("https://nowhere.example.com/x").is_none());
}

#[test]
fn test_canonical_id_falls_back_for_unknown_urls() {
    let store = CatalogStore::from_json(&sample_json()).unwrap();
    assert_eq!(
        store.canonical_id("https://a.com/view/not-in-catalog/"),
        "not-in-catalog"
    );
}

#[test]
fn test_record_conversion() {
    let store = CatalogStore::from_json(&sample_json()).unwrap();
    let record = AssessmentRecord::from(store.get("opq32r").unwrap());

    assert_eq!(record.url, OPQ_URL);
    assert_eq!(record.duration, 0);
    assert_eq!(record.remote_support, "Yes");
    assert_eq!(record.adaptive_support, "No");
    assert_eq!(record.test_type, vec!["Personality & Behavior".to_string()]);
}

#[test]
fn test_empty_catalog_is_an_error() {
    let result = CatalogStore::from_json("[]");
    assert!(matches!(result, Err(CatalogError::Empty)));

    let only_untyped = r#"[{"url": "https://a.com/view/x", "test_type": []}]"#;
    assert!(matches!(
        CatalogStore::from_json(only_untyped),
        Err(CatalogError::Empty)
    ));
}

#[test]
fn test_load_from_disk() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(sample_json().as_bytes()).unwrap();

    let store = CatalogStore::load(file.path()).unwrap();
    assert_eq!(store.len(), 2);
    assert_eq!(store.fingerprint().len(), 64);

    let reloaded = CatalogStore::load(file.path()).unwrap();
    assert_eq!(store.fingerprint(), reloaded.fingerprint());
}

#[test]
fn test_load_reports_parse_errors() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"{not json").unwrap();

    assert!(matches!(
        CatalogStore::load(file.path()),
        Err(CatalogError::Parse { .. })
    ));
    assert!(matches!(
        CatalogStore::load(std::path::Path::new("/missing/catalog.json")),
        Err(CatalogError::Io { .. })
    ));
}
