use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use tracing::{debug, info, warn};

use super::error::{CatalogError, CatalogResult};
use super::model::{Assessment, RawAssessment, TestType};
use super::url::{alternate_spelling, canonicalize, url_variants};
use crate::hashing::catalog_fingerprint;

/// Read-only catalog keyed by canonical identifier.
///
/// Built once at startup; shared across requests behind an `Arc`.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    entries: Vec<Assessment>,
    by_id: HashMap<String, usize>,
    aliases: HashMap<String, usize>,
    row_ids: Vec<String>,
    fingerprint: String,
}

impl CatalogStore {
    /// Loads a JSON array of catalog records from disk.
    pub fn load(path: &Path) -> CatalogResult<Self> {
        let bytes = std::fs::read(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let raw: Vec<RawAssessment> =
            serde_json::from_slice(&bytes).map_err(|source| CatalogError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let store = Self::from_raw(raw)?;
        info!(
            path = %path.display(),
            entries = store.len(),
            rows = store.row_ids.len(),
            fingerprint = %&store.fingerprint[..12],
            "Catalog loaded"
        );
        Ok(store)
    }

    /// Parses catalog JSON already in memory.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let raw: Vec<RawAssessment> =
            serde_json::from_str(json).map_err(|source| CatalogError::Parse {
                path: "<memory>".into(),
                source,
            })?;
        Self::from_raw(raw)
    }

    /// Builds a store from already-normalized entries (ids are re-canonicalized).
    pub fn from_assessments(assessments: Vec<Assessment>) -> CatalogResult<Self> {
        let mut builder = Builder::default();
        for mut a in assessments {
            a.id = canonicalize(&a.url);
            builder.row_ids.push(a.id.clone());
            if a.test_types.is_empty() {
                warn!(url = %a.url, "Dropping catalog entry without a test type");
                continue;
            }
            builder.insert(a);
        }
        builder.finish()
    }

    pub(crate) fn from_raw(raw: Vec<RawAssessment>) -> CatalogResult<Self> {
        let mut builder = Builder::default();
        for record in raw {
            let id = canonicalize(&record.url);
            builder.row_ids.push(id.clone());

            if id.is_empty() {
                warn!("Dropping catalog entry with an empty url");
                continue;
            }

            let mut test_types = BTreeSet::new();
            for label in record.test_type.map(|t| t.into_vec()).unwrap_or_default() {
                match TestType::from_label(&label) {
                    Some(t) => {
                        test_types.insert(t);
                    }
                    None => warn!(url = %record.url, label = %label, "Unknown test type label"),
                }
            }
            if test_types.is_empty() {
                warn!(url = %record.url, "Dropping catalog entry without a test type");
                continue;
            }

            builder.insert(Assessment {
                id,
                url: record.url.trim().to_string(),
                name: record.name.trim().to_string(),
                description: record.description.trim().to_string(),
                duration_minutes: record.duration.filter(|d| *d > 0),
                test_types,
                remote_support: record.remote_support.is_some_and(|f| f.as_bool()),
                adaptive_support: record.adaptive_support.is_some_and(|f| f.as_bool()),
                alternate_urls: record.alternate_urls,
            });
        }
        builder.finish()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Assessment> {
        self.by_id.get(id).map(|&i| &self.entries[i])
    }

    /// Resolves any known spelling of an entry's URL (or its slug).
    pub fn resolve(&self, url: &str) -> Option<&Assessment> {
        let key = url.trim().to_lowercase();
        let key = key.trim_end_matches('/');

        if let Some(&i) = self.aliases.get(key) {
            return Some(&self.entries[i]);
        }
        if let Some(a) = self.get(&canonicalize(url)) {
            return Some(a);
        }
        alternate_spelling(url).and_then(|alt| self.get(&canonicalize(&alt)))
    }

    /// Resolves a URL to its canonical id, falling back to plain canonicalization.
    pub fn canonical_id(&self, url: &str) -> String {
        self.resolve(url)
            .map(|a| a.id.clone())
            .unwrap_or_else(|| canonicalize(url))
    }

    /// Entries in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &Assessment> {
        self.entries.iter()
    }

    /// Canonical id of every row in the source file, including dropped rows.
    ///
    /// Row `i` of a precomputed embedding matrix belongs to `row_ids()[i]`.
    pub fn row_ids(&self) -> &[String] {
        &self.row_ids
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

#[derive(Default)]
struct Builder {
    entries: Vec<Assessment>,
    by_id: HashMap<String, usize>,
    aliases: HashMap<String, usize>,
    row_ids: Vec<String>,
}

impl Builder {
    fn insert(&mut self, assessment: Assessment) {
        if let Some(&existing) = self.by_id.get(&assessment.id) {
            debug!(id = %assessment.id, "Merging duplicate catalog entry");
            let mut extra = vec![assessment.url];
            extra.extend(assessment.alternate_urls);
            for url in extra {
                self.register_aliases(existing, &url, &[]);
                let entry = &mut self.entries[existing];
                if url != entry.url && !entry.alternate_urls.contains(&url) {
                    entry.alternate_urls.push(url);
                }
            }
            return;
        }

        let index = self.entries.len();
        self.by_id.insert(assessment.id.clone(), index);
        let url = assessment.url.clone();
        let alternates = assessment.alternate_urls.clone();
        self.entries.push(assessment);
        self.register_aliases(index, &url, &alternates);
    }

    fn register_aliases(&mut self, index: usize, url: &str, alternates: &[String]) {
        for key in url_variants(url, alternates) {
            self.aliases.entry(key.clone()).or_insert(index);
            self.aliases.entry(canonicalize(&key)).or_insert(index);
        }
    }

    fn finish(self) -> CatalogResult<CatalogStore> {
        if self.entries.is_empty() {
            return Err(CatalogError::Empty);
        }
        let fingerprint = catalog_fingerprint(self.entries.iter().map(|a| a.id.as_str()));
        Ok(CatalogStore {
            entries: self.entries,
            by_id: self.by_id,
            aliases: self.aliases,
            row_ids: self.row_ids,
            fingerprint,
        })
    }
}
