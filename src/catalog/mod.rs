//! Assessment catalog: record model, URL canonicalization, and the read-only store.
//!
//! # Catalog file
//!
//! A JSON array of records:
//!
//! ```json
//! [{
//!   "url": "https://www.shl.com/solutions/products/product-catalog/view/java-8-new/",
//!   "name": "Java 8 (New)",
//!   "description": "Multi-choice test that measures knowledge of Java class design...",
//!   "duration": 18,
//!   "test_type": ["Knowledge & Skills"],
//!   "remote_support": "Yes",
//!   "adaptive_support": "No"
//! }]
//! ```
//!
//! `duration` may be `null` or `0` (unknown). `test_type` takes labels or single-letter
//! codes. Records without a recognizable test type are dropped at load.

pub mod error;
pub mod model;
pub mod store;
pub mod url;

#[cfg(test)]
mod tests;

pub use error::{CatalogError, CatalogResult};
pub use model::{Assessment, AssessmentRecord, TestType};
pub use store::CatalogStore;
pub use url::{alternate_spelling, canonicalize, url_variants};
