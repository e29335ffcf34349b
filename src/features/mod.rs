//! Per-(query, candidate) feature vectors.
//!
//! The layout in [`Feature::ALL`] is a contract with trained models: reordering
//! or adding a feature requires a new model artifact.

pub mod error;
pub mod extractor;
pub mod schema;


pub use error::FeatureError;
pub use extractor::{FeatureExtractor, FeaturedCandidate, duration_match};
pub use schema::{FEATURE_DIM, Feature, FeatureSchema, FeatureVector};
