//! Request pipeline and the shared context it runs against.

pub mod context;
pub mod error;
pub mod pipeline;

#[cfg(test)]
mod tests;

pub use context::RecommenderContext;
pub use error::EngineError;
pub use pipeline::{PipelineConfig, Recommendation, Recommender};
