//! Candidate generation: vector neighbours blended with lexical overlap.
//!
//! ```text
//! QueryContext ──┬─► VectorIndex top-M ──┐
//!                └─► lexical score (all) ─┴─► merge_rankings ─► top-K pool
//! ```

pub mod blend;
pub mod candidate;
pub mod error;
pub mod generator;
pub mod lexical;

#[cfg(test)]
mod tests;

pub use blend::{BlendWeights, merge_rankings};
pub use candidate::{Candidate, CandidatePool, Provenance, RetrievalMode, compare_ranked};
pub use error::RetrievalError;
pub use generator::{CandidateGenerator, GeneratorConfig};
pub use lexical::{EntryText, lexical_score};
