//! Final result list: duration filter, dedup, domain balance, size bounds.
//!
//! Ranks are a strict total order: score descending, then canonical id
//! ascending. The assembler never fabricates entries; a small pool yields a
//! short list.

pub mod assembler;
pub mod error;


pub use assembler::{AssemblyConfig, RankedResult, ResultAssembler};
pub use error::AssemblyError;
