//! Cross-cutting, shared constants.
//!
//! Pipeline defaults live here so that configuration, tests and the binary agree on them.
//!
//! The embedding dimension is shared by the query embedder and the vector
//! index; `RecommenderContext::validate` rejects a mismatch at startup.

use std::time::Duration;

pub const DEFAULT_EMBEDDING_DIM: usize = 768;

/// Hard upper bound on the response size.
pub const MAX_RESULTS: usize = 10;
/// Lower bound the assembler keeps whenever the pool allows it.
pub const MIN_RESULTS: usize = 5;

/// Candidate pool size K handed to feature extraction (4x the output size).
pub const DEFAULT_POOL_SIZE: usize = 40;
/// Nearest neighbours requested from the vector index (M).
pub const DEFAULT_VECTOR_TOP_M: usize = 150;

pub const DEFAULT_SEMANTIC_WEIGHT: f32 = 0.7;
pub const DEFAULT_LEXICAL_WEIGHT: f32 = 0.3;

pub const DEFAULT_EMBEDDING_TIMEOUT: Duration = Duration::from_millis(3_000);
pub const DEFAULT_JUDGE_TIMEOUT: Duration = Duration::from_millis(10_000);
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_millis(10_000);
pub const DEFAULT_JUDGE_RETRIES: u32 = 2;
/// Candidates described to the external judge per request.
pub const DEFAULT_JUDGE_MAX_CANDIDATES: usize = 20;

pub const DEFAULT_EMBEDDING_CACHE_CAPACITY: u64 = 1_024;
