use thiserror::Error;

/// Invalid candidate-generation settings.
#[derive(Debug, Error, PartialEq)]
pub enum RetrievalError {
    #[error("blend weights must be finite and non-negative with semantic > lexical (got {semantic} / {lexical})")]
    InvalidWeights { semantic: f32, lexical: f32 },

    #[error("pool size {pool_size} must exceed the output size {output_size}")]
    PoolTooSmall { pool_size: usize, output_size: usize },
}
