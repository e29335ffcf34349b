use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AssemblyError {
    #[error("result bounds must satisfy 1 <= min ({min}) <= max ({max}) <= {limit}")]
    InvalidBounds { min: usize, max: usize, limit: usize },

    #[error("score floor must be finite, got {0}")]
    InvalidFloor(f32),
}
