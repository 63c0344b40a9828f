use crate::config::ConfigError;
use thiserror::Error;
use vecgate_fixed::FixedError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid dimension {dimension}: must be between 1 and {max}")]
    InvalidDimension { dimension: usize, max: usize },

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Too many tags: {count} > {max}")]
    TooManyTags { count: usize, max: usize },

    #[error("Component {index} out of range")]
    ComponentOutOfRange { index: usize },

    #[error("Quota exceeded: required {required}, remaining {remaining}")]
    QuotaExceeded { required: u128, remaining: u128 },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Arithmetic error: {0}")]
    Fixed(#[from] FixedError),

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, Error>;
