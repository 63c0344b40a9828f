use crate::codec::CodecError;
use crate::config::ConfigError;
use thiserror::Error;
use vecgate_engine::EngineError;
use vecgate_fixed::FixedError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Unknown selector: {0:#x}")]
    UnknownSelector(u32),

    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("Insufficient budget: required {required}, budget {budget}")]
    InsufficientBudget { required: u64, budget: u64 },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Registry error: {0}")]
    Registry(#[from] vecgate_registry::Error),

    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, GatewayError>;

/// Stable numeric error codes reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ErrorCode {
    InvalidDimension = 1,
    TooManyTags = 2,
    QuotaExceeded = 3,
    InsufficientReferences = 4,
    NoCentroidsAvailable = 5,
    InsufficientBudget = 6,
    InvalidParameter = 7,
    ComponentOutOfRange = 8,
    NotCalibrated = 9,
    Overflow = 10,
    UnknownSelector = 11,
    Codec = 12,
}

impl ErrorCode {
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

fn fixed_code(e: &FixedError) -> ErrorCode {
    match e {
        FixedError::DimensionMismatch { .. } => ErrorCode::InvalidDimension,
        _ => ErrorCode::Overflow,
    }
}

fn registry_code(e: &vecgate_registry::Error) -> ErrorCode {
    use vecgate_registry::Error as R;
    match e {
        R::InvalidDimension { .. } | R::DimensionMismatch { .. } => ErrorCode::InvalidDimension,
        R::TooManyTags { .. } => ErrorCode::TooManyTags,
        R::ComponentOutOfRange { .. } => ErrorCode::ComponentOutOfRange,
        R::QuotaExceeded { .. } => ErrorCode::QuotaExceeded,
        R::InvalidParameter(_) | R::Config(_) => ErrorCode::InvalidParameter,
        R::Fixed(f) => fixed_code(f),
    }
}

impl GatewayError {
    /// Flatten to the stable code callers see.
    pub fn code(&self) -> ErrorCode {
        match self {
            GatewayError::UnknownSelector(_) => ErrorCode::UnknownSelector,
            GatewayError::Codec(CodecError::UnknownDomain(_)) => ErrorCode::InvalidParameter,
            GatewayError::Codec(CodecError::ComponentOutOfRange) => ErrorCode::ComponentOutOfRange,
            GatewayError::Codec(_) => ErrorCode::Codec,
            GatewayError::InsufficientBudget { .. } => ErrorCode::InsufficientBudget,
            GatewayError::InvalidParameter(_) | GatewayError::Config(_) => {
                ErrorCode::InvalidParameter
            }
            GatewayError::Registry(e) => registry_code(e),
            GatewayError::Engine(e) => match e {
                EngineError::InvalidDimension { .. } => ErrorCode::InvalidDimension,
                EngineError::InsufficientReferences => ErrorCode::InsufficientReferences,
                EngineError::NoCentroidsAvailable => ErrorCode::NoCentroidsAvailable,
                EngineError::InvalidParameter(_) => ErrorCode::InvalidParameter,
                EngineError::NotCalibrated(_) => ErrorCode::NotCalibrated,
                EngineError::Registry(r) => registry_code(r),
                EngineError::Arithmetic(f) => fixed_code(f),
            },
        }
    }
}
