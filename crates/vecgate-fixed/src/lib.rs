//! Deterministic fixed-point vector math for vecgate.
//!
//! Every score produced by the gateway is computed here. Components are
//! `i128` values scaled by [`SCALE`] (1e18 = 1.0); sums and products are
//! carried in 256-bit accumulators ([`ethnum::I256`]) and only rescaled at the
//! final step, so two validators fed the same inputs always agree bit for bit.
//!
//! - **Scalar helpers**: integer square root, scaled multiply/divide, ratios
//! - **Distance functions**: dot product, cosine similarity, Euclidean distance
//! - **Similarity gate**: threshold check over cosine similarity
//!
//! # Example
//!
//! ```
//! use vecgate_fixed::{cosine_similarity, euclidean_distance, I256, ONE, SCALE};
//!
//! let a = [SCALE, 0];
//! let b = [SCALE, 0];
//! assert_eq!(cosine_similarity(&a, &b).unwrap(), ONE);
//! assert_eq!(euclidean_distance(&a, &b).unwrap(), I256::ZERO);
//! ```

mod distance;
mod scalar;

pub use distance::{
    cosine_similarity, dot, euclidean_distance, euclidean_distance_squared, norm,
    similarity_gate, GateOutcome, Metric,
};
pub use scalar::{fixed_div, fixed_mul, isqrt, ratio, ONE, SCALE};

pub use ethnum::I256;

/// Error type for fixed-point operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FixedError {
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Arithmetic overflow")]
    Overflow,

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Square root of negative value")]
    NegativeSqrt,
}

/// Result type for fixed-point operations.
pub type Result<T> = std::result::Result<T, FixedError>;
