//! Read-only AI primitives over the vecgate registry.
//!
//! Every engine takes `&Registry` and a block height, resolves vectors with
//! the registry's lazy-expiry rules, and computes in fixed point:
//!
//! - **classify**: k-NN majority vote over caller-supplied labeled references
//! - **cluster_assign**: nearest centroid by Euclidean distance
//! - **anomaly_score**: RMS z-score against a domain's calibrated statistic
//! - **similarity_gate**: cosine similarity against a threshold
//! - **global_search**: per-domain top-k merged into one ranking
//!
//! Ties are always broken toward the lowest id (or label), so results are
//! identical on every node.

mod anomaly;
mod classify;
mod cluster;
mod gate;
mod rank;
mod search;

pub use anomaly::{anomaly_score, AnomalyScore, ANOMALY_THRESHOLD};
pub use classify::{classify, Classification, LabeledReference};
pub use cluster::{cluster_assign, Assignment};
pub use gate::similarity_gate;
pub use rank::{top_k, Scored, TopK};
pub use search::{global_search, SearchHit};
pub use vecgate_fixed::GateOutcome;

use vecgate_fixed::FixedError;
use vecgate_registry::Domain;

/// Error type for engine operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    InvalidDimension { expected: usize, actual: usize },

    #[error("No valid references remain")]
    InsufficientReferences,

    #[error("No centroids available")]
    NoCentroidsAvailable,

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Domain {0} has no anomaly statistic")]
    NotCalibrated(Domain),

    #[error("Registry error: {0}")]
    Registry(#[from] vecgate_registry::Error),

    #[error("Arithmetic error: {0}")]
    Arithmetic(FixedError),
}

impl From<FixedError> for EngineError {
    fn from(e: FixedError) -> Self {
        match e {
            FixedError::DimensionMismatch { expected, actual } => {
                EngineError::InvalidDimension { expected, actual }
            }
            other => EngineError::Arithmetic(other),
        }
    }
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

pub(crate) fn check_dimension(expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(EngineError::InvalidDimension { expected, actual });
    }
    Ok(())
}
