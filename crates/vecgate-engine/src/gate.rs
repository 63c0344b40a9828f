//! Pairwise similarity gate over caller-supplied vectors.

use crate::{check_dimension, Result};
use vecgate_fixed::{GateOutcome, I256};
use vecgate_registry::Registry;

/// Check `a` and `b` against the registry's vector limits, then gate their
/// cosine similarity at `threshold`.
pub fn similarity_gate(
    registry: &Registry,
    a: &[i128],
    b: &[i128],
    threshold: I256,
) -> Result<GateOutcome> {
    registry.validate_vector(a)?;
    registry.validate_vector(b)?;
    check_dimension(a.len(), b.len())?;
    Ok(vecgate_fixed::similarity_gate(a, b, threshold)?)
}
