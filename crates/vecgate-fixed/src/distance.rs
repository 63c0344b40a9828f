//! Distance functions for fixed-point vectors.
//!
//! Provides the metrics used by the engines:
//! - **Cosine**: angle-based similarity in `[-1.0, 1.0]`, higher is closer
//! - **Euclidean (L2)**: straight-line distance, lower is closer
//!
//! Inputs are `i128` components at scale 1e18. Every sum is taken in an
//! `I256` accumulator at scale 1e36 and reduced once at the end.

use crate::scalar::{isqrt, ONE};
use crate::{FixedError, Result};
use ethnum::I256;
use std::cmp::Ordering;

/// Metric used to rank candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    /// Cosine similarity: (a · b) / (||a|| * ||b||). Higher is better.
    Cosine,
    /// Euclidean (L2) distance: sqrt(sum((a[i] - b[i])^2)). Lower is better.
    Euclidean,
}

impl Metric {
    /// Score `b` against `a` under this metric.
    #[inline]
    pub fn measure(&self, a: &[i128], b: &[i128]) -> Result<I256> {
        match self {
            Self::Cosine => cosine_similarity(a, b),
            Self::Euclidean => euclidean_distance(a, b),
        }
    }

    /// Order two scores so the better one sorts first.
    #[inline]
    pub fn rank(&self, x: &I256, y: &I256) -> Ordering {
        match self {
            Self::Cosine => y.cmp(x),
            Self::Euclidean => x.cmp(y),
        }
    }
}

#[inline]
fn check_len(a: &[i128], b: &[i128]) -> Result<()> {
    if a.len() != b.len() {
        return Err(FixedError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }
    Ok(())
}

#[inline]
fn square(x: i128) -> I256 {
    let w = I256::from(x);
    w * w
}

/// Raw dot product at scale 1e36.
pub fn dot(a: &[i128], b: &[i128]) -> Result<I256> {
    check_len(a, b)?;

    let mut acc = I256::ZERO;
    for (&x, &y) in a.iter().zip(b) {
        acc = acc
            .checked_add(I256::from(x) * I256::from(y))
            .ok_or(FixedError::Overflow)?;
    }
    Ok(acc)
}

/// L2 norm at scale 1e18.
pub fn norm(a: &[i128]) -> Result<I256> {
    let mut acc = I256::ZERO;
    for &x in a {
        acc = acc.checked_add(square(x)).ok_or(FixedError::Overflow)?;
    }
    isqrt(acc)
}

/// Compute dot product and squared norms in a single pass.
///
/// Returns (dot, norm_a_squared, norm_b_squared), all at scale 1e36.
fn dot_and_norms(a: &[i128], b: &[i128]) -> Result<(I256, I256, I256)> {
    let mut dot = I256::ZERO;
    let mut norm_a = I256::ZERO;
    let mut norm_b = I256::ZERO;

    for (&x, &y) in a.iter().zip(b) {
        dot = dot
            .checked_add(I256::from(x) * I256::from(y))
            .ok_or(FixedError::Overflow)?;
        norm_a = norm_a.checked_add(square(x)).ok_or(FixedError::Overflow)?;
        norm_b = norm_b.checked_add(square(y)).ok_or(FixedError::Overflow)?;
    }

    Ok((dot, norm_a, norm_b))
}

/// Cosine similarity at scale 1e18, in `[-1e18, 1e18]`.
///
/// A zero vector has no direction; its similarity to anything is 0.
///
/// # Example
///
/// ```
/// use vecgate_fixed::{cosine_similarity, I256, ONE, SCALE};
///
/// let a = [SCALE, 0];
/// let b = [0, SCALE];
/// assert_eq!(cosine_similarity(&a, &b).unwrap(), I256::ZERO);
/// assert_eq!(cosine_similarity(&a, &[-SCALE, 0]).unwrap(), -ONE);
/// ```
pub fn cosine_similarity(a: &[i128], b: &[i128]) -> Result<I256> {
    check_len(a, b)?;

    let (dot, norm_a, norm_b) = dot_and_norms(a, b)?;
    let denom = isqrt(norm_a)?
        .checked_mul(isqrt(norm_b)?)
        .ok_or(FixedError::Overflow)?;
    if denom == I256::ZERO {
        return Ok(I256::ZERO);
    }

    let similarity = dot.checked_mul(ONE).ok_or(FixedError::Overflow)? / denom;
    // Floored norms can push parallel vectors just past 1.0
    Ok(similarity.clamp(-ONE, ONE))
}

/// Squared Euclidean distance at scale 1e36.
pub fn euclidean_distance_squared(a: &[i128], b: &[i128]) -> Result<I256> {
    check_len(a, b)?;

    let mut sum = I256::ZERO;
    for (&x, &y) in a.iter().zip(b) {
        let d = I256::from(x) - I256::from(y);
        let sq = d.checked_mul(d).ok_or(FixedError::Overflow)?;
        sum = sum.checked_add(sq).ok_or(FixedError::Overflow)?;
    }
    Ok(sum)
}

/// Euclidean distance at scale 1e18, rounded down.
///
/// # Example
///
/// ```
/// use vecgate_fixed::{euclidean_distance, I256, SCALE};
///
/// let a = [0, 0];
/// let b = [3 * SCALE, 4 * SCALE];
/// assert_eq!(euclidean_distance(&a, &b).unwrap(), I256::new(5 * SCALE));
/// ```
pub fn euclidean_distance(a: &[i128], b: &[i128]) -> Result<I256> {
    isqrt(euclidean_distance_squared(a, b)?)
}

/// Outcome of a similarity gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateOutcome {
    /// `similarity >= threshold`
    pub passed: bool,
    /// Cosine similarity at scale 1e18.
    pub similarity: I256,
}

/// Check whether two vectors are at least `threshold` similar.
///
/// Symmetric in `a` and `b`: the dot product and the norm product both
/// commute, so swapping the arguments yields the same bits.
pub fn similarity_gate(a: &[i128], b: &[i128], threshold: I256) -> Result<GateOutcome> {
    let similarity = cosine_similarity(a, b)?;
    Ok(GateOutcome {
        passed: similarity >= threshold,
        similarity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scalar::SCALE;
    use proptest::prelude::*;

    #[test]
    fn test_euclidean_distance() {
        let a = [0, 0, 0];
        let b = [3 * SCALE, 4 * SCALE, 0];
        assert_eq!(euclidean_distance(&a, &b).unwrap(), I256::new(5 * SCALE));

        // Same vectors = 0 distance
        let c = [SCALE, 2 * SCALE, 3 * SCALE];
        assert_eq!(euclidean_distance(&c, &c).unwrap(), I256::ZERO);
    }

    #[test]
    fn test_euclidean_distance_squared() {
        let a = [0, 0];
        let b = [3 * SCALE, 4 * SCALE];
        assert_eq!(
            euclidean_distance_squared(&a, &b).unwrap(),
            I256::new(25) * ONE * ONE
        );
    }

    #[test]
    fn test_cosine_similarity() {
        // Identical direction = 1.0 regardless of magnitude
        let a = [SCALE, 2 * SCALE, 3 * SCALE];
        let scaled = [2 * SCALE, 4 * SCALE, 6 * SCALE];
        assert_eq!(cosine_similarity(&a, &a).unwrap(), ONE);
        assert_eq!(cosine_similarity(&a, &scaled).unwrap(), ONE);

        // Orthogonal = 0
        assert_eq!(
            cosine_similarity(&[SCALE, 0], &[0, SCALE]).unwrap(),
            I256::ZERO
        );

        // Opposite = -1.0
        assert_eq!(cosine_similarity(&[SCALE, 0], &[-SCALE, 0]).unwrap(), -ONE);
    }

    #[test]
    fn test_zero_vector_cosine() {
        let a = [0, 0, 0];
        let b = [SCALE, 2 * SCALE, 3 * SCALE];
        assert_eq!(cosine_similarity(&a, &b).unwrap(), I256::ZERO);
    }

    #[test]
    fn test_dimension_mismatch() {
        let err = cosine_similarity(&[SCALE], &[SCALE, 0]).unwrap_err();
        assert_eq!(
            err,
            FixedError::DimensionMismatch {
                expected: 1,
                actual: 2
            }
        );
        assert!(euclidean_distance(&[0, 0], &[0]).is_err());
        assert!(dot(&[], &[1]).is_err());
    }

    #[test]
    fn test_dot_and_norm() {
        let a = [SCALE, 2 * SCALE, 3 * SCALE];
        let b = [4 * SCALE, 5 * SCALE, 6 * SCALE];
        // 1*4 + 2*5 + 3*6 = 32, at scale 1e36
        assert_eq!(dot(&a, &b).unwrap(), I256::new(32) * ONE * ONE);
        assert_eq!(norm(&[3 * SCALE, 4 * SCALE]).unwrap(), I256::new(5 * SCALE));
    }

    #[test]
    fn test_metric_enum() {
        let a = [SCALE, 0];
        let b = [0, SCALE];

        assert_eq!(Metric::Cosine.measure(&a, &b).unwrap(), I256::ZERO);
        // sqrt(2) at scale 1e18, floored
        assert_eq!(
            Metric::Euclidean.measure(&a, &b).unwrap(),
            I256::new(1_414_213_562_373_095_048)
        );

        let hi = ONE;
        let lo = I256::ZERO;
        assert_eq!(Metric::Cosine.rank(&hi, &lo), Ordering::Less);
        assert_eq!(Metric::Euclidean.rank(&hi, &lo), Ordering::Greater);
    }

    #[test]
    fn test_similarity_gate_threshold() {
        let a = [SCALE, 0];
        let b = [SCALE, SCALE];
        let gate = similarity_gate(&a, &b, ONE / I256::new(2)).unwrap();
        assert!(gate.passed);
        let gate = similarity_gate(&a, &b, ONE).unwrap();
        assert!(!gate.passed);
    }

    #[test]
    fn test_high_dimensional() {
        let a: Vec<i128> = (0..128).map(|i| i as i128 * SCALE).collect();
        let b: Vec<i128> = (0..128).map(|i| (i + 1) as i128 * SCALE).collect();

        // Each diff is 1, so sqrt(128)
        let d = euclidean_distance(&a, &b).unwrap();
        assert_eq!(d, I256::new(11_313_708_498_984_760_390));
    }

    fn arb_component() -> impl Strategy<Value = i128> {
        -(1_000_000 * SCALE)..=(1_000_000 * SCALE)
    }

    proptest! {
        #[test]
        fn prop_gate_is_symmetric(
            pair in (1usize..64).prop_flat_map(|d| (
                prop::collection::vec(arb_component(), d),
                prop::collection::vec(arb_component(), d),
            ))
        ) {
            let (a, b) = pair;
            let ab = similarity_gate(&a, &b, I256::ZERO).unwrap();
            let ba = similarity_gate(&b, &a, I256::ZERO).unwrap();
            prop_assert_eq!(ab, ba);
            prop_assert!(ab.similarity <= ONE && ab.similarity >= -ONE);
        }

        #[test]
        fn prop_euclidean_is_symmetric(
            pair in (1usize..64).prop_flat_map(|d| (
                prop::collection::vec(arb_component(), d),
                prop::collection::vec(arb_component(), d),
            ))
        ) {
            let (a, b) = pair;
            prop_assert_eq!(
                euclidean_distance(&a, &b).unwrap(),
                euclidean_distance(&b, &a).unwrap()
            );
        }
    }
}
