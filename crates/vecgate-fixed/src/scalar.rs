//! Scalar fixed-point helpers.
//!
//! All helpers truncate toward zero, which is what `I256` division does.

use crate::{FixedError, Result};
use ethnum::I256;

/// Fixed-point scale: 1e18 represents 1.0.
pub const SCALE: i128 = 1_000_000_000_000_000_000;

/// [`SCALE`] as a 256-bit word.
pub const ONE: I256 = I256::new(SCALE);

/// Integer square root, rounded down.
///
/// Newton iteration seeded from a power of two at or above the root, so the
/// sequence decreases monotonically and stops at `floor(sqrt(n))`.
pub fn isqrt(n: I256) -> Result<I256> {
    if n.is_negative() {
        return Err(FixedError::NegativeSqrt);
    }
    if n < I256::new(2) {
        return Ok(n);
    }

    let bits = 256 - n.leading_zeros();
    let mut x = I256::ONE << ((bits + 1) / 2);
    loop {
        let y = (x + n / x) / I256::new(2);
        if y >= x {
            return Ok(x);
        }
        x = y;
    }
}

/// Multiply two fixed-point values: `a * b / SCALE`.
pub fn fixed_mul(a: I256, b: I256) -> Result<I256> {
    let wide = a.checked_mul(b).ok_or(FixedError::Overflow)?;
    Ok(wide / ONE)
}

/// Divide two fixed-point values: `a * SCALE / b`.
pub fn fixed_div(a: I256, b: I256) -> Result<I256> {
    if b == I256::ZERO {
        return Err(FixedError::DivisionByZero);
    }
    let wide = a.checked_mul(ONE).ok_or(FixedError::Overflow)?;
    Ok(wide / b)
}

/// The fixed-point ratio `num / den`, e.g. a vote share.
pub fn ratio(num: u64, den: u64) -> Result<I256> {
    if den == 0 {
        return Err(FixedError::DivisionByZero);
    }
    Ok(I256::from(num) * ONE / I256::from(den))
}
