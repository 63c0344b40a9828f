//! Fixture helpers.

use vecgate_fixed::SCALE;
use vecgate_registry::{Identity, Tag};

/// Convert a literal to fixed point at scale 1e18.
///
/// Only for writing test inputs; the gateway itself never touches floats.
pub fn fixed(x: f64) -> i128 {
    (x * SCALE as f64).round() as i128
}

/// Convert a literal vector to fixed point.
pub fn vector(xs: &[f64]) -> Vec<i128> {
    xs.iter().copied().map(fixed).collect()
}

/// An identity filled with `byte`.
pub fn identity(byte: u8) -> Identity {
    Identity::new([byte; 20])
}

/// A tag filled with `byte`.
pub fn tag(byte: u8) -> Tag {
    Tag([byte; 32])
}
