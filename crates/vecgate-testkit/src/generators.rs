//! Property-based test generators.
//!
//! Provides proptest strategies for:
//! - Fixed-point vectors within the default component bound
//! - Domains, identities and tag sets

use proptest::prelude::*;
use vecgate_fixed::SCALE;
use vecgate_registry::{Domain, Identity, Tag};

/// Largest component magnitude generated, in whole units.
const MAX_UNITS: i128 = 1_000;

fn arb_component() -> impl Strategy<Value = i128> {
    -(MAX_UNITS * SCALE)..=(MAX_UNITS * SCALE)
}

/// A vector of exactly `dim` components.
pub fn arb_vector(dim: usize) -> impl Strategy<Value = Vec<i128>> {
    prop::collection::vec(arb_component(), dim)
}

/// Two vectors sharing a dimension in `1..max_dim`.
pub fn arb_vector_pair(max_dim: usize) -> impl Strategy<Value = (Vec<i128>, Vec<i128>)> {
    (1..max_dim).prop_flat_map(|d| (arb_vector(d), arb_vector(d)))
}

pub fn arb_domain() -> impl Strategy<Value = Domain> {
    prop::sample::select(Domain::ALL.to_vec())
}

pub fn arb_identity() -> impl Strategy<Value = Identity> {
    any::<[u8; 20]>().prop_map(Identity::new)
}

/// Up to `max` tags, possibly with duplicates.
pub fn arb_tags(max: usize) -> impl Strategy<Value = Vec<Tag>> {
    prop::collection::vec(any::<[u8; 32]>().prop_map(Tag), 0..=max)
}
