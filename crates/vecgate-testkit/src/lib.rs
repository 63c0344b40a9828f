//! Test tooling for vecgate.
//!
//! - Property-based generators for vectors, domains, identities and tags
//! - Fixture helpers for writing fixed-point literals
//! - A recording meter for asserting on emitted telemetry
//!
//! # Usage
//!
//! ```
//! use vecgate_testkit::{fixed, vector};
//!
//! assert_eq!(fixed(0.5), 500_000_000_000_000_000);
//! assert_eq!(vector(&[1.0, -1.0]).len(), 2);
//! ```

pub mod fixtures;
pub mod generators;
pub mod meter;

pub use fixtures::{fixed, identity, tag, vector};
pub use generators::{arb_domain, arb_identity, arb_tags, arb_vector, arb_vector_pair};
pub use meter::RecordingMeter;
