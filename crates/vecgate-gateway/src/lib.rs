//! vecgate gateway: the single entry point for external callers.
//!
//! Callers address an operation by a fixed `u32` [`Selector`] and pass a
//! big-endian binary payload. The [`Gateway`] decodes it into a typed
//! [`Request`], quotes its cost from the [`CostSchedule`], rejects it if the
//! caller's budget does not cover that cost, and only then executes it
//! against the registry and engines.
//!
//! # Example
//!
//! ```
//! use vecgate_gateway::{CallContext, Gateway, GatewayConfig, Request, Response, Selector};
//! use vecgate_registry::{Domain, Identity};
//!
//! let mut gateway = Gateway::new(GatewayConfig::default()).unwrap();
//! let ctx = CallContext::new(Identity::new([7; 20]), 1, 1_000_000);
//!
//! let payload = Request::Register {
//!     domain: Domain::Content,
//!     vector: vec![1, 2],
//!     tags: vec![],
//!     ttl_blocks: 0,
//! }
//! .encode();
//! let outcome = gateway
//!     .dispatch(&ctx, Selector::Register.as_u32(), &payload)
//!     .unwrap();
//! assert_eq!(outcome.cost, 35_100);
//!
//! match Response::decode(Selector::Register, &outcome.output).unwrap() {
//!     Response::Register { global_id, .. } => assert_eq!(global_id, 1),
//!     other => panic!("unexpected response {:?}", other),
//! }
//! ```

pub mod codec;
mod config;
mod cost;
mod dispatch;
mod error;
mod request;
mod selector;

pub use codec::CodecError;
pub use config::{ConfigError, GatewayConfig, HARD_MAX_SEARCH_K};
pub use cost::{CostSchedule, OpCost, RegisterCost};
pub use dispatch::{CallContext, CallOutcome, Gateway};
pub use error::{ErrorCode, GatewayError, Result};
pub use request::{Request, Response};
pub use selector::Selector;
