//! Shared vector registry for vecgate.
//!
//! One [`Registry`] value owns all shared state:
//!
//! - **Vector arena**: append-only records keyed by a strictly increasing global id
//! - **Domain index**: per-domain membership and expiry order over the arena
//! - **Quota ledger**: per-registrant consumption, debited on register and
//!   credited on sweep
//! - **Anomaly statistics**: per-domain reference moments, changed only by
//!   explicit calibration
//!
//! Expiry is lazy: a record past its TTL is absent for every read, whether or
//! not a sweep has physically reclaimed it yet.
//!
//! # Example
//!
//! ```
//! use vecgate_registry::{Domain, Identity, Registry, RegistryConfig};
//!
//! let mut registry = Registry::new(RegistryConfig::default()).unwrap();
//! let owner = Identity::new([1; 20]);
//!
//! let reg = registry
//!     .register(owner, Domain::Gaming, vec![1, 2, 3], vec![], 10, 100)
//!     .unwrap();
//! assert!(registry.lookup(reg.global_id, 109).is_some());
//! assert!(registry.lookup(reg.global_id, 110).is_none());
//! ```

mod arena;
mod config;
mod error;
mod expiry;
mod index;
mod quota;
mod stats;
mod store;
mod types;

pub use arena::VectorArena;
pub use config::{ConfigError, RegistryConfig, HARD_MAX_COMPONENT_MAGNITUDE, HARD_MAX_DIM};
pub use error::{Error, Result};
pub use expiry::{expires_at, is_expired, ExpiryQueue};
pub use index::DomainIndex;
pub use quota::{QuotaEntry, QuotaLedger};
pub use stats::{AnomalyStatistic, Moment};
pub use store::{Registration, Registry, SweepReport};
pub use types::{BlockHeight, Domain, GlobalId, Identity, Tag, VectorRecord};
