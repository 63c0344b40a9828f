//! Published cost schedule.
//!
//! Costs are a pure function of the decoded request, so a caller can quote
//! a call before making it. All arithmetic saturates.

use crate::request::Request;
use serde::{Deserialize, Serialize};
use vecgate_registry::Domain;

/// Base cost plus a per-unit charge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpCost {
    pub base: u64,
    #[serde(default)]
    pub per_unit: u64,
}

impl OpCost {
    pub const fn new(base: u64, per_unit: u64) -> Self {
        Self { base, per_unit }
    }

    pub fn charge(&self, units: u64) -> u64 {
        self.base.saturating_add(self.per_unit.saturating_mul(units))
    }
}

/// Registration is charged on two axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterCost {
    pub base: u64,
    #[serde(default)]
    pub per_dimension: u64,
    #[serde(default)]
    pub per_tag: u64,
}

impl RegisterCost {
    pub fn charge(&self, dimension: u64, tags: u64) -> u64 {
        self.base
            .saturating_add(self.per_dimension.saturating_mul(dimension))
            .saturating_add(self.per_tag.saturating_mul(tags))
    }
}

/// Cost per selector.
///
/// Example YAML (any omitted entry keeps its default):
/// ```yaml
/// register:
///   base: 35000
///   per_dimension: 50
///   per_tag: 200
/// global_search:
///   base: 40000
///   per_unit: 5000
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostSchedule {
    pub lookup: OpCost,
    pub register: RegisterCost,
    /// Per reference.
    pub classify: OpCost,
    /// Per centroid.
    pub cluster_assign: OpCost,
    pub anomaly_score: OpCost,
    pub similarity_gate: OpCost,
    /// Per enumerated domain.
    pub global_search: OpCost,
    /// Per unit of `max_count`.
    pub sweep: OpCost,
    /// Per dimension.
    pub calibrate: OpCost,
}

impl Default for CostSchedule {
    fn default() -> Self {
        Self {
            lookup: OpCost::new(20_000, 0),
            register: RegisterCost {
                base: 35_000,
                per_dimension: 50,
                per_tag: 200,
            },
            classify: OpCost::new(25_000, 100),
            cluster_assign: OpCost::new(28_000, 50),
            anomaly_score: OpCost::new(30_000, 0),
            similarity_gate: OpCost::new(10_000, 0),
            global_search: OpCost::new(40_000, 5_000),
            sweep: OpCost::new(20_000, 1_000),
            calibrate: OpCost::new(30_000, 50),
        }
    }
}

impl CostSchedule {
    /// Cost the caller must cover for `request`.
    pub fn required(&self, request: &Request) -> u64 {
        let len = |n: usize| n as u64;
        match request {
            Request::Lookup { .. } => self.lookup.charge(0),
            Request::Register { vector, tags, .. } => {
                self.register.charge(len(vector.len()), len(tags.len()))
            }
            Request::Classify { refs, .. } => self.classify.charge(len(refs.len())),
            Request::ClusterAssign { centroids, .. } => {
                self.cluster_assign.charge(len(centroids.len()))
            }
            Request::AnomalyScore { .. } => self.anomaly_score.charge(0),
            Request::SimilarityGate { .. } => self.similarity_gate.charge(0),
            Request::GlobalSearch { .. } => self.global_search.charge(len(Domain::COUNT)),
            Request::Sweep { max_count, .. } => self.sweep.charge(u64::from(*max_count)),
            Request::Calibrate { vector, .. } => self.calibrate.charge(len(vector.len())),
        }
    }
}
