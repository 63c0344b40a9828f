//! Fixed operation selectors.

use crate::GatewayError;
use vecgate_observe::Labels;

/// Operation selector. The discriminant is the on-wire `u32` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u32)]
pub enum Selector {
    Lookup = 0x01,
    Register = 0x02,
    Classify = 0x03,
    ClusterAssign = 0x04,
    AnomalyScore = 0x05,
    SimilarityGate = 0x06,
    GlobalSearch = 0x07,
    Sweep = 0x08,
    Calibrate = 0x09,
}

impl Selector {
    pub const ALL: [Selector; 9] = [
        Selector::Lookup,
        Selector::Register,
        Selector::Classify,
        Selector::ClusterAssign,
        Selector::AnomalyScore,
        Selector::SimilarityGate,
        Selector::GlobalSearch,
        Selector::Sweep,
        Selector::Calibrate,
    ];

    pub fn as_u32(self) -> u32 {
        self as u32
    }

    pub fn name(self) -> &'static str {
        match self {
            Selector::Lookup => "lookup",
            Selector::Register => "register",
            Selector::Classify => "classify",
            Selector::ClusterAssign => "cluster_assign",
            Selector::AnomalyScore => "anomaly_score",
            Selector::SimilarityGate => "similarity_gate",
            Selector::GlobalSearch => "global_search",
            Selector::Sweep => "sweep",
            Selector::Calibrate => "calibrate",
        }
    }

    /// Metric labels for this selector.
    pub fn labels(self) -> Labels {
        match self {
            Selector::Lookup => &[("op", "lookup")],
            Selector::Register => &[("op", "register")],
            Selector::Classify => &[("op", "classify")],
            Selector::ClusterAssign => &[("op", "cluster_assign")],
            Selector::AnomalyScore => &[("op", "anomaly_score")],
            Selector::SimilarityGate => &[("op", "similarity_gate")],
            Selector::GlobalSearch => &[("op", "global_search")],
            Selector::Sweep => &[("op", "sweep")],
            Selector::Calibrate => &[("op", "calibrate")],
        }
    }

    /// Whether the operation writes registry state.
    pub fn is_mutating(self) -> bool {
        matches!(
            self,
            Selector::Register | Selector::Sweep | Selector::Calibrate
        )
    }
}

impl TryFrom<u32> for Selector {
    type Error = GatewayError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Selector::ALL
            .into_iter()
            .find(|s| s.as_u32() == value)
            .ok_or(GatewayError::UnknownSelector(value))
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
