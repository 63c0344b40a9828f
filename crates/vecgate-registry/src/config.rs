//! Registry configuration.
//!
//! Loads and validates limits from YAML files or builder calls. Every node in
//! a network must run with the same values, since they decide which
//! registrations succeed.

use serde::{Deserialize, Serialize};
use vecgate_fixed::{I256, SCALE};

/// Hard upper bound on vector dimension.
///
/// Accumulator headroom in the math core is sized for this many components.
pub const HARD_MAX_DIM: usize = 4096;

/// Hard upper bound on `max_component_magnitude`, in whole units.
pub const HARD_MAX_COMPONENT_MAGNITUDE: u64 = 1_000_000;

/// Registry configuration.
///
/// Example YAML:
/// ```yaml
/// max_dim: 1536
/// max_tags: 16
/// default_quota: 1000000
/// quota_cost_per_dimension: 1
/// quota_cost_per_tag: 8
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Maximum vector dimension (default: 4096)
    pub max_dim: usize,

    /// Maximum tags per vector (default: 16)
    pub max_tags: usize,

    /// Quota granted to a registrant on first use (default: 1_000_000)
    pub default_quota: u64,

    /// Flat quota charged per registration (default: 0)
    pub quota_base_cost: u64,

    /// Quota charged per vector component (default: 1)
    pub quota_cost_per_dimension: u64,

    /// Quota charged per distinct tag (default: 8)
    pub quota_cost_per_tag: u64,

    /// Largest accepted component magnitude, in whole units (default: 1_000_000)
    pub max_component_magnitude: u64,

    /// Floor on per-component variance used by anomaly scoring, fixed point
    /// at scale 1e36 (default: 1e30, a standard deviation of 0.001)
    pub anomaly_min_variance: i128,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_dim: HARD_MAX_DIM,
            max_tags: 16,
            default_quota: 1_000_000,
            quota_base_cost: 0,
            quota_cost_per_dimension: 1,
            quota_cost_per_tag: 8,
            max_component_magnitude: HARD_MAX_COMPONENT_MAGNITUDE,
            anomaly_min_variance: 1_000_000_000_000_000_000_000_000_000_000,
        }
    }
}

impl RegistryConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum dimension.
    pub fn with_max_dim(mut self, max_dim: usize) -> Self {
        self.max_dim = max_dim;
        self
    }

    /// Set the maximum tag count.
    pub fn with_max_tags(mut self, max_tags: usize) -> Self {
        self.max_tags = max_tags;
        self
    }

    /// Set the default per-registrant quota.
    pub fn with_default_quota(mut self, quota: u64) -> Self {
        self.default_quota = quota;
        self
    }

    /// Set the quota cost formula.
    pub fn with_quota_costs(mut self, base: u64, per_dimension: u64, per_tag: u64) -> Self {
        self.quota_base_cost = base;
        self.quota_cost_per_dimension = per_dimension;
        self.quota_cost_per_tag = per_tag;
        self
    }

    /// Set the anomaly variance floor.
    pub fn with_anomaly_min_variance(mut self, min_variance: i128) -> Self {
        self.anomaly_min_variance = min_variance;
        self
    }

    /// Largest accepted absolute component value, fixed point.
    pub fn max_abs_component(&self) -> i128 {
        self.max_component_magnitude as i128 * SCALE
    }

    /// Variance floor at scale 1e36.
    pub fn anomaly_variance_floor(&self) -> I256 {
        I256::new(self.anomaly_min_variance)
    }

    /// Load configuration from a YAML file.
    pub fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(format!("Failed to read config file: {}", e)))?;

        let config: RegistryConfig = serde_yaml::from_str(&content)
            .map_err(|e| ConfigError::ParseError(format!("Failed to parse YAML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_dim == 0 || self.max_dim > HARD_MAX_DIM {
            return Err(ConfigError::InvalidField(format!(
                "max_dim must be between 1 and {}",
                HARD_MAX_DIM
            )));
        }
        if self.max_component_magnitude == 0
            || self.max_component_magnitude > HARD_MAX_COMPONENT_MAGNITUDE
        {
            return Err(ConfigError::InvalidField(format!(
                "max_component_magnitude must be between 1 and {}",
                HARD_MAX_COMPONENT_MAGNITUDE
            )));
        }
        if self.anomaly_min_variance <= 0 {
            return Err(ConfigError::InvalidField(
                "anomaly_min_variance must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid field: {0}")]
    InvalidField(String),
}
