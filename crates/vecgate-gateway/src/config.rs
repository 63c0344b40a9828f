//! Gateway configuration.
//!
//! Wraps the registry limits and the cost schedule. Loaded from YAML or from
//! `VECGATE_*` environment variables.

use crate::cost::CostSchedule;
use serde::{Deserialize, Serialize};
use vecgate_registry::RegistryConfig;

pub use vecgate_registry::ConfigError;

/// Hard upper bound on `max_search_k`.
pub const HARD_MAX_SEARCH_K: usize = 4096;

fn default_max_search_k() -> usize {
    256
}

/// Gateway configuration.
///
/// Example YAML:
/// ```yaml
/// max_search_k: 64
/// registry:
///   max_dim: 768
///   max_tags: 8
/// costs:
///   lookup:
///     base: 20000
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub registry: RegistryConfig,
    pub costs: CostSchedule,
    /// Largest `k` accepted by global search (default: 256)
    pub max_search_k: usize,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            registry: RegistryConfig::default(),
            costs: CostSchedule::default(),
            max_search_k: default_max_search_k(),
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Result<Option<T>, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| ConfigError::InvalidField(format!("{}: {}", key, e))),
        Err(_) => Ok(None),
    }
}

impl GatewayConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_registry(mut self, registry: RegistryConfig) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_costs(mut self, costs: CostSchedule) -> Self {
        self.costs = costs;
        self
    }

    pub fn with_max_search_k(mut self, k: usize) -> Self {
        self.max_search_k = k;
        self
    }

    /// Load configuration from a YAML file.
    pub fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(format!("Failed to read {}: {}", path, e)))?;

        let config: GatewayConfig = serde_yaml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(format!("Invalid YAML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables.
    ///
    /// Unset variables keep their defaults.
    pub fn load_from_env() -> Result<Self, ConfigError> {
        let mut config = GatewayConfig::default();

        if let Some(max_dim) = env_parse("VECGATE_MAX_DIM")? {
            config.registry.max_dim = max_dim;
        }
        if let Some(max_tags) = env_parse("VECGATE_MAX_TAGS")? {
            config.registry.max_tags = max_tags;
        }
        if let Some(quota) = env_parse("VECGATE_DEFAULT_QUOTA")? {
            config.registry.default_quota = quota;
        }
        if let Some(k) = env_parse("VECGATE_MAX_SEARCH_K")? {
            config.max_search_k = k;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.registry.validate()?;

        if self.max_search_k == 0 || self.max_search_k > HARD_MAX_SEARCH_K {
            return Err(ConfigError::InvalidField(format!(
                "max_search_k must be between 1 and {}",
                HARD_MAX_SEARCH_K
            )));
        }
        Ok(())
    }
}
