//! Refresh configuration.

use crate::error::RefreshError;
use consensus::StrategyKind;
use corelib::NodeAddress;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings for one client's topology refresh cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    /// Addresses always queried, first, in this order.
    pub seeds: Vec<NodeAddress>,
    /// Per-node query timeout in milliseconds.
    pub query_timeout_ms: u64,
    pub strategy: StrategyKind,
    /// Also query every node of the current topology, not just the seeds.
    pub dynamic_sources: bool,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            seeds: Vec::new(),
            query_timeout_ms: 1000,
            strategy: StrategyKind::default(),
            dynamic_sources: true,
        }
    }
}

impl RefreshConfig {
    pub fn new(seeds: Vec<NodeAddress>) -> Self {
        Self {
            seeds,
            ..Self::default()
        }
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }

    pub fn validate(&self) -> Result<(), RefreshError> {
        if self.query_timeout_ms == 0 {
            return Err(RefreshError::InvalidConfig(
                "query_timeout_ms must be greater than zero".to_string(),
            ));
        }
        if self.seeds.is_empty() && !self.dynamic_sources {
            return Err(RefreshError::InvalidConfig(
                "no seeds configured and dynamic_sources is disabled".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config: RefreshConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, RefreshConfig::default());
        assert_eq!(config.query_timeout(), Duration::from_secs(1));
        assert_eq!(config.strategy, StrategyKind::KnownMajority);
        assert!(config.dynamic_sources);
    }

    #[test]
    fn test_config_from_json() {
        let json = r#"{
            "seeds": ["10.0.0.1:7000", "10.0.0.2:7000"],
            "query_timeout_ms": 250,
            "strategy": "healthy-majority",
            "dynamic_sources": false
        }"#;
        let config: RefreshConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.seeds.len(), 2);
        assert_eq!(config.query_timeout(), Duration::from_millis(250));
        assert_eq!(config.strategy, StrategyKind::HealthyMajority);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = RefreshConfig::new(vec![NodeAddress::new("10.0.0.1", 7000)]);
        assert!(config.validate().is_ok());

        config.query_timeout_ms = 0;
        assert!(config.validate().is_err());

        let config = RefreshConfig {
            dynamic_sources: false,
            ..RefreshConfig::default()
        };
        assert!(matches!(config.validate(), Err(RefreshError::InvalidConfig(_))));
    }
}
