use crate::address::Address;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config file: {0}")]
    FileError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Session configuration
///
/// ```yaml
/// default_address: "http://localhost:3000/"
/// outbound_capacity: 1024
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Address for sessions that receive a callback but no address
    pub default_address: Option<String>,

    /// Bound on each connection's outbound queue (unbounded when absent)
    pub outbound_capacity: Option<usize>,
}

impl SessionConfig {
    /// Load and validate a YAML config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&content)?;
        info!("Loaded session config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate YAML
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(address) = &self.default_address {
            Address::parse(address)
                .map_err(|e| ConfigError::ValidationError(e.to_string()))?;
        }

        if self.outbound_capacity == Some(0) {
            return Err(ConfigError::ValidationError(
                "outbound_capacity must be greater than 0".into(),
            ));
        }

        Ok(())
    }
}
