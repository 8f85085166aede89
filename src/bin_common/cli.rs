//! CLI utilities for binaries
//!
//! Handles configuration loading and environment variables
//! for all binary executables.

use std::path::PathBuf;

/// Type of configuration to load
#[derive(Debug, Clone)]
pub enum ConfigType {
    /// Session configuration (config/session.yaml)
    Session,
    /// Custom path, never overridden from the environment
    Custom(String),
}

impl ConfigType {
    /// Get the default path for this config type
    pub fn default_path(&self) -> &str {
        match self {
            ConfigType::Session => "config/session.yaml",
            ConfigType::Custom(path) => path,
        }
    }

    /// Get the environment variable that overrides the default path
    pub fn env_var_name(&self) -> Option<&str> {
        match self {
            ConfigType::Session => Some("SESSION_CONFIG_PATH"),
            ConfigType::Custom(_) => None,
        }
    }
}

/// Load configuration path from environment or use default
///
/// # Examples
/// ```
/// use pushline::bin_common::{load_config_from_env, ConfigType};
///
/// let path = load_config_from_env(ConfigType::Session);
/// ```
pub fn load_config_from_env(config_type: ConfigType) -> PathBuf {
    config_type
        .env_var_name()
        .and_then(|name| std::env::var(name).ok())
        .unwrap_or_else(|| config_type.default_path().to_string())
        .into()
}
