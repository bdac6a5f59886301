//! Configuration loading
//!
//! Loads configuration in precedence order (highest to lowest):
//! 1. Environment variable overrides
//! 2. Config file in the resbridge config directory
//! 3. Built-in defaults

use anyhow::{Context, Result};
use std::path::Path;

use super::paths;
use super::schema::Config;

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with all layers applied
    pub fn load() -> Result<Config> {
        let mut config = match Self::load_file(&paths::root_config_path()) {
            Ok(config) => config,
            Err(e) => {
                tracing::debug!("Using default configuration: {}", e);
                Config::default()
            }
        };

        config = Self::apply_env_overrides(config);
        Ok(config)
    }

    /// Built-in defaults, no file or environment consulted
    pub fn load_defaults() -> Config {
        Config::default()
    }

    /// Load configuration from a specific file
    pub fn load_file(path: &Path) -> Result<Config> {
        if !path.exists() {
            anyhow::bail!("Config file not found: {}", path.display());
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        // Every field is serde-defaulted, so a partial file merges over
        // the defaults
        let config: Config = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    fn apply_env_overrides(mut config: Config) -> Config {
        if let Ok(namespace) = std::env::var("RESBRIDGE_NAMESPACE") {
            if !namespace.is_empty() {
                config.default_namespace = namespace;
            }
        }
        if let Ok(ttl) = std::env::var("RESBRIDGE_CACHE_TTL") {
            match ttl.parse() {
                Ok(seconds) => config.cache_ttl_seconds = seconds,
                Err(_) => {
                    tracing::warn!("Ignoring invalid RESBRIDGE_CACHE_TTL: {}", ttl);
                }
            }
        }
        config
    }
}
