//! Configuration schema
//!
//! Serde-backed configuration structure with defaults for every field,
//! so a partial config file merges over the built-in defaults.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Namespace used when the caller does not name one
    pub default_namespace: String,

    /// Extra directories scanned for schema manifests, in addition to
    /// the user schemas directory
    pub schema_dirs: Vec<PathBuf>,

    /// Cross-call fetch cache TTL in seconds; 0 disables the cache
    pub cache_ttl_seconds: u64,

    /// Enrichment defaults
    pub enrich: EnrichConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_namespace: "default".to_string(),
            schema_dirs: Vec::new(),
            cache_ttl_seconds: 0,
            enrich: EnrichConfig::default(),
        }
    }
}

/// Enrichment configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EnrichConfig {
    /// Related kinds searched when `--enrich` is passed without a list
    pub kinds: Vec<String>,
}

impl Default for EnrichConfig {
    fn default() -> Self {
        Self {
            kinds: vec!["service".to_string(), "ingress".to_string()],
        }
    }
}
