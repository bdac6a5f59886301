//! Configuration module
//!
//! Layered YAML configuration: built-in defaults, the config file in the
//! platform config directory, then environment variable overrides.

pub mod loader;
pub mod paths;
pub mod schema;

pub use loader::ConfigLoader;
pub use schema::{Config, EnrichConfig};
