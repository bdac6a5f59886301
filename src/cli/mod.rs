//! CLI layer
//!
//! Logging initialization and subcommand handlers for the resbridge
//! binary.

pub mod commands;
pub mod logging;

pub use commands::{OutputFormat, ResolveRequest, handle_resolve, handle_schema_list, handle_schema_show};
pub use logging::init_logging;
