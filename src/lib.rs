//! resbridge library
//!
//! A declarative object-composition engine: composite schemas describe
//! logical cloud objects field by field, each field annotated with where
//! in the cluster its value comes from; the resolver issues the minimum
//! set of store fetches, extracts and transforms the values, and an
//! enrichment pass merges connection info from related resources.

pub mod cli;
pub mod config;
pub mod enrich;
pub mod error;
pub mod models;
pub mod resolve;
pub mod schema;
pub mod services;
pub mod store;

// Re-export the core API surface for convenience
pub use enrich::enrich_object;
pub use error::{ComposeError, ComposeResult};
pub use models::{BuiltinKind, ResourceTarget};
pub use resolve::{
    ExternalValues, FetchCache, FetchKey, MemoryFetchCache, resolve_object,
    resolve_object_with_cache,
};
pub use schema::{
    CompositeSchema, FieldSchema, FieldSpec, QueryDescriptor, SchemaEntry, Transform,
};
pub use services::Composer;
pub use store::{KubeResourceStore, MemoryStore, ResourceStore};
