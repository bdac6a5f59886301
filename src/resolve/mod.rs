//! Object resolver
//!
//! Turns a composite schema plus a resolution target into a composed
//! object: collects the query descriptors, deduplicates their fetches,
//! issues one concurrent round of store calls, then extracts and
//! transforms every field.

pub mod cache;
pub mod core;
pub mod extract;
pub mod plan;

pub use cache::{FetchCache, MemoryFetchCache};
pub use core::{ExternalValues, resolve_object, resolve_object_with_cache};
pub use extract::{dotted, extract_path};
pub use plan::{FetchKey, FetchPlan, Fetched, plan_for};
