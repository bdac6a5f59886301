//! Enrichment pass
//!
//! Secondary resolvers that augment an already-composed object with data
//! from related resources discovered by label correlation.

pub mod core;

pub use core::{enrich_object, instance_label_key};
