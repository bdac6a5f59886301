//! Service layer
//!
//! Facades that bundle the store, cache and core functions behind one
//! handle for callers.

pub mod composer;

pub use composer::Composer;
