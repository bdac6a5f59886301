//! Model layer
//!
//! Core identification types shared across the engine: the built-in
//! resource kind enum and the resource target addressing a single
//! cluster object.

pub mod builtin_kind;
pub mod target;

pub use builtin_kind::BuiltinKind;
pub use target::{ResourceTarget, api_resource_for};
