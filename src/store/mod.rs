//! Resource store abstraction
//!
//! The composition engine's sole external boundary. A `ResourceStore` can
//! fetch a single resource by target or list resources of a built-in kind
//! by label selector; resources are structured JSON records
//! (apiVersion/kind/metadata/spec/status).

pub mod client;
pub mod kube;
pub mod memory;

pub use client::create_client;
pub use memory::MemoryStore;
pub use self::kube::KubeResourceStore;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

use crate::models::{BuiltinKind, ResourceTarget};

/// Asynchronous access to cluster resources
///
/// `get` returns `Ok(None)` when the resource does not exist; transport
/// and API failures surface as errors. Implementations must be safe to
/// call concurrently - the resolver issues all fetches of one resolution
/// as a single concurrent round.
#[async_trait]
pub trait ResourceStore: Send + Sync {
    /// Fetch a single resource by target
    async fn get(&self, target: &ResourceTarget) -> Result<Option<Value>>;

    /// List resources of a built-in kind, optionally filtered by a
    /// `key=value` label selector
    async fn list(
        &self,
        namespace: &str,
        kind: BuiltinKind,
        selector: Option<&str>,
    ) -> Result<Vec<Value>>;
}
