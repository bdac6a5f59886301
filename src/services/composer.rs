//! Composer facade
//!
//! Owns the resource store (and the optional fetch cache) so callers -
//! UI hooks, AI tool handlers, the CLI - hold one handle instead of
//! threading store references through every call.

use std::sync::Arc;

use serde_json::Value;

use crate::enrich;
use crate::error::ComposeResult;
use crate::models::{BuiltinKind, ResourceTarget};
use crate::resolve::{self, ExternalValues, FetchCache};
use crate::schema::CompositeSchema;
use crate::store::ResourceStore;

/// Service for resolving and enriching composed objects
pub struct Composer {
    store: Arc<dyn ResourceStore>,
    cache: Option<Arc<dyn FetchCache>>,
}

impl Composer {
    pub fn new(store: Arc<dyn ResourceStore>) -> Self {
        Self { store, cache: None }
    }

    /// Attach a cross-call fetch cache
    pub fn with_cache(mut self, cache: Arc<dyn FetchCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Resolve a composite schema against a target
    pub async fn resolve(
        &self,
        target: &ResourceTarget,
        schema: &CompositeSchema,
    ) -> ComposeResult<Value> {
        self.resolve_with_externals(target, schema, None).await
    }

    /// Resolve with caller-supplied values for `external` fields
    pub async fn resolve_with_externals(
        &self,
        target: &ResourceTarget,
        schema: &CompositeSchema,
        externals: Option<&ExternalValues>,
    ) -> ComposeResult<Value> {
        match &self.cache {
            Some(cache) => {
                resolve::resolve_object_with_cache(
                    self.store.as_ref(),
                    target,
                    schema,
                    externals,
                    cache.as_ref(),
                )
                .await
            }
            None => resolve::resolve_object(self.store.as_ref(), target, schema, externals).await,
        }
    }

    /// Merge related-resource connection info into a composed object
    pub async fn enrich(
        &self,
        target: &ResourceTarget,
        composed: &Value,
        related_kinds: &[BuiltinKind],
    ) -> ComposeResult<Value> {
        enrich::enrich_object(self.store.as_ref(), target, composed, related_kinds).await
    }

    /// Get a reference to the underlying resource store
    pub fn store(&self) -> &dyn ResourceStore {
        self.store.as_ref()
    }
}
