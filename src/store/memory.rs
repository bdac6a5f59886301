//! In-memory resource store
//!
//! Fixture-backed store used by tests and offline resolution. Resources
//! are plain JSON values in the same shape the API server returns. The
//! store counts get/list calls so tests can assert the resolver's fetch
//! deduplication, and can be told to fail list calls to exercise the
//! enrichment degradation path.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

use super::ResourceStore;
use crate::models::{BuiltinKind, ResourceTarget};

/// Resource store over a fixed set of in-memory objects
#[derive(Default)]
pub struct MemoryStore {
    resources: Vec<Value>,
    get_calls: AtomicUsize,
    list_calls: AtomicUsize,
    fail_lists: AtomicBool,
}

impl MemoryStore {
    /// Create a store seeded with the given resources
    pub fn new(resources: Vec<Value>) -> Self {
        Self {
            resources,
            ..Default::default()
        }
    }

    /// Number of single-resource fetches issued so far
    pub fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }

    /// Number of list fetches issued so far
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    /// Total store calls issued so far
    pub fn total_calls(&self) -> usize {
        self.get_calls() + self.list_calls()
    }

    /// Make subsequent list calls fail (enrichment degradation tests)
    pub fn fail_lists(&self, fail: bool) {
        self.fail_lists.store(fail, Ordering::SeqCst);
    }

    fn kind_of(resource: &Value) -> Option<&str> {
        resource.get("kind").and_then(|k| k.as_str())
    }

    fn metadata_str<'a>(resource: &'a Value, key: &str) -> Option<&'a str> {
        resource
            .get("metadata")
            .and_then(|m| m.get(key))
            .and_then(|v| v.as_str())
    }

    /// Check a `key=value` label selector against a resource's labels.
    /// A bare key (no `=`) matches any resource carrying that label.
    fn matches_selector(resource: &Value, selector: &str) -> bool {
        let labels = match resource
            .get("metadata")
            .and_then(|m| m.get("labels"))
            .and_then(|l| l.as_object())
        {
            Some(labels) => labels,
            None => return false,
        };

        selector.split(',').all(|clause| {
            let clause = clause.trim();
            match clause.split_once('=') {
                Some((key, value)) => labels
                    .get(key.trim())
                    .and_then(|v| v.as_str())
                    .is_some_and(|v| v == value.trim()),
                None => labels.contains_key(clause),
            }
        })
    }
}

#[async_trait]
impl ResourceStore for MemoryStore {
    async fn get(&self, target: &ResourceTarget) -> Result<Option<Value>> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);

        let kind = target.kind_name();
        Ok(self
            .resources
            .iter()
            .find(|r| {
                Self::kind_of(r) == Some(kind.as_str())
                    && Self::metadata_str(r, "namespace") == Some(target.namespace())
                    && Self::metadata_str(r, "name") == Some(target.name())
            })
            .cloned())
    }

    async fn list(
        &self,
        namespace: &str,
        kind: BuiltinKind,
        selector: Option<&str>,
    ) -> Result<Vec<Value>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_lists.load(Ordering::SeqCst) {
            anyhow::bail!("List {} in {} failed (injected)", kind.plural(), namespace);
        }

        Ok(self
            .resources
            .iter()
            .filter(|r| {
                Self::kind_of(r) == Some(kind.as_str())
                    && Self::metadata_str(r, "namespace") == Some(namespace)
                    && selector.is_none_or(|s| Self::matches_selector(r, s))
            })
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pod(name: &str, labels: Value) -> Value {
        json!({
            "apiVersion": "v1",
            "kind": "Pod",
            "metadata": {"name": name, "namespace": "dev", "labels": labels}
        })
    }

    #[tokio::test]
    async fn test_get_by_kind_namespace_name() {
        let store = MemoryStore::new(vec![pod("a", json!({})), pod("b", json!({}))]);
        let target = ResourceTarget::builtin(BuiltinKind::Pod, "dev", "b").unwrap();
        let found = store.get(&target).await.unwrap();
        assert_eq!(
            found.unwrap()["metadata"]["name"],
            Value::String("b".into())
        );
        assert_eq!(store.get_calls(), 1);
    }

    #[tokio::test]
    async fn test_list_selector_matching() {
        let store = MemoryStore::new(vec![
            pod("a", json!({"app": "web"})),
            pod("b", json!({"app": "db"})),
            pod("c", json!({"app": "web", "tier": "edge"})),
        ]);

        let items = store
            .list("dev", BuiltinKind::Pod, Some("app=web"))
            .await
            .unwrap();
        assert_eq!(items.len(), 2);

        let items = store
            .list("dev", BuiltinKind::Pod, Some("app=web,tier=edge"))
            .await
            .unwrap();
        assert_eq!(items.len(), 1);

        let items = store.list("dev", BuiltinKind::Pod, Some("tier")).await.unwrap();
        assert_eq!(items.len(), 1);
    }

    #[tokio::test]
    async fn test_injected_list_failure() {
        let store = MemoryStore::new(vec![]);
        store.fail_lists(true);
        assert!(store.list("dev", BuiltinKind::Service, None).await.is_err());
    }
}
