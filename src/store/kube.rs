//! Kubernetes-backed resource store
//!
//! Fetches resources through the API server using dynamic typing, so
//! custom API-group resources and built-in kinds go through the same
//! code path. Objects are returned as raw JSON values.

use anyhow::{Context, Result};
use async_trait::async_trait;
use kube::api::{Api, ListParams};
use kube::core::DynamicObject;
use serde_json::Value;

use super::ResourceStore;
use crate::models::{BuiltinKind, ResourceTarget, api_resource_for};

/// Resource store backed by a live Kubernetes API server
pub struct KubeResourceStore {
    client: kube::Client,
}

impl KubeResourceStore {
    pub fn new(client: kube::Client) -> Self {
        Self { client }
    }

    /// Build a store from the ambient kubeconfig/in-cluster environment
    pub async fn from_env() -> Result<Self> {
        let client = super::create_client()
            .await
            .context("Failed to initialize Kubernetes client")?;
        Ok(Self::new(client))
    }

    /// Get a reference to the underlying Kubernetes client
    pub fn client(&self) -> &kube::Client {
        &self.client
    }
}

#[async_trait]
impl ResourceStore for KubeResourceStore {
    async fn get(&self, target: &ResourceTarget) -> Result<Option<Value>> {
        let api_resource = target.api_resource();
        let api: Api<DynamicObject> =
            Api::namespaced_with(self.client.clone(), target.namespace(), &api_resource);

        tracing::debug!(
            "Fetching {} {}/{}",
            target.kind_name(),
            target.namespace(),
            target.name()
        );

        match api.get(target.name()).await {
            Ok(obj) => {
                let value = serde_json::to_value(&obj)
                    .context("Failed to serialize resource to JSON")?;
                Ok(Some(value))
            }
            Err(kube::Error::Api(err)) if err.code == 404 => Ok(None),
            Err(e) => Err(e).with_context(|| {
                format!(
                    "Failed to fetch {} {}/{}",
                    target.kind_name(),
                    target.namespace(),
                    target.name()
                )
            }),
        }
    }

    async fn list(
        &self,
        namespace: &str,
        kind: BuiltinKind,
        selector: Option<&str>,
    ) -> Result<Vec<Value>> {
        let api_resource = api_resource_for(kind);
        let api: Api<DynamicObject> =
            Api::namespaced_with(self.client.clone(), namespace, &api_resource);

        let mut params = ListParams::default();
        if let Some(selector) = selector {
            params = params.labels(selector);
        }

        tracing::debug!(
            "Listing {} in {} (selector: {})",
            kind.plural(),
            namespace,
            selector.unwrap_or("<none>")
        );

        let list = api
            .list(&params)
            .await
            .with_context(|| format!("Failed to list {} in {}", kind.plural(), namespace))?;

        list.items
            .iter()
            .map(|obj| {
                serde_json::to_value(obj).context("Failed to serialize resource to JSON")
            })
            .collect()
    }
}
