//! Kubernetes client construction
//!
//! Handles connection to the Kubernetes API server and provides a
//! configured client for the kube-backed resource store.
//!
//! Supports HTTP/HTTPS proxy configuration via standard environment
//! variables (`HTTP_PROXY`, `HTTPS_PROXY`, `NO_PROXY`). Internal cluster
//! hosts are detected and added to `NO_PROXY` automatically so corporate
//! proxies do not intercept API traffic.

use anyhow::Result;
use kube::{Client, Config};
use url::Url;

/// Initialize and return a Kubernetes client with automatic proxy support
///
/// Uses the default kubeconfig loading strategy:
/// 1. In-cluster config (if running in a pod)
/// 2. KUBECONFIG environment variable
/// 3. ~/.kube/config
pub async fn create_client() -> Result<Client> {
    let config = Config::infer().await?;

    // Extract the cluster host for NO_PROXY auto-detection
    let cluster_url = config.cluster_url.to_string();
    if let Ok(url) = Url::parse(&cluster_url) {
        if let Some(host) = url.host_str() {
            ensure_no_proxy_bypass(host);
        }
    }

    let client = Client::try_from(config)?;
    Ok(client)
}

/// Get the default namespace from the active kubeconfig context, if any
pub async fn get_default_namespace() -> Option<String> {
    let config = Config::infer().await.ok()?;
    let ns = config.default_namespace;
    if ns.is_empty() || ns == "default" {
        None
    } else {
        Some(ns)
    }
}

/// Add an internal cluster host to NO_PROXY when it is not already covered
fn ensure_no_proxy_bypass(host: &str) {
    if !is_internal_host(host) {
        return;
    }

    let no_proxy = std::env::var("NO_PROXY").unwrap_or_default();
    let no_proxy_lower = std::env::var("no_proxy").unwrap_or_default();
    let current = if !no_proxy.is_empty() {
        no_proxy
    } else {
        no_proxy_lower
    };

    if no_proxy_contains(&current, host) {
        return;
    }

    let updated = if current.is_empty() {
        host.to_string()
    } else {
        format!("{},{}", current, host)
    };

    tracing::debug!("Adding cluster host {} to NO_PROXY", host);

    // Set both variants for compatibility
    unsafe {
        std::env::set_var("NO_PROXY", &updated);
        std::env::set_var("no_proxy", &updated);
    }
}

/// Check if a host looks like an internal/private domain
///
/// Detects private IP ranges, localhost, and common internal TLDs
/// (.local, .internal, .cluster.local).
fn is_internal_host(host: &str) -> bool {
    if host.starts_with("10.")
        || host.starts_with("172.")
        || host.starts_with("192.168.")
        || host == "localhost"
        || host == "127.0.0.1"
        || host == "::1"
    {
        return true;
    }

    host.ends_with(".local")
        || host.ends_with(".internal")
        || host.ends_with(".cluster.local")
        || host.ends_with(".svc.cluster.local")
}

/// Check if NO_PROXY already covers the host
///
/// Handles exact matches, leading-dot wildcard patterns, and subdomain
/// suffix matches.
fn no_proxy_contains(no_proxy: &str, host: &str) -> bool {
    no_proxy
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .any(|pattern| {
            if pattern == host {
                return true;
            }
            if let Some(suffix) = pattern.strip_prefix('.') {
                if host == suffix || host.ends_with(&format!(".{}", suffix)) {
                    return true;
                }
            }
            host.ends_with(&format!(".{}", pattern))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_internal_host() {
        assert!(is_internal_host("10.0.0.1"));
        assert!(is_internal_host("localhost"));
        assert!(is_internal_host("api.cluster.local"));
        assert!(!is_internal_host("example.com"));
    }

    #[test]
    fn test_no_proxy_contains() {
        assert!(no_proxy_contains("example.com", "example.com"));
        assert!(no_proxy_contains(".example.com", "api.example.com"));
        assert!(no_proxy_contains("example.com", "api.example.com"));
        assert!(!no_proxy_contains("example.com", "example.org"));
        assert!(!no_proxy_contains("", "example.com"));
    }
}
