//! Relevance pass implementation
//!
//! Given an already-composed object, discover the Services and Ingresses
//! pointing at its workload by label correlation and merge their
//! connection information into the object's `ports` entries. Enrichment
//! is additive: a port with no match stays unchanged, and a failing list
//! call degrades to the unenriched base instead of blocking it.

use serde_json::{Value, json};

use crate::error::{ComposeError, ComposeResult};
use crate::models::{BuiltinKind, ResourceTarget};
use crate::store::ResourceStore;

/// Instance-manager label key for a workload kind
///
/// The label whose value equals the workload's name, by convention. The
/// key differs per kind; this is a fixed table, never inferred.
pub fn instance_label_key(kind: BuiltinKind) -> Option<&'static str> {
    match kind {
        BuiltinKind::Deployment => Some("app"),
        BuiltinKind::StatefulSet => Some("app.kubernetes.io/instance"),
        BuiltinKind::DaemonSet => Some("app.kubernetes.io/name"),
        _ => None,
    }
}

/// Label selector correlating related resources to the target's workload
fn correlation_selector(target: &ResourceTarget) -> Option<String> {
    let key = match target {
        ResourceTarget::Builtin { kind, .. } => instance_label_key(*kind)?,
        // Bridge-managed custom resources label their children with the
        // plain instance name
        ResourceTarget::Custom { .. } => "app",
    };
    Some(format!("{}={}", key, target.name()))
}

/// Merge related-resource connection info into a composed object
///
/// Returns a new object; the input is never mutated. Finding no related
/// resource is a normal outcome, not an error.
pub async fn enrich_object(
    store: &dyn ResourceStore,
    target: &ResourceTarget,
    composed: &Value,
    related_kinds: &[BuiltinKind],
) -> ComposeResult<Value> {
    if !composed.is_object() {
        return Err(ComposeError::Store(anyhow::anyhow!(
            "enrichment requires a composed object, got {}",
            composed
        )));
    }

    let mut enriched = composed.clone();

    let has_ports = enriched
        .get("ports")
        .and_then(|p| p.as_array())
        .is_some_and(|p| !p.is_empty());
    if !has_ports {
        tracing::debug!(
            "Composed object {}/{} has no ports to enrich",
            target.namespace(),
            target.name()
        );
        return Ok(enriched);
    }

    let selector = match correlation_selector(target) {
        Some(selector) => selector,
        None => {
            tracing::debug!("No instance label convention for {}", target.kind_name());
            return Ok(enriched);
        }
    };

    for kind in related_kinds {
        let items = match store
            .list(target.namespace(), *kind, Some(&selector))
            .await
        {
            Ok(items) => items,
            Err(e) => {
                // Enrichment is additive; a failed lookup degrades
                // gracefully instead of failing the base object
                tracing::warn!(
                    "Enrichment list of {} for {}/{} failed: {}",
                    kind.plural(),
                    target.namespace(),
                    target.name(),
                    e
                );
                continue;
            }
        };

        let ports = enriched
            .get_mut("ports")
            .and_then(|p| p.as_array_mut())
            .expect("ports checked above");

        match kind {
            BuiltinKind::Service => merge_services(ports, &items),
            BuiltinKind::Ingress => merge_ingresses(ports, &items),
            other => {
                tracing::debug!("No enrichment rule for related kind {}", other);
            }
        }
    }

    Ok(enriched)
}

/// Attach serviceName/privateAddress to ports exposed by a Service.
/// First matching Service wins, in store order.
fn merge_services(ports: &mut [Value], services: &[Value]) {
    for service in services {
        let name = match metadata_name(service) {
            Some(name) => name,
            None => continue,
        };
        let cluster_ip = service
            .get("spec")
            .and_then(|s| s.get("clusterIP"))
            .and_then(|ip| ip.as_str());
        let service_ports = service
            .get("spec")
            .and_then(|s| s.get("ports"))
            .and_then(|p| p.as_array())
            .cloned()
            .unwrap_or_default();

        for entry in ports.iter_mut() {
            if entry.get("serviceName").is_some() {
                continue;
            }
            let number = match entry.get("number").and_then(|n| n.as_i64()) {
                Some(number) => number,
                None => continue,
            };
            let exposed = service_ports
                .iter()
                .any(|p| p.get("port").and_then(|n| n.as_i64()) == Some(number));
            if !exposed {
                continue;
            }

            entry["serviceName"] = json!(name);
            if let Some(ip) = cluster_ip {
                entry["privateAddress"] = json!(ip);
            }
        }
    }
}

/// Attach ingressName/host/publicAddress to ports routed by an Ingress.
/// First matching rule wins, in store order.
fn merge_ingresses(ports: &mut [Value], ingresses: &[Value]) {
    for ingress in ingresses {
        let name = match metadata_name(ingress) {
            Some(name) => name,
            None => continue,
        };
        let rules = ingress
            .get("spec")
            .and_then(|s| s.get("rules"))
            .and_then(|r| r.as_array())
            .cloned()
            .unwrap_or_default();

        for rule in &rules {
            let host = rule.get("host").and_then(|h| h.as_str()).unwrap_or("");
            let paths = rule
                .get("http")
                .and_then(|h| h.get("paths"))
                .and_then(|p| p.as_array())
                .cloned()
                .unwrap_or_default();

            for path in &paths {
                let number = path
                    .get("backend")
                    .and_then(|b| b.get("service"))
                    .and_then(|s| s.get("port"))
                    .and_then(|p| p.get("number"))
                    .and_then(|n| n.as_i64());
                let number = match number {
                    Some(number) => number,
                    None => continue,
                };
                let http_path = path.get("path").and_then(|p| p.as_str()).unwrap_or("/");

                for entry in ports.iter_mut() {
                    if entry.get("ingressName").is_some() {
                        continue;
                    }
                    if entry.get("number").and_then(|n| n.as_i64()) != Some(number) {
                        continue;
                    }

                    entry["ingressName"] = json!(name);
                    if !host.is_empty() {
                        entry["host"] = json!(host);
                        entry["publicAddress"] = json!(format!("{}{}", host, http_path));
                    }
                }
            }
        }
    }
}

fn metadata_name(resource: &Value) -> Option<&str> {
    resource
        .get("metadata")
        .and_then(|m| m.get("name"))
        .and_then(|n| n.as_str())
}
