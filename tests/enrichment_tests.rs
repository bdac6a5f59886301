//! Enrichment pass tests
//!
//! Port matching against related Services and Ingresses discovered by
//! label correlation, plus the graceful-degradation behavior when a
//! related-resource list call fails.

use resbridge::enrich::enrich_object;
use resbridge::{BuiltinKind, MemoryStore, ResourceTarget};
use serde_json::{Value, json};

fn web_target() -> ResourceTarget {
    ResourceTarget::builtin(BuiltinKind::Deployment, "prod", "web").unwrap()
}

fn service(name: &str, labels: Value, port: i64, cluster_ip: &str) -> Value {
    json!({
        "apiVersion": "v1",
        "kind": "Service",
        "metadata": {"name": name, "namespace": "prod", "labels": labels},
        "spec": {
            "clusterIP": cluster_ip,
            "ports": [{"port": port, "targetPort": port}]
        }
    })
}

fn ingress(name: &str, labels: Value, host: &str, port: i64) -> Value {
    json!({
        "apiVersion": "networking.k8s.io/v1",
        "kind": "Ingress",
        "metadata": {"name": name, "namespace": "prod", "labels": labels},
        "spec": {
            "rules": [{
                "host": host,
                "http": {"paths": [{
                    "path": "/",
                    "backend": {"service": {"name": name, "port": {"number": port}}}
                }]}
            }]
        }
    })
}

#[tokio::test]
async fn test_service_port_matching() {
    let store = MemoryStore::new(vec![service(
        "web-svc",
        json!({"app": "web"}),
        3000,
        "10.0.0.5",
    )]);
    let composed = json!({"name": "web", "ports": [{"number": 3000}]});

    let enriched = enrich_object(&store, &web_target(), &composed, &[BuiltinKind::Service])
        .await
        .unwrap();

    assert_eq!(
        enriched["ports"],
        json!([{
            "number": 3000,
            "serviceName": "web-svc",
            "privateAddress": "10.0.0.5"
        }])
    );
    // The input object is never mutated
    assert_eq!(composed["ports"], json!([{"number": 3000}]));
}

#[tokio::test]
async fn test_non_matching_port_left_unenriched() {
    let store = MemoryStore::new(vec![service(
        "web-svc",
        json!({"app": "web"}),
        8080,
        "10.0.0.5",
    )]);
    let composed = json!({"name": "web", "ports": [{"number": 3000}]});

    let enriched = enrich_object(&store, &web_target(), &composed, &[BuiltinKind::Service])
        .await
        .unwrap();

    assert_eq!(enriched["ports"], json!([{"number": 3000}]));
}

#[tokio::test]
async fn test_ingress_adds_public_address() {
    let store = MemoryStore::new(vec![
        service("web-svc", json!({"app": "web"}), 3000, "10.0.0.5"),
        ingress("web-ing", json!({"app": "web"}), "web.example.com", 3000),
    ]);
    let composed = json!({"name": "web", "ports": [{"number": 3000}, {"number": 9090}]});

    let enriched = enrich_object(
        &store,
        &web_target(),
        &composed,
        &[BuiltinKind::Service, BuiltinKind::Ingress],
    )
    .await
    .unwrap();

    assert_eq!(
        enriched["ports"][0],
        json!({
            "number": 3000,
            "serviceName": "web-svc",
            "privateAddress": "10.0.0.5",
            "ingressName": "web-ing",
            "host": "web.example.com",
            "publicAddress": "web.example.com/"
        })
    );
    assert_eq!(enriched["ports"][1], json!({"number": 9090}));
}

#[tokio::test]
async fn test_first_matching_service_wins() {
    let store = MemoryStore::new(vec![
        service("svc-one", json!({"app": "web"}), 3000, "10.0.0.1"),
        service("svc-two", json!({"app": "web"}), 3000, "10.0.0.2"),
    ]);
    let composed = json!({"ports": [{"number": 3000}]});

    let enriched = enrich_object(&store, &web_target(), &composed, &[BuiltinKind::Service])
        .await
        .unwrap();

    assert_eq!(enriched["ports"][0]["serviceName"], json!("svc-one"));
    assert_eq!(enriched["ports"][0]["privateAddress"], json!("10.0.0.1"));
}

#[tokio::test]
async fn test_label_correlation_excludes_other_instances() {
    let store = MemoryStore::new(vec![service(
        "other-svc",
        json!({"app": "other"}),
        3000,
        "10.0.0.9",
    )]);
    let composed = json!({"ports": [{"number": 3000}]});

    let enriched = enrich_object(&store, &web_target(), &composed, &[BuiltinKind::Service])
        .await
        .unwrap();

    assert_eq!(enriched["ports"], json!([{"number": 3000}]));
}

#[tokio::test]
async fn test_statefulset_uses_its_own_label_key() {
    let target = ResourceTarget::builtin(BuiltinKind::StatefulSet, "prod", "db").unwrap();
    let store = MemoryStore::new(vec![
        service(
            "db-svc",
            json!({"app.kubernetes.io/instance": "db"}),
            5432,
            "10.0.0.7",
        ),
        // Labeled with the Deployment convention; must not match
        service("decoy-svc", json!({"app": "db"}), 5432, "10.0.0.8"),
    ]);
    let composed = json!({"ports": [{"number": 5432}]});

    let enriched = enrich_object(&store, &target, &composed, &[BuiltinKind::Service])
        .await
        .unwrap();

    assert_eq!(enriched["ports"][0]["serviceName"], json!("db-svc"));
}

#[tokio::test]
async fn test_list_failure_degrades_to_base_object() {
    let store = MemoryStore::new(vec![]);
    store.fail_lists(true);
    let composed = json!({"name": "web", "ports": [{"number": 3000}]});

    let enriched = enrich_object(&store, &web_target(), &composed, &[BuiltinKind::Service])
        .await
        .unwrap();

    assert_eq!(enriched, composed);
}

#[tokio::test]
async fn test_object_without_ports_passes_through() {
    let store = MemoryStore::new(vec![]);
    let composed = json!({"name": "web"});

    let enriched = enrich_object(&store, &web_target(), &composed, &[BuiltinKind::Service])
        .await
        .unwrap();

    assert_eq!(enriched, composed);
    // No ports means no related lookups at all
    assert_eq!(store.list_calls(), 0);
}
