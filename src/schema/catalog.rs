//! Built-in schema catalog
//!
//! The logical object kinds the dashboard ships with, declared with the
//! typed schema builders. These are data, not logic: each entry lists
//! where every output field comes from and how it is coerced.

use serde_json::json;

use super::SchemaEntry;
use super::composite::{CompositeSchema, FieldSchema, FieldSpec};
use super::descriptor::QueryDescriptor;
use super::manifest::ResourceDecl;
use super::transform::Transform;

/// All built-in schemas
pub fn builtin_schemas() -> Vec<SchemaEntry> {
    vec![devbox(), database(), deployment(), bucket()]
}

/// Look up a built-in schema by name
pub fn find(name: &str) -> Option<SchemaEntry> {
    builtin_schemas().into_iter().find(|e| e.name == name)
}

/// Development sandbox: a custom resource backed by a Deployment, a
/// credentials Secret and its Pods
fn devbox() -> SchemaEntry {
    let schema = CompositeSchema::new("devbox")
        .leaf(
            "name",
            FieldSpec::new(QueryDescriptor::field("devbox", "metadata.name")),
        )
        .leaf(
            "phase",
            FieldSpec::new(QueryDescriptor::field("devbox", "status.phase")).optional(),
        )
        .leaf(
            "image",
            FieldSpec::new(QueryDescriptor::field("devbox", "spec.image")),
        )
        .leaf(
            "cpu",
            FieldSpec::new(QueryDescriptor::field("devbox", "spec.resources.cpu"))
                .with_transform(Transform::Number)
                .optional(),
        )
        .leaf(
            "memory",
            FieldSpec::new(QueryDescriptor::field("devbox", "spec.resources.memory")).optional(),
        )
        .leaf(
            "createdAt",
            FieldSpec::new(QueryDescriptor::field("devbox", "metadata.creationTimestamp"))
                .with_transform(Transform::Timestamp),
        )
        .leaf(
            "ports",
            FieldSpec::new(QueryDescriptor::field(
                "deployment",
                "spec.template.spec.containers.0.ports",
            ))
            .with_transform(Transform::Ports)
            .optional(),
        )
        .leaf(
            "password",
            FieldSpec::new(
                QueryDescriptor::field("secret", "data.password")
                    .with_name_pattern("^{{name}}-auth$"),
            )
            .with_transform(Transform::Base64Utf8)
            .optional(),
        )
        .leaf("region", FieldSpec::new(QueryDescriptor::external()).optional())
        .field(
            "pods",
            FieldSchema::list(FieldSchema::object([
                (
                    "name",
                    FieldSchema::leaf(FieldSpec::new(
                        QueryDescriptor::field("pod", "metadata.name").with_label("app"),
                    )),
                ),
                (
                    "phase",
                    FieldSchema::leaf(
                        FieldSpec::new(
                            QueryDescriptor::field("pod", "status.phase").with_label("app"),
                        )
                        .optional(),
                    ),
                ),
                (
                    "node",
                    FieldSchema::leaf(
                        FieldSpec::new(
                            QueryDescriptor::field("pod", "spec.nodeName").with_label("app"),
                        )
                        .optional(),
                    ),
                ),
            ])),
        );

    SchemaEntry {
        name: "devbox".to_string(),
        description: Some("Development sandbox instance".to_string()),
        resource: ResourceDecl::Custom {
            group: "sandbox.bridge.io".to_string(),
            version: "v1alpha1".to_string(),
            plural: "devboxes".to_string(),
        },
        schema,
    }
}

/// Managed database cluster
fn database() -> SchemaEntry {
    let schema = CompositeSchema::new("database")
        .leaf(
            "name",
            FieldSpec::new(QueryDescriptor::field("database", "metadata.name")),
        )
        .leaf(
            "engine",
            FieldSpec::new(QueryDescriptor::field("database", "spec.engine")),
        )
        .leaf(
            "version",
            FieldSpec::new(QueryDescriptor::field("database", "spec.version")).optional(),
        )
        .leaf(
            "replicas",
            FieldSpec::new(QueryDescriptor::field("database", "spec.replicas"))
                .with_transform(Transform::Number)
                .with_transform(Transform::Default(json!(1))),
        )
        .leaf(
            "storage",
            FieldSpec::new(QueryDescriptor::field("database", "spec.storage.size")).optional(),
        )
        .leaf(
            "phase",
            FieldSpec::new(QueryDescriptor::field("database", "status.phase")).optional(),
        )
        .leaf(
            "createdAt",
            FieldSpec::new(QueryDescriptor::field("database", "metadata.creationTimestamp"))
                .with_transform(Transform::Timestamp),
        )
        .field(
            "connection",
            FieldSchema::object([
                (
                    "host",
                    FieldSchema::leaf(
                        FieldSpec::new(QueryDescriptor::field("service", "spec.clusterIP"))
                            .optional(),
                    ),
                ),
                (
                    "port",
                    FieldSchema::leaf(
                        FieldSpec::new(QueryDescriptor::field("service", "spec.ports.0.port"))
                            .with_transform(Transform::Number)
                            .optional(),
                    ),
                ),
            ]),
        )
        .leaf(
            "rootPassword",
            FieldSpec::new(
                QueryDescriptor::field("secret", "data.password")
                    .with_name_pattern("^{{name}}-credentials$"),
            )
            .with_transform(Transform::Base64Utf8)
            .optional(),
        )
        .field(
            "pods",
            FieldSchema::list(FieldSchema::object([
                (
                    "name",
                    FieldSchema::leaf(FieldSpec::new(
                        QueryDescriptor::field("pod", "metadata.name").with_label("app"),
                    )),
                ),
                (
                    "phase",
                    FieldSchema::leaf(
                        FieldSpec::new(
                            QueryDescriptor::field("pod", "status.phase").with_label("app"),
                        )
                        .optional(),
                    ),
                ),
            ])),
        );

    SchemaEntry {
        name: "database".to_string(),
        description: Some("Managed database cluster".to_string()),
        resource: ResourceDecl::Custom {
            group: "db.bridge.io".to_string(),
            version: "v1".to_string(),
            plural: "databases".to_string(),
        },
        schema,
    }
}

/// Plain workload view over a built-in Deployment
fn deployment() -> SchemaEntry {
    let schema = CompositeSchema::new("deployment")
        .leaf(
            "name",
            FieldSpec::new(QueryDescriptor::field("deployment", "metadata.name")),
        )
        .leaf(
            "image",
            FieldSpec::new(QueryDescriptor::field(
                "deployment",
                "spec.template.spec.containers.0.image",
            )),
        )
        .leaf(
            "replicas",
            FieldSpec::new(QueryDescriptor::field("deployment", "spec.replicas"))
                .with_transform(Transform::Number),
        )
        .leaf(
            "readyReplicas",
            FieldSpec::new(QueryDescriptor::field("deployment", "status.readyReplicas"))
                .with_transform(Transform::Number)
                .with_transform(Transform::Default(json!(0))),
        )
        .leaf(
            "ports",
            FieldSpec::new(QueryDescriptor::field(
                "deployment",
                "spec.template.spec.containers.0.ports",
            ))
            .with_transform(Transform::Ports)
            .optional(),
        )
        .leaf(
            "createdAt",
            FieldSpec::new(QueryDescriptor::field(
                "deployment",
                "metadata.creationTimestamp",
            ))
            .with_transform(Transform::Timestamp),
        );

    SchemaEntry {
        name: "deployment".to_string(),
        description: Some("Workload deployment".to_string()),
        resource: ResourceDecl::Builtin {
            kind: "deployment".to_string(),
        },
        schema,
    }
}

/// Object storage bucket; its access policy lives in an annotation blob
fn bucket() -> SchemaEntry {
    let schema = CompositeSchema::new("bucket")
        .leaf(
            "name",
            FieldSpec::new(QueryDescriptor::field("bucket", "metadata.name")),
        )
        .leaf(
            "phase",
            FieldSpec::new(QueryDescriptor::field("bucket", "status.phase")).optional(),
        )
        .leaf(
            "capacity",
            FieldSpec::new(QueryDescriptor::field("bucket", "spec.capacity")).optional(),
        )
        .leaf(
            "policy",
            FieldSpec::new(QueryDescriptor::segments(
                "bucket",
                ["metadata", "annotations", "storage.bridge.io/policy"],
            ))
            .with_transform(Transform::JsonParse)
            .with_transform(Transform::Default(
                json!({"compatibility": "s3", "resources": []}),
            )),
        )
        .leaf(
            "createdAt",
            FieldSpec::new(QueryDescriptor::field("bucket", "metadata.creationTimestamp"))
                .with_transform(Transform::Timestamp),
        )
        .leaf("endpoint", FieldSpec::new(QueryDescriptor::external()).optional());

    SchemaEntry {
        name: "bucket".to_string(),
        description: Some("Object storage bucket".to_string()),
        resource: ResourceDecl::Custom {
            group: "storage.bridge.io".to_string(),
            version: "v1alpha1".to_string(),
            plural: "buckets".to_string(),
        },
        schema,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_builtin_schemas_validate() {
        for entry in builtin_schemas() {
            entry.schema.validate().unwrap_or_else(|e| {
                panic!("schema '{}' failed validation: {}", entry.name, e)
            });
        }
    }

    #[test]
    fn test_find() {
        assert!(find("devbox").is_some());
        assert!(find("nope").is_none());
    }

    #[test]
    fn test_targets_mint() {
        let entry = find("devbox").unwrap();
        let target = entry.target("dev", "box-a").unwrap();
        assert_eq!(target.kind_name(), "Devbox");

        let entry = find("deployment").unwrap();
        let target = entry.target("prod", "web").unwrap();
        assert_eq!(target.kind_name(), "Deployment");
    }
}
