// Schema layer for resbridge
//
// Declarative composite schemas: query descriptors embedded per field,
// the typed schema tree, per-field transforms, manifest loading and the
// built-in catalog.

pub mod catalog;
pub mod composite;
pub mod descriptor;
pub mod loader;
pub mod manifest;
pub mod template;
pub mod transform;

pub use composite::{CompositeSchema, FieldSchema, FieldSpec};
pub use descriptor::{EXTERNAL_TYPE, ParsedQuery, QueryDescriptor, parse, parse_single};
pub use loader::SchemaLoader;
pub use manifest::{ResourceDecl, SchemaManifest};
pub use template::interpolate;
pub use transform::Transform;

use anyhow::Result;
use serde::Serialize;

use crate::models::{BuiltinKind, ResourceTarget};

/// A named, ready-to-resolve schema: the composite tree plus the
/// declaration of the resource its root type addresses
#[derive(Debug, Clone, Serialize)]
pub struct SchemaEntry {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub resource: ResourceDecl,
    pub schema: CompositeSchema,
}

impl SchemaEntry {
    /// Mint the resolution target for one instance of this logical object
    pub fn target(&self, namespace: &str, name: &str) -> Result<ResourceTarget> {
        match &self.resource {
            ResourceDecl::Custom {
                group,
                version,
                plural,
            } => ResourceTarget::custom(
                group.as_str(),
                version.as_str(),
                plural.as_str(),
                namespace,
                name,
            ),
            ResourceDecl::Builtin { kind } => {
                let kind = BuiltinKind::from_str_case_insensitive(kind)
                    .ok_or_else(|| anyhow::anyhow!("Unknown built-in kind: {}", kind))?;
                ResourceTarget::builtin(kind, namespace, name)
            }
        }
    }
}
