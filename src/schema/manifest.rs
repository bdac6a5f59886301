//! Schema manifest format
//!
//! Composite schemas can be declared in YAML files. Each field carries
//! its query descriptor in the JSON metadata dialect (the `query` key),
//! so manifests exercise the same parser the original annotations go
//! through. A manifest converts into a validated `SchemaEntry`.

use serde::{Deserialize, Serialize};

use super::composite::{CompositeSchema, FieldSchema, FieldSpec};
use super::descriptor::parse_single;
use super::transform::Transform;
use super::SchemaEntry;
use crate::error::{ComposeError, ComposeResult};
use crate::models::BuiltinKind;

fn default_enabled() -> bool {
    true
}

/// Declaration of the resource a schema resolves against
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ResourceDecl {
    /// Custom API-group resource
    Custom {
        group: String,
        version: String,
        plural: String,
    },
    /// Built-in Kubernetes resource
    Builtin { kind: String },
}

/// Schema manifest - root structure of a schema YAML file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaManifest {
    /// Logical object name (must be unique across schema directories);
    /// doubles as the schema's root type
    pub name: String,

    /// Whether this schema is available
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Optional description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// The resource this schema's root-type descriptors resolve against
    pub resource: ResourceDecl,

    /// Output fields
    pub fields: Vec<FieldManifest>,
}

/// One output field of a schema manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldManifest {
    pub name: String,

    /// Query descriptor in the JSON metadata dialect (leaf fields)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,

    /// Transform chain applied after extraction
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub transforms: Vec<Transform>,

    /// Absent values are tolerated instead of failing the resolution
    #[serde(default)]
    pub optional: bool,

    /// Nested object fields
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldManifest>,

    /// Element schema for list fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element: Option<Box<FieldManifest>>,
}

impl SchemaManifest {
    /// Parse a manifest from YAML text
    pub fn from_yaml(raw: &str) -> ComposeResult<Self> {
        serde_yaml::from_str(raw)
            .map_err(|e| ComposeError::MalformedDescriptor(format!("invalid schema manifest: {}", e)))
    }

    /// Convert into a validated schema entry
    pub fn into_entry(self) -> ComposeResult<SchemaEntry> {
        if let ResourceDecl::Builtin { kind } = &self.resource {
            if BuiltinKind::from_str_case_insensitive(kind).is_none() {
                return Err(ComposeError::UnsupportedResourceType(kind.clone()));
            }
        }

        let mut schema = CompositeSchema::new(self.name.as_str());
        for field in &self.fields {
            schema = schema.field(field.name.clone(), field.to_schema()?);
        }
        schema.validate()?;

        Ok(SchemaEntry {
            name: self.name,
            description: self.description,
            resource: self.resource,
            schema,
        })
    }
}

impl FieldManifest {
    fn to_schema(&self) -> ComposeResult<FieldSchema> {
        let shapes =
            usize::from(self.query.is_some()) + usize::from(!self.fields.is_empty())
                + usize::from(self.element.is_some());
        if shapes != 1 {
            return Err(ComposeError::MalformedDescriptor(format!(
                "field '{}' must declare exactly one of query, fields or element",
                self.name
            )));
        }

        if let Some(raw) = &self.query {
            let query = parse_single(raw)?;
            let mut spec = FieldSpec::new(query);
            spec.transforms = self.transforms.clone();
            spec.optional = self.optional;
            return Ok(FieldSchema::Leaf(spec));
        }

        if let Some(element) = &self.element {
            return Ok(FieldSchema::List(Box::new(element.to_schema()?)));
        }

        let mut fields = std::collections::BTreeMap::new();
        for sub in &self.fields {
            fields.insert(sub.name.clone(), sub.to_schema()?);
        }
        Ok(FieldSchema::Object(fields))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_manifest() {
        let manifest = SchemaManifest::from_yaml(
            r#"
name: devbox
resource:
  type: custom
  group: sandbox.bridge.io
  version: v1alpha1
  plural: devboxes
fields:
  - name: image
    query: '{"resourceType": "devbox", "path": "spec.image"}'
"#,
        )
        .unwrap();
        let entry = manifest.into_entry().unwrap();
        assert_eq!(entry.name, "devbox");
        assert_eq!(entry.schema.fields.len(), 1);
    }

    #[test]
    fn test_field_shape_exclusivity() {
        let manifest = SchemaManifest::from_yaml(
            r#"
name: bad
resource:
  type: builtin
  kind: deployment
fields:
  - name: image
"#,
        )
        .unwrap();
        assert!(manifest.into_entry().is_err());
    }

    #[test]
    fn test_unknown_builtin_kind_rejected() {
        let manifest = SchemaManifest::from_yaml(
            r#"
name: bad
resource:
  type: builtin
  kind: widget
fields:
  - name: image
    query: '{"resourceType": "widget", "path": "spec.image"}'
"#,
        )
        .unwrap();
        assert!(matches!(
            manifest.into_entry(),
            Err(ComposeError::UnsupportedResourceType(_))
        ));
    }
}
