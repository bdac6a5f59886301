//! Composite schema tree
//!
//! A composite schema describes the shape of one logical object: a map
//! from output field name to either a leaf (query descriptor plus
//! transforms) or a nested object/list schema. Field order within one
//! level is irrelevant; names are unique. The tree is an explicit typed
//! structure built at schema-definition time.

use std::collections::BTreeMap;

use serde::Serialize;

use super::descriptor::QueryDescriptor;
use super::transform::Transform;
use crate::error::{ComposeError, ComposeResult};

/// Leaf field: what to fetch, how to coerce it, whether it may be absent
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSpec {
    pub query: QueryDescriptor,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub transforms: Vec<Transform>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub optional: bool,
}

impl FieldSpec {
    pub fn new(query: QueryDescriptor) -> Self {
        Self {
            query,
            transforms: Vec::new(),
            optional: false,
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transforms.push(transform);
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}

/// One node of the output shape
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldSchema {
    /// A single resolved value
    Leaf(FieldSpec),
    /// Nested output object; sub-fields resolve independently
    Object(BTreeMap<String, FieldSchema>),
    /// One element schema applied to every item of a shared list fetch
    List(Box<FieldSchema>),
}

impl FieldSchema {
    pub fn leaf(spec: FieldSpec) -> Self {
        FieldSchema::Leaf(spec)
    }

    pub fn object(fields: impl IntoIterator<Item = (&'static str, FieldSchema)>) -> Self {
        FieldSchema::Object(
            fields
                .into_iter()
                .map(|(name, schema)| (name.to_string(), schema))
                .collect(),
        )
    }

    pub fn list(element: FieldSchema) -> Self {
        FieldSchema::List(Box::new(element))
    }
}

/// Schema for one logical object kind
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompositeSchema {
    /// The logical object's own type name; descriptors naming it are
    /// resolved against the resolution target directly
    pub root_type: String,
    pub fields: BTreeMap<String, FieldSchema>,
}

impl CompositeSchema {
    pub fn new(root_type: impl Into<String>) -> Self {
        Self {
            root_type: root_type.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Add a field (builder style); replaces any previous field of the
    /// same name
    pub fn field(mut self, name: impl Into<String>, schema: FieldSchema) -> Self {
        self.fields.insert(name.into(), schema);
        self
    }

    /// Convenience for adding a leaf field
    pub fn leaf(self, name: impl Into<String>, spec: FieldSpec) -> Self {
        self.field(name, FieldSchema::Leaf(spec))
    }

    /// Validate every descriptor in the tree
    pub fn validate(&self) -> ComposeResult<()> {
        fn walk(name: &str, schema: &FieldSchema, depth_in_list: bool) -> ComposeResult<()> {
            match schema {
                FieldSchema::Leaf(spec) => spec.query.validate(),
                FieldSchema::Object(fields) => {
                    for (sub, schema) in fields {
                        walk(sub, schema, depth_in_list)?;
                    }
                    Ok(())
                }
                FieldSchema::List(element) => {
                    if depth_in_list {
                        return Err(ComposeError::MalformedDescriptor(format!(
                            "field '{}': nested list schemas are not supported",
                            name
                        )));
                    }
                    walk(name, element, true)
                }
            }
        }

        for (name, schema) in &self.fields {
            walk(name, schema, false)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_shape() {
        let schema = CompositeSchema::new("devbox")
            .leaf("image", FieldSpec::new(QueryDescriptor::field("devbox", "spec.image")))
            .field(
                "pods",
                FieldSchema::list(FieldSchema::object([(
                    "name",
                    FieldSchema::leaf(FieldSpec::new(
                        QueryDescriptor::field("pod", "metadata.name").with_label("app"),
                    )),
                )])),
            );

        assert_eq!(schema.fields.len(), 2);
        assert!(schema.validate().is_ok());
    }

    #[test]
    fn test_nested_list_rejected() {
        let inner = FieldSchema::list(FieldSchema::leaf(FieldSpec::new(
            QueryDescriptor::field("pod", "metadata.name").with_label("app"),
        )));
        let schema = CompositeSchema::new("devbox").field("bad", FieldSchema::list(inner));
        assert!(schema.validate().is_err());
    }
}
