//! Query descriptor types and the metadata-string parser
//!
//! A query descriptor is the declarative instruction attached to one
//! schema field: which resource to read and where in it the field's
//! value lives. Descriptors are built with the typed constructors when
//! schemas are declared in code, and parsed from the JSON metadata
//! dialect when schemas come from manifests on disk.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{ComposeError, ComposeResult};

/// Sentinel resource type whose value comes from the caller's context,
/// not from a fetch
pub const EXTERNAL_TYPE: &str = "external";

/// Declarative fetch-and-extract instruction for one schema field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryDescriptor {
    /// Resource kind to read from: a built-in kind name, the schema's
    /// own root type, or the `"external"` sentinel
    #[serde(rename = "resourceType", alias = "resourceKind")]
    pub resource_type: String,

    /// Access path into the fetched resource; numeric segments index
    /// arrays. Empty means the resource's metadata as a whole.
    #[serde(default, deserialize_with = "deserialize_path")]
    pub path: Vec<String>,

    /// Label key selecting a set of resources whose label value equals
    /// the target's name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Regex pattern matched against resource names; may contain
    /// `{{name}}` placeholders interpolated from the target name
    #[serde(
        rename = "name",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub name_pattern: Option<String>,

    /// Take the first item of a label fetch instead of producing an array
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub first: bool,
}

impl QueryDescriptor {
    /// Descriptor reading the whole resource of the given type
    pub fn new(resource_type: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            path: Vec::new(),
            label: None,
            name_pattern: None,
            first: false,
        }
    }

    /// Descriptor reading a dotted path from the given resource type
    pub fn field(resource_type: impl Into<String>, path: &str) -> Self {
        Self {
            path: split_dotted(path),
            ..Self::new(resource_type)
        }
    }

    /// Descriptor with explicit path segments (for keys containing dots,
    /// e.g. annotation names)
    pub fn segments(
        resource_type: impl Into<String>,
        path: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            path: path.into_iter().map(Into::into).collect(),
            ..Self::new(resource_type)
        }
    }

    /// Descriptor whose value the caller supplies out of band
    pub fn external() -> Self {
        Self::new(EXTERNAL_TYPE)
    }

    /// Select a set of resources by label key instead of a single name
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Match resource names against a regex pattern (first match wins)
    pub fn with_name_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.name_pattern = Some(pattern.into());
        self
    }

    /// Reduce a label fetch to its first item
    pub fn take_first(mut self) -> Self {
        self.first = true;
        self
    }

    /// True when the value is caller-supplied rather than fetched
    pub fn is_external(&self) -> bool {
        self.resource_type == EXTERNAL_TYPE
    }

    /// True when this descriptor implies a list fetch
    pub fn is_list(&self) -> bool {
        self.label.is_some() || self.name_pattern.is_some()
    }

    /// Check the descriptor invariants
    ///
    /// Exactly one fetch strategy may be implied: direct single-resource
    /// or label-based list - never both.
    pub fn validate(&self) -> ComposeResult<()> {
        if self.resource_type.is_empty() {
            return Err(ComposeError::MalformedDescriptor(
                "resourceType must not be empty".to_string(),
            ));
        }
        if self.label.is_some() && self.name_pattern.is_some() {
            return Err(ComposeError::MalformedDescriptor(format!(
                "descriptor for '{}' sets both label and name - exactly one fetch strategy is allowed",
                self.resource_type
            )));
        }
        if self.is_external() && self.is_list() {
            return Err(ComposeError::MalformedDescriptor(
                "external descriptors cannot carry label or name selection".to_string(),
            ));
        }
        Ok(())
    }
}

/// Result of parsing a metadata string: a single descriptor for reads,
/// or several for the mutation-description dialect
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedQuery {
    Single(QueryDescriptor),
    Multi(Vec<QueryDescriptor>),
}

/// Parse the JSON metadata dialect attached to a schema field
///
/// Accepts a single JSON object or a JSON array of objects. Unknown keys
/// are tolerated; the type key may be `resourceType` or `resourceKind`;
/// `path` may be a dotted string or an array of segments.
pub fn parse(raw: &str) -> ComposeResult<ParsedQuery> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| ComposeError::MalformedDescriptor(format!("invalid JSON: {}", e)))?;

    match value {
        Value::Object(_) => {
            let descriptor = descriptor_from_value(value)?;
            Ok(ParsedQuery::Single(descriptor))
        }
        Value::Array(items) => {
            let descriptors = items
                .into_iter()
                .map(descriptor_from_value)
                .collect::<ComposeResult<Vec<_>>>()?;
            if descriptors.is_empty() {
                return Err(ComposeError::MalformedDescriptor(
                    "descriptor array must not be empty".to_string(),
                ));
            }
            Ok(ParsedQuery::Multi(descriptors))
        }
        other => Err(ComposeError::MalformedDescriptor(format!(
            "expected a JSON object or array, got {}",
            json_type_name(&other)
        ))),
    }
}

/// Parse a metadata string that must hold exactly one descriptor
pub fn parse_single(raw: &str) -> ComposeResult<QueryDescriptor> {
    match parse(raw)? {
        ParsedQuery::Single(descriptor) => Ok(descriptor),
        ParsedQuery::Multi(_) => Err(ComposeError::MalformedDescriptor(
            "expected a single descriptor, got an array".to_string(),
        )),
    }
}

fn descriptor_from_value(value: Value) -> ComposeResult<QueryDescriptor> {
    let descriptor: QueryDescriptor = serde_json::from_value(value)
        .map_err(|e| ComposeError::MalformedDescriptor(e.to_string()))?;
    descriptor.validate()?;
    Ok(descriptor)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Split a dotted access path into segments, tolerating a leading dot
pub fn split_dotted(path: &str) -> Vec<String> {
    path.strip_prefix('.')
        .unwrap_or(path)
        .split('.')
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

fn deserialize_path<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum PathSpec {
        Dotted(String),
        Segments(Vec<String>),
    }

    match PathSpec::deserialize(deserializer)? {
        PathSpec::Dotted(s) => Ok(split_dotted(&s)),
        PathSpec::Segments(segments) => Ok(segments),
    }
}
