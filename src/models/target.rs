//! Resource target identification
//!
//! A `ResourceTarget` identifies exactly one resource instance in the
//! cluster - either a custom API-group resource or one of the built-in
//! kinds. Targets are immutable once constructed; name and namespace are
//! always non-empty.

use anyhow::Result;
use kube::core::ApiResource;

use super::BuiltinKind;

/// Identifies exactly one concrete resource instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceTarget {
    /// A custom API-group resource (group/version/plural addressing)
    Custom {
        group: String,
        version: String,
        plural: String,
        namespace: String,
        name: String,
    },
    /// A built-in Kubernetes resource
    Builtin {
        kind: BuiltinKind,
        namespace: String,
        name: String,
    },
}

impl ResourceTarget {
    /// Create a target for a custom resource
    pub fn custom(
        group: impl Into<String>,
        version: impl Into<String>,
        plural: impl Into<String>,
        namespace: impl Into<String>,
        name: impl Into<String>,
    ) -> Result<Self> {
        let target = ResourceTarget::Custom {
            group: group.into(),
            version: version.into(),
            plural: plural.into(),
            namespace: namespace.into(),
            name: name.into(),
        };
        target.validate()?;
        Ok(target)
    }

    /// Create a target for a built-in resource
    pub fn builtin(
        kind: BuiltinKind,
        namespace: impl Into<String>,
        name: impl Into<String>,
    ) -> Result<Self> {
        let target = ResourceTarget::Builtin {
            kind,
            namespace: namespace.into(),
            name: name.into(),
        };
        target.validate()?;
        Ok(target)
    }

    fn validate(&self) -> Result<()> {
        if self.name().is_empty() {
            anyhow::bail!("Resource target requires a non-empty name");
        }
        if self.namespace().is_empty() {
            anyhow::bail!("Resource target requires a non-empty namespace");
        }
        Ok(())
    }

    /// The target's namespace
    pub fn namespace(&self) -> &str {
        match self {
            ResourceTarget::Custom { namespace, .. } => namespace,
            ResourceTarget::Builtin { namespace, .. } => namespace,
        }
    }

    /// The target's name
    pub fn name(&self) -> &str {
        match self {
            ResourceTarget::Custom { name, .. } => name,
            ResourceTarget::Builtin { name, .. } => name,
        }
    }

    /// Display name of the target's kind (singular, capitalized for
    /// custom resources derived from the plural)
    pub fn kind_name(&self) -> String {
        match self {
            ResourceTarget::Custom { plural, .. } => singular_kind(plural),
            ResourceTarget::Builtin { kind, .. } => kind.as_str().to_string(),
        }
    }

    /// Build the kube ApiResource used to address this target
    pub fn api_resource(&self) -> ApiResource {
        match self {
            ResourceTarget::Custom {
                group,
                version,
                plural,
                ..
            } => ApiResource {
                group: group.clone(),
                version: version.clone(),
                api_version: format!("{}/{}", group, version),
                kind: singular_kind(plural),
                plural: plural.clone(),
            },
            ResourceTarget::Builtin { kind, .. } => api_resource_for(*kind),
        }
    }
}

/// Build the kube ApiResource for a built-in kind
pub fn api_resource_for(kind: BuiltinKind) -> ApiResource {
    let group = kind.group();
    let version = kind.version();
    let api_version = if group.is_empty() {
        version.to_string()
    } else {
        format!("{}/{}", group, version)
    };
    ApiResource {
        group: group.to_string(),
        version: version.to_string(),
        api_version,
        kind: kind.as_str().to_string(),
        plural: kind.plural().to_string(),
    }
}

/// Derive a display kind from a plural resource name ("devboxes" -> "Devbox")
fn singular_kind(plural: &str) -> String {
    // "es" is stripped only after sibilant stems ("devboxes", "ingresses"),
    // otherwise a plain "s" comes off ("databases", "buckets")
    let singular = plural
        .strip_suffix("es")
        .filter(|s| {
            s.ends_with("ss")
                || s.ends_with('x')
                || s.ends_with('z')
                || s.ends_with("ch")
                || s.ends_with("sh")
        })
        .or_else(|| plural.strip_suffix('s'))
        .unwrap_or(plural);
    let mut chars = singular.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
