//! Fetch planning
//!
//! Maps a query descriptor onto the concrete store call it needs. The
//! `FetchKey` is the deduplication identity of one underlying call: two
//! descriptors with the same key share a single fetch within one
//! resolution. Name patterns are interpolated here, once per resolution,
//! before any grouping or matching happens.

use std::collections::HashMap;

use regex::Regex;
use serde_json::Value;

use crate::error::{ComposeError, ComposeResult};
use crate::models::{BuiltinKind, ResourceTarget};
use crate::schema::descriptor::QueryDescriptor;
use crate::schema::template::interpolate;

/// Deduplication identity of a single store call
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FetchKey {
    /// The resolution target itself
    Primary,
    /// Direct get-by-name of a built-in resource
    Get {
        kind: BuiltinKind,
        namespace: String,
        name: String,
    },
    /// List of a built-in kind, optionally narrowed by a label selector
    List {
        kind: BuiltinKind,
        namespace: String,
        selector: Option<String>,
    },
}

/// Result of one store call
#[derive(Debug, Clone)]
pub enum Fetched {
    Single(Option<Value>),
    Items(Vec<Value>),
}

/// A descriptor's fetch key plus its compiled name filter, if any
#[derive(Debug)]
pub struct FetchPlan {
    pub key: FetchKey,
    pub name_regex: Option<Regex>,
}

impl FetchPlan {
    /// Pattern string of the name filter (for grouping comparisons)
    pub fn pattern(&self) -> Option<&str> {
        self.name_regex.as_ref().map(|r| r.as_str())
    }
}

/// Plan the fetch for one descriptor; `None` means the value is external
/// and nothing is fetched
pub fn plan_for(
    query: &QueryDescriptor,
    root_type: &str,
    target: &ResourceTarget,
) -> ComposeResult<Option<FetchPlan>> {
    query.validate()?;

    if query.is_external() {
        return Ok(None);
    }

    let namespace = target.namespace().to_string();

    // Fields of the schema's own root type read from the target directly
    if query.resource_type.eq_ignore_ascii_case(root_type) && !query.is_list() {
        return Ok(Some(FetchPlan {
            key: FetchKey::Primary,
            name_regex: None,
        }));
    }

    let kind = BuiltinKind::from_str_case_insensitive(&query.resource_type)
        .ok_or_else(|| ComposeError::UnsupportedResourceType(query.resource_type.clone()))?;

    if let Some(label) = &query.label {
        let selector = format!("{}={}", label, target.name());
        return Ok(Some(FetchPlan {
            key: FetchKey::List {
                kind,
                namespace,
                selector: Some(selector),
            },
            name_regex: None,
        }));
    }

    if let Some(pattern) = &query.name_pattern {
        let vars: HashMap<&str, &str> = [
            ("name", target.name()),
            ("namespace", target.namespace()),
        ]
        .into_iter()
        .collect();
        let resolved = interpolate(pattern, &vars);
        let regex = Regex::new(&resolved).map_err(|e| {
            ComposeError::MalformedDescriptor(format!(
                "invalid name pattern '{}': {}",
                resolved, e
            ))
        })?;
        return Ok(Some(FetchPlan {
            key: FetchKey::List {
                kind,
                namespace,
                selector: None,
            },
            name_regex: Some(regex),
        }));
    }

    Ok(Some(FetchPlan {
        key: FetchKey::Get {
            kind,
            namespace,
            name: target.name().to_string(),
        },
        name_regex: None,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target() -> ResourceTarget {
        ResourceTarget::custom("sandbox.bridge.io", "v1alpha1", "devboxes", "dev", "box-a")
            .unwrap()
    }

    #[test]
    fn test_root_type_is_primary() {
        let plan = plan_for(
            &QueryDescriptor::field("devbox", "spec.image"),
            "devbox",
            &target(),
        )
        .unwrap()
        .unwrap();
        assert_eq!(plan.key, FetchKey::Primary);
    }

    #[test]
    fn test_label_selector_uses_target_name() {
        let plan = plan_for(
            &QueryDescriptor::field("pod", "metadata.name").with_label("app"),
            "devbox",
            &target(),
        )
        .unwrap()
        .unwrap();
        assert_eq!(
            plan.key,
            FetchKey::List {
                kind: BuiltinKind::Pod,
                namespace: "dev".to_string(),
                selector: Some("app=box-a".to_string()),
            }
        );
    }

    #[test]
    fn test_name_pattern_interpolated() {
        let plan = plan_for(
            &QueryDescriptor::field("secret", "data.password")
                .with_name_pattern("^{{name}}-auth$"),
            "devbox",
            &target(),
        )
        .unwrap()
        .unwrap();
        assert_eq!(plan.pattern(), Some("^box-a-auth$"));
        assert!(plan.name_regex.unwrap().is_match("box-a-auth"));
    }

    #[test]
    fn test_external_has_no_plan() {
        let plan = plan_for(&QueryDescriptor::external(), "devbox", &target()).unwrap();
        assert!(plan.is_none());
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let err = plan_for(
            &QueryDescriptor::field("widget", "spec.x"),
            "devbox",
            &target(),
        )
        .unwrap_err();
        assert!(matches!(err, ComposeError::UnsupportedResourceType(t) if t == "widget"));
    }
}
