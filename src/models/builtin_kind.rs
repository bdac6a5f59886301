//! Built-in resource kind definitions
//!
//! This module provides a centralized enum for the built-in Kubernetes
//! resource kinds the composition engine can fetch. This eliminates
//! hardcoded strings throughout the codebase and provides type safety
//! for resource kind references.

use std::fmt;
use std::str::FromStr;

/// Enumeration of the built-in resource kinds the store can fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinKind {
    Deployment,
    Service,
    Ingress,
    StatefulSet,
    DaemonSet,
    ConfigMap,
    Secret,
    Pod,
    PersistentVolumeClaim,
}

impl BuiltinKind {
    /// Get the display name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            BuiltinKind::Deployment => "Deployment",
            BuiltinKind::Service => "Service",
            BuiltinKind::Ingress => "Ingress",
            BuiltinKind::StatefulSet => "StatefulSet",
            BuiltinKind::DaemonSet => "DaemonSet",
            BuiltinKind::ConfigMap => "ConfigMap",
            BuiltinKind::Secret => "Secret",
            BuiltinKind::Pod => "Pod",
            BuiltinKind::PersistentVolumeClaim => "PersistentVolumeClaim",
        }
    }

    /// Get the API group for this kind (empty string for the core group)
    pub fn group(&self) -> &'static str {
        match self {
            BuiltinKind::Deployment | BuiltinKind::StatefulSet | BuiltinKind::DaemonSet => "apps",
            BuiltinKind::Ingress => "networking.k8s.io",
            _ => "",
        }
    }

    /// Get the preferred API version for this kind
    pub fn version(&self) -> &'static str {
        "v1"
    }

    /// Get the plural resource name used in API paths
    pub fn plural(&self) -> &'static str {
        match self {
            BuiltinKind::Deployment => "deployments",
            BuiltinKind::Service => "services",
            BuiltinKind::Ingress => "ingresses",
            BuiltinKind::StatefulSet => "statefulsets",
            BuiltinKind::DaemonSet => "daemonsets",
            BuiltinKind::ConfigMap => "configmaps",
            BuiltinKind::Secret => "secrets",
            BuiltinKind::Pod => "pods",
            BuiltinKind::PersistentVolumeClaim => "persistentvolumeclaims",
        }
    }

    /// Try to parse a string into a BuiltinKind, returning None if invalid
    /// Use this when you want Option<Self> instead of Result<Self, String>
    pub fn parse_optional(s: &str) -> Option<Self> {
        s.parse().ok()
    }

    /// Get all built-in kinds
    ///
    /// Returns an array of all BuiltinKind variants. This is useful for
    /// iterating over all resource types dynamically.
    pub fn all() -> &'static [Self] {
        &[
            BuiltinKind::Deployment,
            BuiltinKind::Service,
            BuiltinKind::Ingress,
            BuiltinKind::StatefulSet,
            BuiltinKind::DaemonSet,
            BuiltinKind::ConfigMap,
            BuiltinKind::Secret,
            BuiltinKind::Pod,
            BuiltinKind::PersistentVolumeClaim,
        ]
    }

    /// Try to parse a string (case-insensitive, with common aliases) into a BuiltinKind
    pub fn from_str_case_insensitive(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "deployment" | "deployments" | "deploy" => Some(BuiltinKind::Deployment),
            "service" | "services" | "svc" => Some(BuiltinKind::Service),
            "ingress" | "ingresses" | "ing" => Some(BuiltinKind::Ingress),
            "statefulset" | "statefulsets" | "sts" => Some(BuiltinKind::StatefulSet),
            "daemonset" | "daemonsets" | "ds" => Some(BuiltinKind::DaemonSet),
            "configmap" | "configmaps" | "cm" => Some(BuiltinKind::ConfigMap),
            "secret" | "secrets" => Some(BuiltinKind::Secret),
            "pod" | "pods" | "po" => Some(BuiltinKind::Pod),
            "persistentvolumeclaim" | "persistentvolumeclaims" | "pvc" => {
                Some(BuiltinKind::PersistentVolumeClaim)
            }
            _ => None,
        }
    }
}

impl fmt::Display for BuiltinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<BuiltinKind> for String {
    fn from(kind: BuiltinKind) -> Self {
        kind.as_str().to_string()
    }
}

impl FromStr for BuiltinKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Deployment" => Ok(BuiltinKind::Deployment),
            "Service" => Ok(BuiltinKind::Service),
            "Ingress" => Ok(BuiltinKind::Ingress),
            "StatefulSet" => Ok(BuiltinKind::StatefulSet),
            "DaemonSet" => Ok(BuiltinKind::DaemonSet),
            "ConfigMap" => Ok(BuiltinKind::ConfigMap),
            "Secret" => Ok(BuiltinKind::Secret),
            "Pod" => Ok(BuiltinKind::Pod),
            "PersistentVolumeClaim" => Ok(BuiltinKind::PersistentVolumeClaim),
            _ => Err(format!("Unknown built-in resource kind: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_str() {
        assert_eq!(BuiltinKind::Deployment.as_str(), "Deployment");
        assert_eq!(
            BuiltinKind::PersistentVolumeClaim.as_str(),
            "PersistentVolumeClaim"
        );
    }

    #[test]
    fn test_from_str() {
        assert_eq!(
            BuiltinKind::parse_optional("Deployment"),
            Some(BuiltinKind::Deployment)
        );
        assert_eq!(
            BuiltinKind::parse_optional("Ingress"),
            Some(BuiltinKind::Ingress)
        );
        assert_eq!(BuiltinKind::parse_optional("Unknown"), None);
    }

    #[test]
    fn test_from_str_case_insensitive() {
        assert_eq!(
            BuiltinKind::from_str_case_insensitive("deployment"),
            Some(BuiltinKind::Deployment)
        );
        assert_eq!(
            BuiltinKind::from_str_case_insensitive("svc"),
            Some(BuiltinKind::Service)
        );
        assert_eq!(
            BuiltinKind::from_str_case_insensitive("pvc"),
            Some(BuiltinKind::PersistentVolumeClaim)
        );
        assert_eq!(BuiltinKind::from_str_case_insensitive("widget"), None);
    }

    #[test]
    fn test_group_and_plural() {
        assert_eq!(BuiltinKind::Deployment.group(), "apps");
        assert_eq!(BuiltinKind::Service.group(), "");
        assert_eq!(BuiltinKind::Ingress.group(), "networking.k8s.io");
        assert_eq!(BuiltinKind::Ingress.plural(), "ingresses");
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", BuiltinKind::StatefulSet), "StatefulSet");
    }
}
