//! Query descriptor dialect tests
//!
//! The JSON metadata dialect must accept both the single-descriptor read
//! form and the array form used by the mutation-description dialect, and
//! must fail loudly on configuration bugs.

use resbridge::ComposeError;
use resbridge::schema::{ParsedQuery, interpolate, parse, parse_single};

#[test]
fn test_parse_single_object() {
    let parsed = parse(r#"{"resourceType": "devbox", "path": "spec.image"}"#).unwrap();
    match parsed {
        ParsedQuery::Single(descriptor) => {
            assert_eq!(descriptor.resource_type, "devbox");
            assert_eq!(descriptor.path, vec!["spec", "image"]);
            assert!(descriptor.label.is_none());
            assert!(descriptor.name_pattern.is_none());
        }
        ParsedQuery::Multi(_) => panic!("expected a single descriptor"),
    }
}

#[test]
fn test_resource_kind_alias_and_segment_path() {
    let descriptor = parse_single(
        r#"{"resourceKind": "secret", "path": ["data", "password"], "name": "^{{name}}-auth$"}"#,
    )
    .unwrap();
    assert_eq!(descriptor.resource_type, "secret");
    assert_eq!(descriptor.path, vec!["data", "password"]);
    assert_eq!(descriptor.name_pattern.as_deref(), Some("^{{name}}-auth$"));
}

#[test]
fn test_parse_array_dialect() {
    let parsed = parse(
        r#"[
            {"resourceType": "deployment", "path": "spec.replicas"},
            {"resourceType": "statefulset", "path": "spec.replicas"}
        ]"#,
    )
    .unwrap();
    match parsed {
        ParsedQuery::Multi(descriptors) => {
            assert_eq!(descriptors.len(), 2);
            assert_eq!(descriptors[0].resource_type, "deployment");
            assert_eq!(descriptors[1].resource_type, "statefulset");
        }
        ParsedQuery::Single(_) => panic!("expected the array dialect"),
    }
}

#[test]
fn test_label_descriptor() {
    let descriptor = parse_single(r#"{"resourceType": "pod", "label": "app"}"#).unwrap();
    assert_eq!(descriptor.label.as_deref(), Some("app"));
    assert!(descriptor.is_list());
    assert!(descriptor.path.is_empty());
}

#[test]
fn test_invalid_json_is_malformed() {
    let err = parse("{not json").unwrap_err();
    assert!(matches!(err, ComposeError::MalformedDescriptor(_)));
}

#[test]
fn test_missing_resource_type_is_malformed() {
    let err = parse(r#"{"path": "spec.image"}"#).unwrap_err();
    assert!(matches!(err, ComposeError::MalformedDescriptor(_)));
}

#[test]
fn test_label_and_name_are_exclusive() {
    let err = parse(r#"{"resourceType": "pod", "label": "app", "name": "^x$"}"#).unwrap_err();
    assert!(matches!(err, ComposeError::MalformedDescriptor(_)));
}

#[test]
fn test_scalar_input_is_malformed() {
    let err = parse(r#""just a string""#).unwrap_err();
    assert!(matches!(err, ComposeError::MalformedDescriptor(_)));
}

#[test]
fn test_unknown_keys_tolerated() {
    let descriptor = parse_single(
        r#"{"resourceType": "devbox", "path": "spec.image", "mutation": "replace"}"#,
    )
    .unwrap();
    assert_eq!(descriptor.resource_type, "devbox");
}

#[test]
fn test_parse_single_rejects_array() {
    let err = parse_single(r#"[{"resourceType": "devbox"}]"#).unwrap_err();
    assert!(matches!(err, ComposeError::MalformedDescriptor(_)));
}

#[test]
fn test_interpolation_before_matching() {
    let vars = [("name", "box-a")].into_iter().collect();
    assert_eq!(interpolate("^{{name}}-auth$", &vars), "^box-a-auth$");
    assert_eq!(interpolate("no placeholders", &vars), "no placeholders");
}
