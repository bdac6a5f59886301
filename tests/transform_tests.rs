//! Field transform layer tests

use resbridge::ComposeError;
use resbridge::schema::Transform;
use resbridge::schema::transform::apply;
use serde_json::json;

#[test]
fn test_base64_round_trip() {
    // base64("hello")
    let out = apply("password", Some(json!("aGVsbG8=")), &[Transform::Base64Utf8]).unwrap();
    assert_eq!(out, Some(json!("hello")));
}

#[test]
fn test_base64_failure_names_the_field() {
    let err = apply("password", Some(json!("%%%")), &[Transform::Base64Utf8]).unwrap_err();
    match err {
        ComposeError::Transform { field, raw, .. } => {
            assert_eq!(field, "password");
            assert!(raw.contains("%%%"));
        }
        other => panic!("expected a transform error, got {:?}", other),
    }
}

#[test]
fn test_base64_non_string_input_fails() {
    let err = apply("password", Some(json!(42)), &[Transform::Base64Utf8]).unwrap_err();
    assert!(matches!(err, ComposeError::Transform { field, .. } if field == "password"));
}

#[test]
fn test_numeric_coercion() {
    assert_eq!(
        apply("replicas", Some(json!("3")), &[Transform::Number]).unwrap(),
        Some(json!(3))
    );
    assert_eq!(
        apply("replicas", Some(json!(7)), &[Transform::Number]).unwrap(),
        Some(json!(7))
    );
    assert_eq!(
        apply("load", Some(json!("0.5")), &[Transform::Number]).unwrap(),
        Some(json!(0.5))
    );
    assert!(apply("replicas", Some(json!("many")), &[Transform::Number]).is_err());
}

#[test]
fn test_ports_reshaping() {
    let raw = json!([
        {"containerPort": 3000, "protocol": "TCP"},
        {"containerPort": 9090, "name": "metrics"}
    ]);
    let out = apply("ports", Some(raw), &[Transform::Ports]).unwrap();
    assert_eq!(
        out,
        Some(json!([
            {"number": 3000, "protocol": "TCP"},
            {"number": 9090, "name": "metrics"}
        ]))
    );
}

#[test]
fn test_ports_accepts_service_style_entries() {
    let raw = json!([{"port": 5432}]);
    let out = apply("ports", Some(raw), &[Transform::Ports]).unwrap();
    assert_eq!(out, Some(json!([{"number": 5432}])));
}

#[test]
fn test_ports_entry_without_number_fails() {
    let err = apply("ports", Some(json!([{"name": "web"}])), &[Transform::Ports]).unwrap_err();
    assert!(matches!(err, ComposeError::Transform { field, .. } if field == "ports"));
}

#[test]
fn test_json_round_trip() {
    let parsed = apply(
        "policy",
        Some(json!("{\"compatibility\":\"s3\"}")),
        &[Transform::JsonParse],
    )
    .unwrap();
    assert_eq!(parsed, Some(json!({"compatibility": "s3"})));

    let text = apply(
        "policy",
        Some(json!({"compatibility": "s3"})),
        &[Transform::JsonStringify],
    )
    .unwrap();
    assert_eq!(text, Some(json!("{\"compatibility\":\"s3\"}")));
}

#[test]
fn test_json_parse_failure() {
    let err = apply("policy", Some(json!("{oops")), &[Transform::JsonParse]).unwrap_err();
    assert!(matches!(err, ComposeError::Transform { field, .. } if field == "policy"));
}

#[test]
fn test_timestamp_formatting() {
    let out = apply(
        "createdAt",
        Some(json!("2026-03-14T09:26:53Z")),
        &[Transform::Timestamp],
    )
    .unwrap();
    assert_eq!(out, Some(json!("2026-03-14 09:26:53 UTC")));

    assert!(apply("createdAt", Some(json!("yesterday")), &[Transform::Timestamp]).is_err());
}

#[test]
fn test_flatten_one_level() {
    let out = apply(
        "addresses",
        Some(json!([["10.0.0.1"], ["10.0.0.2", "10.0.0.3"], "10.0.0.4"])),
        &[Transform::Flatten],
    )
    .unwrap();
    assert_eq!(
        out,
        Some(json!(["10.0.0.1", "10.0.0.2", "10.0.0.3", "10.0.0.4"]))
    );
}

#[test]
fn test_default_substitution_on_absent() {
    let default = json!({"compatibility": "s3", "resources": []});
    let out = apply(
        "policy",
        None,
        &[Transform::JsonParse, Transform::Default(default.clone())],
    )
    .unwrap();
    assert_eq!(out, Some(default));
}

#[test]
fn test_default_is_identity_on_present() {
    let out = apply(
        "replicas",
        Some(json!(5)),
        &[Transform::Number, Transform::Default(json!(1))],
    )
    .unwrap();
    assert_eq!(out, Some(json!(5)));
}

#[test]
fn test_absent_without_default_stays_absent() {
    assert_eq!(apply("phase", None, &[]).unwrap(), None);
}
