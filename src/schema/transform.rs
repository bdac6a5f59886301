//! Field transform layer
//!
//! Per-field validation and coercion applied after raw extraction. Pure:
//! one call per leaf field, no I/O. Failures carry the field name and
//! the offending raw value so composed objects stay debuggable - a bad
//! value is never silently swallowed into an empty string.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::{ComposeError, ComposeResult};

/// Built-in transform kinds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Transform {
    /// Decode a base64 string into UTF-8 text (secret values)
    Base64Utf8,
    /// Coerce a string or number into a JSON number
    Number,
    /// Reshape container port objects into `{number, name?, protocol?}` records
    Ports,
    /// Parse a string holding embedded JSON (annotation blobs)
    JsonParse,
    /// Serialize any value into its JSON text
    JsonStringify,
    /// Normalize an RFC3339 timestamp into `YYYY-MM-DD HH:MM:SS UTC`
    Timestamp,
    /// Flatten one level of nested arrays
    Flatten,
    /// Substitute this value when the extracted value is absent;
    /// identity otherwise
    Default(Value),
}

/// Apply a transform chain to an extracted value
///
/// `value` is `None` when the field's path matched nothing. In that case
/// the first `Default` in the chain supplies the value; without one the
/// absence is returned for the resolver to judge against the field's
/// optionality.
pub fn apply(
    field: &str,
    value: Option<Value>,
    transforms: &[Transform],
) -> ComposeResult<Option<Value>> {
    let mut current = match value {
        Some(v) => v,
        None => match default_of(transforms) {
            Some(default) => return Ok(Some(default)),
            None => return Ok(None),
        },
    };

    for transform in transforms {
        let raw = current_repr(&current);
        current = apply_one(current, transform)
            .map_err(|reason| transform_error(field, &raw, reason))?;
    }

    Ok(Some(current))
}

fn default_of(transforms: &[Transform]) -> Option<Value> {
    transforms.iter().find_map(|t| match t {
        Transform::Default(v) => Some(v.clone()),
        _ => None,
    })
}

fn apply_one(value: Value, transform: &Transform) -> Result<Value, String> {
    match transform {
        Transform::Base64Utf8 => {
            let encoded = value
                .as_str()
                .ok_or_else(|| "base64 input must be a string".to_string())?;
            let bytes = BASE64
                .decode(encoded)
                .map_err(|e| format!("invalid base64: {}", e))?;
            let text =
                String::from_utf8(bytes).map_err(|e| format!("decoded bytes are not UTF-8: {}", e))?;
            Ok(Value::String(text))
        }
        Transform::Number => coerce_number(value),
        Transform::Ports => reshape_ports(value),
        Transform::JsonParse => {
            let raw = value
                .as_str()
                .ok_or_else(|| "JSON parse input must be a string".to_string())?;
            serde_json::from_str(raw).map_err(|e| format!("embedded JSON is invalid: {}", e))
        }
        Transform::JsonStringify => {
            let text = serde_json::to_string(&value)
                .map_err(|e| format!("value is not serializable: {}", e))?;
            Ok(Value::String(text))
        }
        Transform::Timestamp => {
            let raw = value
                .as_str()
                .ok_or_else(|| "timestamp input must be a string".to_string())?;
            let parsed = DateTime::parse_from_rfc3339(raw)
                .map_err(|e| format!("not an RFC3339 timestamp: {}", e))?;
            Ok(Value::String(
                parsed
                    .with_timezone(&Utc)
                    .format("%Y-%m-%d %H:%M:%S UTC")
                    .to_string(),
            ))
        }
        Transform::Flatten => {
            let items = value
                .as_array()
                .ok_or_else(|| "flatten input must be an array".to_string())?;
            let mut out = Vec::new();
            for item in items {
                match item {
                    Value::Array(inner) => out.extend(inner.iter().cloned()),
                    other => out.push(other.clone()),
                }
            }
            Ok(Value::Array(out))
        }
        // Absence was handled before the chain ran
        Transform::Default(_) => Ok(value),
    }
}

fn coerce_number(value: Value) -> Result<Value, String> {
    match value {
        Value::Number(n) => Ok(Value::Number(n)),
        Value::String(s) => {
            if let Ok(i) = s.parse::<i64>() {
                return Ok(json!(i));
            }
            s.parse::<f64>()
                .map_err(|_| format!("'{}' is not a number", s))
                .and_then(|f| {
                    serde_json::Number::from_f64(f)
                        .map(Value::Number)
                        .ok_or_else(|| format!("'{}' is not a finite number", s))
                })
        }
        other => Err(format!("cannot coerce {} to a number", type_name(&other))),
    }
}

/// Reshape a list of container port objects into `{number}` records,
/// preserving name and protocol when present
fn reshape_ports(value: Value) -> Result<Value, String> {
    let items = value
        .as_array()
        .ok_or_else(|| "ports input must be an array".to_string())?;

    let mut out = Vec::with_capacity(items.len());
    for item in items {
        let number = item
            .get("containerPort")
            .or_else(|| item.get("port"))
            .and_then(|p| p.as_i64())
            .ok_or_else(|| "port entry has no containerPort/port number".to_string())?;

        let mut entry = serde_json::Map::new();
        entry.insert("number".to_string(), json!(number));
        if let Some(name) = item.get("name").and_then(|n| n.as_str()) {
            entry.insert("name".to_string(), json!(name));
        }
        if let Some(protocol) = item.get("protocol").and_then(|p| p.as_str()) {
            entry.insert("protocol".to_string(), json!(protocol));
        }
        out.push(Value::Object(entry));
    }

    Ok(Value::Array(out))
}

fn transform_error(field: &str, raw: &str, reason: String) -> ComposeError {
    ComposeError::Transform {
        field: field.to_string(),
        reason,
        raw: raw.to_string(),
    }
}

fn current_repr(value: &Value) -> String {
    let repr = value.to_string();
    // Keep error messages readable for large blobs
    if repr.chars().count() > 120 {
        let truncated: String = repr.chars().take(120).collect();
        format!("{}...", truncated)
    } else {
        repr
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
