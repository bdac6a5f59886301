//! Path extraction from fetched resources
//!
//! Walks a dotted access path through a JSON resource. Numeric segments
//! index arrays. A JSON null at the end of the path counts as absent so
//! optionality and default substitution see one kind of "missing".

use serde_json::Value;

/// Extract the value at `path`, cloning it out of the resource
pub fn extract_path(resource: &Value, path: &[String]) -> Option<Value> {
    let mut current = resource;

    for segment in path {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => {
                let index: usize = segment.parse().ok()?;
                items.get(index)?
            }
            _ => return None,
        };
    }

    if current.is_null() {
        None
    } else {
        Some(current.clone())
    }
}

/// Join path segments into the dotted display form used in errors and
/// external-value keys
pub fn dotted(path: &[String]) -> String {
    path.join(".")
}
