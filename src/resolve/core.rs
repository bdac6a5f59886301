//! Object resolver core
//!
//! Resolution runs in phases: walk the schema collecting bindings, plan
//! and deduplicate the store calls they need, issue all distinct fetches
//! as one concurrent round, then extract, transform and assign field by
//! field. Extraction starts only after every fetch has settled, so the
//! composed object is built without any completion-order dependence.
//! Partial objects are never returned - any resolution error aborts the
//! whole call.

use std::collections::HashMap;

use futures::future::join_all;
use serde_json::{Map, Value};

use super::cache::FetchCache;
use super::extract::{dotted, extract_path};
use super::plan::{FetchKey, FetchPlan, Fetched, plan_for};
use crate::error::{ComposeError, ComposeResult};
use crate::models::ResourceTarget;
use crate::schema::composite::{CompositeSchema, FieldSchema, FieldSpec};
use crate::schema::descriptor::QueryDescriptor;
use crate::schema::transform;
use crate::store::ResourceStore;

/// Caller-supplied values for `external` fields, keyed by dotted output path
pub type ExternalValues = HashMap<String, Value>;

/// Resolve a composite schema against a target into a composed object
pub async fn resolve_object(
    store: &dyn ResourceStore,
    target: &ResourceTarget,
    schema: &CompositeSchema,
    externals: Option<&ExternalValues>,
) -> ComposeResult<Value> {
    resolve_inner(store, target, schema, externals, None).await
}

/// Resolve with a pluggable cross-call fetch cache consulted before the
/// store; in-call deduplication happens regardless
pub async fn resolve_object_with_cache(
    store: &dyn ResourceStore,
    target: &ResourceTarget,
    schema: &CompositeSchema,
    externals: Option<&ExternalValues>,
    cache: &dyn FetchCache,
) -> ComposeResult<Value> {
    resolve_inner(store, target, schema, externals, Some(cache)).await
}

/// One output field's contribution to the fetch round
enum Binding<'a> {
    /// Value supplied by the caller, space reserved in the output
    External { out: Vec<String>, spec: &'a FieldSpec },
    /// Single leaf value
    Leaf {
        out: Vec<String>,
        spec: &'a FieldSpec,
        plan: FetchPlan,
    },
    /// List field: one shared fetch, the element schema applied per item
    List {
        out: Vec<String>,
        leaves: Vec<(Vec<String>, &'a FieldSpec)>,
        plan: FetchPlan,
    },
}

async fn resolve_inner(
    store: &dyn ResourceStore,
    target: &ResourceTarget,
    schema: &CompositeSchema,
    externals: Option<&ExternalValues>,
    cache: Option<&dyn FetchCache>,
) -> ComposeResult<Value> {
    let bindings = collect_bindings(schema, target)?;

    // Group by fetch key; first-appearance order keeps the round
    // deterministic
    let mut distinct: Vec<FetchKey> = Vec::new();
    for binding in &bindings {
        if let Some(key) = binding_key(binding) {
            if !distinct.contains(key) {
                distinct.push(key.clone());
            }
        }
    }

    tracing::debug!(
        "Resolving {} {}/{}: {} fields over {} distinct fetches",
        schema.root_type,
        target.namespace(),
        target.name(),
        bindings.len(),
        distinct.len()
    );

    let mut results: HashMap<FetchKey, Fetched> = HashMap::new();

    let mut to_fetch: Vec<FetchKey> = Vec::new();
    for key in &distinct {
        match cache {
            Some(cache) => match cache.lookup(key).await {
                Some(hit) => {
                    results.insert(key.clone(), hit);
                }
                None => to_fetch.push(key.clone()),
            },
            None => to_fetch.push(key.clone()),
        }
    }

    // Single concurrent round; no ordering assumed between fetches
    let fetched = join_all(to_fetch.iter().map(|key| fetch_one(store, target, key))).await;
    for (key, result) in to_fetch.iter().zip(fetched) {
        let value = result?;
        if let Some(cache) = cache {
            cache.store(key, &value).await;
        }
        results.insert(key.clone(), value);
    }

    // The primary target missing is fatal for the whole resolution
    if let Some(Fetched::Single(None)) = results.get(&FetchKey::Primary) {
        return Err(ComposeError::ResourceNotFound {
            kind: target.kind_name(),
            namespace: target.namespace().to_string(),
            name: target.name().to_string(),
        });
    }

    let mut output = Value::Object(Map::new());

    for binding in &bindings {
        match binding {
            Binding::External { out, spec } => {
                let field = dotted(out);
                let raw = externals.and_then(|values| values.get(&field)).cloned();
                let value = transform::apply(&field, raw, &spec.transforms)?;
                // Space is reserved even when the caller has not filled
                // the value yet
                insert_at(&mut output, out, value.unwrap_or(Value::Null));
            }
            Binding::Leaf { out, spec, plan } => {
                if let Some(value) = resolve_leaf(out, spec, plan, &results)? {
                    insert_at(&mut output, out, value);
                }
            }
            Binding::List { out, leaves, plan } => {
                let value = resolve_list(out, leaves, plan, &results)?;
                insert_at(&mut output, out, value);
            }
        }
    }

    Ok(output)
}

/// Walk the schema depth-first, planning the fetch for every leaf
fn collect_bindings<'a>(
    schema: &'a CompositeSchema,
    target: &ResourceTarget,
) -> ComposeResult<Vec<Binding<'a>>> {
    fn walk<'a>(
        fields: &'a std::collections::BTreeMap<String, FieldSchema>,
        prefix: &[String],
        root_type: &str,
        target: &ResourceTarget,
        out: &mut Vec<Binding<'a>>,
    ) -> ComposeResult<()> {
        for (name, field) in fields {
            let mut path = prefix.to_vec();
            path.push(name.clone());

            match field {
                FieldSchema::Leaf(spec) => {
                    match plan_for(&spec.query, root_type, target)? {
                        Some(plan) => out.push(Binding::Leaf {
                            out: path,
                            spec,
                            plan,
                        }),
                        None => out.push(Binding::External { out: path, spec }),
                    }
                }
                FieldSchema::Object(sub) => {
                    walk(sub, &path, root_type, target, out)?;
                }
                FieldSchema::List(element) => {
                    let mut leaves = Vec::new();
                    element_leaves(element, &[], &mut leaves)?;
                    let plan = list_plan(&path, &leaves, root_type, target)?;
                    out.push(Binding::List {
                        out: path,
                        leaves,
                        plan,
                    });
                }
            }
        }
        Ok(())
    }

    let mut bindings = Vec::new();
    walk(
        &schema.fields,
        &[],
        &schema.root_type,
        target,
        &mut bindings,
    )?;
    Ok(bindings)
}

/// Collect the leaves of a list element schema with their relative paths
fn element_leaves<'a>(
    schema: &'a FieldSchema,
    prefix: &[String],
    out: &mut Vec<(Vec<String>, &'a FieldSpec)>,
) -> ComposeResult<()> {
    match schema {
        FieldSchema::Leaf(spec) => {
            out.push((prefix.to_vec(), spec));
            Ok(())
        }
        FieldSchema::Object(fields) => {
            for (name, sub) in fields {
                let mut path = prefix.to_vec();
                path.push(name.clone());
                element_leaves(sub, &path, out)?;
            }
            Ok(())
        }
        FieldSchema::List(_) => Err(ComposeError::MalformedDescriptor(
            "nested list schemas are not supported".to_string(),
        )),
    }
}

/// All element leaves of a list field must agree on one list fetch
fn list_plan(
    out: &[String],
    leaves: &[(Vec<String>, &FieldSpec)],
    root_type: &str,
    target: &ResourceTarget,
) -> ComposeResult<FetchPlan> {
    let field = dotted(out);
    let mut shared: Option<FetchPlan> = None;

    for (_, spec) in leaves {
        let plan = plan_for(&spec.query, root_type, target)?.ok_or_else(|| {
            ComposeError::MalformedDescriptor(format!(
                "list field '{}' cannot contain external descriptors",
                field
            ))
        })?;
        if !matches!(plan.key, FetchKey::List { .. }) {
            return Err(ComposeError::MalformedDescriptor(format!(
                "list field '{}' requires label or name selection on every element descriptor",
                field
            )));
        }
        match &shared {
            None => shared = Some(plan),
            Some(existing) => {
                if existing.key != plan.key || existing.pattern() != plan.pattern() {
                    return Err(ComposeError::MalformedDescriptor(format!(
                        "list field '{}' mixes descriptors that resolve to different fetches",
                        field
                    )));
                }
            }
        }
    }

    shared.ok_or_else(|| {
        ComposeError::MalformedDescriptor(format!("list field '{}' has no element fields", field))
    })
}

fn binding_key<'a>(binding: &'a Binding<'_>) -> Option<&'a FetchKey> {
    match binding {
        Binding::External { .. } => None,
        Binding::Leaf { plan, .. } => Some(&plan.key),
        Binding::List { plan, .. } => Some(&plan.key),
    }
}

async fn fetch_one(
    store: &dyn ResourceStore,
    target: &ResourceTarget,
    key: &FetchKey,
) -> ComposeResult<Fetched> {
    match key {
        FetchKey::Primary => store
            .get(target)
            .await
            .map(Fetched::Single)
            .map_err(ComposeError::Store),
        FetchKey::Get {
            kind,
            namespace,
            name,
        } => {
            let secondary = ResourceTarget::builtin(*kind, namespace.clone(), name.clone())
                .map_err(ComposeError::Store)?;
            store
                .get(&secondary)
                .await
                .map(Fetched::Single)
                .map_err(ComposeError::Store)
        }
        FetchKey::List {
            kind,
            namespace,
            selector,
        } => store
            .list(namespace, *kind, selector.as_deref())
            .await
            .map(Fetched::Items)
            .map_err(ComposeError::Store),
    }
}

/// Resolve a leaf binding; `Ok(None)` means the optional field is absent
fn resolve_leaf(
    out: &[String],
    spec: &FieldSpec,
    plan: &FetchPlan,
    results: &HashMap<FetchKey, Fetched>,
) -> ComposeResult<Option<Value>> {
    let field = dotted(out);

    match results.get(&plan.key) {
        Some(Fetched::Single(Some(resource))) => {
            let raw = raw_value(resource, &spec.query);
            finish_scalar(&field, spec, raw)
        }
        Some(Fetched::Single(None)) => {
            // Secondary resource missing; the primary was checked earlier
            if spec.optional {
                Ok(None)
            } else {
                Err(not_found(&plan.key))
            }
        }
        Some(Fetched::Items(items)) => {
            let matching = filter_items(items, plan);

            if plan.name_regex.is_some() || spec.query.first {
                // Scalar expected: first item in store order wins
                match matching.first() {
                    Some(item) => {
                        let raw = raw_value(item, &spec.query);
                        finish_scalar(&field, spec, raw)
                    }
                    None if spec.optional => Ok(None),
                    None => Err(not_found(&plan.key)),
                }
            } else {
                let mut values = Vec::with_capacity(matching.len());
                for item in matching {
                    let raw = raw_value(item, &spec.query);
                    // Each element is transformed independently
                    if let Some(value) = transform::apply(&field, raw, &spec.transforms)? {
                        values.push(value);
                    } else if !spec.optional {
                        return Err(ComposeError::MissingField {
                            field: field.clone(),
                        });
                    }
                }
                Ok(Some(Value::Array(values)))
            }
        }
        None => Err(ComposeError::Store(anyhow::anyhow!(
            "fetch result missing for field '{}'",
            field
        ))),
    }
}

/// Resolve a list binding into an array of element objects
fn resolve_list(
    out: &[String],
    leaves: &[(Vec<String>, &FieldSpec)],
    plan: &FetchPlan,
    results: &HashMap<FetchKey, Fetched>,
) -> ComposeResult<Value> {
    let field = dotted(out);

    let items = match results.get(&plan.key) {
        Some(Fetched::Items(items)) => items,
        _ => {
            return Err(ComposeError::Store(anyhow::anyhow!(
                "fetch result missing for list field '{}'",
                field
            )));
        }
    };

    let mut elements = Vec::new();
    for item in filter_items(items, plan) {
        let mut element = Value::Object(Map::new());
        for (rel, spec) in leaves {
            let leaf_field = if rel.is_empty() {
                field.clone()
            } else {
                format!("{}.{}", field, dotted(rel))
            };
            let raw = raw_value(item, &spec.query);
            match transform::apply(&leaf_field, raw, &spec.transforms)? {
                Some(value) => insert_at(&mut element, rel, value),
                None if spec.optional => {}
                None => {
                    return Err(ComposeError::MissingField { field: leaf_field });
                }
            }
        }
        elements.push(element);
    }

    Ok(Value::Array(elements))
}

/// Extract a descriptor's raw value from one fetched resource. An
/// absent path means the resource's metadata as a whole.
fn raw_value(resource: &Value, query: &QueryDescriptor) -> Option<Value> {
    if query.path.is_empty() {
        resource
            .get("metadata")
            .cloned()
            .filter(|v| !v.is_null())
    } else {
        extract_path(resource, &query.path)
    }
}

fn filter_items<'a>(items: &'a [Value], plan: &FetchPlan) -> Vec<&'a Value> {
    match &plan.name_regex {
        Some(regex) => items
            .iter()
            .filter(|item| {
                item.get("metadata")
                    .and_then(|m| m.get("name"))
                    .and_then(|n| n.as_str())
                    .is_some_and(|name| regex.is_match(name))
            })
            .collect(),
        None => items.iter().collect(),
    }
}

fn finish_scalar(
    field: &str,
    spec: &FieldSpec,
    raw: Option<Value>,
) -> ComposeResult<Option<Value>> {
    match transform::apply(field, raw, &spec.transforms)? {
        Some(value) => Ok(Some(value)),
        None if spec.optional => Ok(None),
        None => Err(ComposeError::MissingField {
            field: field.to_string(),
        }),
    }
}

fn not_found(key: &FetchKey) -> ComposeError {
    match key {
        FetchKey::Primary => unreachable!("primary absence is handled before extraction"),
        FetchKey::Get {
            kind,
            namespace,
            name,
        } => ComposeError::ResourceNotFound {
            kind: kind.as_str().to_string(),
            namespace: namespace.clone(),
            name: name.clone(),
        },
        FetchKey::List {
            kind,
            namespace,
            selector,
        } => ComposeError::ResourceNotFound {
            kind: kind.as_str().to_string(),
            namespace: namespace.clone(),
            name: selector.clone().unwrap_or_else(|| "<name pattern>".to_string()),
        },
    }
}

/// Assign `value` at `path`, creating intermediate objects as needed.
/// An empty path replaces the node wholesale.
fn insert_at(obj: &mut Value, path: &[String], value: Value) {
    if path.is_empty() {
        *obj = value;
        return;
    }

    let mut current = obj;
    for segment in &path[..path.len() - 1] {
        if !current.is_object() {
            *current = Value::Object(Map::new());
        }
        current = current
            .as_object_mut()
            .expect("just ensured object")
            .entry(segment.clone())
            .or_insert_with(|| Value::Object(Map::new()));
    }

    if !current.is_object() {
        *current = Value::Object(Map::new());
    }
    current
        .as_object_mut()
        .expect("just ensured object")
        .insert(path[path.len() - 1].clone(), value);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_insert_at_creates_nesting() {
        let mut obj = Value::Object(Map::new());
        insert_at(
            &mut obj,
            &["connection".to_string(), "host".to_string()],
            json!("10.0.0.5"),
        );
        insert_at(
            &mut obj,
            &["connection".to_string(), "port".to_string()],
            json!(5432),
        );
        assert_eq!(
            obj,
            json!({"connection": {"host": "10.0.0.5", "port": 5432}})
        );
    }

    #[test]
    fn test_insert_at_empty_path_replaces() {
        let mut obj = Value::Object(Map::new());
        insert_at(&mut obj, &[], json!("whole"));
        assert_eq!(obj, json!("whole"));
    }
}
