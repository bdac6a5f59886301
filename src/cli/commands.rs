//! CLI subcommand handlers

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde_json::Value;

use crate::config::{Config, ConfigLoader, paths};
use crate::models::BuiltinKind;
use crate::resolve::{ExternalValues, MemoryFetchCache};
use crate::schema::{SchemaEntry, SchemaLoader, catalog};
use crate::services::Composer;
use crate::store::KubeResourceStore;

/// Output format for composed objects
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
}

/// Parameters of the `resolve` subcommand
pub struct ResolveRequest {
    /// Schema name (catalog or loaded manifest) or a manifest file path
    pub schema: String,
    /// Instance name
    pub name: String,
    /// Namespace override; falls back to the configured default
    pub namespace: Option<String>,
    /// `key=value` pairs for external fields
    pub externals: Vec<String>,
    /// Related kinds to enrich with; empty string means the configured set
    pub enrich: Option<String>,
    pub output: OutputFormat,
}

/// Resolve a logical object and print it
pub async fn handle_resolve(request: ResolveRequest) -> Result<()> {
    let config = ConfigLoader::load().context("Failed to load configuration")?;

    let entry = find_schema(&config, &request.schema)?;

    // Namespace precedence: flag, then kubeconfig context, then config
    let kubeconfig_namespace = match request.namespace {
        Some(_) => None,
        None => crate::store::client::get_default_namespace().await,
    };
    let namespace = request
        .namespace
        .as_deref()
        .or(kubeconfig_namespace.as_deref())
        .unwrap_or(&config.default_namespace);
    let target = entry
        .target(namespace, &request.name)
        .context("Failed to build resolution target")?;

    let externals = parse_externals(&request.externals)?;

    let store = Arc::new(KubeResourceStore::from_env().await?);
    let mut composer = Composer::new(store);
    if config.cache_ttl_seconds > 0 {
        composer = composer.with_cache(Arc::new(MemoryFetchCache::new(Duration::from_secs(
            config.cache_ttl_seconds,
        ))));
    }

    let mut composed = composer
        .resolve_with_externals(&target, &entry.schema, Some(&externals))
        .await
        .with_context(|| format!("Failed to resolve {} {}/{}", entry.name, namespace, request.name))?;

    if let Some(kinds) = &request.enrich {
        let related = parse_enrich_kinds(&config, kinds)?;
        composed = composer
            .enrich(&target, &composed, &related)
            .await
            .context("Failed to enrich composed object")?;
    }

    print_value(&composed, request.output)
}

/// List available schemas (catalog plus loaded manifests)
pub fn handle_schema_list() -> Result<()> {
    let config = ConfigLoader::load().context("Failed to load configuration")?;

    println!("Built-in schemas:");
    for entry in catalog::builtin_schemas() {
        print_entry_line(&entry);
    }

    let loaded = load_manifest_schemas(&config)?;
    if !loaded.is_empty() {
        println!("\nUser schemas:");
        for entry in &loaded {
            print_entry_line(entry);
        }
    }

    Ok(())
}

/// Print one schema in full
pub fn handle_schema_show(name: &str) -> Result<()> {
    let config = ConfigLoader::load().context("Failed to load configuration")?;
    let entry = find_schema(&config, name)?;
    let yaml = serde_yaml::to_string(&entry).context("Failed to serialize schema")?;
    print!("{}", yaml);
    Ok(())
}

fn print_entry_line(entry: &SchemaEntry) {
    match &entry.description {
        Some(description) => println!("  - {} ({})", entry.name, description),
        None => println!("  - {}", entry.name),
    }
}

/// Resolve a schema argument: explicit file path, catalog name, or a
/// name from the configured schema directories
fn find_schema(config: &Config, schema: &str) -> Result<SchemaEntry> {
    let path = Path::new(schema);
    if path.is_file() {
        return SchemaLoader::load_file(path);
    }

    if let Some(entry) = catalog::find(schema) {
        return Ok(entry);
    }

    let loaded = load_manifest_schemas(config)?;
    loaded
        .into_iter()
        .find(|e| e.name == schema)
        .ok_or_else(|| anyhow::anyhow!("Unknown schema: {}", schema))
}

fn load_manifest_schemas(config: &Config) -> Result<Vec<SchemaEntry>> {
    let mut dirs = vec![paths::user_schemas_dir()];
    dirs.extend(config.schema_dirs.iter().cloned());
    SchemaLoader::new(dirs).load_all()
}

/// Parse `key=value` external pairs; values holding valid JSON are kept
/// structured, anything else becomes a string
fn parse_externals(pairs: &[String]) -> Result<ExternalValues> {
    let mut externals = ExternalValues::new();
    for pair in pairs {
        let (key, raw) = pair
            .split_once('=')
            .with_context(|| format!("Invalid external '{}', expected key=value", pair))?;
        let value = serde_json::from_str::<Value>(raw)
            .unwrap_or_else(|_| Value::String(raw.to_string()));
        externals.insert(key.to_string(), value);
    }
    Ok(externals)
}

fn parse_enrich_kinds(config: &Config, kinds: &str) -> Result<Vec<BuiltinKind>> {
    let names: Vec<&str> = if kinds.is_empty() {
        config.enrich.kinds.iter().map(|s| s.as_str()).collect()
    } else {
        kinds.split(',').map(|s| s.trim()).collect()
    };

    names
        .into_iter()
        .filter(|s| !s.is_empty())
        .map(|name| {
            BuiltinKind::from_str_case_insensitive(name).with_context(|| {
                let known: Vec<&str> = BuiltinKind::all().iter().map(|k| k.as_str()).collect();
                format!(
                    "Unknown related kind: {} (expected one of: {})",
                    name,
                    known.join(", ")
                )
            })
        })
        .collect()
}

fn print_value(value: &Value, output: OutputFormat) -> Result<()> {
    match output {
        OutputFormat::Json => {
            let json =
                serde_json::to_string_pretty(value).context("Failed to serialize output")?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let yaml = serde_yaml::to_string(value).context("Failed to serialize output")?;
            print!("{}", yaml);
        }
    }
    Ok(())
}
