//! Schema manifest loader
//!
//! Scans schema directories for YAML manifests and loads them with
//! conflict detection. A manifest that fails to parse is logged and
//! skipped so one broken file does not take down the rest.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::SchemaEntry;
use super::manifest::SchemaManifest;

/// Schema manifest loader
pub struct SchemaLoader {
    dirs: Vec<PathBuf>,
}

impl SchemaLoader {
    /// Create a loader over the given directories (searched in order)
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        Self { dirs }
    }

    /// Load all enabled schemas from every configured directory
    pub fn load_all(&self) -> Result<Vec<SchemaEntry>> {
        let mut entries = Vec::new();

        for dir in &self.dirs {
            if !dir.exists() {
                tracing::debug!("Schema directory does not exist: {:?}", dir);
                continue;
            }
            self.load_dir(dir, &mut entries)?;
        }

        self.check_conflicts(&entries)?;
        Ok(entries)
    }

    /// Load a single schema manifest file (the enabled flag is ignored
    /// for explicitly named files)
    pub fn load_file(path: &Path) -> Result<SchemaEntry> {
        Self::read_manifest(path)?
            .into_entry()
            .with_context(|| format!("Invalid schema manifest: {}", path.display()))
    }

    fn read_manifest(path: &Path) -> Result<SchemaManifest> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read schema manifest: {}", path.display()))?;
        SchemaManifest::from_yaml(&contents)
            .with_context(|| format!("Failed to parse schema manifest: {}", path.display()))
    }

    fn load_dir(&self, dir: &Path, entries: &mut Vec<SchemaEntry>) -> Result<()> {
        tracing::debug!("Loading schemas from: {:?}", dir);

        for entry in
            std::fs::read_dir(dir).with_context(|| format!("Failed to read {}", dir.display()))?
        {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if !path.is_file() {
                continue;
            }
            let extension = path.extension().and_then(|e| e.to_str());
            if extension != Some("yaml") && extension != Some("yml") {
                continue;
            }

            let manifest = match Self::read_manifest(&path) {
                Ok(manifest) => manifest,
                Err(e) => {
                    tracing::warn!("Skipping schema {:?}: {}", path, e);
                    continue;
                }
            };
            if !manifest.enabled {
                tracing::info!("Schema {} is disabled", manifest.name);
                continue;
            }

            match manifest.into_entry() {
                Ok(schema) => {
                    tracing::info!("Loaded schema: {}", schema.name);
                    entries.push(schema);
                }
                Err(e) => {
                    tracing::warn!("Skipping schema {:?}: {}", path, e);
                }
            }
        }

        Ok(())
    }

    fn check_conflicts(&self, entries: &[SchemaEntry]) -> Result<()> {
        let mut seen = HashSet::new();
        for entry in entries {
            if !seen.insert(entry.name.as_str()) {
                anyhow::bail!("Duplicate schema name: {}", entry.name);
            }
        }
        Ok(())
    }
}
