// Index metadata snapshots: fetch, create, copy, and file round-trip
use crate::constants;
use crate::store::DocumentStore;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// A portable snapshot of an index's configuration: its settings and field
/// mappings, with environment-generated keys stripped so the snapshot can be
/// reapplied without colliding with the source index's identity.
///
/// Backed by `BTreeMap` so snapshot files serialize with deterministic key
/// order, suitable for diffing and version control.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexMetadata {
    pub settings: BTreeMap<String, Value>,
    pub mappings: BTreeMap<String, Value>,
}

impl IndexMetadata {
    pub fn new(settings: BTreeMap<String, Value>, mappings: BTreeMap<String, Value>) -> Self {
        Self { settings, mappings }
    }
}

/// Removes store-generated keys from a settings map, both in the flat
/// `index.uuid` form and nested under an `index` object.
pub fn strip_environment_keys(settings: &mut BTreeMap<String, Value>) {
    for key in constants::ENVIRONMENT_SETTINGS_KEYS {
        settings.remove(&format!("index.{}", key));
        if let Some(Value::Object(index)) = settings.get_mut("index") {
            index.remove(*key);
        }
    }
}

/// Fetches the metadata snapshot of an index. Aliases are resolved to their
/// concrete index first, so snapshotting an alias snapshots whatever it
/// currently points at.
pub async fn get_metadata<S: DocumentStore>(store: &S, name: &str) -> Result<IndexMetadata> {
    let index = store
        .resolve_alias(name)
        .await?
        .unwrap_or_else(|| name.to_string());

    let mut settings = store
        .get_settings(&index)
        .await
        .with_context(|| format!("failed to fetch settings of '{}'", index))?;
    let mappings = store
        .get_mappings(&index)
        .await
        .with_context(|| format!("failed to fetch mappings of '{}'", index))?;

    strip_environment_keys(&mut settings);
    Ok(IndexMetadata::new(settings, mappings))
}

/// Creates an index from a metadata snapshot and refreshes it so it is
/// immediately searchable and writable. Must complete before any document
/// copy targets the index.
pub async fn put_metadata<S: DocumentStore>(
    store: &S,
    index: &str,
    meta: &IndexMetadata,
) -> Result<()> {
    store
        .create_index(index, meta)
        .await
        .with_context(|| format!("failed to create index '{}'", index))?;
    store.refresh(index).await?;
    Ok(())
}

/// Copies the metadata snapshot of `src` into a newly created `dest`.
pub async fn copy_metadata<S: DocumentStore>(store: &S, src: &str, dest: &str) -> Result<()> {
    let meta = get_metadata(store, src).await?;
    put_metadata(store, dest, &meta).await
}

/// Writes a snapshot to a JSON file with sorted keys and stable indentation.
pub fn write_snapshot(path: impl AsRef<Path>, meta: &IndexMetadata) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)
        .with_context(|| format!("failed to create snapshot file {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), meta)
        .with_context(|| format!("failed to write snapshot to {}", path.display()))?;
    Ok(())
}

/// Reads a snapshot back from a JSON file.
pub fn read_snapshot(path: impl AsRef<Path>) -> Result<IndexMetadata> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("failed to open snapshot file {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("invalid snapshot file {}", path.display()))
}
