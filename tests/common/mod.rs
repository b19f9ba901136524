#![allow(dead_code)]

use anyhow::{bail, Result};
use indexmig::{AliasAction, BulkAction, Document, DocumentStore, IndexMetadata};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Mutex;

/// In-memory document store for exercising the migration machinery without a
/// live cluster. Records every mutating call so tests can assert on atomicity
/// and on "no mutation happened" properties.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    indexes: BTreeMap<String, IndexEntry>,
    aliases: BTreeMap<String, String>,
    mutations: u64,
    alias_calls: Vec<Vec<AliasAction>>,
    bulk_sizes: Vec<usize>,
}

#[derive(Default, Clone)]
struct IndexEntry {
    metadata: IndexMetadata,
    docs: BTreeMap<String, Document>,
}

impl Inner {
    fn concrete(&self, name: &str) -> Result<String> {
        if let Some(index) = self.aliases.get(name) {
            return Ok(index.clone());
        }
        if self.indexes.contains_key(name) {
            return Ok(name.to_string());
        }
        bail!("no such index: {}", name);
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an index with documents directly, bypassing call recording.
    pub fn seed_index(&self, name: &str, meta: IndexMetadata, docs: Vec<Document>) {
        let mut inner = self.inner.lock().unwrap();
        let entry = IndexEntry {
            metadata: meta,
            docs: docs.into_iter().map(|d| (d.id.clone(), d)).collect(),
        };
        inner.indexes.insert(name.to_string(), entry);
    }

    /// Inserts an alias binding directly, bypassing call recording.
    pub fn seed_alias(&self, alias: &str, index: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner
            .aliases
            .insert(alias.to_string(), index.to_string());
    }

    pub fn has_index(&self, name: &str) -> bool {
        self.inner.lock().unwrap().indexes.contains_key(name)
    }

    pub fn docs(&self, name: &str) -> Vec<Document> {
        let inner = self.inner.lock().unwrap();
        inner
            .indexes
            .get(name)
            .map(|entry| entry.docs.values().cloned().collect())
            .unwrap_or_default()
    }

    pub fn metadata(&self, name: &str) -> IndexMetadata {
        let inner = self.inner.lock().unwrap();
        inner
            .indexes
            .get(name)
            .map(|entry| entry.metadata.clone())
            .unwrap_or_default()
    }

    pub fn bound(&self, alias: &str) -> Option<String> {
        self.inner.lock().unwrap().aliases.get(alias).cloned()
    }

    /// Total number of mutating calls issued so far (create, delete, bulk,
    /// alias updates).
    pub fn mutation_count(&self) -> u64 {
        self.inner.lock().unwrap().mutations
    }

    /// Every `update_aliases` call, with the actions it carried.
    pub fn alias_calls(&self) -> Vec<Vec<AliasAction>> {
        self.inner.lock().unwrap().alias_calls.clone()
    }

    /// Size of each bulk write, in call order.
    pub fn bulk_sizes(&self) -> Vec<usize> {
        self.inner.lock().unwrap().bulk_sizes.clone()
    }
}

impl DocumentStore for MemoryStore {
    async fn create_index(&self, name: &str, meta: &IndexMetadata) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        if inner.indexes.contains_key(name) {
            bail!("index already exists: {}", name);
        }
        inner.mutations += 1;
        inner.indexes.insert(
            name.to_string(),
            IndexEntry {
                metadata: meta.clone(),
                docs: BTreeMap::new(),
            },
        );
        Ok(())
    }

    async fn get_settings(&self, name: &str) -> Result<BTreeMap<String, serde_json::Value>> {
        let inner = self.inner.lock().unwrap();
        let index = inner.concrete(name)?;
        Ok(inner.indexes[&index].metadata.settings.clone())
    }

    async fn get_mappings(&self, name: &str) -> Result<BTreeMap<String, serde_json::Value>> {
        let inner = self.inner.lock().unwrap();
        let index = inner.concrete(name)?;
        Ok(inner.indexes[&index].metadata.mappings.clone())
    }

    async fn delete_index(&self, name: &str) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        if inner.indexes.remove(name).is_none() {
            bail!("no such index: {}", name);
        }
        inner.mutations += 1;
        Ok(())
    }

    async fn refresh(&self, name: &str) -> Result<()> {
        let inner = self.inner.lock().unwrap();
        inner.concrete(name)?;
        Ok(())
    }

    async fn count(&self, name: &str) -> Result<u64> {
        let inner = self.inner.lock().unwrap();
        let index = inner.concrete(name)?;
        Ok(inner.indexes[&index].docs.len() as u64)
    }

    async fn search(&self, name: &str, size: usize, from: u64) -> Result<Vec<Document>> {
        let inner = self.inner.lock().unwrap();
        let index = inner.concrete(name)?;
        Ok(inner.indexes[&index]
            .docs
            .values()
            .skip(from as usize)
            .take(size)
            .cloned()
            .collect())
    }

    async fn bulk(&self, actions: &[BulkAction]) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.mutations += 1;
        inner.bulk_sizes.push(actions.len());
        for action in actions {
            let Some(entry) = inner.indexes.get_mut(&action.index) else {
                bail!("bulk write to missing index: {}", action.index);
            };
            entry.docs.insert(action.doc.id.clone(), action.doc.clone());
        }
        Ok(())
    }

    async fn update_aliases(&self, actions: &[AliasAction]) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.mutations += 1;
        inner.alias_calls.push(actions.to_vec());
        for action in actions {
            match action {
                AliasAction::Remove { alias, index } => {
                    if inner.aliases.get(alias) != Some(index) {
                        bail!("alias '{}' is not bound to '{}'", alias, index);
                    }
                    inner.aliases.remove(alias);
                }
                AliasAction::Add { alias, index } => {
                    if !inner.indexes.contains_key(index) {
                        bail!("cannot alias missing index: {}", index);
                    }
                    inner.aliases.insert(alias.clone(), index.clone());
                }
            }
        }
        Ok(())
    }

    async fn resolve_alias(&self, name: &str) -> Result<Option<String>> {
        Ok(self.inner.lock().unwrap().aliases.get(name).cloned())
    }

    async fn list_aliases(&self) -> Result<Vec<(String, String)>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .aliases
            .iter()
            .map(|(alias, index)| (alias.clone(), index.clone()))
            .collect())
    }
}

/// Metadata with one keyword field, enough to tell snapshots apart.
pub fn simple_meta(field: &str) -> IndexMetadata {
    let mut settings = BTreeMap::new();
    settings.insert("index".to_string(), json!({"number_of_shards": "1"}));
    let mut mappings = BTreeMap::new();
    mappings.insert(
        "properties".to_string(),
        json!({field: {"type": "keyword"}}),
    );
    IndexMetadata::new(settings, mappings)
}

/// Documents doc_000 .. doc_(n-1) with a numeric payload.
pub fn make_docs(n: usize) -> Vec<Document> {
    (0..n)
        .map(|i| {
            Document::new(
                format!("doc_{:03}", i),
                json!({"qty": i, "name": format!("item {}", i)}),
            )
        })
        .collect()
}
