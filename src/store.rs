// DocumentStore trait - the document-store collaborator interface
//
// Every operation in this crate talks to the store through this trait, which
// enables testing the migration machinery against an in-memory fake instead
// of a live cluster.
use crate::document::{BulkAction, Document};
use crate::metadata::IndexMetadata;
use anyhow::Result;
use serde_json::Value;
use std::collections::BTreeMap;

/// One entry of an alias-registry update. A `move` cutover sends a Remove and
/// an Add in the same `update_aliases` call so the alias never resolves to
/// nothing in between.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AliasAction {
    Add { alias: String, index: String },
    Remove { alias: String, index: String },
}

/// The set of document-store calls used by the migration machinery.
///
/// Absence is typed, not stringly: `resolve_alias` returns `None` for a name
/// that is not an alias, which is the one NotFound case recovered locally
/// (`move` falling back to `bind`). Request failures are plain errors and are
/// never retried here.
#[allow(async_fn_in_trait)]
pub trait DocumentStore {
    /// Create an index with the given settings and mappings.
    async fn create_index(&self, name: &str, meta: &IndexMetadata) -> Result<()>;

    /// Fetch the settings of an existing index.
    async fn get_settings(&self, name: &str) -> Result<BTreeMap<String, Value>>;

    /// Fetch the field mappings of an existing index.
    async fn get_mappings(&self, name: &str) -> Result<BTreeMap<String, Value>>;

    /// Delete an index. Irreversible.
    async fn delete_index(&self, name: &str) -> Result<()>;

    /// Force a refresh so prior writes are visible to searches.
    async fn refresh(&self, name: &str) -> Result<()>;

    /// Count all documents in an index (match-all).
    async fn count(&self, name: &str) -> Result<u64>;

    /// Fetch one match-all page of documents with offset pagination. Page
    /// ordering is whatever the store returns.
    async fn search(&self, name: &str, size: usize, from: u64) -> Result<Vec<Document>>;

    /// Issue one bulk write. Fails if the store rejects any action in it.
    async fn bulk(&self, actions: &[BulkAction]) -> Result<()>;

    /// Apply alias-registry actions atomically in a single call.
    async fn update_aliases(&self, actions: &[AliasAction]) -> Result<()>;

    /// Resolve an alias to its concrete index, or `None` if the name is not
    /// an alias.
    async fn resolve_alias(&self, name: &str) -> Result<Option<String>>;

    /// Enumerate all currently bound (alias, index) pairs.
    async fn list_aliases(&self) -> Result<Vec<(String, String)>>;
}
