// Migration step execution and bootstrap promotion (wrap)
use crate::alias;
use crate::copy::{copy_documents, Progress};
use crate::document::{BulkAction, Document};
use crate::metadata::{copy_metadata, put_metadata, IndexMetadata};
use crate::script::render_template;
use crate::store::DocumentStore;
use crate::transform::{DocumentTransform, FieldOps};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// One versioned transition for an alias: the destination index (as a
/// `{alias}`/`{date}` template), its metadata, an optional per-document
/// transform, and optional seed documents written verbatim after the copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MigrationStep {
    pub index_name: String,
    pub index_metadata: IndexMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<FieldOps>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub seed_documents: Vec<Document>,
}

/// Execution modes for a single step.
#[derive(Debug, Clone, Copy, Default)]
pub struct StepOptions {
    /// Create the destination index and seed it, but skip the document copy.
    pub create_only: bool,
    /// Do everything except the final alias cutover.
    pub dry_run: bool,
}

/// Executes one migration step for `alias`: create the destination from the
/// step's metadata, copy the alias's documents into it (unless create-only),
/// write seed documents, then atomically repoint the alias (unless dry-run).
///
/// Everything before the cutover must succeed for the cutover to run; any
/// earlier failure leaves the alias where it was, so retrying the whole step
/// is safe. The destination may be left behind as an orphaned, possibly
/// partial index.
///
/// Returns the rendered destination index name.
pub async fn run_step<S: DocumentStore>(
    store: &S,
    alias: &str,
    step: &MigrationStep,
    opts: &StepOptions,
    on_progress: Option<Progress<'_>>,
) -> Result<String> {
    let today = chrono::Local::now().date_naive();
    let dest = render_template(&step.index_name, alias, today);
    log::info!("migrating alias '{}' to index '{}'", alias, dest);

    put_metadata(store, &dest, &step.index_metadata).await?;

    if !opts.create_only {
        let transform = step
            .transform
            .as_ref()
            .map(|ops| ops as &dyn DocumentTransform);
        copy_documents(store, alias, &dest, transform, on_progress).await?;
    }

    if !step.seed_documents.is_empty() {
        let actions: Vec<BulkAction> = step
            .seed_documents
            .iter()
            .cloned()
            .map(|doc| BulkAction::new(&dest, doc))
            .collect();
        store
            .bulk(&actions)
            .await
            .with_context(|| format!("failed to write seed documents to '{}'", dest))?;
    }

    if !opts.dry_run {
        alias::move_alias(store, alias, &dest).await?;
    }

    Ok(dest)
}

/// Promotes a plain index into an aliased one: copy `src`'s metadata and
/// documents into `dest`, delete `src`, then bind an alias named `src` to
/// `dest`. Readers keep using the old name throughout.
///
/// The delete is irreversible, so it is issued only after both copies have
/// reported success.
pub async fn wrap<S: DocumentStore>(
    store: &S,
    src: &str,
    dest: &str,
    on_progress: Option<Progress<'_>>,
) -> Result<()> {
    log::info!("wrapping index '{}' into '{}'", src, dest);

    copy_metadata(store, src, dest).await?;
    copy_documents(store, src, dest, None, on_progress).await?;

    store
        .delete_index(src)
        .await
        .with_context(|| format!("failed to delete promoted index '{}'", src))?;
    alias::bind(store, src, dest).await
}
