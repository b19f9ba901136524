// Paginated document copy pipeline
use crate::constants;
use crate::document::BulkAction;
use crate::store::DocumentStore;
use crate::transform::DocumentTransform;
use anyhow::{Context, Result};

/// Progress observer for a copy: called with `(completed, total)`. Rendering
/// (bar, log line) is the caller's concern.
pub type Progress<'a> = &'a mut dyn FnMut(u64, u64);

/// Copies every document from `src` into `dest` in pages of
/// [`constants::PAGE_SIZE`], applying `transform` per document when given and
/// issuing one bulk write per page.
///
/// The total is counted once at the start and may go stale if `src` is being
/// written concurrently; pagination is a plain offset with no point-in-time
/// cursor, so the copy assumes the source is quiescent. Destination writes
/// overwrite by document id, so re-running the whole copy after a failure is
/// always safe. A failed bulk call or transform aborts the copy immediately,
/// leaving `dest` partially populated.
///
/// Emits `(0, total)` before the first page, then `(completed, total)` after
/// each successful page. Returns the number of documents copied.
pub async fn copy_documents<S: DocumentStore>(
    store: &S,
    src: &str,
    dest: &str,
    transform: Option<&dyn DocumentTransform>,
    mut on_progress: Option<Progress<'_>>,
) -> Result<u64> {
    let total = store
        .count(src)
        .await
        .with_context(|| format!("failed to count documents in '{}'", src))?;

    if let Some(progress) = on_progress.as_mut() {
        progress(0, total);
    }

    let mut offset = 0u64;
    let mut completed = 0u64;

    loop {
        let page = store
            .search(src, constants::PAGE_SIZE, offset)
            .await
            .with_context(|| format!("failed to read page at offset {} of '{}'", offset, src))?;
        if page.is_empty() {
            break;
        }

        let mut actions = Vec::with_capacity(page.len());
        for doc in page {
            let doc = match transform {
                Some(t) => {
                    let id = doc.id.clone();
                    t.apply(doc)
                        .with_context(|| format!("transform failed for document '{}'", id))?
                }
                None => doc,
            };
            actions.push(BulkAction::new(dest, doc));
        }

        completed += actions.len() as u64;
        store
            .bulk(&actions)
            .await
            .with_context(|| format!("bulk write of {} documents to '{}' failed", actions.len(), dest))?;

        if let Some(progress) = on_progress.as_mut() {
            progress(completed, total);
        }
        offset += constants::PAGE_SIZE as u64;
    }

    log::debug!("copied {} documents from '{}' to '{}'", completed, src, dest);
    Ok(completed)
}
