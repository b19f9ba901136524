// Alias state machine: bind on first use, atomic move thereafter
use crate::store::{AliasAction, DocumentStore};
use anyhow::Result;

/// Binds `alias` to `index` with a single registry call. Valid when the alias
/// is unbound (first use).
pub async fn bind<S: DocumentStore>(store: &S, alias: &str, index: &str) -> Result<()> {
    store
        .update_aliases(&[AliasAction::Add {
            alias: alias.to_string(),
            index: index.to_string(),
        }])
        .await
}

/// Repoints `alias` from its current index to `new_index`.
///
/// The remove and the add travel in one atomic registry request, never two
/// calls, so there is no window where the alias resolves to nothing. If the
/// alias turns out to be unbound, falls back to `bind` (first-use semantics).
pub async fn move_alias<S: DocumentStore>(store: &S, alias: &str, new_index: &str) -> Result<()> {
    match store.resolve_alias(alias).await? {
        Some(old_index) => {
            log::debug!("moving alias '{}': '{}' -> '{}'", alias, old_index, new_index);
            store
                .update_aliases(&[
                    AliasAction::Remove {
                        alias: alias.to_string(),
                        index: old_index,
                    },
                    AliasAction::Add {
                        alias: alias.to_string(),
                        index: new_index.to_string(),
                    },
                ])
                .await
        }
        None => {
            log::debug!("alias '{}' unbound, binding to '{}'", alias, new_index);
            bind(store, alias, new_index).await
        }
    }
}
