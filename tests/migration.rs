mod common;

use anyhow::Result;
use common::{make_docs, simple_meta, MemoryStore};
use indexmig::{
    alias, get_metadata, run_step, wrap, AliasAction, Document, FieldOps, MigrationStep,
    StepOptions,
};
use serde_json::json;

fn step_v2(transform: Option<FieldOps>, seeds: Vec<Document>) -> MigrationStep {
    MigrationStep {
        index_name: "{alias}_v2".to_string(),
        index_metadata: simple_meta("title"),
        transform,
        seed_documents: seeds,
    }
}

#[tokio::test]
async fn move_alias_issues_one_atomic_registry_call() -> Result<()> {
    let store = MemoryStore::new();
    store.seed_index("orders_v1", simple_meta("name"), make_docs(3));
    store.seed_index("orders_v2", simple_meta("name"), vec![]);
    store.seed_alias("orders", "orders_v1");

    alias::move_alias(&store, "orders", "orders_v2").await?;

    let calls = store.alias_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0],
        vec![
            AliasAction::Remove {
                alias: "orders".to_string(),
                index: "orders_v1".to_string()
            },
            AliasAction::Add {
                alias: "orders".to_string(),
                index: "orders_v2".to_string()
            },
        ]
    );
    assert_eq!(store.bound("orders"), Some("orders_v2".to_string()));
    // The old index is untouched.
    assert!(store.has_index("orders_v1"));
    assert_eq!(store.docs("orders_v1").len(), 3);
    Ok(())
}

#[tokio::test]
async fn move_alias_on_unbound_name_behaves_like_bind() -> Result<()> {
    let store = MemoryStore::new();
    store.seed_index("orders_v1", simple_meta("name"), vec![]);

    alias::move_alias(&store, "orders", "orders_v1").await?;

    let calls = store.alias_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0],
        vec![AliasAction::Add {
            alias: "orders".to_string(),
            index: "orders_v1".to_string()
        }]
    );
    assert_eq!(store.bound("orders"), Some("orders_v1".to_string()));
    Ok(())
}

#[tokio::test]
async fn wrap_promotes_a_plain_index() -> Result<()> {
    let store = MemoryStore::new();
    store.seed_index("orders", simple_meta("name"), make_docs(120));

    wrap(&store, "orders", "orders_v1", None).await?;

    assert!(!store.has_index("orders"));
    assert_eq!(store.bound("orders"), Some("orders_v1".to_string()));
    assert_eq!(store.docs("orders_v1").len(), 120);
    assert_eq!(store.metadata("orders_v1").mappings, simple_meta("name").mappings);

    // Reads through the old name now hit the new index.
    let meta = get_metadata(&store, "orders").await?;
    assert_eq!(meta.mappings, simple_meta("name").mappings);
    Ok(())
}

#[tokio::test]
async fn run_step_copies_transforms_seeds_and_cuts_over() -> Result<()> {
    let store = MemoryStore::new();
    store.seed_index("orders_v1", simple_meta("name"), make_docs(5));
    store.seed_alias("orders", "orders_v1");

    let transform = FieldOps {
        rename: [("name".to_string(), "title".to_string())].into(),
        ..Default::default()
    };
    let seeds = vec![Document::new("defaults", json!({"kind": "seed"}))];
    let dest = run_step(
        &store,
        "orders",
        &step_v2(Some(transform), seeds),
        &StepOptions::default(),
        None,
    )
    .await?;

    assert_eq!(dest, "orders_v2");
    assert_eq!(store.bound("orders"), Some("orders_v2".to_string()));

    let docs = store.docs("orders_v2");
    assert_eq!(docs.len(), 6);
    let copied: Vec<&Document> = docs.iter().filter(|d| d.id != "defaults").collect();
    for doc in copied {
        assert!(doc.source.get("title").is_some());
        assert!(doc.source.get("name").is_none());
    }
    // Seed documents are written verbatim, no transform.
    let seed = docs.iter().find(|d| d.id == "defaults").unwrap();
    assert_eq!(seed.source, json!({"kind": "seed"}));

    // Source index survives the cutover.
    assert_eq!(store.docs("orders_v1").len(), 5);
    Ok(())
}

#[tokio::test]
async fn run_step_dry_run_leaves_the_alias_alone() -> Result<()> {
    let store = MemoryStore::new();
    store.seed_index("orders_v1", simple_meta("name"), make_docs(5));
    store.seed_alias("orders", "orders_v1");

    let opts = StepOptions {
        dry_run: true,
        ..Default::default()
    };
    let dest = run_step(&store, "orders", &step_v2(None, vec![]), &opts, None).await?;

    assert_eq!(dest, "orders_v2");
    assert_eq!(store.bound("orders"), Some("orders_v1".to_string()));
    assert_eq!(store.docs("orders_v2").len(), 5);
    assert!(store.alias_calls().is_empty());
    Ok(())
}

#[tokio::test]
async fn run_step_create_only_skips_the_copy() -> Result<()> {
    let store = MemoryStore::new();
    store.seed_index("orders_v1", simple_meta("name"), make_docs(5));
    store.seed_alias("orders", "orders_v1");

    let opts = StepOptions {
        create_only: true,
        ..Default::default()
    };
    let seeds = vec![Document::new("defaults", json!({"kind": "seed"}))];
    run_step(&store, "orders", &step_v2(None, seeds), &opts, None).await?;

    // Only the seed document landed; the cutover still happened.
    assert_eq!(store.docs("orders_v2").len(), 1);
    assert_eq!(store.bound("orders"), Some("orders_v2".to_string()));
    Ok(())
}

#[tokio::test]
async fn failed_step_never_moves_the_alias() -> Result<()> {
    let store = MemoryStore::new();
    store.seed_index("orders_v1", simple_meta("name"), make_docs(5));
    store.seed_alias("orders", "orders_v1");

    // qty is a scalar, so setting below it fails the transform mid-copy.
    let bad = FieldOps {
        set: [("qty.nested".to_string(), json!(1))].into(),
        ..Default::default()
    };
    let err = run_step(
        &store,
        "orders",
        &step_v2(Some(bad), vec![]),
        &StepOptions::default(),
        None,
    )
    .await
    .unwrap_err();

    assert!(err.to_string().contains("transform failed"));
    assert_eq!(store.bound("orders"), Some("orders_v1".to_string()));
    assert!(store.alias_calls().is_empty());
    // The destination is orphaned for manual cleanup.
    assert!(store.has_index("orders_v2"));
    Ok(())
}
