//! # indexmig
//!
//! Zero-downtime evolution of aliased document-store indexes: metadata
//! snapshots, paginated bulk document copy with optional transforms, atomic
//! alias cutover, and orchestrated multi-step upgrade chains that drive each
//! alias to its declared latest index.
//!
//! The store is abstracted behind [`store::DocumentStore`]; [`HttpStore`]
//! talks to an Elasticsearch-compatible REST API, and tests run against an
//! in-memory fake.

pub mod alias;
pub mod constants;
pub mod copy;
pub mod document;
pub mod http_store;
pub mod metadata;
pub mod migration;
pub mod script;
pub mod store;
pub mod transform;
pub mod upgrade;

pub use copy::{copy_documents, Progress};
pub use document::{BulkAction, Document};
pub use http_store::HttpStore;
pub use metadata::{
    copy_metadata, get_metadata, put_metadata, read_snapshot, write_snapshot, IndexMetadata,
};
pub use migration::{run_step, wrap, MigrationStep, StepOptions};
pub use script::{load_migration_step, load_upgrade_plan, render_template};
pub use store::{AliasAction, DocumentStore};
pub use transform::{DocumentTransform, FieldOps};
pub use upgrade::{run_upgrade, UpgradeConfig, UpgradeOptions, UpgradePlan, UpgradeReport};
