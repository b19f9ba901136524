// Migrate command - run one migration step against an aliased index
use super::progress::CopyBar;
use anyhow::Result;
use clap::Args;
use indexmig::{load_migration_step, run_step, HttpStore, StepOptions};
use std::path::PathBuf;

#[derive(Args)]
#[command(
    about = "Run one migration step against an aliased index",
    long_about = "Run one migration step against an aliased index

Creates a new index from the descriptor's metadata, copies every
document from the index the alias currently points at (applying the
descriptor's transform if present), writes any seed documents, and
atomically repoints the alias to the new index.

The descriptor is a JSON file:
  index_name      Name for the new index; may use {alias} and {date}
                  placeholders.
  index_metadata  Settings and mappings for the new index.
  transform       (optional) Declarative field operations applied to each
                  copied document: rename, set, remove on dot-paths.
  seed_documents  (optional) Documents written verbatim after the copy.

The alias is only moved after everything else succeeded, so a failed
step leaves readers untouched and can be retried unchanged.",
    after_help = "Examples:\n  \
        # Preview: build the new index but leave the alias alone\n  \
        indexmig migrate orders step_v2.json --dry-run\n\n  \
        # Full step\n  \
        indexmig migrate orders step_v2.json\n\n  \
        # Only create the destination index (no document copy)\n  \
        indexmig migrate orders step_v2.json --create-only"
)]
pub struct MigrateCommand {
    /// Alias to migrate
    pub alias: String,

    /// Migration descriptor JSON file
    pub descriptor: PathBuf,

    /// Create the destination index and seeds, but skip the document copy
    #[arg(long)]
    pub create_only: bool,

    /// Do everything except the final alias cutover
    #[arg(short = 'n', long)]
    pub dry_run: bool,
}

pub fn run(cmd: MigrateCommand, server: &str, quiet: bool) -> Result<()> {
    tokio::runtime::Runtime::new()?.block_on(async {
        let store = HttpStore::new(server)?;
        let step = load_migration_step(&cmd.descriptor)?;
        let opts = StepOptions {
            create_only: cmd.create_only,
            dry_run: cmd.dry_run,
        };

        let bar = CopyBar::new(quiet);
        let mut observer = |completed, total| bar.update(completed, total);
        let dest = run_step(&store, &cmd.alias, &step, &opts, Some(&mut observer)).await?;
        bar.finish();

        if cmd.dry_run {
            eprintln!(
                "✓ Built index '{}'; alias '{}' left untouched (dry run)",
                dest, cmd.alias
            );
        } else {
            eprintln!("✓ Alias '{}' migrated to '{}'", cmd.alias, dest);
        }
        Ok(())
    })
}
