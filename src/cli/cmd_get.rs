// Get command - snapshot index metadata to a JSON file
use anyhow::Result;
use clap::Args;
use indexmig::{get_metadata, write_snapshot, HttpStore};
use std::path::PathBuf;

#[derive(Args)]
#[command(
    about = "Save an index's settings and mappings to a JSON file",
    long_about = "Save an index's settings and mappings to a JSON file

Aliases are resolved to their concrete index first. Store-generated
settings keys (uuid, creation date, engine version) are stripped so the
snapshot can be reapplied with 'indexmig put' without colliding with the
source index's identity. Files are written with sorted keys, suitable
for diffing and version control.",
    after_help = "Examples:\n  \
        indexmig get orders orders.json\n  \
        indexmig -s search01:9200 get orders orders.json"
)]
pub struct GetCommand {
    /// Index or alias to snapshot
    pub index: String,

    /// Output JSON file
    pub json_file: PathBuf,
}

pub fn run(cmd: GetCommand, server: &str) -> Result<()> {
    tokio::runtime::Runtime::new()?.block_on(async {
        let store = HttpStore::new(server)?;
        let meta = get_metadata(&store, &cmd.index).await?;
        write_snapshot(&cmd.json_file, &meta)?;
        eprintln!(
            "✓ Wrote snapshot of '{}' to {}",
            cmd.index,
            cmd.json_file.display()
        );
        Ok(())
    })
}
