// Put command - create an index from a JSON snapshot file
use anyhow::Result;
use clap::Args;
use indexmig::{put_metadata, read_snapshot, HttpStore};
use std::path::PathBuf;

#[derive(Args)]
#[command(
    about = "Create an index from a JSON snapshot file",
    after_help = "Examples:\n  \
        indexmig put orders_v2 orders.json"
)]
pub struct PutCommand {
    /// Index to create
    pub index: String,

    /// Snapshot JSON file with settings and mappings
    pub json_file: PathBuf,
}

pub fn run(cmd: PutCommand, server: &str) -> Result<()> {
    tokio::runtime::Runtime::new()?.block_on(async {
        let store = HttpStore::new(server)?;
        let meta = read_snapshot(&cmd.json_file)?;
        put_metadata(&store, &cmd.index, &meta).await?;
        eprintln!("✓ Created index '{}'", cmd.index);
        Ok(())
    })
}
