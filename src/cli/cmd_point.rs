// Point command - move an alias to a different index
use anyhow::Result;
use clap::Args;
use indexmig::{alias, HttpStore};

#[derive(Args)]
#[command(
    about = "Move an alias to a different index",
    long_about = "Move an alias to a different index

The remove of the old binding and the add of the new one travel in a
single atomic registry request, so the alias never resolves to nothing
in between. If the alias doesn't exist yet, it is created (first use).",
    after_help = "Examples:\n  \
        indexmig point orders orders_v2"
)]
pub struct PointCommand {
    /// Alias to move
    pub alias: String,

    /// Index the alias should point at
    pub dest_index: String,
}

pub fn run(cmd: PointCommand, server: &str, _quiet: bool) -> Result<()> {
    tokio::runtime::Runtime::new()?.block_on(async {
        let store = HttpStore::new(server)?;
        alias::move_alias(&store, &cmd.alias, &cmd.dest_index).await?;
        eprintln!("✓ Alias '{}' -> '{}'", cmd.alias, cmd.dest_index);
        Ok(())
    })
}
