// Wrap command - promote a plain index into an aliased one
use super::progress::CopyBar;
use anyhow::Result;
use clap::Args;
use indexmig::{wrap, HttpStore};

#[derive(Args)]
#[command(
    about = "Promote a plain index into an aliased one",
    long_about = "Promote a plain index into an aliased one

Copies the source's metadata and documents into the destination index,
deletes the source, then binds an alias with the source's old name to
the destination. Readers keep using the old name throughout; afterwards
the name can be moved between index versions atomically.

The source is deleted only after both copies succeed.",
    after_help = "Examples:\n  \
        indexmig wrap orders orders_v1"
)]
pub struct WrapCommand {
    /// Plain (unaliased) index to promote
    pub src_index: String,

    /// Destination index that will carry the data
    pub dest_index: String,
}

pub fn run(cmd: WrapCommand, server: &str, quiet: bool) -> Result<()> {
    tokio::runtime::Runtime::new()?.block_on(async {
        let store = HttpStore::new(server)?;

        let bar = CopyBar::new(quiet);
        let mut observer = |completed, total| bar.update(completed, total);
        wrap(&store, &cmd.src_index, &cmd.dest_index, Some(&mut observer)).await?;
        bar.finish();

        eprintln!(
            "✓ Wrapped '{}' into '{}' (alias '{}' now points at it)",
            cmd.src_index, cmd.dest_index, cmd.src_index
        );
        Ok(())
    })
}
