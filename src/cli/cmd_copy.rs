// Copy command - duplicate an index, optionally including documents
use super::progress::CopyBar;
use anyhow::Result;
use clap::Args;
use indexmig::{copy_documents, copy_metadata, HttpStore};

#[derive(Args)]
#[command(
    about = "Copy an index to a new index, optionally with documents",
    long_about = "Copy an index to a new index, optionally with documents

By default only the metadata (settings and mappings) is copied. With
--docs, all documents are copied in pages through the bulk API. The
destination overwrites by document id, so re-running a copy after a
failure is safe.",
    after_help = "Examples:\n  \
        # Metadata only\n  \
        indexmig copy orders_v1 orders_v2\n\n  \
        # Metadata and documents\n  \
        indexmig copy orders_v1 orders_v2 --docs\n\n  \
        # Documents into an already-created index\n  \
        indexmig copy orders_v1 orders_v2 --docs --no-meta"
)]
pub struct CopyCommand {
    /// Source index or alias
    pub src_index: String,

    /// Destination index
    pub dest_index: String,

    /// Copy the documents as well
    #[arg(short = 'd', long)]
    pub docs: bool,

    /// Don't copy the metadata (settings and mappings)
    #[arg(short = 'm', long)]
    pub no_meta: bool,
}

pub fn run(cmd: CopyCommand, server: &str, quiet: bool) -> Result<()> {
    tokio::runtime::Runtime::new()?.block_on(async {
        let store = HttpStore::new(server)?;

        if !cmd.no_meta {
            copy_metadata(&store, &cmd.src_index, &cmd.dest_index).await?;
            eprintln!("✓ Copied metadata '{}' -> '{}'", cmd.src_index, cmd.dest_index);
        }

        if cmd.docs {
            let bar = CopyBar::new(quiet);
            let mut observer = |completed, total| bar.update(completed, total);
            let copied = copy_documents(
                &store,
                &cmd.src_index,
                &cmd.dest_index,
                None,
                Some(&mut observer),
            )
            .await?;
            bar.finish();
            eprintln!(
                "✓ Copied {} document(s) '{}' -> '{}'",
                copied, cmd.src_index, cmd.dest_index
            );
        }

        Ok(())
    })
}
