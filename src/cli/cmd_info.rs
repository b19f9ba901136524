// Info command - alias resolution, document count, and metadata
use anyhow::Result;
use clap::Args;
use indexmig::{get_metadata, DocumentStore, HttpStore};

#[derive(Args)]
#[command(
    about = "Show alias resolution, document count, and metadata",
    after_help = "Examples:\n  \
        indexmig info orders"
)]
pub struct InfoCommand {
    /// Index or alias to inspect
    pub name: String,

    /// Print the full metadata snapshot as JSON
    #[arg(long)]
    pub meta: bool,
}

pub fn run(cmd: InfoCommand, server: &str) -> Result<()> {
    tokio::runtime::Runtime::new()?.block_on(async {
        let store = HttpStore::new(server)?;

        let resolved = store.resolve_alias(&cmd.name).await?;
        let concrete = resolved.clone().unwrap_or_else(|| cmd.name.clone());
        let count = store.count(&concrete).await?;
        let meta = get_metadata(&store, &cmd.name).await?;

        println!("Name:      {}", cmd.name);
        match &resolved {
            Some(index) => println!("Kind:      alias -> {}", index),
            None => println!("Kind:      plain index"),
        }
        println!("Documents: {}", count);

        if cmd.meta {
            println!("{}", serde_json::to_string_pretty(&meta)?);
        } else {
            let fields: Vec<&str> = meta.mappings.keys().map(String::as_str).collect();
            println!("Mappings:  {}", fields.join(", "));
        }

        Ok(())
    })
}
