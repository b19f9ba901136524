use anyhow::Result;
use clap::{Parser, Subcommand};
use indexmig::constants;

// CLI Commands (cmd_ prefix)
mod cmd_copy;
mod cmd_get;
mod cmd_info;
mod cmd_migrate;
mod cmd_point;
mod cmd_put;
mod cmd_upgrade;
mod cmd_wrap;

// Helper modules (no cmd_ prefix)
mod logger;
mod progress;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Format custom help template with grouped commands
fn format_help_template() -> &'static str {
    concat!(
        "{about-with-newline}\n\n",
        "{usage-heading}\n  {usage}\n\n",
        "Options:\n{options}\n\n",
        "Metadata Snapshots:\n",
        "  get       Save an index's settings and mappings to a JSON file\n",
        "  put       Create an index from a JSON snapshot file\n",
        "  info      Show alias resolution, document count, and metadata\n",
        "\n",
        "Index Operations:\n",
        "  copy      Copy an index to a new index, optionally with documents\n",
        "  wrap      Promote a plain index into an aliased one\n",
        "  point     Move an alias to a different index\n",
        "\n",
        "Migration:\n",
        "  migrate   Run one migration step against an aliased index\n",
        "  upgrade   Drive aliases along their transition chains to latest\n",
        "\n",
        "See 'indexmig <COMMAND> --help' for more information on a specific command.\n"
    )
}

#[derive(Parser)]
#[command(bin_name = "indexmig")]
#[command(version = VERSION)]
#[command(about = concat!("indexmig v", env!("CARGO_PKG_VERSION"), " - Document-Store Index Migration"))]
#[command(long_about = concat!(
    "indexmig v", env!("CARGO_PKG_VERSION"), " - Document-Store Index Migration\n\n",
    "Tool for zero-downtime evolution of aliased document-store indexes:\n",
    "metadata snapshots, bulk document copies with transforms, atomic alias\n",
    "cutover, and orchestrated multi-step upgrade chains."
))]
#[command(author)]
#[command(propagate_version = true)]
#[command(help_template = format_help_template())]
pub struct Cli {
    /// Document-store server URL
    #[arg(short = 's', long = "server", global = true, default_value = constants::DEFAULT_SERVER_URL)]
    server: String,

    /// Suppress progress output
    #[arg(short = 'q', long, global = true)]
    quiet: bool,

    /// Enable verbose output
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Get(cmd_get::GetCommand),
    Put(cmd_put::PutCommand),
    Copy(cmd_copy::CopyCommand),
    Wrap(cmd_wrap::WrapCommand),
    Point(cmd_point::PointCommand),
    Info(cmd_info::InfoCommand),
    Migrate(cmd_migrate::MigrateCommand),
    Upgrade(cmd_upgrade::UpgradeCommand),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logger based on verbosity flags
    logger::init_logger(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Get(cmd) => cmd_get::run(cmd, &cli.server)?,
        Commands::Put(cmd) => cmd_put::run(cmd, &cli.server)?,
        Commands::Copy(cmd) => cmd_copy::run(cmd, &cli.server, cli.quiet)?,
        Commands::Wrap(cmd) => cmd_wrap::run(cmd, &cli.server, cli.quiet)?,
        Commands::Point(cmd) => cmd_point::run(cmd, &cli.server, cli.quiet)?,
        Commands::Info(cmd) => cmd_info::run(cmd, &cli.server)?,
        Commands::Migrate(cmd) => cmd_migrate::run(cmd, &cli.server, cli.quiet)?,
        Commands::Upgrade(cmd) => cmd_upgrade::run(cmd, &cli.server, cli.quiet)?,
    }

    Ok(())
}
