// Upgrade command - drive aliases along their transition chains
use super::progress::CopyBar;
use anyhow::Result;
use clap::Args;
use indexmig::{load_upgrade_plan, run_upgrade, HttpStore, UpgradeOptions, UpgradeReport};
use std::path::PathBuf;

#[derive(Args)]
#[command(
    about = "Drive aliases along their transition chains to latest",
    long_about = "Drive aliases along their transition chains to latest

Reads an upgrade descriptor declaring, per alias (or per alias family
via a regex pattern), an initial index, a latest index, and a chain of
migration steps keyed by source index. For each target alias the chain
is validated first (reachability to latest, no cycles); an unbound
exact-name alias is bootstrapped by wrapping its plain index; then
migration steps run one at a time until the alias is bound to latest.

Each invocation re-derives the position from the alias registry, so an
interrupted upgrade can simply be re-run.",
    after_help = "Examples:\n  \
        # Validate chains and show the route without touching anything\n  \
        indexmig upgrade upgrade.json --dry-run\n\n  \
        # Run the full upgrade\n  \
        indexmig upgrade upgrade.json"
)]
pub struct UpgradeCommand {
    /// Upgrade descriptor JSON file
    pub descriptor: PathBuf,

    /// Validate chains and print the route without issuing mutating calls
    #[arg(short = 'n', long)]
    pub dry_run: bool,
}

fn print_report(report: &UpgradeReport, dry_run: bool) {
    for outcome in &report.aliases {
        let mut route = vec![outcome
            .steps
            .first()
            .map(|s| s.from.clone())
            .unwrap_or_else(|| outcome.final_index.clone())];
        route.extend(outcome.steps.iter().map(|s| s.to.clone()));

        let verb = if dry_run { "would run" } else { "ran" };
        if outcome.steps.is_empty() && !outcome.bootstrapped {
            eprintln!("  {}: already at '{}'", outcome.alias, outcome.final_index);
        } else {
            let bootstrap = if outcome.bootstrapped {
                " (bootstrapped)"
            } else {
                ""
            };
            eprintln!(
                "  {}: {} {} step(s){}: {}",
                outcome.alias,
                verb,
                outcome.steps.len(),
                bootstrap,
                route.join(" -> ")
            );
        }
    }
}

pub fn run(cmd: UpgradeCommand, server: &str, quiet: bool) -> Result<()> {
    tokio::runtime::Runtime::new()?.block_on(async {
        let store = HttpStore::new(server)?;
        let plan = load_upgrade_plan(&cmd.descriptor)?;
        let opts = UpgradeOptions {
            dry_run: cmd.dry_run,
        };

        let bar = CopyBar::new(quiet || cmd.dry_run);
        let mut observer = |completed, total| bar.update(completed, total);
        let report = run_upgrade(&store, &plan, &opts, Some(&mut observer)).await?;
        bar.finish();

        if cmd.dry_run {
            eprintln!("Upgrade plan ({} step(s) total):", report.total_steps());
        } else {
            eprintln!("✓ Upgrade complete ({} step(s) total):", report.total_steps());
        }
        print_report(&report, cmd.dry_run);
        Ok(())
    })
}
