// Upgrade orchestrator: alias discovery, chain validation, and the drive loop
use crate::copy::Progress;
use crate::migration::{run_step, wrap, MigrationStep, StepOptions};
use crate::script::render_template;
use crate::store::DocumentStore;
use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use regex::Regex;
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};

/// Declared upgrade configuration for one alias or alias family.
///
/// With `alias_pattern`, every currently bound alias matching the pattern is
/// processed, the matched alias substituting into all name templates. Without
/// it, exactly the declared alias is processed, bootstrapping the plain index
/// of the same name if the alias is unbound.
#[derive(Debug, Clone, Deserialize)]
pub struct UpgradeConfig {
    #[serde(default)]
    pub alias_pattern: Option<String>,
    pub initial_index: String,
    pub latest_index: String,
    /// Transition chain: source index name template -> the step advancing it.
    pub transitions: BTreeMap<String, MigrationStep>,
}

/// An upgrade descriptor: declared alias name -> configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct UpgradePlan {
    pub aliases: BTreeMap<String, UpgradeConfig>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UpgradeOptions {
    /// Validate chains and report the route without issuing any mutating call.
    pub dry_run: bool,
}

/// One executed (or, under dry-run, planned) transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainStep {
    pub from: String,
    pub to: String,
}

/// Outcome for one alias within an upgrade run.
#[derive(Debug, Clone)]
pub struct AliasUpgrade {
    pub alias: String,
    /// True when the alias was unbound and a plain index was promoted first.
    pub bootstrapped: bool,
    pub steps: Vec<ChainStep>,
    pub final_index: String,
}

#[derive(Debug, Clone, Default)]
pub struct UpgradeReport {
    pub aliases: Vec<AliasUpgrade>,
}

impl UpgradeReport {
    pub fn total_steps(&self) -> usize {
        self.aliases.iter().map(|a| a.steps.len()).sum()
    }
}

/// A transition chain with all templates rendered for one concrete alias.
struct RenderedChain<'a> {
    latest: String,
    /// source index name -> (step, rendered destination name)
    transitions: BTreeMap<String, (&'a MigrationStep, String)>,
}

impl<'a> RenderedChain<'a> {
    fn new(config: &'a UpgradeConfig, alias: &str, date: NaiveDate) -> Self {
        let transitions = config
            .transitions
            .iter()
            .map(|(from, step)| {
                let rendered_from = render_template(from, alias, date);
                let rendered_dest = render_template(&step.index_name, alias, date);
                (rendered_from, (step, rendered_dest))
            })
            .collect();
        Self {
            latest: render_template(&config.latest_index, alias, date),
            transitions,
        }
    }

    /// Walks the chain from `start` to `latest`, returning the route. Fails
    /// with a configuration error on a missing transition or a revisited
    /// index; runs before any mutating call.
    fn route(&self, alias: &str, start: &str) -> Result<Vec<ChainStep>> {
        let mut seen = HashSet::from([start.to_string()]);
        let mut route = Vec::new();
        let mut current = start.to_string();

        while current != self.latest {
            let Some((_, dest)) = self.transitions.get(&current) else {
                bail!(
                    "configuration error: no transition from index '{}' for alias '{}' (latest is '{}')",
                    current,
                    alias,
                    self.latest
                );
            };
            if !seen.insert(dest.clone()) {
                bail!(
                    "configuration error: transition chain for alias '{}' revisits index '{}'",
                    alias,
                    dest
                );
            }
            route.push(ChainStep {
                from: current.clone(),
                to: dest.clone(),
            });
            current = dest.clone();
        }
        Ok(route)
    }
}

fn reborrow<'a>(progress: &'a mut Option<Progress<'_>>) -> Option<Progress<'a>> {
    match progress {
        Some(cb) => Some(&mut **cb),
        None => None,
    }
}

/// Runs the full upgrade: discovers target aliases for every declared config,
/// bootstraps unaliased indexes, and executes migration steps along each
/// chain until the alias is bound to its latest index.
///
/// Aliases are processed strictly sequentially. The copy progress observer is
/// shared across steps; each copy re-announces its own `(0, total)`.
pub async fn run_upgrade<S: DocumentStore>(
    store: &S,
    plan: &UpgradePlan,
    opts: &UpgradeOptions,
    mut on_progress: Option<Progress<'_>>,
) -> Result<UpgradeReport> {
    let bound = store.list_aliases().await?;
    let today = chrono::Local::now().date_naive();
    let mut report = UpgradeReport::default();

    for (declared, config) in &plan.aliases {
        let targets: Vec<String> = match &config.alias_pattern {
            Some(pattern) => {
                let re = Regex::new(pattern).with_context(|| {
                    format!(
                        "configuration error: invalid alias pattern '{}' for '{}'",
                        pattern, declared
                    )
                })?;
                let mut matched: Vec<String> = bound
                    .iter()
                    .filter(|(alias, _)| re.is_match(alias))
                    .map(|(alias, _)| alias.clone())
                    .collect();
                matched.sort();
                matched.dedup();
                if matched.is_empty() {
                    log::warn!(
                        "no bound alias matches pattern '{}' declared for '{}'",
                        pattern,
                        declared
                    );
                }
                matched
            }
            None => vec![declared.clone()],
        };

        for alias in targets {
            let outcome =
                upgrade_alias(store, &alias, config, today, opts, reborrow(&mut on_progress))
                    .await?;
            report.aliases.push(outcome);
        }
    }

    Ok(report)
}

/// Drives one alias from its current binding to the latest index.
async fn upgrade_alias<S: DocumentStore>(
    store: &S,
    alias: &str,
    config: &UpgradeConfig,
    today: NaiveDate,
    opts: &UpgradeOptions,
    mut on_progress: Option<Progress<'_>>,
) -> Result<AliasUpgrade> {
    let chain = RenderedChain::new(config, alias, today);

    let binding = store.resolve_alias(alias).await?;
    let needs_bootstrap = binding.is_none();
    let start = match &binding {
        Some(index) => index.clone(),
        None => render_template(&config.initial_index, alias, today),
    };

    // Full reachability and cycle check up front, before any mutation.
    let planned = chain.route(alias, &start)?;

    if start == chain.latest && !needs_bootstrap {
        log::info!("alias '{}' already at latest index '{}'", alias, chain.latest);
    }

    if opts.dry_run {
        return Ok(AliasUpgrade {
            alias: alias.to_string(),
            bootstrapped: needs_bootstrap,
            steps: planned,
            final_index: chain.latest,
        });
    }

    if needs_bootstrap {
        log::info!(
            "alias '{}' is unbound, promoting plain index into '{}'",
            alias,
            start
        );
        wrap(store, alias, &start, reborrow(&mut on_progress)).await?;
    }

    let mut seen = HashSet::from([start.clone()]);
    let mut current = start;
    let mut executed = Vec::new();

    while current != chain.latest {
        let Some((step, _)) = chain.transitions.get(&current) else {
            // Unreachable after the up-front route check unless the registry
            // moved underneath us mid-run.
            bail!(
                "configuration error: no transition from index '{}' for alias '{}' (latest is '{}')",
                current,
                alias,
                chain.latest
            );
        };

        let dest = run_step(
            store,
            alias,
            step,
            &StepOptions::default(),
            reborrow(&mut on_progress),
        )
        .await?;
        store.refresh(&dest).await?;

        let now = store
            .resolve_alias(alias)
            .await?
            .with_context(|| format!("alias '{}' unbound after migration step", alias))?;
        if !seen.insert(now.clone()) {
            bail!(
                "configuration error: transition chain for alias '{}' revisits index '{}'",
                alias,
                now
            );
        }

        executed.push(ChainStep {
            from: current.clone(),
            to: now.clone(),
        });
        current = now;
    }

    Ok(AliasUpgrade {
        alias: alias.to_string(),
        bootstrapped: needs_bootstrap,
        steps: executed,
        final_index: current,
    })
}
