// Descriptor files for the migrate and upgrade commands
//
// Descriptors are plain JSON data, never executable code: a migration step
// carries a name template, a metadata document, an optional declarative
// transform, and optional seed documents.
use crate::migration::MigrationStep;
use crate::upgrade::UpgradePlan;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Substitutes `{alias}` and `{date}` (YYYY-MM-DD) placeholders in an index
/// name template.
pub fn render_template(template: &str, alias: &str, date: NaiveDate) -> String {
    template
        .replace("{alias}", alias)
        .replace("{date}", &date.format("%Y-%m-%d").to_string())
}

/// Loads a single migration-step descriptor from a JSON file.
pub fn load_migration_step(path: impl AsRef<Path>) -> Result<MigrationStep> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("failed to open migration descriptor {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("invalid migration descriptor {}", path.display()))
}

/// Loads an upgrade-plan descriptor (declared alias name -> upgrade config)
/// from a JSON file.
pub fn load_upgrade_plan(path: impl AsRef<Path>) -> Result<UpgradePlan> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("failed to open upgrade descriptor {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("invalid upgrade descriptor {}", path.display()))
}
