//! Snapshot command implementation.

use super::load_config;
use crate::prompt::TerminalPrompt;
use crate::SnapshotAction;
use anyhow::{Context, Result};
use ordinal_core::{DeleteSelection, RestoreSelection, SnapshotPrompt, SnapshotStore};
use std::path::Path;

#[derive(Debug, Clone)]
pub struct SnapshotOptions {
    pub action: SnapshotAction,
    pub category: Option<String>,
    /// Restore archives whose name contains this token
    pub token: Option<String>,
    pub latest: bool,
    /// Delete selection given on the command line
    pub select: Option<String>,
    pub assume_yes: bool,
}

pub fn run_snapshot(config_path: &Path, options: SnapshotOptions) -> Result<()> {
    let config = load_config(config_path)?;
    let store = SnapshotStore::new(&config);
    let mut prompt = TerminalPrompt::new(options.assume_yes);
    run_with_store(&store, &options, &mut prompt)
}

fn run_with_store(
    store: &SnapshotStore,
    options: &SnapshotOptions,
    prompt: &mut dyn SnapshotPrompt,
) -> Result<()> {
    let category = options.category.as_deref().filter(|c| *c != "all");

    match options.action {
        SnapshotAction::Create => {
            let archived = match category {
                Some(category) => store.snapshot_category(category),
                None => store.snapshot_all(),
            }
            .context("Failed to create snapshot")?;
            tracing::info!("✓ Archived {} file(s)", archived.len());
        }
        SnapshotAction::Restore => {
            let restored = if let Some(token) = &options.token {
                store.restore(category, &RestoreSelection::Matching(token.clone()))
            } else if options.latest {
                store.restore(category, &RestoreSelection::Latest)
            } else {
                store.restore_interactive(category, prompt)
            }
            .context("Failed to restore snapshot")?;
            tracing::info!("✓ Restored {} file(s)", restored.len());
        }
        SnapshotAction::Delete => {
            let deleted = match &options.select {
                Some(input) => {
                    let selection =
                        DeleteSelection::parse(input).context("Invalid delete selection")?;
                    store.delete(&selection, prompt)
                }
                None => store.delete_interactive(prompt),
            }
            .context("Failed to delete snapshots")?;
            tracing::info!("✓ Deleted {} snapshot(s)", deleted);
        }
    }
    Ok(())
}
