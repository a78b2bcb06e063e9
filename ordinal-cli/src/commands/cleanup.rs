//! Cleanup command implementation.

use super::load_config;
use anyhow::{Context, Result};
use ordinal_core::{Config, SiteBuilder, SnapshotStore};
use std::path::Path;

/// Remove generated pages whose markdown source was deleted
pub fn cleanup_site(config_path: &Path, snapshot_first: bool) -> Result<()> {
    let config = load_config(config_path)?;
    cleanup_with_config(&config, snapshot_first)
}

pub fn cleanup_with_config(config: &Config, snapshot_first: bool) -> Result<()> {
    if snapshot_first {
        let archived = SnapshotStore::new(config)
            .snapshot_all()
            .context("Failed to snapshot output before cleanup")?;
        tracing::info!("Snapshotted {} file(s) before cleanup", archived.len());
    }

    let removed = SiteBuilder::new(config)
        .cleanup_orphans()
        .context("Failed to clean up generated pages")?;

    if removed.is_empty() {
        tracing::info!("No orphaned pages found");
    } else {
        tracing::info!("✓ Removed {} orphaned page(s)", removed.len());
    }
    Ok(())
}
