//! CLI command implementations.

pub mod cleanup;
pub mod generate;
pub mod setup;
pub mod snapshot;

pub use cleanup::cleanup_site;
pub use generate::{generate_site, GenerateOptions};
pub use setup::setup_site;
pub use snapshot::{run_snapshot, SnapshotOptions};

use anyhow::{Context, Result};
use ordinal_core::Config;
use std::path::Path;

/// Load `ordinal.yml`, falling back to defaults rooted next to it
pub(crate) fn load_config(config_path: &Path) -> Result<Config> {
    tracing::debug!("Loading config from {:?}", config_path);
    Config::from_file_or_default(config_path).context("Failed to load configuration")
}
