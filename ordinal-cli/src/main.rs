//! ordinal CLI - publish a markdown digital garden as static HTML.

mod commands;
mod prompt;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ordinal")]
#[command(about = "Static site generator for markdown digital gardens", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to config file
    #[arg(short, long, default_value = "ordinal.yml", global = true)]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the directory layout, default templates and a starter config
    Setup,

    /// Render markdown documents into HTML pages
    Generate {
        /// Only render this category ("all" renders every page)
        #[arg(long)]
        category: Option<String>,

        /// Write stub documents for wikilinks with no target
        #[arg(long)]
        create_missing: bool,

        /// Log what would be written without writing anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Delete generated pages whose markdown source is gone
    Cleanup {
        /// Snapshot the output before deleting anything
        #[arg(long)]
        snapshot: bool,
    },

    /// Create, restore or delete snapshots of generated output
    Snapshot {
        #[arg(long, value_enum)]
        action: SnapshotAction,

        /// Restrict create/restore to one category
        #[arg(long)]
        category: Option<String>,

        /// Restore every archive whose name contains this token
        #[arg(long, conflicts_with = "latest")]
        snapshot: Option<String>,

        /// Restore the most recent snapshot without prompting
        #[arg(long)]
        latest: bool,

        /// Delete selection ("all" or comma-separated indices) instead of prompting
        #[arg(long)]
        select: Option<String>,

        /// Skip the delete confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum SnapshotAction {
    Create,
    Restore,
    Delete,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Setup => commands::setup_site(&cli.config),
        Commands::Generate {
            category,
            create_missing,
            dry_run,
        } => commands::generate_site(
            &cli.config,
            commands::GenerateOptions {
                category,
                create_missing,
                dry_run,
            },
        ),
        Commands::Cleanup { snapshot } => commands::cleanup_site(&cli.config, snapshot),
        Commands::Snapshot {
            action,
            category,
            snapshot,
            latest,
            select,
            yes,
        } => commands::run_snapshot(
            &cli.config,
            commands::SnapshotOptions {
                action,
                category,
                token: snapshot,
                latest,
                select,
                assume_yes: yes,
            },
        ),
    }
}
