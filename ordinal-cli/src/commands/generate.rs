//! Generate command implementation.

use super::load_config;
use anyhow::{Context, Result};
use ordinal_core::{models::Page, Config, SiteBuilder, SiteIndex};
use ordinal_render::Renderer;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    pub category: Option<String>,
    pub create_missing: bool,
    pub dry_run: bool,
}

/// Build the site and write the selected pages
pub fn generate_site(config_path: &Path, options: GenerateOptions) -> Result<()> {
    let config = load_config(config_path)?;
    generate_with_config(&config, &options)
}

pub fn generate_with_config(config: &Config, options: &GenerateOptions) -> Result<()> {
    let builder = SiteBuilder::new(config);

    if options.create_missing {
        if options.dry_run {
            tracing::info!("Dry run: not creating missing pages");
        } else {
            let created = builder
                .create_missing_pages()
                .context("Failed to create missing pages")?;
            tracing::info!("Created {} missing page(s)", created.len());
        }
    }

    let index = builder.build().context("Failed to build site")?;
    let pages = builder
        .select_pages(&index, options.category.as_deref())
        .context("Failed to select pages")?;

    tracing::info!(
        "Parsed {} documents; rendering {}",
        index.pages.len(),
        pages.len()
    );

    if options.dry_run {
        for page in &pages {
            tracing::info!(
                "Would write {} using {}",
                builder.output_path(&page.document).display(),
                config.template_for(&page.document)
            );
        }
        return Ok(());
    }

    let renderer = Renderer::from_config(config);
    let mut written = 0;
    let mut failed = 0;
    for page in &pages {
        match write_page(&builder, &renderer, page, &index, config) {
            Ok(()) => written += 1,
            Err(err) => {
                tracing::error!(
                    "Failed to generate {}: {:#}",
                    page.document.source_path.display(),
                    err
                );
                failed += 1;
            }
        }
    }

    if let Err(err) = builder.merge_images() {
        tracing::error!("Failed to copy images: {}", err);
    }

    tracing::info!("✓ Generated {} page(s)", written);
    if failed > 0 {
        tracing::warn!("{} page(s) failed", failed);
    }
    tracing::info!("✓ Output written to {:?}", config.public_dir());
    Ok(())
}

fn write_page(
    builder: &SiteBuilder<'_>,
    renderer: &Renderer,
    page: &Page,
    index: &SiteIndex,
    config: &Config,
) -> Result<()> {
    let html = renderer.render_page(page, index, config)?;
    let output = builder.output_path(&page.document);
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent).with_context(|| format!("Failed to create {:?}", parent))?;
    }
    fs::write(&output, html).with_context(|| format!("Failed to write {:?}", output))?;
    tracing::debug!("Generated: {}", output.display());
    Ok(())
}
