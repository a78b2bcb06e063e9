//! Setup command implementation.

use super::load_config;
use anyhow::{Context, Result};
use ordinal_core::Config;
use std::fs;
use std::path::Path;

const DEFAULT_CONFIG: &str = include_str!("../../assets/ordinal.yml");

/// Templates copied into a fresh templates directory
const DEFAULT_TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("../../assets/templates/base.html")),
    ("_meta.html", include_str!("../../assets/templates/_meta.html")),
    ("_links.html", include_str!("../../assets/templates/_links.html")),
    ("index.html", include_str!("../../assets/templates/index.html")),
    ("section.html", include_str!("../../assets/templates/section.html")),
    ("articles.html", include_str!("../../assets/templates/articles.html")),
    ("notes.html", include_str!("../../assets/templates/notes.html")),
    ("template.md", include_str!("../../assets/templates/template.md")),
];

const STARTER_CATEGORIES: &[&str] = &["articles", "notes"];

/// Scaffold a site next to `config_path`; existing files are left alone
pub fn setup_site(config_path: &Path) -> Result<()> {
    write_if_missing(config_path, DEFAULT_CONFIG)?;

    let config = load_config(config_path)?;
    scaffold(&config)?;

    println!("✓ ordinal site ready");
    println!("  - Edit {} to customize site metadata", config_path.display());
    println!("  - Write documents in {:?}", config.content_dir());
    println!("  - Run `ordinal generate` to build {:?}", config.public_dir());
    Ok(())
}

fn scaffold(config: &Config) -> Result<()> {
    let content = config.content_dir();
    for dir in [
        content.clone(),
        config.templates_dir(),
        config.public_dir(),
        config.snapshots_dir(),
    ] {
        fs::create_dir_all(&dir).with_context(|| format!("Failed to create {:?}", dir))?;
    }

    for category in STARTER_CATEGORIES {
        let dir = content.join(category);
        fs::create_dir_all(&dir).with_context(|| format!("Failed to create {:?}", dir))?;
    }

    write_if_missing(&content.join("index.md"), &starter_index())?;
    write_if_missing(&content.join("articles/welcome.md"), &starter_article())?;

    let templates = config.templates_dir();
    for (name, body) in DEFAULT_TEMPLATES {
        write_if_missing(&templates.join(name), body)?;
    }
    Ok(())
}

fn write_if_missing(path: &Path, contents: &str) -> Result<()> {
    if path.exists() {
        println!("{} already exists; leaving it", path.display());
        return Ok(());
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("Failed to create {:?}", parent))?;
    }
    fs::write(path, contents).with_context(|| format!("Failed to write {:?}", path))?;
    println!("Created {}", path.display());
    Ok(())
}

fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

fn starter_index() -> String {
    format!(
        r#"---
title: Home
description: Start here
created: {today}
last_modified: {today}
---

## Welcome

This garden is built with ordinal. Start with [[Welcome]].
"#,
        today = today()
    )
}

fn starter_article() -> String {
    format!(
        r#"---
title: Welcome
description: How this garden works
created: {today}
last_modified: {today}
domain: [meta]
---

## Writing

Documents live in category folders under `content/`. Link one by wrapping
its title in double square brackets, and add **bold**, _italics_ and
footnotes[^1].

### Images

Put images in `content/images/` and embed them by file name.

[^1]: Footnotes collect at the bottom of the page.
"#,
        today = today()
    )
}
