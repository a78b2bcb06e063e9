//! Site building logic - discovery, the link-collection pass, and content upkeep.

use crate::{
    config::Config,
    frontmatter::split_document,
    markdown::{wikilinks::link_targets, LinkResolver, MarkdownProcessor},
    models::*,
    related::RelatedIndex,
    slug::slug_from_path,
};
use regex::Regex;
use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Content subdirectory holding images; never a category
pub const IMAGES_DIR: &str = "images";

/// Stub written for a missing page when `template.md` is absent
const DEFAULT_STUB: &str = "---\ntitle: {title}\ncreated: {created}\nlast_modified: {last_modified}\n---\n\n## {title}\n";

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Content directory not found: {0}")]
    MissingContentRoot(PathBuf),

    #[error("Unknown category: {0}")]
    UnknownCategory(String),
}

/// Main site builder
pub struct SiteBuilder<'a> {
    config: &'a Config,
    processor: MarkdownProcessor,
}

impl<'a> SiteBuilder<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            processor: MarkdownProcessor::new(&config.images_url),
        }
    }

    /// Parse every document and collect the complete link graph
    ///
    /// Nothing is written; rendering happens afterwards against the returned
    /// index, so every page sees every backlink.
    pub fn build(&self) -> Result<SiteIndex, BuildError> {
        let content_dir = self.content_root()?;
        let span = tracing::info_span!("build", content = %content_dir.display());
        let _guard = span.enter();

        let categories = self.discover_categories()?;
        let documents = self.discover_documents()?;
        tracing::info!(
            "Found {} markdown files in {} categories",
            documents.len(),
            categories.len()
        );

        let resolver = self.link_resolver(&documents, &categories);
        let related = RelatedIndex::build(&documents);

        let mut graph = LinkGraph::new();
        let mut pages = Vec::with_capacity(documents.len());
        for document in documents {
            let converted = self.processor.convert(&document.body, &resolver);
            for target in &converted.outgoing_links {
                graph.record(&document.slug, target);
            }
            tracing::debug!(
                "Parsed {} ({} articles, {} links)",
                document.source_path.display(),
                converted.articles.len(),
                converted.outgoing_links.len()
            );

            pages.push(Page {
                document,
                articles: converted.articles,
                toc: converted.toc,
                footnotes: converted.footnotes,
                outgoing_links: converted.outgoing_links,
                external_links: converted.external_links,
            });
        }

        tracing::info!(
            "Built site index with {} pages and {} link targets",
            pages.len(),
            graph.target_count()
        );

        Ok(SiteIndex {
            pages,
            graph,
            related,
            categories,
        })
    }

    /// Pages to render for `category` (`None` or `"all"` selects every page)
    pub fn select_pages<'i>(
        &self,
        index: &'i SiteIndex,
        category: Option<&str>,
    ) -> Result<Vec<&'i Page>, BuildError> {
        match category {
            None | Some("all") => Ok(index.pages.iter().collect()),
            Some(name) if index.categories.iter().any(|c| c == name) => {
                Ok(index.pages_in_category(name).collect())
            }
            Some(name) => Err(BuildError::UnknownCategory(name.to_string())),
        }
    }

    /// Absolute output path for a document
    pub fn output_path(&self, document: &Document) -> PathBuf {
        self.config.public_dir().join(document.output_rel_path())
    }

    /// Top-level content directories that contain markdown, sorted by name
    pub fn discover_categories(&self) -> Result<Vec<String>, BuildError> {
        let content_dir = self.content_root()?;
        let mut categories = Vec::new();

        for entry in fs::read_dir(&content_dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().to_string();
            if name == IMAGES_DIR {
                continue;
            }
            if contains_markdown(&entry.path()) {
                categories.push(name);
            }
        }

        categories.sort();
        tracing::debug!("Categories found: {:?}", categories);
        Ok(categories)
    }

    /// Read and split every markdown file under the content directory
    ///
    /// Unreadable files are logged and skipped.
    pub fn discover_documents(&self) -> Result<Vec<Document>, BuildError> {
        let content_dir = self.content_root()?;
        let ignore_patterns = compile_ignore_patterns(&self.config.ignore_patterns);
        let mut documents = Vec::new();

        for entry in WalkDir::new(&content_dir)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            let path = entry.path();
            if path.extension().map_or(true, |ext| ext != "md") {
                continue;
            }

            let rel = path.strip_prefix(&content_dir).unwrap_or(path).to_path_buf();
            let rel_str = rel.to_string_lossy().replace('\\', "/");
            if rel_str.starts_with(&format!("{}/", IMAGES_DIR)) {
                continue;
            }
            if should_ignore(&rel_str, &ignore_patterns) {
                tracing::debug!("Ignoring {} due to ignore_patterns", rel_str);
                continue;
            }

            let content = match fs::read_to_string(path) {
                Ok(content) => content,
                Err(e) => {
                    tracing::error!("Failed to read {}: {}", path.display(), e);
                    continue;
                }
            };

            let (frontmatter, body) = split_document(&content, &rel_str);
            let (category, kind) = self.classify(&rel);

            documents.push(Document {
                slug: slug_from_path(&rel),
                source_path: rel,
                category,
                kind,
                frontmatter,
                body,
            });
        }

        Ok(documents)
    }

    /// Category folders in wikilink resolution order
    ///
    /// Configured `link_priority` entries come first, then every other
    /// discovered category alphabetically.
    pub fn link_order(&self, categories: &[String]) -> Vec<String> {
        let mut order = self.config.link_priority.clone();
        for category in categories {
            if !order.contains(category) {
                order.push(category.clone());
            }
        }
        order
    }

    /// Write stub pages for wikilink targets that have no document
    ///
    /// Stubs go into the linking page's category (the default category for
    /// root-level pages). Returns the created paths.
    pub fn create_missing_pages(&self) -> Result<Vec<PathBuf>, BuildError> {
        let content_dir = self.content_root()?;
        let documents = self.discover_documents()?;
        let mut known: HashSet<String> = documents.iter().map(|d| d.slug.clone()).collect();

        let template_path = self.config.templates_dir().join("template.md");
        let template = match fs::read_to_string(&template_path) {
            Ok(template) => template,
            Err(_) => {
                tracing::warn!(
                    "Stub template not found at {}; using built-in stub",
                    template_path.display()
                );
                DEFAULT_STUB.to_string()
            }
        };

        let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let mut created = Vec::new();

        for document in &documents {
            for (target, slug) in link_targets(&document.body) {
                if known.contains(&slug) {
                    continue;
                }
                if !is_file_name_slug(&slug) {
                    tracing::warn!(
                        "Not creating a page for [[{}]] linked from {}: not a plain file name",
                        target,
                        document.source_path.display()
                    );
                    known.insert(slug);
                    continue;
                }

                let path = content_dir
                    .join(&document.category)
                    .join(format!("{}.md", slug));
                if path.exists() {
                    known.insert(slug);
                    continue;
                }

                let stub = template
                    .replace("{title}", &title_case(&target))
                    .replace("{created}", &now)
                    .replace("{last_modified}", &now);
                if let Err(err) = write_stub(&path, &stub) {
                    tracing::error!("Failed to create {}: {}", path.display(), err);
                    continue;
                }
                tracing::info!("Created missing file: {}", path.display());

                known.insert(slug);
                created.push(path);
            }
        }

        Ok(created)
    }

    /// Copy `content/images` into `public/images`, keeping relative paths
    pub fn merge_images(&self) -> Result<usize, BuildError> {
        let source_dir = self.config.content_dir().join(IMAGES_DIR);
        let dest_dir = self.config.public_dir().join(IMAGES_DIR);

        if !source_dir.is_dir() {
            tracing::info!(
                "Source images directory does not exist: {}. Skipping.",
                source_dir.display()
            );
            return Ok(0);
        }

        let mut copied = 0;
        for entry in WalkDir::new(&source_dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            let rel = entry
                .path()
                .strip_prefix(&source_dir)
                .unwrap_or(entry.path());
            let dest = dest_dir.join(rel);
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &dest)?;
            tracing::debug!("Copied image: {} -> {}", entry.path().display(), dest.display());
            copied += 1;
        }

        tracing::info!("Copied {} images", copied);
        Ok(copied)
    }

    /// Delete generated HTML whose markdown source no longer exists
    ///
    /// Only each category's output directory is swept; the index page and
    /// the images directory are left alone.
    pub fn cleanup_orphans(&self) -> Result<Vec<PathBuf>, BuildError> {
        let categories = self.discover_categories()?;
        let documents = self.discover_documents()?;
        let public_dir = self.config.public_dir();

        let expected: HashSet<PathBuf> = documents
            .iter()
            .map(|d| public_dir.join(d.output_rel_path()))
            .collect();

        let mut removed = Vec::new();
        for category in &categories {
            let output_dir = public_dir.join(category);
            if !output_dir.is_dir() {
                continue;
            }

            for entry in WalkDir::new(&output_dir)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
            {
                let path = entry.path();
                if path.extension().map_or(true, |ext| ext != "html") || expected.contains(path) {
                    continue;
                }
                fs::remove_file(path)?;
                tracing::info!("Deleted orphaned HTML file: {}", path.display());
                removed.push(path.to_path_buf());
            }
        }

        Ok(removed)
    }

    fn content_root(&self) -> Result<PathBuf, BuildError> {
        let content_dir = self.config.content_dir();
        if content_dir.is_dir() {
            Ok(content_dir)
        } else {
            Err(BuildError::MissingContentRoot(content_dir))
        }
    }

    fn classify(&self, rel: &Path) -> (String, PageKind) {
        let parts: Vec<String> = rel
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy().to_string()),
                _ => None,
            })
            .collect();
        let stem = rel
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        match parts.as_slice() {
            [_] if stem == "index" => (self.config.default_category.clone(), PageKind::Index),
            [_] => (self.config.default_category.clone(), PageKind::Article),
            [dir, _] if *dir == stem => (dir.clone(), PageKind::Section),
            [dir, ..] => (dir.clone(), PageKind::Article),
            [] => (self.config.default_category.clone(), PageKind::Article),
        }
    }

    fn link_resolver(&self, documents: &[Document], categories: &[String]) -> LinkResolver {
        let mut resolver =
            LinkResolver::new(self.link_order(categories), &self.config.default_category);
        for document in documents {
            resolver.insert(&document.slug, &document.category, &document.url());
        }
        resolver
    }
}

fn contains_markdown(dir: &Path) -> bool {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .any(|e| e.file_type().is_file() && e.path().extension().is_some_and(|ext| ext == "md"))
}

fn compile_ignore_patterns(patterns: &[String]) -> Vec<Regex> {
    let mut compiled = Vec::new();
    for pat in patterns {
        match Regex::new(pat) {
            Ok(re) => compiled.push(re),
            Err(err) => tracing::warn!("Invalid ignore pattern '{}': {}", pat, err),
        }
    }
    compiled
}

fn should_ignore(path: &str, ignores: &[Regex]) -> bool {
    ignores.iter().any(|re| re.is_match(path))
}

/// A slug usable as a single file name inside its category directory
fn is_file_name_slug(slug: &str) -> bool {
    !slug.contains(['/', '\\']) && !slug.starts_with('.') && !slug.contains("..")
}

fn write_stub(path: &Path, stub: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, stub)
}

/// Capitalize the first letter of each word and lowercase the rest
fn title_case(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
