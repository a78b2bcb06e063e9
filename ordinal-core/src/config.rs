//! Configuration parsing and management.

use crate::models::{Document, PageKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    ParseError(#[from] serde_yaml::Error),
}

/// Main configuration struct matching the ordinal.yml schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,

    #[serde(default)]
    pub paths: PathsConfig,

    /// Category assigned to documents that live directly in the content root
    #[serde(default = "default_category")]
    pub default_category: String,

    /// Folder order consulted when resolving `[[wikilinks]]`
    #[serde(default = "default_link_priority")]
    pub link_priority: Vec<String>,

    /// URL prefix that image sources are rewritten under
    #[serde(default = "default_images_url")]
    pub images_url: String,

    /// Category name -> template file name
    #[serde(default)]
    pub templates: HashMap<String, String>,

    #[serde(default = "default_index_template")]
    pub index_template: String,

    #[serde(default = "default_section_template")]
    pub section_template: String,

    #[serde(default)]
    pub ignore_patterns: Vec<String>,

    // Internal: path to config file (for relative path resolution)
    #[serde(skip)]
    config_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "default_title")]
    pub title: String,

    #[serde(default = "default_description")]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "default_content_dir")]
    pub content: PathBuf,

    #[serde(default = "default_templates_dir")]
    pub templates: PathBuf,

    #[serde(default = "default_public_dir")]
    pub public: PathBuf,

    #[serde(default = "default_snapshots_dir")]
    pub snapshots: PathBuf,
}

fn default_title() -> String {
    String::from("Default Title")
}

fn default_description() -> String {
    String::from("Default Description")
}

fn default_category() -> String {
    String::from("articles")
}

fn default_link_priority() -> Vec<String> {
    vec![String::from("articles"), String::from("notes")]
}

fn default_images_url() -> String {
    String::from("/images/")
}

fn default_index_template() -> String {
    String::from("index.html")
}

fn default_section_template() -> String {
    String::from("section.html")
}

fn default_content_dir() -> PathBuf {
    PathBuf::from("content")
}

fn default_templates_dir() -> PathBuf {
    PathBuf::from("templates")
}

fn default_public_dir() -> PathBuf {
    PathBuf::from("public")
}

fn default_snapshots_dir() -> PathBuf {
    PathBuf::from("snapshots")
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            description: default_description(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            content: default_content_dir(),
            templates: default_templates_dir(),
            public: default_public_dir(),
            snapshots: default_snapshots_dir(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            site: SiteConfig::default(),
            paths: PathsConfig::default(),
            default_category: default_category(),
            link_priority: default_link_priority(),
            images_url: default_images_url(),
            templates: HashMap::new(),
            index_template: default_index_template(),
            section_template: default_section_template(),
            ignore_patterns: Vec::new(),
            config_path: None,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let mut config: Config = serde_yaml::from_str(&contents)?;

        // Store config file path for relative path resolution
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Load configuration, falling back to defaults rooted next to `path`
    /// when the file does not exist.
    pub fn from_file_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            return Self::from_file(path);
        }

        tracing::debug!("No config at {:?}; using defaults", path);
        Ok(Self::rooted_at(path))
    }

    /// Default configuration whose relative paths resolve next to `config_path`
    pub fn rooted_at<P: AsRef<Path>>(config_path: P) -> Self {
        Self {
            config_path: Some(config_path.as_ref().to_path_buf()),
            ..Self::default()
        }
    }

    /// Default configuration with every directory under `root`
    pub fn for_root<P: AsRef<Path>>(root: P) -> Self {
        Self::rooted_at(root.as_ref().join("ordinal.yml"))
    }

    /// Get the content directory, resolved relative to config file
    pub fn content_dir(&self) -> PathBuf {
        self.resolve_path(&self.paths.content)
    }

    /// Get the templates directory, resolved relative to config file
    pub fn templates_dir(&self) -> PathBuf {
        self.resolve_path(&self.paths.templates)
    }

    /// Get the public (output) directory, resolved relative to config file
    pub fn public_dir(&self) -> PathBuf {
        self.resolve_path(&self.paths.public)
    }

    /// Get the snapshot archive directory, resolved relative to config file
    pub fn snapshots_dir(&self) -> PathBuf {
        self.resolve_path(&self.paths.snapshots)
    }

    /// Template used for pages of an ordinary category
    pub fn template_for_category(&self, category: &str) -> String {
        self.templates
            .get(category)
            .cloned()
            .unwrap_or_else(|| format!("{}.html", category))
    }

    /// Template for one document
    ///
    /// A `template` key in front matter wins; otherwise the page kind picks
    /// the index or section template, and articles use their category's.
    pub fn template_for(&self, document: &Document) -> String {
        if let Some(template) = &document.frontmatter.template {
            return template.clone();
        }
        match document.kind {
            PageKind::Index => self.index_template.clone(),
            PageKind::Section => self.section_template.clone(),
            PageKind::Article => self.template_for_category(&document.category),
        }
    }

    /// Resolve a path relative to the config file location
    fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else if let Some(config_path) = &self.config_path {
            if let Some(parent) = config_path.parent() {
                parent.join(path)
            } else {
                path.to_path_buf()
            }
        } else {
            path.to_path_buf()
        }
    }
}
