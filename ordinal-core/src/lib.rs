//! # ordinal-core
//!
//! Core library for the ordinal static site generator.
//!
//! This crate turns a tree of markdown documents into a parsed site index:
//! configuration, front matter, the markup pipeline, backlink and related
//! article indexes, and the snapshot store for generated output.

pub mod builder;
pub mod config;
pub mod frontmatter;
pub mod markdown;
pub mod models;
pub mod related;
pub mod slug;
pub mod snapshot;

pub use builder::{BuildError, SiteBuilder};
pub use config::{Config, ConfigError};
pub use frontmatter::FrontmatterError;
pub use models::{
    Article, Document, ExternalLink, Frontmatter, LinkGraph, Page, PageKind, SiteIndex, TocEntry,
};
pub use related::{RelatedArticle, RelatedEntry, RelatedIndex};
pub use slug::slugify;
pub use snapshot::{
    DeleteSelection, RestoreSelection, SnapshotEntry, SnapshotError, SnapshotPrompt, SnapshotStore,
};
