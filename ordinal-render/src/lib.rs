//! # ordinal-render
//!
//! Template rendering library for ordinal.
//!
//! This crate assembles the per-page template context and renders it with
//! minijinja templates loaded from the site's templates directory.

pub mod context;
pub mod templates;

pub use context::{ArticleSummary, BacklinkEntry, MetaItem, PageContext};
pub use templates::{RenderError, Renderer};
