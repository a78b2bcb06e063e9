//! Runtime templates loaded from the site's templates directory.

use crate::context::PageContext;
use minijinja::{Environment, ErrorKind};
use ordinal_core::{models::Page, Config, SiteIndex};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    #[error("Error rendering template {name}: {source}")]
    Template {
        name: String,
        #[source]
        source: minijinja::Error,
    },
}

/// Renders pages through minijinja templates looked up by file name
///
/// `.html` templates auto-escape, so pre-rendered fields such as `content`
/// must be marked `|safe` in the template.
pub struct Renderer {
    env: Environment<'static>,
}

impl Renderer {
    pub fn new(templates_dir: &Path) -> Self {
        let mut env = Environment::new();
        env.set_loader(minijinja::path_loader(templates_dir));
        Self { env }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.templates_dir())
    }

    /// Render `context` with the named template
    pub fn render(&self, template_name: &str, context: &PageContext) -> Result<String, RenderError> {
        let template = self.env.get_template(template_name).map_err(|e| {
            if e.kind() == ErrorKind::TemplateNotFound {
                RenderError::TemplateNotFound(template_name.to_string())
            } else {
                RenderError::Template {
                    name: template_name.to_string(),
                    source: e,
                }
            }
        })?;

        template.render(context).map_err(|e| RenderError::Template {
            name: template_name.to_string(),
            source: e,
        })
    }

    /// Build a page's context and render it with the page's template
    pub fn render_page(
        &self,
        page: &Page,
        index: &SiteIndex,
        config: &Config,
    ) -> Result<String, RenderError> {
        let template_name = config.template_for(&page.document);
        let context = PageContext::build(page, index, config);
        tracing::debug!(
            "Rendering {} with {}",
            page.document.source_path.display(),
            template_name
        );
        self.render(&template_name, &context)
    }
}
