//! Handlebars renderer.
//!
//! Generated files are JavaScript, YAML and Markdown, never HTML, so output
//! is not escaped.

use handlebars::Handlebars;
use tracing::instrument;

use molgen_core::{
    application::{ApplicationError, ports::TemplateRenderer},
    error::MolgenResult,
};

/// Renderer backed by a Handlebars registry with HTML escaping disabled.
#[derive(Debug)]
pub struct HandlebarsRenderer {
    registry: Handlebars<'static>,
}

impl HandlebarsRenderer {
    /// Create a new renderer. Missing variables render as empty text.
    pub fn new() -> Self {
        let mut registry = Handlebars::new();
        registry.register_escape_fn(handlebars::no_escape);
        Self { registry }
    }
}

impl Default for HandlebarsRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer for HandlebarsRenderer {
    #[instrument(skip(self, template, data))]
    fn render(&self, name: &str, template: &str, data: &serde_json::Value) -> MolgenResult<String> {
        self.registry.render_template(template, data).map_err(|e| {
            ApplicationError::RenderingFailed {
                template: name.to_owned(),
                reason: e.to_string(),
            }
            .into()
        })
    }
}
