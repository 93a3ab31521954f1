//! Rendering of declaration models into `.d.ts` text
//!
//! This crate stamps a [`DeclarationModel`] into TypeScript declaration
//! source through Tera templates. Rendering is deterministic: the same model
//! always yields byte-identical text, with declarations and imports in the
//! order the model fixes.

mod templates;

pub use templates::DECLARATION_TEMPLATE;

use protoc_gen_tsd_common::{DeclarationModel, Result, TsdError};
use tera::Tera;
use tracing::debug;

/// Turns a declaration model into file content
pub trait Renderer {
    /// Render `model` with the template named `template`
    fn render(&self, template: &str, model: &DeclarationModel) -> Result<String>;
}

/// Tera-backed renderer over the embedded templates
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    pub fn new() -> Result<Self> {
        let tera = templates::load_templates()?;
        Ok(Self { tera })
    }
}

impl Renderer for TemplateRenderer {
    fn render(&self, template: &str, model: &DeclarationModel) -> Result<String> {
        let context = tera::Context::from_serialize(model).map_err(|e| TsdError::Render {
            template: template.to_string(),
            message: format!("failed to build context: {}", templates::error_chain(&e)),
        })?;

        let rendered = self
            .tera
            .render(template, &context)
            .map_err(|e| TsdError::Render {
                template: template.to_string(),
                message: templates::error_chain(&e),
            })?;

        debug!(
            file = %model.file_name,
            template,
            bytes = rendered.len(),
            "rendered declarations"
        );

        Ok(rendered)
    }
}
