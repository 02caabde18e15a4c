//! Template collaborators: context data, template references, renderers and
//! the rendering requirements registry.

mod data;
mod errors;
mod locator;
mod plain_text;
mod reference;
mod renderer;
mod requirements;

pub use data::{TemplateData, BASE_URL_FIELD, IS_EMAIL_FIELD};
pub use errors::RenderError;
pub use locator::{ThemeLocator, BASE_EMAIL_TEMPLATE};
pub use plain_text::html_to_plain;
pub use reference::{normalize_template_id, TemplateReference, TEMPLATE_SUFFIX};
pub use renderer::{RenderedDocument, TemplateRenderer};
pub use requirements::{RenderingRequirements, RequirementsSuspension};

#[cfg(test)]
pub mod tests {
    pub use super::renderer::MockTemplateRenderer;
}
