//! Built-in email templates, compiled with askama

use askama::Template;

use crate::domain::communication::templates::{
    RenderError, RenderedDocument, TemplateData, TemplateRenderer, BASE_EMAIL_TEMPLATE,
    BASE_URL_FIELD,
};

/// The base email layout
#[derive(Debug, Template)]
#[template(path = "builtin/email.html")]
pub struct BaseEmailTemplate {
    /// Document title
    pub subject: String,

    /// HTML content of the email
    pub content: String,

    /// Site link shown in the footer
    pub base_url: String,
}

impl BaseEmailTemplate {
    /// Builds the template from the `subject`, `content` and `base_url` fields
    pub fn from_data(data: &TemplateData) -> Self {
        let field = |name: &str| data.get_str(name).unwrap_or_default().to_string();

        Self {
            subject: field("subject"),
            content: field("content"),
            base_url: field(BASE_URL_FIELD),
        }
    }
}

/// Renders the templates that ship with the crate
#[derive(Debug, Default, Clone)]
pub struct BuiltinRenderer;

impl BuiltinRenderer {
    /// Create a new built-in renderer
    pub fn new() -> Self {
        Self
    }
}

impl TemplateRenderer for BuiltinRenderer {
    fn has_template(&self, template: &str) -> bool {
        template == BASE_EMAIL_TEMPLATE
    }

    fn render(&self, template: &str, data: &TemplateData) -> Result<RenderedDocument, RenderError> {
        if !self.has_template(template) {
            return Err(RenderError::TemplateNotFound(template.to_string()));
        }

        BaseEmailTemplate::from_data(data)
            .render()
            .map(RenderedDocument::new)
            .map_err(|e| RenderError::Render {
                template: template.to_string(),
                source: e.into(),
            })
    }
}
