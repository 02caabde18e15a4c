//! Template renderer seam

use std::fmt;

#[cfg(test)]
use mockall::mock;

use super::{html_to_plain, RenderError, TemplateData};

/// The output of rendering a template
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderedDocument {
    html: String,
}

impl RenderedDocument {
    /// Wraps rendered HTML
    pub fn new(html: impl Into<String>) -> Self {
        Self { html: html.into() }
    }

    /// The rendered HTML
    pub fn as_str(&self) -> &str {
        &self.html
    }

    /// The rendered output as plain text
    pub fn plain(&self) -> String {
        html_to_plain(&self.html)
    }
}

impl fmt::Display for RenderedDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.html)
    }
}

impl From<RenderedDocument> for String {
    fn from(document: RenderedDocument) -> Self {
        document.html
    }
}

/// Renders named templates against [`TemplateData`]
pub trait TemplateRenderer: Send + Sync + 'static {
    /// Whether `template` can be rendered
    fn has_template(&self, template: &str) -> bool;

    /// Renders `template` against `data`
    ///
    /// # Errors
    /// [`RenderError::TemplateNotFound`] when the template is unknown, or
    /// [`RenderError::Render`] when the engine fails.
    fn render(&self, template: &str, data: &TemplateData) -> Result<RenderedDocument, RenderError>;
}

#[cfg(test)]
mock! {
    pub TemplateRenderer {}

    impl TemplateRenderer for TemplateRenderer {
        fn has_template(&self, template: &str) -> bool;
        fn render(
            &self,
            template: &str,
            data: &TemplateData,
        ) -> Result<RenderedDocument, RenderError>;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rendered_document_plain() {
        let document = RenderedDocument::new("<p>Hello &amp; welcome</p>");

        assert_eq!(document.plain(), "Hello & welcome");
        assert_eq!(document.to_string(), "<p>Hello &amp; welcome</p>");
    }
}
