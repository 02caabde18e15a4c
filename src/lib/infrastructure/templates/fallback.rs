//! Renderer trying a primary engine before a secondary one

use crate::domain::communication::templates::{
    RenderError, RenderedDocument, TemplateData, TemplateRenderer,
};

/// Renders with `P` when it has the template, with `S` otherwise
#[derive(Debug, Default, Clone)]
pub struct FallbackRenderer<P, S> {
    primary: P,
    secondary: S,
}

impl<P, S> FallbackRenderer<P, S>
where
    P: TemplateRenderer,
    S: TemplateRenderer,
{
    /// Create a new fallback renderer
    pub fn new(primary: P, secondary: S) -> Self {
        Self { primary, secondary }
    }
}

impl<P, S> TemplateRenderer for FallbackRenderer<P, S>
where
    P: TemplateRenderer,
    S: TemplateRenderer,
{
    fn has_template(&self, template: &str) -> bool {
        self.primary.has_template(template) || self.secondary.has_template(template)
    }

    fn render(&self, template: &str, data: &TemplateData) -> Result<RenderedDocument, RenderError> {
        if self.primary.has_template(template) {
            self.primary.render(template, data)
        } else {
            self.secondary.render(template, data)
        }
    }
}

#[cfg(test)]
mod tests {
    use mockall::predicate::{always, eq};
    use testresult::TestResult;

    use crate::domain::communication::templates::tests::MockTemplateRenderer;

    use super::*;

    fn renderer(name: &'static str, output: &'static str) -> MockTemplateRenderer {
        let mut renderer = MockTemplateRenderer::new();
        renderer
            .expect_has_template()
            .returning(move |template| template == name);
        renderer
            .expect_render()
            .with(eq(name), always())
            .returning(move |_, _| Ok(RenderedDocument::new(output)));
        renderer
    }

    #[test]
    fn test_primary_wins() -> TestResult {
        let fallback = FallbackRenderer::new(
            renderer("Email", "primary"),
            renderer("Email", "secondary"),
        );

        assert_eq!(fallback.render("Email", &TemplateData::new())?.as_str(), "primary");

        Ok(())
    }

    #[test]
    fn test_secondary_used_when_primary_lacks_template() -> TestResult {
        let fallback = FallbackRenderer::new(
            renderer("Welcome", "primary"),
            renderer("Email", "secondary"),
        );

        assert!(fallback.has_template("Welcome"));
        assert!(fallback.has_template("Email"));
        assert_eq!(fallback.render("Email", &TemplateData::new())?.as_str(), "secondary");

        Ok(())
    }

    #[test]
    fn test_missing_everywhere_is_reported_by_secondary() {
        let mut secondary = MockTemplateRenderer::new();
        secondary.expect_has_template().return_const(false);
        secondary
            .expect_render()
            .returning(|template, _| Err(RenderError::TemplateNotFound(template.to_string())));

        let fallback = FallbackRenderer::new(renderer("Welcome", "primary"), secondary);

        assert!(!fallback.has_template("Missing"));
        assert!(matches!(
            fallback.render("Missing", &TemplateData::new()),
            Err(RenderError::TemplateNotFound(_))
        ));
    }
}
