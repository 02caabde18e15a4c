//! Theme-aware template lookup

use tracing::debug;

use super::TemplateRenderer;

/// Name of the base email template every email kind falls back to
pub const BASE_EMAIL_TEMPLATE: &str = "Email";

/// Finds templates across an ordered list of themes
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ThemeLocator {
    themes: Vec<String>,
}

impl ThemeLocator {
    /// Creates a locator searching `themes` in order
    pub fn new(themes: Vec<String>) -> Self {
        let themes = themes
            .into_iter()
            .map(|t| t.trim().trim_matches('/').to_string())
            .filter(|t| !t.is_empty())
            .collect();

        Self { themes }
    }

    /// The configured themes
    pub fn themes(&self) -> &[String] {
        &self.themes
    }

    /// Candidate template names for an email kind, most specific first
    pub fn candidates_for_kind(kind: &str) -> Vec<String> {
        let mut candidates = vec![kind.to_string()];

        if kind != BASE_EMAIL_TEMPLATE {
            candidates.push(BASE_EMAIL_TEMPLATE.to_string());
        }

        candidates
    }

    /// Returns the first candidate the renderer has, trying `<theme>/<name>`
    /// for each theme before the bare name.
    pub fn find_template<R>(&self, candidates: &[String], renderer: &R) -> Option<String>
    where
        R: TemplateRenderer + ?Sized,
    {
        let found = candidates.iter().find_map(|candidate| {
            self.themes
                .iter()
                .map(|theme| format!("{theme}/{candidate}"))
                .chain(std::iter::once(candidate.clone()))
                .find(|name| renderer.has_template(name))
        });

        debug!(?candidates, ?found, "template lookup");

        found
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::communication::templates::tests::MockTemplateRenderer;

    use super::*;

    fn renderer_with(names: &'static [&'static str]) -> MockTemplateRenderer {
        let mut renderer = MockTemplateRenderer::new();
        renderer
            .expect_has_template()
            .returning(move |name| names.contains(&name));
        renderer
    }

    #[test]
    fn test_candidates_for_kind() {
        assert_eq!(
            ThemeLocator::candidates_for_kind("WelcomeEmail"),
            vec!["WelcomeEmail", "Email"]
        );
        assert_eq!(ThemeLocator::candidates_for_kind("Email"), vec!["Email"]);
    }

    #[test]
    fn test_theme_order_is_respected() {
        let renderer = renderer_with(&["base/WelcomeEmail", "custom/WelcomeEmail"]);
        let locator = ThemeLocator::new(vec!["custom".into(), "base".into()]);

        let candidates = ThemeLocator::candidates_for_kind("WelcomeEmail");
        let found = locator.find_template(&candidates, &renderer);

        assert_eq!(found.as_deref(), Some("custom/WelcomeEmail"));
    }

    #[test]
    fn test_specific_kind_beats_base_template() {
        let renderer = renderer_with(&["custom/Email", "WelcomeEmail"]);
        let locator = ThemeLocator::new(vec!["custom".into()]);

        let candidates = ThemeLocator::candidates_for_kind("WelcomeEmail");
        let found = locator.find_template(&candidates, &renderer);

        assert_eq!(found.as_deref(), Some("WelcomeEmail"));
    }

    #[test]
    fn test_falls_back_to_base_template() {
        let renderer = renderer_with(&["Email"]);
        let locator = ThemeLocator::new(vec!["custom/".into(), " ".into()]);

        assert_eq!(locator.themes(), &["custom".to_string()]);

        let candidates = ThemeLocator::candidates_for_kind("WelcomeEmail");
        let found = locator.find_template(&candidates, &renderer);

        assert_eq!(found.as_deref(), Some("Email"));
    }

    #[test]
    fn test_nothing_found() {
        let renderer = renderer_with(&[]);
        let locator = ThemeLocator::default();

        assert_eq!(locator.find_template(&["Missing".to_string()], &renderer), None);
    }
}
