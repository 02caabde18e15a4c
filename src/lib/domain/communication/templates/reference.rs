//! Template references

/// Suffix stripped from configured template identifiers
pub const TEMPLATE_SUFFIX: &str = ".ss";

/// Strips [`TEMPLATE_SUFFIX`] from a template identifier
pub fn normalize_template_id(template: &str) -> &str {
    template.strip_suffix(TEMPLATE_SUFFIX).unwrap_or(template)
}

/// The HTML and plain templates configured for a message
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TemplateReference {
    html: Option<String>,
    plain: Option<String>,
}

impl TemplateReference {
    /// Creates a reference from optional identifiers, normalizing both
    pub fn new(html: Option<&str>, plain: Option<&str>) -> Self {
        let mut reference = Self::default();
        reference.set_html(html.unwrap_or_default());
        reference.set_plain(plain.unwrap_or_default());
        reference
    }

    /// The HTML template, if configured
    pub fn html(&self) -> Option<&str> {
        self.html.as_deref()
    }

    /// The plain template, if configured
    pub fn plain(&self) -> Option<&str> {
        self.plain.as_deref()
    }

    /// Sets the HTML template. An empty identifier clears it.
    pub fn set_html(&mut self, template: &str) {
        self.html = configured(template);
    }

    /// Sets the plain template. An empty identifier clears it.
    pub fn set_plain(&mut self, template: &str) {
        self.plain = configured(template);
    }

    /// Whether neither template is configured
    pub fn is_empty(&self) -> bool {
        self.html.is_none() && self.plain.is_none()
    }
}

fn configured(template: &str) -> Option<String> {
    let template = normalize_template_id(template);

    (!template.is_empty()).then(|| template.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suffix_is_stripped() {
        let mut reference = TemplateReference::default();
        reference.set_html("foo.ss");
        reference.set_plain("emails/foo_plain.ss");

        assert_eq!(reference.html(), Some("foo"));
        assert_eq!(reference.plain(), Some("emails/foo_plain"));
    }

    #[test]
    fn test_other_suffixes_are_kept() {
        let reference = TemplateReference::new(Some("welcome.html"), None);

        assert_eq!(reference.html(), Some("welcome.html"));
    }

    #[test]
    fn test_empty_identifier_means_not_configured() {
        let reference = TemplateReference::new(Some(""), Some(".ss"));

        assert!(reference.is_empty());
    }
}
