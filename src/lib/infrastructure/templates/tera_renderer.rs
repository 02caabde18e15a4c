//! Tera template renderer

use std::{collections::HashMap, path::PathBuf};

use clap::Parser;
use serde_json::Value;
use tera::{Context, Tera};
use tracing::debug;

use crate::domain::communication::templates::{
    RenderError, RenderedDocument, RenderingRequirements, TemplateData, TemplateRenderer,
};

/// Extensions tried, in order, when a template identifier has no exact match
pub const TEMPLATE_EXTENSIONS: &[&str] = &["html", "txt", "tera"];

/// Template configuration
#[derive(Clone, Debug, Parser)]
pub struct TemplatesConfig {
    /// Directory Tera templates are loaded from
    #[clap(long, env = "TEMPLATES_DIR", default_value = "themes")]
    pub templates_dir: PathBuf,

    /// Themes searched for default email templates, in order
    #[clap(long, env = "THEMES", value_delimiter = ',')]
    pub themes: Vec<String>,
}

/// Renders Tera templates
///
/// Templates get an `absolute_link(path=...)` function prefixing `path`
/// with the site's base URL.
#[derive(Debug)]
pub struct TeraRenderer {
    tera: Tera,
    requirements: Option<RenderingRequirements>,
}

impl TeraRenderer {
    /// Loads every template under `config.templates_dir`
    pub fn new(config: &TemplatesConfig, base_url: &str) -> Result<Self, RenderError> {
        let glob = format!("{}/**/*", config.templates_dir.display());

        let tera = Tera::new(&glob).map_err(|e| RenderError::Render {
            template: glob.clone(),
            source: e.into(),
        })?;

        debug!(
            templates = tera.get_template_names().count(),
            %glob,
            "loaded templates"
        );

        Ok(Self::from_tera(tera, base_url))
    }

    /// Wraps an existing Tera instance
    pub fn from_tera(mut tera: Tera, base_url: &str) -> Self {
        tera.register_function("absolute_link", absolute_link(base_url));

        Self {
            tera,
            requirements: None,
        }
    }

    /// Injects `requirements` into rendered HTML documents while the
    /// registry is not suspended
    pub fn with_requirements(mut self, requirements: RenderingRequirements) -> Self {
        self.requirements = Some(requirements);
        self
    }

    /// The name of the loaded template `template` refers to
    pub fn resolve(&self, template: &str) -> Option<String> {
        let mut candidates = std::iter::once(template.to_string())
            .chain(TEMPLATE_EXTENSIONS.iter().map(|ext| format!("{template}.{ext}")));

        candidates.find(|candidate| {
            self.tera
                .get_template_names()
                .any(|name| name == candidate.as_str())
        })
    }
}

fn absolute_link(base_url: &str) -> impl tera::Function {
    let base_url = base_url.trim_end_matches('/').to_string();

    move |args: &HashMap<String, Value>| -> tera::Result<Value> {
        let path = match args.get("path") {
            Some(Value::String(path)) => path.as_str(),
            Some(other) => {
                return Err(tera::Error::msg(format!(
                    "absolute_link: `path` must be a string, got {other}"
                )))
            }
            None => "",
        };

        Ok(Value::String(format!("{base_url}{path}")))
    }
}

impl TemplateRenderer for TeraRenderer {
    fn has_template(&self, template: &str) -> bool {
        self.resolve(template).is_some()
    }

    fn render(&self, template: &str, data: &TemplateData) -> Result<RenderedDocument, RenderError> {
        let name = self
            .resolve(template)
            .ok_or_else(|| RenderError::TemplateNotFound(template.to_string()))?;

        let context = Context::from_serialize(data.to_map())
            .map_err(|e| RenderError::InvalidData(e.to_string()))?;

        let html = self
            .tera
            .render(&name, &context)
            .map_err(|e| RenderError::Render {
                template: name.clone(),
                source: e.into(),
            })?;

        let html = match &self.requirements {
            Some(requirements) => requirements.include_in_html(&html),
            None => html,
        };

        Ok(RenderedDocument::new(html))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use testresult::TestResult;

    use crate::{
        domain::communication::{
            email::{EmailConfig, EmailOptions, EmailService},
            templates::ThemeLocator,
        },
        infrastructure::{
            email::memory::MemoryMailer,
            templates::{builtin::BuiltinRenderer, fallback::FallbackRenderer},
        },
    };

    use super::*;

    const PAGE: &str = "<html><head><title>{{ title }}</title></head>\
                        <body><p>Hello {{ name }}</p></body></html>";

    fn tera() -> TestResult<Tera> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            ("Welcome.html", "<p>Hello {{ name }}</p>"),
            ("WelcomePlain.txt", "Hello {{ name }}, visit {{ absolute_link(path=\"/account\") }}"),
            ("Page.html", PAGE),
            ("custom/WelcomeEmail.html", "<p>Custom welcome for {{ name }}</p>"),
            ("Broken.html", "{{ missing_variable }}"),
            ("Signature.txt", "Regards, {{ base_url }}"),
        ])?;

        Ok(tera)
    }

    fn renderer() -> TestResult<TeraRenderer> {
        Ok(TeraRenderer::from_tera(tera()?, "https://www.example.com/"))
    }

    fn data(name: &str) -> TemplateData {
        let mut data = TemplateData::new();
        data.insert("name", name);
        data.insert("title", "Page");
        data
    }

    #[test]
    fn test_resolve_tries_extensions() -> TestResult {
        let renderer = renderer()?;

        assert_eq!(renderer.resolve("Welcome").as_deref(), Some("Welcome.html"));
        assert_eq!(renderer.resolve("WelcomePlain").as_deref(), Some("WelcomePlain.txt"));
        assert_eq!(renderer.resolve("Page.html").as_deref(), Some("Page.html"));
        assert_eq!(renderer.resolve("Missing"), None);

        Ok(())
    }

    #[test]
    fn test_render_escapes_html_templates() -> TestResult {
        let document = renderer()?.render("Welcome", &data("Ada & Co"))?;

        assert_eq!(document.as_str(), "<p>Hello Ada &amp; Co</p>");
        assert_eq!(document.plain(), "Hello Ada & Co");

        Ok(())
    }

    #[test]
    fn test_absolute_link() -> TestResult {
        let document = renderer()?.render("WelcomePlain", &data("Ada"))?;

        assert_eq!(
            document.as_str(),
            "Hello Ada, visit https://www.example.com/account"
        );

        Ok(())
    }

    #[test]
    fn test_missing_template() -> TestResult {
        let result = renderer()?.render("Missing", &data("Ada"));

        assert!(matches!(result, Err(RenderError::TemplateNotFound(t)) if t == "Missing"));

        Ok(())
    }

    #[test]
    fn test_engine_errors_are_render_errors() -> TestResult {
        let result = renderer()?.render("Broken", &TemplateData::new());

        assert!(matches!(
            result,
            Err(RenderError::Render { template, .. }) if template == "Broken.html"
        ));

        Ok(())
    }

    #[test]
    fn test_requirements_injected_into_pages() -> TestResult {
        let requirements = RenderingRequirements::new();
        requirements.css("/themes/site.css");

        let renderer = renderer()?.with_requirements(requirements);
        let document = renderer.render("Page", &data("Ada"))?;

        assert!(document.as_str().contains("href=\"/themes/site.css\""));

        Ok(())
    }

    type TestService = EmailService<FallbackRenderer<TeraRenderer, BuiltinRenderer>, MemoryMailer>;

    fn service(requirements: RenderingRequirements) -> TestResult<Arc<TestService>> {
        let renderer = FallbackRenderer::new(
            renderer()?.with_requirements(requirements.clone()),
            BuiltinRenderer::new(),
        );

        Ok(Arc::new(
            EmailService::new(
                Arc::new(renderer),
                Arc::new(MemoryMailer::new()),
                EmailConfig {
                    admin_email: Some("Site Admin <admin@example.com>".into()),
                    base_url: "https://www.example.com/".into(),
                    site_host: None,
                },
            )
            .with_locator(ThemeLocator::new(vec!["custom".into()]))
            .with_requirements(requirements),
        ))
    }

    #[tokio::test]
    async fn test_email_renders_without_page_requirements() -> TestResult {
        let requirements = RenderingRequirements::new();
        requirements.css("/themes/site.css");

        let service = service(requirements.clone())?;
        let mut email = service.email(EmailOptions {
            to: vec!["user@example.com".parse()?],
            subject: Some("Hello".into()),
            ..Default::default()
        })?;
        email.set_html_template("Page").add_data("name", "Ada").add_data("title", "Mail");
        email.send().await?;

        let sent = service.mailer().last_message().expect("nothing sent");
        let html = sent.html_body.expect("no html body");

        assert!(!html.contains("site.css"));
        assert_eq!(sent.plain_body.as_deref(), Some("Hello Ada"));
        assert_eq!(requirements.stylesheets(), vec!["/themes/site.css"]);

        Ok(())
    }

    #[tokio::test]
    async fn test_email_kind_uses_themed_template() -> TestResult {
        let service = service(RenderingRequirements::new())?;
        let mut email = service.email(EmailOptions {
            to: vec!["user@example.com".parse()?],
            ..Default::default()
        })?;
        email.set_kind("WelcomeEmail").add_data("name", "Ada");

        assert_eq!(email.html_template().as_deref(), Some("custom/WelcomeEmail"));

        email.send().await?;

        let sent = service.mailer().last_message().expect("nothing sent");

        assert_eq!(
            sent.html_body.as_deref(),
            Some("<p>Custom welcome for Ada</p>")
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_email_falls_back_to_builtin_template() -> TestResult {
        let service = service(RenderingRequirements::new())?;
        let mut email = service.email(EmailOptions {
            to: vec!["user@example.com".parse()?],
            subject: Some("Hello".into()),
            ..Default::default()
        })?;
        email
            .add_data("subject", "Hello")
            .add_data("content", "<p>Built in</p>");

        assert_eq!(email.html_template().as_deref(), Some("Email"));

        email.send_plain().await?;

        let sent = service.mailer().last_message().expect("nothing sent");

        assert_eq!(sent.html_body, None);
        assert!(sent.plain_body.unwrap_or_default().starts_with("Built in"));

        Ok(())
    }

    #[tokio::test]
    async fn test_plain_template_with_raw_html_body() -> TestResult {
        let service = service(RenderingRequirements::new())?;
        let mut email = service.email(EmailOptions {
            to: vec!["user@example.com".parse()?],
            body: Some("<p>Typed by hand</p>".into()),
            ..Default::default()
        })?;
        email.set_plain_template("Signature.ss");
        email.send().await?;

        let sent = service.mailer().last_message().expect("nothing sent");

        assert_eq!(sent.html_body.as_deref(), Some("<p>Typed by hand</p>"));
        assert_eq!(
            sent.plain_body.as_deref(),
            Some("Regards, https://www.example.com/")
        );

        Ok(())
    }
}
