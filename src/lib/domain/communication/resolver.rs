//! Message content resolution
//!
//! Decides which HTML and plain text bodies a message is sent with. Bodies
//! set directly on the message win unless the template data has been
//! customized, in which case the configured templates are rendered instead.
//! A missing plain body is derived from the HTML one.

use tracing::debug;

use crate::domain::communication::{
    mailer::Message,
    templates::{
        html_to_plain, RenderError, RenderingRequirements, TemplateData, TemplateReference,
        TemplateRenderer,
    },
};

/// The bodies a message ends up with
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResolvedContent {
    /// Final HTML body
    pub html: Option<String>,

    /// Final plain text body
    pub plain: Option<String>,
}

impl ResolvedContent {
    /// Assigns the resolved bodies to `message`. Unresolved parts leave the
    /// message untouched.
    pub fn apply_to(self, message: &mut Message) {
        if let Some(plain) = self.plain {
            message.plain_body = Some(plain);
        }

        if let Some(html) = self.html {
            message.html_body = Some(html);
        }
    }
}

/// Resolves message bodies against templates
#[derive(Debug)]
pub struct ContentResolver<'a, R: ?Sized> {
    renderer: &'a R,
    requirements: &'a RenderingRequirements,
}

impl<'a, R> ContentResolver<'a, R>
where
    R: TemplateRenderer + ?Sized,
{
    /// Creates a resolver rendering with `renderer`, suspending
    /// `requirements` while it does so
    pub fn new(renderer: &'a R, requirements: &'a RenderingRequirements) -> Self {
        Self {
            renderer,
            requirements,
        }
    }

    /// Resolves the final bodies of `message`.
    ///
    /// # Arguments
    /// * `message` - The message whose current bodies are considered.
    /// * `templates` - The configured HTML and plain templates.
    /// * `data` - The data templates are rendered against.
    /// * `data_customized` - Whether the data was explicitly set or added to;
    ///   bodies set on the message are then ignored in favour of templates.
    /// * `plain_only` - Leave the HTML body out of the result.
    ///
    /// # Errors
    /// Any [`RenderError`] raised by the renderer, or
    /// [`RenderError::RequirementsSuspended`] when the requirements registry
    /// is already suspended by another resolution.
    pub fn resolve(
        &self,
        message: &Message,
        templates: &TemplateReference,
        data: &TemplateData,
        data_customized: bool,
        plain_only: bool,
    ) -> Result<ResolvedContent, RenderError> {
        let html_body = non_empty(&message.html_body);
        let plain_body = non_empty(&message.plain_body);

        if templates.is_empty() && html_body.is_none() && plain_body.is_none() {
            debug!("nothing to resolve");

            return Ok(ResolvedContent {
                html: message.html_body.clone().filter(|_| !plain_only),
                plain: message.plain_body.clone(),
            });
        }

        let mut html_render = html_body.filter(|_| !data_customized).map(str::to_string);
        let mut plain_render = plain_body.filter(|_| !data_customized).map(str::to_string);

        let plain_template = templates.plain().filter(|_| plain_render.is_none());
        let html_template = templates.html().filter(|_| html_render.is_none());

        if plain_template.is_some() || html_template.is_some() {
            let _suspension = self.requirements.suspend()?;

            if let Some(template) = plain_template {
                debug!(template, "rendering plain template");
                plain_render = non_empty_render(self.renderer.render(template, data)?.plain());
            }

            if let Some(template) = html_template {
                debug!(template, "rendering HTML template");
                html_render = non_empty_render(self.renderer.render(template, data)?.into());
            }
        }

        if plain_render.is_none() {
            plain_render = html_render
                .as_deref()
                .map(|html| html_to_plain(&html_escape::decode_html_entities(html)))
                .and_then(non_empty_render);
        }

        if html_render.is_none() {
            html_render = html_body.map(str::to_string);
        }

        if plain_render.is_none() {
            plain_render = plain_body.map(str::to_string);
        }

        Ok(ResolvedContent {
            html: html_render.filter(|_| !plain_only),
            plain: plain_render,
        })
    }
}

fn non_empty(body: &Option<String>) -> Option<&str> {
    body.as_deref().filter(|b| !b.is_empty())
}

// An empty render counts as unset so the raw bodies still apply.
fn non_empty_render(rendered: String) -> Option<String> {
    Some(rendered).filter(|r| !r.is_empty())
}
