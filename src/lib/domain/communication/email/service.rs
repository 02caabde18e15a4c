//! Email service: the collaborators every email is composed and sent with

use std::sync::Arc;

use tracing::debug;

use crate::domain::communication::{
    email_addresses::{EmailAddress, Mailbox},
    errors::EmailError,
    mailer::Mailer,
    templates::{RenderingRequirements, TemplateRenderer, ThemeLocator},
};

use super::{Email, EmailConfig, EmailExtension, EmailOptions};

/// Email service
#[derive(Debug)]
pub struct EmailService<R, M>
where
    R: TemplateRenderer,
    M: Mailer,
{
    renderer: Arc<R>,
    mailer: Arc<M>,
    locator: ThemeLocator,
    requirements: RenderingRequirements,
    config: EmailConfig,
    extensions: Vec<Arc<dyn EmailExtension>>,
}

impl<R, M> EmailService<R, M>
where
    R: TemplateRenderer,
    M: Mailer,
{
    /// Creates a new email service with no themes, no extensions and its own
    /// rendering requirements registry
    pub fn new(renderer: Arc<R>, mailer: Arc<M>, config: EmailConfig) -> Self {
        Self {
            renderer,
            mailer,
            locator: ThemeLocator::default(),
            requirements: RenderingRequirements::new(),
            config,
            extensions: Vec::new(),
        }
    }

    /// Uses `locator` to find default HTML templates
    pub fn with_locator(mut self, locator: ThemeLocator) -> Self {
        self.locator = locator;
        self
    }

    /// Suspends `requirements` while rendering, e.g. [`RenderingRequirements::global`]
    pub fn with_requirements(mut self, requirements: RenderingRequirements) -> Self {
        self.requirements = requirements;
        self
    }

    /// Registers an extension
    pub fn with_extension(mut self, extension: impl EmailExtension + 'static) -> Self {
        self.extensions.push(Arc::new(extension));
        self
    }

    /// Composes a new email
    pub fn email(self: &Arc<Self>, options: EmailOptions) -> Result<Email<R, M>, EmailError> {
        Email::new(Arc::clone(self), options)
    }

    /// The template renderer
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// The mailer
    pub fn mailer(&self) -> &M {
        &self.mailer
    }

    /// The theme locator
    pub fn locator(&self) -> &ThemeLocator {
        &self.locator
    }

    /// The rendering requirements registry
    pub fn requirements(&self) -> &RenderingRequirements {
        &self.requirements
    }

    /// The host address configuration
    pub fn config(&self) -> &EmailConfig {
        &self.config
    }

    /// The registered extensions
    pub fn extensions(&self) -> &[Arc<dyn EmailExtension>] {
        &self.extensions
    }

    /// Resolves the sender used when an email is composed without one.
    ///
    /// The administrator address wins; otherwise `no-reply@<host>`.
    ///
    /// # Errors
    /// [`EmailError::Configuration`] when neither an administrator address
    /// nor a site host is configured, [`EmailError::InvalidEmail`] when the
    /// configured address does not parse.
    pub fn default_from(&self) -> Result<Mailbox, EmailError> {
        let mut from = match self.config.admin_email() {
            Some(admin_email) => admin_email.parse::<Mailbox>()?,
            None => {
                let host = self
                    .config
                    .host()
                    .ok_or_else(|| EmailError::Configuration("host not defined".to_string()))?;

                EmailAddress::new(&format!("no-reply@{host}"))?.into()
            }
        };

        for extension in &self.extensions {
            extension.update_default_from(&mut from);
        }

        debug!(%from, "resolved default sender");

        Ok(from)
    }
}
