//! A templated email message

use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::domain::communication::{
    email_addresses::{EmailAddress, Mailbox},
    errors::EmailError,
    mailer::{Mailer, Message},
    resolver::ContentResolver,
    templates::{
        TemplateData, TemplateReference, TemplateRenderer, ThemeLocator, BASE_EMAIL_TEMPLATE,
        BASE_URL_FIELD, IS_EMAIL_FIELD,
    },
};

use super::EmailService;

/// Options an [`Email`] is composed with
#[derive(Clone, Debug, Default)]
pub struct EmailOptions {
    /// The sender; the service's default sender when absent
    pub from: Option<Mailbox>,

    /// Recipients
    pub to: Vec<Mailbox>,

    /// Subject line
    pub subject: Option<String>,

    /// HTML body
    pub body: Option<String>,

    /// Carbon-copy recipients
    pub cc: Vec<Mailbox>,

    /// Blind carbon-copy recipients
    pub bcc: Vec<Mailbox>,

    /// Bounce address
    pub return_path: Option<EmailAddress>,
}

/// An email whose bodies may be rendered from templates.
///
/// Bodies set with [`Email::set_body`], [`Email::set_html_body`] or
/// [`Email::set_plain_body`] are sent as they are, unless the template data
/// has been customized with [`Email::set_data`] or [`Email::add_data`]: from
/// then on the templates are rendered instead.
#[derive(Debug)]
pub struct Email<R, M>
where
    R: TemplateRenderer,
    M: Mailer,
{
    service: Arc<EmailService<R, M>>,
    message: Message,
    templates: TemplateReference,
    kind: String,
    data: TemplateData,
    data_customized: bool,
}

impl<R, M> Email<R, M>
where
    R: TemplateRenderer,
    M: Mailer,
{
    /// Composes a new email.
    ///
    /// # Errors
    /// [`EmailError::Configuration`] when no sender is given and none can be
    /// derived from the service's configuration.
    pub fn new(
        service: Arc<EmailService<R, M>>,
        options: EmailOptions,
    ) -> Result<Self, EmailError> {
        let from = match options.from {
            Some(from) => from,
            None => service.default_from()?,
        };

        let message = Message {
            from: Some(from),
            to: options.to,
            cc: options.cc,
            bcc: options.bcc,
            return_path: options.return_path,
            subject: options.subject.unwrap_or_default(),
            html_body: options.body.filter(|b| !b.is_empty()),
            plain_body: None,
        };

        Ok(Self {
            service,
            message,
            templates: TemplateReference::default(),
            kind: BASE_EMAIL_TEMPLATE.to_string(),
            data: TemplateData::new(),
            data_customized: false,
        })
    }

    /// The message as it currently stands
    pub fn message(&self) -> &Message {
        &self.message
    }

    /// Sets the sender
    pub fn set_from(&mut self, from: Mailbox) -> &mut Self {
        self.message.from = Some(from);
        self
    }

    /// Replaces the recipients
    pub fn set_to(&mut self, to: Vec<Mailbox>) -> &mut Self {
        self.message.to = to;
        self
    }

    /// Adds a recipient
    pub fn add_to(&mut self, to: Mailbox) -> &mut Self {
        self.message.to.push(to);
        self
    }

    /// Replaces the carbon-copy recipients
    pub fn set_cc(&mut self, cc: Vec<Mailbox>) -> &mut Self {
        self.message.cc = cc;
        self
    }

    /// Replaces the blind carbon-copy recipients
    pub fn set_bcc(&mut self, bcc: Vec<Mailbox>) -> &mut Self {
        self.message.bcc = bcc;
        self
    }

    /// Sets the subject
    pub fn set_subject(&mut self, subject: impl Into<String>) -> &mut Self {
        self.message.subject = subject.into();
        self
    }

    /// Sets the bounce address
    pub fn set_return_path(&mut self, return_path: EmailAddress) -> &mut Self {
        self.message.return_path = Some(return_path);
        self
    }

    /// Sets the HTML body.
    ///
    /// Has no effect on the sent email once [`Email::set_data`] or
    /// [`Email::add_data`] has been called and a template is configured.
    pub fn set_body(&mut self, body: impl Into<String>) -> &mut Self {
        self.set_html_body(Some(body.into()))
    }

    /// Sets or clears the HTML body
    pub fn set_html_body(&mut self, body: Option<String>) -> &mut Self {
        self.message.html_body = body;
        self
    }

    /// Sets or clears the plain text body
    pub fn set_plain_body(&mut self, body: Option<String>) -> &mut Self {
        self.message.plain_body = body;
        self
    }

    /// The HTML body
    pub fn html_body(&self) -> Option<&str> {
        self.message.html_body.as_deref()
    }

    /// The plain text body
    pub fn plain_body(&self) -> Option<&str> {
        self.message.plain_body.as_deref()
    }

    /// The data exposed to templates.
    ///
    /// Adds `is_email` and `base_url` unless they are already set, then
    /// lets extensions adjust it.
    pub fn data(&self) -> TemplateData {
        let mut data = self.data.clone();

        data.insert_if_absent(IS_EMAIL_FIELD, true);
        data.insert_if_absent(BASE_URL_FIELD, self.service.config().absolute_base_url());

        for extension in self.service.extensions() {
            extension.update_data(&mut data);
        }

        data
    }

    /// Whether the template data has been customized
    pub fn is_data_customized(&self) -> bool {
        self.data_customized
    }

    /// Sets the data templates fall back to when a field is not added
    /// directly. Bodies set on the email are ignored from now on.
    pub fn set_data(&mut self, data: Map<String, Value>) -> &mut Self {
        self.data.set_failover(data);
        self.data_customized = true;
        self
    }

    /// Like [`Email::set_data`], from any value serializing to an object
    pub fn set_data_from<T>(&mut self, data: &T) -> Result<&mut Self, EmailError>
    where
        T: Serialize + ?Sized,
    {
        let data = TemplateData::from_serialize(data)?;

        Ok(self.set_data(data.to_map()))
    }

    /// Adds a single field to the template data. Bodies set on the email
    /// are ignored from now on.
    pub fn add_data(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.data.insert(name, value);
        self.data_customized = true;
        self
    }

    /// Adds several fields to the template data. Bodies set on the email
    /// are ignored from now on.
    pub fn add_data_map(&mut self, data: Map<String, Value>) -> &mut Self {
        self.data.extend(data);
        self.data_customized = true;
        self
    }

    /// Removes a field from the template data
    pub fn remove_data(&mut self, name: &str) -> &mut Self {
        self.data.remove(name);
        self
    }

    /// Sets the kind of email, used to find a default HTML template
    pub fn set_kind(&mut self, kind: impl Into<String>) -> &mut Self {
        self.kind = kind.into();
        self
    }

    /// The kind of email
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Sets the HTML template. A trailing `.ss` is stripped.
    pub fn set_html_template(&mut self, template: &str) -> &mut Self {
        self.templates.set_html(template);
        self
    }

    /// The HTML template: the one configured, otherwise the template found
    /// for this email's kind across the service's themes
    pub fn html_template(&self) -> Option<String> {
        self.templates.html().map(str::to_string).or_else(|| {
            self.service.locator().find_template(
                &ThemeLocator::candidates_for_kind(&self.kind),
                self.service.renderer(),
            )
        })
    }

    /// Sets the plain template. A trailing `.ss` is stripped.
    pub fn set_plain_template(&mut self, template: &str) -> &mut Self {
        self.templates.set_plain(template);
        self
    }

    /// The plain template, if configured
    pub fn plain_template(&self) -> Option<&str> {
        self.templates.plain()
    }

    /// Renders the templates and sends the email.
    ///
    /// Bodies set explicitly are kept unless the data has been customized.
    pub async fn send(&mut self) -> Result<(), EmailError> {
        self.update_bodies(false)?;

        info!(
            kind = self.kind(),
            subject = %self.message.subject,
            recipients = self.message.to.len(),
            "sending email"
        );

        self.service.mailer().send_message(&self.message).await?;

        Ok(())
    }

    /// Renders the templates and sends the email as plain text only.
    ///
    /// The HTML body of this email is left as it was.
    pub async fn send_plain(&mut self) -> Result<(), EmailError> {
        self.update_bodies(true)?;

        let message = Message {
            html_body: None,
            ..self.message.clone()
        };

        info!(
            subject = %message.subject,
            recipients = message.to.len(),
            "sending plain email"
        );

        self.service.mailer().send_message(&message).await?;

        Ok(())
    }

    fn update_bodies(&mut self, plain_only: bool) -> Result<(), EmailError> {
        let templates = TemplateReference::new(
            self.html_template().as_deref(),
            self.plain_template(),
        );

        debug!(
            html_template = templates.html(),
            plain_template = templates.plain(),
            data_customized = self.data_customized,
            plain_only,
            "resolving email content"
        );

        let resolved =
            ContentResolver::new(self.service.renderer(), self.service.requirements()).resolve(
                &self.message,
                &templates,
                &self.data(),
                self.data_customized,
                plain_only,
            )?;

        resolved.apply_to(&mut self.message);

        Ok(())
    }
}
