//! SMTP mailer implementation

use anyhow::Result;
use async_trait::async_trait;
use clap::Parser;
use lettre::{
    address::Envelope,
    message::{header::ContentType, MultiPart, SinglePart},
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
    Address, SmtpTransport, Transport,
};
use tracing::debug;

use crate::domain::communication::{
    email_addresses::Mailbox,
    mailer::{Mailer, MailerError, Message},
};

/// SMTP configuration
#[derive(Clone, Default, Debug, Parser)]
pub struct SMTPConfig {
    /// The SMTP host
    #[clap(long, env = "SMTP_HOST", default_value = "localhost")]
    pub host: String,

    /// The SMTP port
    #[clap(long, env = "SMTP_PORT", default_value = "587")]
    pub port: u16,

    /// The SMTP username
    #[clap(long, env = "SMTP_USER", default_value = "")]
    pub username: String,

    /// The SMTP password
    #[clap(long, env = "SMTP_PASSWORD", default_value = "")]
    pub password: String,

    /// Verify the TLS certificate
    #[clap(long, env = "SMTP_VERIFY_TLS", default_value = "true")]
    pub verify_tls: bool,

    /// Enable STARTTLS (TLS upgrade on connection)
    #[clap(long, env = "SMTP_STARTTLS", default_value = "true")]
    pub starttls: bool,
}

/// SMTP mailer
#[derive(Debug, Default, Clone)]
pub struct SMTPMailer {
    config: SMTPConfig,
}

impl SMTPMailer {
    /// Create a new SMTP mailer
    pub fn new(config: SMTPConfig) -> Self {
        Self { config }
    }

    /// Build the SMTP transport from the configuration
    pub fn mailer(&self) -> Result<SmtpTransport> {
        let relay = if self.config.starttls {
            SmtpTransport::starttls_relay(&self.config.host)?
        } else {
            SmtpTransport::relay(&self.config.host)?
        };

        let relay = relay.port(self.config.port).tls(Tls::Opportunistic(
            TlsParameters::builder(self.config.host.to_string())
                .dangerous_accept_invalid_certs(!self.config.verify_tls)
                .build()?,
        ));

        let relay = if self.config.username.is_empty() {
            relay
        } else {
            relay.credentials(Credentials::new(
                self.config.username.clone(),
                self.config.password.clone(),
            ))
        };

        Ok(relay.build())
    }
}

fn mailbox(mailbox: &Mailbox) -> Result<lettre::message::Mailbox, MailerError> {
    Ok(lettre::message::Mailbox::new(
        mailbox.name.clone(),
        mailbox.email.as_str().parse()?,
    ))
}

/// Builds the lettre message: multipart alternative when both bodies are
/// present, a single part otherwise
pub fn build_message(message: &Message) -> Result<lettre::Message, MailerError> {
    let from = message.from.as_ref().ok_or(MailerError::InvalidEmail)?;

    let mut builder = lettre::Message::builder()
        .from(mailbox(from)?)
        .subject(message.subject.clone());

    for to in &message.to {
        builder = builder.to(mailbox(to)?);
    }

    for cc in &message.cc {
        builder = builder.cc(mailbox(cc)?);
    }

    for bcc in &message.bcc {
        builder = builder.bcc(mailbox(bcc)?);
    }

    let email = match (&message.plain_body, &message.html_body) {
        (Some(plain), Some(html)) => builder.multipart(MultiPart::alternative_plain_html(
            plain.clone(),
            html.clone(),
        ))?,
        (None, Some(html)) => builder.singlepart(SinglePart::html(html.clone()))?,
        (Some(plain), None) => builder.singlepart(SinglePart::plain(plain.clone()))?,
        (None, None) => builder
            .header(ContentType::TEXT_PLAIN)
            .body(String::new())?,
    };

    Ok(email)
}

/// Builds the SMTP envelope for a message with a return path: the return
/// path is the envelope sender, every recipient an envelope recipient
pub fn build_envelope(message: &Message) -> Result<Option<Envelope>, MailerError> {
    let Some(return_path) = &message.return_path else {
        return Ok(None);
    };

    let recipients = message
        .recipients()
        .map(|recipient| recipient.email.as_str().parse::<Address>())
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Some(Envelope::new(
        Some(return_path.as_str().parse::<Address>()?),
        recipients,
    )?))
}

#[async_trait]
impl Mailer for SMTPMailer {
    async fn send_message(&self, message: &Message) -> Result<(), MailerError> {
        let email = build_message(message)?;
        let envelope = build_envelope(message)?;
        let transport = self.mailer()?;

        let result = match envelope {
            Some(envelope) => transport.send_raw(&envelope, &email.formatted()),
            None => transport.send(&email),
        };

        match result {
            Ok(response) => {
                debug!(code = %response.code(), "SMTP server accepted message");
                Ok(())
            }
            Err(e) => Err(MailerError::UnknownError(e.into())),
        }
    }
}
