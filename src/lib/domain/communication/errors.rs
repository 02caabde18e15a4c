//! Error types for the email module

use thiserror::Error;
use tracing::debug;

use crate::domain::communication::{
    email_addresses::EmailAddressError, mailer::MailerError, templates::RenderError,
};

/// Email errors
#[derive(Debug, Error)]
pub enum EmailError {
    /// No sender could be configured for the email
    #[error("no send-from address resolvable: {0}")]
    Configuration(String),

    /// A template could not be found or rendered
    #[error(transparent)]
    TemplateRender(#[from] RenderError),

    /// Invalid email address
    #[error("Invalid email address")]
    InvalidEmail,

    /// An error occurred while sending the email
    #[error("An error occurred while sending the email")]
    SendError,

    /// Unknown error
    #[error(transparent)]
    UnknownError(anyhow::Error),
}

impl From<anyhow::Error> for EmailError {
    fn from(err: anyhow::Error) -> Self {
        EmailError::UnknownError(err)
    }
}

impl From<EmailAddressError> for EmailError {
    fn from(err: EmailAddressError) -> Self {
        debug!("EmailAddressError -> EmailError: {err}");

        EmailError::InvalidEmail
    }
}

impl From<MailerError> for EmailError {
    fn from(err: MailerError) -> Self {
        debug!("MailerError -> EmailError");

        match err {
            MailerError::SendError => EmailError::SendError,
            MailerError::InvalidEmail => EmailError::InvalidEmail,
            MailerError::UnknownError(e) => EmailError::UnknownError(e),
        }
    }
}
