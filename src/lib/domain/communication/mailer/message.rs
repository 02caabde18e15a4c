//! Email message

use crate::domain::communication::email_addresses::{EmailAddress, Mailbox};

/// Email message, as handed to a [`Mailer`](super::Mailer)
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Message {
    /// The sender of the email
    pub from: Option<Mailbox>,

    /// The recipients of the email
    pub to: Vec<Mailbox>,

    /// Carbon-copy recipients
    pub cc: Vec<Mailbox>,

    /// Blind carbon-copy recipients
    pub bcc: Vec<Mailbox>,

    /// Address bounces are returned to
    pub return_path: Option<EmailAddress>,

    /// The subject of the email
    pub subject: String,

    /// The HTML body of the email
    pub html_body: Option<String>,

    /// The plain text body of the email
    pub plain_body: Option<String>,
}

impl Message {
    /// All envelope recipients: `to`, then `cc`, then `bcc`
    pub fn recipients(&self) -> impl Iterator<Item = &Mailbox> {
        self.to.iter().chain(self.cc.iter()).chain(self.bcc.iter())
    }
}
