//! Mailer module

mod errors;
mod message;

use async_trait::async_trait;

#[cfg(test)]
use mockall::mock;

pub use errors::MailerError;
pub use message::Message;

/// Sends composed messages to their recipients
#[async_trait]
pub trait Mailer: Clone + Send + Sync + 'static {
    /// Send a message
    ///
    /// # Arguments
    /// * `message` - The fully resolved [`Message`] to deliver.
    ///
    /// # Returns
    /// A [`Result`] indicating success or failure.
    async fn send_message(&self, message: &Message) -> Result<(), MailerError>;
}

#[cfg(test)]
mock! {
    pub Mailer {}

    impl Clone for Mailer {
        fn clone(&self) -> Self;
    }

    #[async_trait]
    impl Mailer for Mailer {
        async fn send_message(&self, message: &Message) -> Result<(), MailerError>;
    }
}
