//! In-memory mailer capturing messages in an outbox

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tracing::debug;

use crate::domain::communication::mailer::{Mailer, MailerError, Message};

/// Mailer that stores sent messages instead of delivering them.
///
/// Clones share the same outbox.
#[derive(Debug, Default, Clone)]
pub struct MemoryMailer {
    outbox: Arc<Mutex<Vec<Message>>>,
}

impl MemoryMailer {
    /// Create a new mailer with an empty outbox
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages sent so far
    pub fn messages(&self) -> Vec<Message> {
        self.outbox().clone()
    }

    /// The most recently sent message
    pub fn last_message(&self) -> Option<Message> {
        self.outbox().last().cloned()
    }

    /// Number of messages sent so far
    pub fn len(&self) -> usize {
        self.outbox().len()
    }

    /// Whether nothing has been sent
    pub fn is_empty(&self) -> bool {
        self.outbox().is_empty()
    }

    /// Empties the outbox
    pub fn clear(&self) {
        self.outbox().clear();
    }

    fn outbox(&self) -> MutexGuard<'_, Vec<Message>> {
        self.outbox.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl Mailer for MemoryMailer {
    async fn send_message(&self, message: &Message) -> Result<(), MailerError> {
        debug!(subject = %message.subject, "captured message");

        self.outbox().push(message.clone());

        Ok(())
    }
}
