//! Email composition, content resolution and delivery

pub mod email;
pub mod email_addresses;
pub mod errors;
pub mod mailer;
pub mod resolver;
pub mod templates;
