//! Templated emails: composition, data, templates and sending.

mod compose;
mod config;
mod extension;
mod service;

pub use compose::{Email, EmailOptions};
pub use config::EmailConfig;
pub use extension::EmailExtension;
pub use service::EmailService;
