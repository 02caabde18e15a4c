//! Email extension hooks

use std::fmt::Debug;

use crate::domain::communication::{email_addresses::Mailbox, templates::TemplateData};

/// Hooks that let the host application adjust emails
///
/// Every hook defaults to doing nothing.
pub trait EmailExtension: Debug + Send + Sync {
    /// Called after the default sender has been resolved
    fn update_default_from(&self, _from: &mut Mailbox) {}

    /// Called whenever template data is read, after the built-in fields are added
    fn update_data(&self, _data: &mut TemplateData) {}
}
