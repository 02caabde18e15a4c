//! Infrastructure adapters: transports and template engines

pub mod email;
pub mod templates;
