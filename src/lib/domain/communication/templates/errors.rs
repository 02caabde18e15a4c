//! Rendering errors

use thiserror::Error;

/// Errors raised while locating or rendering a template
#[derive(Debug, Error)]
pub enum RenderError {
    /// No renderer knows the template
    #[error("template not found: {0}")]
    TemplateNotFound(String),

    /// The template exists but failed to render
    #[error("failed to render template {template}")]
    Render {
        /// The template identifier
        template: String,

        /// The underlying engine error
        #[source]
        source: anyhow::Error,
    },

    /// Template data could not be turned into a rendering context
    #[error("invalid template data: {0}")]
    InvalidData(String),

    /// The rendering requirements registry is already suspended
    #[error("rendering requirements are already suspended")]
    RequirementsSuspended,
}
