//! Template engines: Tera templates loaded from disk, the built-in askama
//! templates, and a renderer chaining the two.

pub mod builtin;
pub mod fallback;
pub mod tera_renderer;
