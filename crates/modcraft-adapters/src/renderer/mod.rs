//! Template rendering.

mod template;

pub use template::{TemplateRenderer, apply_path_tokens, to_kebab, to_snake};
