//! Infrastructure adapters for modcraft.
//!
//! This crate implements the ports defined in `modcraft-core::application::ports`
//! and ships the built-in modules. It contains all file I/O and process
//! spawning.

pub mod editors;
pub mod filesystem;
pub mod hooks;
pub mod modules;
pub mod renderer;

// Re-export commonly used adapters
pub use editors::{CompositionRootFileEditor, GoModEditor, YamlConfigEditor};
pub use filesystem::{LocalWriter, MemoryWriter};
pub use hooks::GitInitHook;
pub use modules::{builtin_registry, register_builtins};
pub use renderer::TemplateRenderer;
