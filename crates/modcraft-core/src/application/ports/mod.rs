//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `modcraft-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Module port**: [`Module`], the capability set every built-in or
//!   third-party module implements, and the [`ModuleContext`] it receives.
//! - **Driven (Output) Ports**: called by modules, implemented by infrastructure
//!   - `Renderer`, `FsWriter`: template output
//!   - `ManifestEditor`: go.mod edits
//!   - `CompositionRootEditor`: DI wiring
//!   - `ConfigEditor`: config defaults
//!   - `PostHook`: best-effort post-generation steps

pub mod context;
pub mod module;
pub mod output;

pub use context::ModuleContext;
pub use module::Module;
pub use output::{CompositionRootEditor, ConfigEditor, FsWriter, ManifestEditor, PostHook, Renderer};
