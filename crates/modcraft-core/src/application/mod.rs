//! Application layer for Modcraft.
//!
//! This layer contains:
//! - **Services**: the module registry and the use cases built on it
//! - **Ports**: the module contract, the context bundle, and driven ports
//! - **Errors**: Application-specific error types
//!
//! Resolution rules live in `crate::domain::resolution`; this layer only
//! drives the resulting plan.

pub mod error;
pub mod ports;
pub mod services;

pub use services::{ApplyReport, ModuleInfo, ModuleRegistry, ModuleService};

pub use ports::{
    CompositionRootEditor, ConfigEditor, FsWriter, ManifestEditor, Module, ModuleContext,
    PostHook, Renderer,
};

pub use error::ApplicationError;
