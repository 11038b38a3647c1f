//! Application services - orchestrate use cases.
//!
//! The registry owns modules and drives resolution plus sequential
//! application; the module service wraps it in the use cases the CLI calls.

pub mod module_registry;
pub mod module_service;

pub use module_registry::{ApplyReport, ModuleRegistry};
pub use module_service::{BASE_MODULE, ModuleInfo, ModuleService};
