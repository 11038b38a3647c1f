pub mod common;
pub mod module_descriptor;
pub mod template;

pub use crate::domain::DomainError;
pub use module_descriptor::{ModuleDescriptor, ModuleDescriptorBuilder};
pub use template::{GeneratedFile, ModuleTemplate, TemplateFile};
