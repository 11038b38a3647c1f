// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for Modcraft.
//!
//! Pure logic only: module identity, the value tree, the resolution planner
//! and the composition-root document model. Filesystem access, rendering
//! and module side effects go through ports defined in the application
//! layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No filesystem, network, or process calls
//! - **Few crates**: std, `thiserror` and `serde` derives
//! - **Value semantics**: descriptors and plans are Clone + PartialEq

pub mod composition;
pub mod entities;
pub mod error;
pub mod resolution;
pub mod value_objects;
pub mod values;

pub use composition::{CompositionDocument, ImportDecl, ImportSpec, ReturnCall};
pub use entities::{
    common::{Permissions, RelativePath},
    module_descriptor::{ModuleDescriptor, ModuleDescriptorBuilder},
    template::{GeneratedFile, ModuleTemplate, TemplateFile},
};
pub use error::{DomainError, ErrorCategory};
pub use resolution::{DescriptorLookup, ResolutionPlan, resolve};
pub use value_objects::ModuleName;
pub use values::{Value, ValueMap};
