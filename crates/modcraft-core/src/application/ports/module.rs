//! The module capability contract.

use crate::application::ports::context::ModuleContext;
use crate::domain::{ModuleDescriptor, ModuleName, ValueMap};
use crate::error::CraftResult;

/// A composable unit of generated functionality.
///
/// Identity and graph edges come from [`Module::descriptor`] and must be
/// stable for the lifetime of the instance. The registry never mutates a
/// module; it only asks whether it [`applies`](Module::applies) and then
/// calls [`apply`](Module::apply).
pub trait Module: Send + Sync {
    fn descriptor(&self) -> &ModuleDescriptor;

    fn name(&self) -> &ModuleName {
        self.descriptor().name()
    }

    fn requires(&self) -> &[ModuleName] {
        self.descriptor().requires()
    }

    fn conflicts(&self) -> &[ModuleName] {
        self.descriptor().conflicts()
    }

    /// Side-effect free gate for [`apply`](Module::apply).
    fn applies(&self, _ctx: &ModuleContext<'_>) -> bool {
        true
    }

    fn apply(&self, ctx: &mut ModuleContext<'_>) -> CraftResult<()>;

    /// Nested configuration defaults, merged into config documents.
    fn defaults(&self) -> Option<ValueMap> {
        None
    }
}
