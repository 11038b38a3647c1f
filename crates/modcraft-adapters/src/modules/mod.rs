//! Built-in modules.

mod catalog;
mod gorm;
mod template_module;

pub use catalog::{
    db_gorm, feature_dockerfile, feature_gitignore, feature_makefile, grpc_server, http_chi,
    http_gin, platform_base,
};
pub use gorm::{Driver, DriverChoice, GormModule};
pub use template_module::{Binding, Requirement, TemplateModule};

use modcraft_core::application::ModuleRegistry;

/// Register every built-in module.
pub fn register_builtins(registry: &mut ModuleRegistry) {
    registry.register(platform_base());
    registry.register(http_gin());
    registry.register(http_chi());
    registry.register(grpc_server());
    registry.register(db_gorm());
    registry.register(feature_gitignore());
    registry.register(feature_makefile());
    registry.register(feature_dockerfile());
}

/// A registry holding exactly the built-in modules.
pub fn builtin_registry() -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    register_builtins(&mut registry);
    registry
}
