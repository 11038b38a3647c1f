//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what modules need from the outside world while they
//! apply. The `modcraft-adapters` crate provides implementations; every one
//! of them is optional in a [`ModuleContext`](crate::application::ModuleContext).

use std::path::Path;

use crate::domain::{GeneratedFile, ModuleTemplate, Value, ValueMap};
use crate::error::CraftResult;

/// Port for template rendering.
///
/// Implemented by:
/// - `modcraft_adapters::renderer::TemplateRenderer`
///
/// Pure and deterministic given its inputs.
pub trait Renderer: Send + Sync {
    fn render(&self, template: &ModuleTemplate, values: &ValueMap)
    -> CraftResult<Vec<GeneratedFile>>;
}

/// Port for writing generated files under a project root.
///
/// Implemented by:
/// - `modcraft_adapters::filesystem::LocalWriter` (production)
/// - `modcraft_adapters::filesystem::MemoryWriter` (testing)
///
/// Must fail with `FileExists` rather than overwrite.
pub trait FsWriter: Send + Sync {
    fn write_all(&self, root: &Path, files: &[GeneratedFile]) -> CraftResult<()>;
}

/// Port for editing the project's dependency manifest.
pub trait ManifestEditor: Send + Sync {
    /// Add a requirement. An existing requirement keeps its version.
    fn add(&self, module: &str, version: &str) -> CraftResult<()>;

    /// Upsert a `replace old => new` redirect.
    fn replace(&self, old_path: &str, new_path: &str) -> CraftResult<()>;

    /// Best effort; may do nothing.
    fn tidy(&self) -> CraftResult<()>;
}

/// Port for idempotent composition-root wiring.
///
/// Implemented by:
/// - `modcraft_adapters::editors::CompositionRootFileEditor`
///
/// `ensure` guarantees that `import_path` is imported as `alias` and that
/// `call_expr` is an argument of the aggregation call, adding neither twice.
/// A missing composition root is success.
pub trait CompositionRootEditor: Send + Sync {
    fn ensure(&self, alias: &str, import_path: &str, call_expr: &str) -> CraftResult<()>;
}

/// Port for merging module defaults into the persisted config document.
pub trait ConfigEditor: Send + Sync {
    /// Add the module's default keys that the document lacks.
    fn ensure_defaults_for(&self, module: &str) -> CraftResult<()>;

    /// Overwrite one dotted-path key, creating the document if needed.
    fn set(&self, path: &str, value: Value) -> CraftResult<()>;
}

/// Port for best-effort steps after a project is generated.
pub trait PostHook: Send + Sync {
    fn run(&self, project_dir: &Path) -> CraftResult<()>;
}
