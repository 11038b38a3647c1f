//! Template-backed module: render embedded files, then wire the result into
//! the project through whichever editors the context carries.

use std::fmt;

use tracing::{debug, warn};

use modcraft_core::{
    application::ports::{Module, ModuleContext},
    domain::{ModuleDescriptor, ModuleTemplate, ValueMap},
    error::CraftResult,
};

/// A go.mod requirement a module adds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requirement {
    pub module: &'static str,
    pub version: &'static str,
}

impl Requirement {
    pub const fn new(module: &'static str, version: &'static str) -> Self {
        Self { module, version }
    }
}

/// How a module is registered in the composition root.
///
/// `package` is relative to the project's Go module path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    pub alias: &'static str,
    pub package: &'static str,
    pub call: &'static str,
}

pub struct TemplateModule {
    descriptor: ModuleDescriptor,
    template: ModuleTemplate,
    requirements: Vec<Requirement>,
    binding: Option<Binding>,
    defaults: Option<ValueMap>,
    marker: Option<&'static str>,
}

impl TemplateModule {
    pub fn new(descriptor: ModuleDescriptor, template: ModuleTemplate) -> Self {
        Self {
            descriptor,
            template,
            requirements: Vec::new(),
            binding: None,
            defaults: None,
            marker: None,
        }
    }

    pub fn with_requirement(mut self, requirement: Requirement) -> Self {
        self.requirements.push(requirement);
        self
    }

    pub fn with_binding(mut self, binding: Binding) -> Self {
        self.binding = Some(binding);
        self
    }

    /// Defaults from an embedded YAML document.
    ///
    /// A document that does not parse is logged and ignored.
    pub fn with_defaults_yaml(mut self, yaml: &str) -> Self {
        self.defaults = parse_defaults(self.descriptor.name().as_str(), yaml);
        self
    }

    /// Skip the module when this project-relative file already exists.
    pub fn with_marker(mut self, marker: &'static str) -> Self {
        self.marker = Some(marker);
        self
    }

    pub fn template(&self) -> &ModuleTemplate {
        &self.template
    }

    pub fn binding(&self) -> Option<&Binding> {
        self.binding.as_ref()
    }
}

impl Module for TemplateModule {
    fn descriptor(&self) -> &ModuleDescriptor {
        &self.descriptor
    }

    fn applies(&self, ctx: &ModuleContext<'_>) -> bool {
        marker_absent(ctx, self.marker)
    }

    fn defaults(&self) -> Option<ValueMap> {
        self.defaults.clone()
    }

    fn apply(&self, ctx: &mut ModuleContext<'_>) -> CraftResult<()> {
        ctx.render_and_write(&self.template)?;
        add_requirements(ctx, &self.requirements);
        if let Some(binding) = &self.binding {
            wire(ctx, binding)?;
        }
        if self.defaults.is_some() {
            merge_config_defaults(ctx, self.descriptor.name().as_str())?;
        }
        Ok(())
    }
}

impl fmt::Debug for TemplateModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateModule")
            .field("name", self.descriptor.name())
            .field("files", &self.template.files.len())
            .field("binding", &self.binding)
            .finish()
    }
}

// ── Shared apply steps ────────────────────────────────────────────────────────

pub(crate) fn marker_absent(ctx: &ModuleContext<'_>, marker: Option<&str>) -> bool {
    let Some(marker) = marker else {
        return true;
    };
    let present = ctx.project_root().join(marker).exists();
    if present {
        debug!(marker, "already present in project");
    }
    !present
}

/// go.mod edits are best effort; the post hook's `go mod tidy` fixes gaps.
pub(crate) fn add_requirements(ctx: &ModuleContext<'_>, requirements: &[Requirement]) {
    let Some(manifest) = ctx.manifest() else {
        return;
    };
    for req in requirements {
        if let Err(e) = manifest.add(req.module, req.version) {
            warn!(module = req.module, error = %e, "could not add go.mod requirement");
        }
    }
}

pub(crate) fn wire(ctx: &ModuleContext<'_>, binding: &Binding) -> CraftResult<()> {
    let Some(editor) = ctx.composition_root() else {
        return Ok(());
    };
    let module_path = ctx.require_str("Module")?;
    let import_path = format!("{}/{}", module_path.trim_end_matches('/'), binding.package);
    editor.ensure(binding.alias, &import_path, binding.call)
}

pub(crate) fn merge_config_defaults(ctx: &ModuleContext<'_>, module: &str) -> CraftResult<()> {
    match ctx.config() {
        Some(config) => config.ensure_defaults_for(module),
        None => Ok(()),
    }
}

pub(crate) fn parse_defaults(module: &str, yaml: &str) -> Option<ValueMap> {
    match serde_yaml_ng::from_str::<ValueMap>(yaml) {
        Ok(map) if !map.is_empty() => Some(map),
        Ok(_) => None,
        Err(e) => {
            warn!(module, error = %e, "embedded defaults do not parse, ignoring");
            None
        }
    }
}
