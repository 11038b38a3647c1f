//! The context bundle handed to every module.
//!
//! It owns the generation values and the project root, carries the tracing
//! span used as the run's log handle, and borrows whichever collaborators
//! the caller wired in. Modules treat a missing collaborator as "skip that
//! step".

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::Span;

use crate::application::ApplicationError;
use crate::application::ports::output::{
    CompositionRootEditor, ConfigEditor, FsWriter, ManifestEditor, Renderer,
};
use crate::domain::values::{self, Value};
use crate::domain::{ModuleTemplate, ValueMap};
use crate::error::CraftResult;

pub struct ModuleContext<'a> {
    values: ValueMap,
    project_root: PathBuf,
    span: Span,
    renderer: Option<&'a dyn Renderer>,
    writer: Option<&'a dyn FsWriter>,
    manifest: Option<&'a dyn ManifestEditor>,
    composition_root: Option<&'a dyn CompositionRootEditor>,
    config: Option<&'a dyn ConfigEditor>,
}

impl<'a> ModuleContext<'a> {
    /// Context with no collaborators and empty values.
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        let project_root = project_root.into();
        let span = tracing::info_span!("generation", root = %project_root.display());
        Self {
            values: ValueMap::new(),
            project_root,
            span,
            renderer: None,
            writer: None,
            manifest: None,
            composition_root: None,
            config: None,
        }
    }

    pub fn with_values(mut self, values: ValueMap) -> Self {
        self.values = values;
        self
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn with_renderer(mut self, renderer: &'a dyn Renderer) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn with_writer(mut self, writer: &'a dyn FsWriter) -> Self {
        self.writer = Some(writer);
        self
    }

    pub fn with_manifest(mut self, manifest: &'a dyn ManifestEditor) -> Self {
        self.manifest = Some(manifest);
        self
    }

    pub fn with_composition_root(mut self, editor: &'a dyn CompositionRootEditor) -> Self {
        self.composition_root = Some(editor);
        self
    }

    pub fn with_config(mut self, config: &'a dyn ConfigEditor) -> Self {
        self.config = Some(config);
        self
    }

    pub fn values(&self) -> &ValueMap {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut ValueMap {
        &mut self.values
    }

    /// Set a dotted-path value, creating intermediate maps.
    pub fn set_value(&mut self, path: &str, value: impl Into<Value>) -> CraftResult<()> {
        values::set_path(&mut self.values, path, value.into())?;
        Ok(())
    }

    pub fn value_str(&self, path: &str) -> Option<&str> {
        values::get_str(&self.values, path)
    }

    /// A non-empty string value or `MissingValue`.
    pub fn require_str(&self, path: &str) -> CraftResult<&str> {
        self.value_str(path)
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| {
                ApplicationError::MissingValue {
                    key: path.to_string(),
                }
                .into()
            })
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// The run's log handle; module spans are children of it.
    pub fn span(&self) -> &Span {
        &self.span
    }

    pub fn renderer(&self) -> Option<&'a dyn Renderer> {
        self.renderer
    }

    pub fn writer(&self) -> Option<&'a dyn FsWriter> {
        self.writer
    }

    pub fn manifest(&self) -> Option<&'a dyn ManifestEditor> {
        self.manifest
    }

    pub fn composition_root(&self) -> Option<&'a dyn CompositionRootEditor> {
        self.composition_root
    }

    pub fn config(&self) -> Option<&'a dyn ConfigEditor> {
        self.config
    }

    /// Render `template` with the current values and write the result.
    ///
    /// Returns `false` when either the renderer or the writer is absent.
    pub fn render_and_write(&self, template: &ModuleTemplate) -> CraftResult<bool> {
        let (Some(renderer), Some(writer)) = (self.renderer, self.writer) else {
            tracing::debug!(template = %template.name, "renderer or writer absent, skipping files");
            return Ok(false);
        };
        let files = renderer.render(template, &self.values)?;
        writer.write_all(&self.project_root, &files)?;
        Ok(true)
    }
}

impl fmt::Debug for ModuleContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleContext")
            .field("project_root", &self.project_root)
            .field("values", &self.values)
            .field("renderer", &self.renderer.is_some())
            .field("writer", &self.writer.is_some())
            .field("manifest", &self.manifest.is_some())
            .field("composition_root", &self.composition_root.is_some())
            .field("config", &self.config.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CraftError;

    #[test]
    fn bare_context_has_no_collaborators() {
        let ctx = ModuleContext::new("/tmp/project");
        assert!(ctx.renderer().is_none());
        assert!(ctx.writer().is_none());
        assert!(ctx.manifest().is_none());
        assert!(ctx.composition_root().is_none());
        assert!(ctx.config().is_none());
        assert!(!ctx.render_and_write(&ModuleTemplate::new("empty")).unwrap());
    }

    #[test]
    fn require_str_reports_missing_key() {
        let mut ctx = ModuleContext::new("/tmp/project");
        ctx.set_value("Module", "").unwrap();
        let err = ctx.require_str("Module").unwrap_err();
        assert!(matches!(
            err,
            CraftError::Application(ApplicationError::MissingValue { .. })
        ));

        ctx.set_value("Module", "example.com/app").unwrap();
        assert_eq!(ctx.require_str("Module").unwrap(), "example.com/app");
    }
}
