//! Wiring shared by `new` and `add`.
//!
//! Builds the adapters for one project directory and the generation values
//! every module reads (`Name`, `Module`, then `--set` overrides).

use std::fs;
use std::path::Path;

use tracing::{Span, debug};

use modcraft_adapters::{
    CompositionRootFileEditor, GoModEditor, LocalWriter, TemplateRenderer, YamlConfigEditor,
};
use modcraft_core::{
    domain::{ResolutionPlan, values},
    prelude::*,
};

use crate::{
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Adapters bound to one project root.
pub struct ProjectAdapters {
    renderer: TemplateRenderer,
    writer: LocalWriter,
    manifest: GoModEditor,
    composition_root: CompositionRootFileEditor,
    config: YamlConfigEditor,
}

impl ProjectAdapters {
    pub fn new(root: &Path, registry: &ModuleRegistry, config: &AppConfig) -> Self {
        Self {
            renderer: TemplateRenderer::new(),
            writer: LocalWriter::new(),
            manifest: GoModEditor::new(root),
            composition_root: CompositionRootFileEditor::new(root)
                .with_path(&config.composition_root.path)
                .with_combinator(&config.composition_root.combinator),
            config: YamlConfigEditor::new(root, registry.defaults_catalog()),
        }
    }

    /// A fully wired context for `root`.
    pub fn context(&self, root: &Path, values: ValueMap, span: Span) -> ModuleContext<'_> {
        ModuleContext::new(root)
            .with_values(values)
            .with_span(span)
            .with_renderer(&self.renderer)
            .with_writer(&self.writer)
            .with_manifest(&self.manifest)
            .with_composition_root(&self.composition_root)
            .with_config(&self.config)
    }
}

/// `Name` and `Module`, then each `KEY=VALUE` override on top.
///
/// Both keys end up in output paths, so an overridden `Name` must still be a
/// valid project name and `Module` a plausible import path.
pub fn generation_values(name: &str, module: &str, overrides: &[String]) -> CliResult<ValueMap> {
    let mut base = ValueMap::new();
    base.insert("Name".into(), Value::from(name));
    base.insert("Module".into(), Value::from(module));
    let values = values::with_overrides(&base, overrides.iter().map(String::as_str))
        .map_err(|e| CliError::Core(e.into()))?;

    match values::get_str(&values, "Name") {
        Some(final_name) if final_name == name => {}
        Some(final_name) => validate_project_name(final_name)?,
        None => return Err(invalid_input("Name must be a string")),
    }
    let final_module = values::get_str(&values, "Module").unwrap_or_default();
    validate_module_path(final_module)?;
    Ok(values)
}

pub fn validate_project_name(name: &str) -> CliResult<()> {
    let invalid = |reason: &str| {
        Err(CliError::InvalidProjectName {
            name: name.into(),
            reason: reason.into(),
        })
    };

    if name.is_empty() {
        return invalid("name cannot be empty");
    }
    if name.starts_with('.') {
        return invalid("name cannot start with '.'");
    }
    if name.contains('/') || name.contains('\\') {
        return invalid("name cannot contain path separators");
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return invalid("only ASCII letters, digits, '-' and '_' are allowed");
    }
    Ok(())
}

fn validate_module_path(module: &str) -> CliResult<()> {
    if module.is_empty() || module.contains(char::is_whitespace) {
        return Err(invalid_input(format!("invalid module path '{module}'")));
    }
    if module.starts_with('/') || module.split('/').any(|seg| seg.is_empty() || seg == "." || seg == "..") {
        return Err(invalid_input(format!(
            "module path '{module}' must be slash-separated without empty, '.' or '..' segments"
        )));
    }
    Ok(())
}

fn invalid_input(message: impl Into<String>) -> CliError {
    CliError::InvalidInput {
        message: message.into(),
        source: None,
    }
}

/// Module path declared by `<root>/go.mod`, if there is one.
pub fn read_module_path(root: &Path) -> Option<String> {
    let content = fs::read_to_string(root.join("go.mod")).ok()?;
    let module = content.lines().find_map(|line| {
        let rest = line.trim().strip_prefix("module")?;
        rest.starts_with(char::is_whitespace)
            .then(|| rest.trim().trim_matches('"').to_string())
    })?;
    debug!(module = %module, "read module path from go.mod");
    (!module.is_empty()).then_some(module)
}

/// Print a resolved plan, one module per line.
pub fn show_plan(plan: &ResolutionPlan, registry: &ModuleRegistry, out: &OutputManager) -> CliResult<()> {
    out.header("Resolved modules (in order)")?;
    for name in &plan.order {
        let label = registry
            .get(name.as_str())
            .map(|m| m.descriptor().label().to_string())
            .unwrap_or_default();
        out.item(name.as_str(), &label)?;
    }
    Ok(())
}

/// Print an apply report.
pub fn show_report(report: &ApplyReport, out: &OutputManager) -> CliResult<()> {
    for name in &report.applied {
        out.success(&format!("applied {name}"))?;
    }
    for name in &report.skipped {
        out.info(&format!("skipped {name} (already present)"))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_layer_on_name_and_module() {
        let values = generation_values(
            "orders",
            "github.com/acme/orders",
            &["gorm.driver=postgres".into(), "Name=billing".into()],
        )
        .unwrap();
        assert_eq!(values::get_str(&values, "Name"), Some("billing"));
        assert_eq!(values::get_str(&values, "Module"), Some("github.com/acme/orders"));
        assert_eq!(values::get_str(&values, "gorm.driver"), Some("postgres"));
    }

    #[test]
    fn malformed_override_is_a_user_error() {
        let err = generation_values("orders", "m", &["novalue".into()]).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn overridden_name_must_stay_a_project_name() {
        for bad in ["../../escaped", "a/b", "..", ""] {
            let err = generation_values("orders", "m.io/orders", &[format!("Name={bad}")])
                .unwrap_err();
            assert!(matches!(err, CliError::InvalidProjectName { .. }), "{bad}");
            assert_eq!(err.exit_code(), 2);
        }
    }

    #[test]
    fn overridden_module_must_be_an_import_path() {
        for bad in ["", "a b", "../x", "/abs", "a//b"] {
            let err = generation_values("orders", "m.io/orders", &[format!("Module={bad}")])
                .unwrap_err();
            assert!(matches!(err, CliError::InvalidInput { .. }), "{bad:?}");
        }
        assert!(generation_values("orders", "m.io/o", &["Module=github.com/acme/x".into()]).is_ok());
    }

    #[test]
    fn nested_name_override_is_rejected() {
        let err = generation_values("orders", "m.io/o", &["Name.first=x".into()]).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn empty_name_is_invalid() {
        assert!(matches!(
            validate_project_name(""),
            Err(CliError::InvalidProjectName { .. })
        ));
    }

    #[test]
    fn dotfile_name_is_invalid() {
        assert!(matches!(
            validate_project_name(".hidden"),
            Err(CliError::InvalidProjectName { .. })
        ));
    }

    #[test]
    fn path_separator_and_spaces_are_invalid() {
        assert!(validate_project_name("a/b").is_err());
        assert!(validate_project_name("a\\b").is_err());
        assert!(validate_project_name("my app").is_err());
    }

    #[test]
    fn valid_names_pass() {
        for name in &["orders", "billing-api", "user_service", "svc2", "Payments"] {
            assert!(validate_project_name(name).is_ok(), "failed for: {name}");
        }
    }

    #[test]
    fn module_path_comes_from_go_mod() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("go.mod"),
            "// generated\nmodule github.com/acme/orders\n\ngo 1.22\n",
        )
        .unwrap();
        assert_eq!(
            read_module_path(dir.path()).as_deref(),
            Some("github.com/acme/orders")
        );
    }

    #[test]
    fn module_path_absent_without_go_mod() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(read_module_path(dir.path()), None);
    }
}
