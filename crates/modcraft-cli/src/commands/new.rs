//! Implementation of the `modcraft new` command.
//!
//! Responsibility: translate CLI arguments into generation values and a
//! module selection, call the module service, and display results.

use std::fs;
use std::io::IsTerminal as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, info_span, instrument};

use modcraft_adapters::{GitInitHook, builtin_registry};
use modcraft_core::application::ModuleService;

use crate::{
    cli::{NewArgs, global::GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
    project::{ProjectAdapters, generation_values, show_plan, show_report, validate_project_name},
};

/// Execute the `modcraft new` command.
///
/// 1. Resolve and validate the project name and directory
/// 2. Build generation values (`Name`, `Module`, `--set`)
/// 3. Resolve the plan; `--dry-run` prints it and stops
/// 4. Confirm when interactive, unless `--yes`
/// 5. Generate `platform:base` plus `--with` modules, then run hooks
#[instrument(skip_all, fields(project = %args.name))]
pub fn execute(
    args: NewArgs,
    global: &GlobalArgs,
    config: &AppConfig,
    output: &OutputManager,
) -> CliResult<()> {
    let (project_name, project_path) = resolve_project_path(&args.name, args.output.as_deref())?;
    validate_project_name(&project_name)?;

    let module_path = args
        .module
        .clone()
        .unwrap_or_else(|| format!("{}/{}", config.project.module_prefix, project_name));
    let values = generation_values(&project_name, &module_path, &args.set)?;

    let extras: Vec<&str> = args.with.iter().map(String::as_str).collect();
    let selection = ModuleService::project_selection(&extras);
    debug!(modules = ?selection, module_path = %module_path, "selection resolved");

    let hooks = config.hooks.enabled && !args.no_hooks;
    let mut service = ModuleService::new(Arc::new(builtin_registry()));

    // Conflicts, cycles and unknown names fail here, before any directory exists.
    let plan = service.plan_modules(&selection)?;

    if args.dry_run {
        output.info(&format!(
            "Dry run: would create '{}' at {}",
            project_name,
            project_path.display()
        ))?;
        show_plan(&plan, service.registry(), output)?;
        return Ok(());
    }

    if is_non_empty_dir(&project_path) {
        return Err(CliError::ProjectExists { path: project_path });
    }

    if !global.quiet && !args.yes && std::io::stdin().is_terminal() {
        show_configuration(&project_name, &module_path, &selection, &project_path, output)?;
        if !confirm()? {
            return Err(CliError::Cancelled);
        }
    }

    fs::create_dir_all(&project_path)
        .with_cli_context(|| format!("creating {}", project_path.display()))?;

    if hooks {
        service = service.with_post_hook(Box::new(GitInitHook::new()));
    }

    output.header(&format!("Creating '{project_name}'..."))?;
    info!(project = %project_name, path = %project_path.display(), "generation started");

    let adapters = ProjectAdapters::new(&project_path, service.registry(), config);
    let span = info_span!("new", project = %project_name);
    let mut ctx = adapters.context(&project_path, values, span);
    let report = service.generate_project(&mut ctx, &extras)?;

    show_report(&report, output)?;
    output.success(&format!("Project '{project_name}' created!"))?;

    if !global.quiet {
        output.print("")?;
        output.print("Next steps:")?;
        output.print(&format!("  cd {}", project_path.display()))?;
        if !hooks {
            output.print("  go mod tidy")?;
        }
        output.print(&format!("  go run ./cmd/{project_name}"))?;
    }

    Ok(())
}

// ── Path resolution ───────────────────────────────────────────────────────────

/// Split `name` into the project name (its last component) and the project
/// directory.  `--output` replaces any parent given in `name`.
pub fn resolve_project_path(name: &str, output: Option<&Path>) -> CliResult<(String, PathBuf)> {
    let path = Path::new(name);

    let project_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| CliError::InvalidProjectName {
            name: name.into(),
            reason: "cannot extract valid project name".into(),
        })?
        .to_string();

    let target = match output {
        Some(dir) => dir.join(&project_name),
        None => path.to_path_buf(),
    };

    Ok((project_name, target))
}

fn is_non_empty_dir(path: &Path) -> bool {
    fs::read_dir(path)
        .map(|mut entries| entries.next().is_some())
        .unwrap_or(path.exists())
}

// ── UI helpers ────────────────────────────────────────────────────────────────

fn show_configuration(
    name: &str,
    module_path: &str,
    modules: &[&str],
    location: &Path,
    out: &OutputManager,
) -> CliResult<()> {
    out.header("Configuration")?;
    out.print(&format!("  Project:   {name}"))?;
    out.print(&format!("  Module:    {module_path}"))?;
    out.print(&format!("  Modules:   {}", modules.join(", ")))?;
    out.print(&format!("  Location:  {}", location.display()))?;
    out.print("")?;
    Ok(())
}

fn confirm() -> CliResult<bool> {
    use std::io::{self, Write};

    print!("Continue? [Y/n] ");
    io::stdout()
        .flush()
        .with_cli_context(|| "failed to flush stdout")?;

    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .with_cli_context(|| "failed to read confirmation input")?;

    let input = input.trim().to_ascii_lowercase();
    Ok(input.is_empty() || input == "y" || input == "yes")
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── resolve_project_path ──────────────────────────────────────────────────

    #[test]
    fn simple_name_resolves_to_cwd() {
        let (name, dir) = resolve_project_path("my-app", None).unwrap();
        assert_eq!(name, "my-app");
        assert_eq!(dir, PathBuf::from("my-app"));
    }

    #[test]
    fn relative_path_keeps_parent() {
        let (name, dir) = resolve_project_path("../my-app", None).unwrap();
        assert_eq!(name, "my-app");
        assert_eq!(dir, PathBuf::from("../my-app"));
    }

    #[test]
    fn explicit_output_overrides_parent() {
        let (name, dir) = resolve_project_path("nested/my-app", Some(Path::new("/srv"))).unwrap();
        assert_eq!(name, "my-app");
        assert_eq!(dir, PathBuf::from("/srv/my-app"));
    }

    #[test]
    fn nested_path_works_on_all_platforms() {
        let sep = std::path::MAIN_SEPARATOR;
        let path = format!("foo{sep}bar{sep}my-app");

        let (name, dir) = resolve_project_path(&path, None).unwrap();
        assert_eq!(name, "my-app");
        assert_eq!(dir, PathBuf::from("foo").join("bar").join("my-app"));
    }

    #[test]
    fn bare_parent_has_no_name() {
        assert!(matches!(
            resolve_project_path("..", None),
            Err(CliError::InvalidProjectName { .. })
        ));
    }

    // ── directory checks ─────────────────────────────────────────────────────

    #[test]
    fn empty_directory_is_reusable() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!is_non_empty_dir(dir.path()));
        assert!(!is_non_empty_dir(&dir.path().join("missing")));

        fs::write(dir.path().join("go.mod"), "module x\n").unwrap();
        assert!(is_non_empty_dir(dir.path()));
    }
}
