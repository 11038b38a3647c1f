//! Implementation of the `modcraft add` command.
//!
//! Applies modules (and their requirements) to an existing project.  The
//! project name is the directory's basename; the Go module path comes from
//! `go.mod`, falling back to `<project.module_prefix>/<name>`.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use tracing::{info, info_span, instrument, warn};

use modcraft_adapters::builtin_registry;
use modcraft_core::application::ModuleService;

use crate::{
    cli::AddArgs,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
    project::{ProjectAdapters, generation_values, read_module_path, show_plan, show_report},
};

#[instrument(skip_all, fields(modules = ?args.modules, dir = %args.dir.display()))]
pub fn execute(args: AddArgs, config: &AppConfig, output: &OutputManager) -> CliResult<()> {
    let root = fs::canonicalize(&args.dir).map_err(|_| CliError::ProjectNotFound {
        path: args.dir.clone(),
    })?;
    if !root.is_dir() {
        return Err(CliError::ProjectNotFound { path: args.dir });
    }

    let project_name = project_name(&root)?;
    let module_path = read_module_path(&root).unwrap_or_else(|| {
        warn!(dir = %root.display(), "no module path in go.mod, using configured prefix");
        format!("{}/{}", config.project.module_prefix, project_name)
    });
    let values = generation_values(&project_name, &module_path, &args.set)?;

    let names: Vec<&str> = args.modules.iter().map(String::as_str).collect();
    let service = ModuleService::new(Arc::new(builtin_registry()));

    if args.dry_run {
        let plan = service.plan_modules(&names)?;
        output.info(&format!("Dry run: would apply to {}", root.display()))?;
        show_plan(&plan, service.registry(), output)?;
        return Ok(());
    }

    if !root.join("go.mod").exists() {
        output.warning("No go.mod found; platform:base will generate a new project here")?;
    }

    let adapters = ProjectAdapters::new(&root, service.registry(), config);
    let span = info_span!("add", project = %project_name);
    let mut ctx = adapters.context(&root, values, span);
    let report = service.apply_modules(&mut ctx, &names)?;
    info!(applied = report.applied.len(), "add finished");

    show_report(&report, output)?;
    if report.applied.is_empty() {
        output.info("Nothing to do")?;
    } else {
        output.success(&format!("Added {} to '{project_name}'", args.modules.join(", ")))?;
    }
    Ok(())
}

fn project_name(root: &Path) -> CliResult<String> {
    root.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| CliError::InvalidProjectName {
            name: root.display().to_string(),
            reason: "directory has no usable name".into(),
        })
}
