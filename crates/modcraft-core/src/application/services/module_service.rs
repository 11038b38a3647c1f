//! Module Service - the use cases the CLI calls.
//!
//! - apply modules to an existing tree
//! - generate a new tree (`platform:base` plus extras, then the post hook)
//! - enumerate and dry-run plan

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::{
    application::{
        ports::{Module, ModuleContext, PostHook},
        services::module_registry::{ApplyReport, ModuleRegistry},
    },
    domain::ResolutionPlan,
    error::CraftResult,
};

/// Module every generated project starts from.
pub const BASE_MODULE: &str = "platform:base";

/// Information about a module for display purposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleInfo {
    pub name: String,
    pub label: String,
    pub version: String,
    pub summary: String,
    pub tags: Vec<String>,
    pub requires: Vec<String>,
    pub conflicts: Vec<String>,
}

impl ModuleInfo {
    fn from_module(module: &dyn Module) -> Self {
        let d = module.descriptor();
        Self {
            name: d.name().to_string(),
            label: d.label().to_string(),
            version: d.version().to_string(),
            summary: d.summary().to_string(),
            tags: d.tags().to_vec(),
            requires: d.requires().iter().map(ToString::to_string).collect(),
            conflicts: d.conflicts().iter().map(ToString::to_string).collect(),
        }
    }
}

pub struct ModuleService {
    registry: Arc<ModuleRegistry>,
    post_hook: Option<Box<dyn PostHook>>,
}

impl ModuleService {
    pub fn new(registry: Arc<ModuleRegistry>) -> Self {
        Self {
            registry,
            post_hook: None,
        }
    }

    pub fn with_post_hook(mut self, hook: Box<dyn PostHook>) -> Self {
        self.post_hook = Some(hook);
        self
    }

    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    /// Apply `names` (and their requirements) to the context's project.
    #[instrument(skip_all, fields(modules = ?names))]
    pub fn apply_modules(
        &self,
        ctx: &mut ModuleContext<'_>,
        names: &[&str],
    ) -> CraftResult<ApplyReport> {
        let report = self.registry.apply(ctx, names)?;
        info!(
            applied = report.applied.len(),
            skipped = report.skipped.len(),
            "modules applied"
        );
        Ok(report)
    }

    /// All registered modules in registration order.
    pub fn list_modules(&self) -> Vec<ModuleInfo> {
        self.registry
            .list()
            .iter()
            .map(|m| ModuleInfo::from_module(m.as_ref()))
            .collect()
    }

    pub fn plan_modules(&self, names: &[&str]) -> CraftResult<ResolutionPlan> {
        self.registry.plan(names.iter().copied())
    }

    /// Names a new project applies: the base module first, then `extra`.
    pub fn project_selection<'n>(extra: &[&'n str]) -> Vec<&'n str> {
        let mut names = Vec::with_capacity(extra.len() + 1);
        names.push(BASE_MODULE);
        names.extend(extra.iter().copied().filter(|n| *n != BASE_MODULE));
        names
    }

    /// Generate a new project and run the post hook.
    ///
    /// Post-hook failures are logged and never returned.
    #[instrument(skip_all, fields(root = %ctx.project_root().display(), extra = ?extra))]
    pub fn generate_project(
        &self,
        ctx: &mut ModuleContext<'_>,
        extra: &[&str],
    ) -> CraftResult<ApplyReport> {
        let names = Self::project_selection(extra);
        let report = self.registry.apply(ctx, &names)?;

        if let Some(hook) = &self.post_hook {
            if let Err(e) = hook.run(ctx.project_root()) {
                warn!(error = %e, "post-generation hook failed, continuing");
            }
        }

        info!(applied = report.applied.len(), "project generated");
        Ok(report)
    }
}
