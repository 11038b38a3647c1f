//! Module registry - owns every known module and drives application.
//!
//! `apply` is the single entry point the rest of the tool uses:
//! 1. Plan (expand, conflict check, order) via `domain::resolution`
//! 2. Apply each planned module in order, skipping those whose predicate fails
//!
//! Planning is pure, so resolution failures have no side effects. Once
//! application starts, the first failing module aborts the run; files written
//! by earlier modules stay in place.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, info_span, instrument};

use crate::{
    application::{
        ApplicationError,
        ports::{Module, ModuleContext},
    },
    domain::{
        DescriptorLookup, ModuleDescriptor, ModuleName, ResolutionPlan, ValueMap, resolve,
    },
    error::{CraftError, CraftResult},
};

/// Outcome of a successful [`ModuleRegistry::apply`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    /// Modules whose `apply` ran, in order.
    pub applied: Vec<ModuleName>,
    /// Modules whose `applies` predicate returned false.
    pub skipped: Vec<ModuleName>,
}

impl ApplyReport {
    pub fn is_empty(&self) -> bool {
        self.applied.is_empty() && self.skipped.is_empty()
    }
}

/// Name-keyed module registry with stable registration order.
#[derive(Default)]
pub struct ModuleRegistry {
    modules: HashMap<ModuleName, Arc<dyn Module>>,
    order: Vec<ModuleName>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a module.
    ///
    /// Replacing keeps the name's original position in [`list`](Self::list).
    pub fn register<M: Module + 'static>(&mut self, module: M) {
        self.register_arc(Arc::new(module));
    }

    pub fn register_arc(&mut self, module: Arc<dyn Module>) {
        let name = module.name().clone();
        if self.modules.insert(name.clone(), module).is_none() {
            self.order.push(name);
        } else {
            debug!(module = %name, "replaced registered module");
        }
    }

    /// Snapshot of all modules in registration order.
    pub fn list(&self) -> Vec<Arc<dyn Module>> {
        self.order
            .iter()
            .filter_map(|name| self.modules.get(name).cloned())
            .collect()
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Module>> {
        self.modules.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.modules.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Resolve `names` without applying anything.
    pub fn plan<I, S>(&self, names: I) -> CraftResult<ResolutionPlan>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(resolve(self, names)?)
    }

    /// Resolve `names` and apply the plan against `ctx`.
    #[instrument(skip_all, fields(requested = names.len()))]
    pub fn apply(&self, ctx: &mut ModuleContext<'_>, names: &[&str]) -> CraftResult<ApplyReport> {
        let plan = self.plan(names.iter().copied())?;
        info!(
            order = %plan.order.iter().map(ModuleName::as_str).collect::<Vec<_>>().join(", "),
            "resolved application order"
        );

        let mut report = ApplyReport::default();
        for name in &plan.order {
            let module = self.get(name.as_str()).ok_or_else(|| CraftError::Internal {
                message: format!("planned module '{name}' is not registered"),
            })?;

            let span = info_span!(parent: ctx.span(), "module", name = %name);
            let _entered = span.enter();

            if !module.applies(ctx) {
                debug!("predicate false, skipping");
                report.skipped.push(name.clone());
                continue;
            }

            module.apply(ctx).map_err(|source| ApplicationError::ModuleFailed {
                module: name.to_string(),
                source: Box::new(source),
            })?;
            debug!("applied");
            report.applied.push(name.clone());
        }

        Ok(report)
    }

    /// Defaults of every module that declares some, keyed by name.
    pub fn defaults_catalog(&self) -> BTreeMap<String, ValueMap> {
        self.order
            .iter()
            .filter_map(|name| {
                let defaults = self.modules.get(name)?.defaults()?;
                (!defaults.is_empty()).then(|| (name.to_string(), defaults))
            })
            .collect()
    }
}

impl DescriptorLookup for ModuleRegistry {
    fn descriptor(&self, name: &str) -> Option<&ModuleDescriptor> {
        self.modules.get(name).map(|m| m.descriptor())
    }
}

impl fmt::Debug for ModuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleRegistry")
            .field("modules", &self.order)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Value;
    use std::sync::Mutex;

    struct Fake {
        descriptor: ModuleDescriptor,
        tag: &'static str,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl Module for Fake {
        fn descriptor(&self) -> &ModuleDescriptor {
            &self.descriptor
        }

        fn apply(&self, _ctx: &mut ModuleContext<'_>) -> CraftResult<()> {
            self.log
                .lock()
                .unwrap()
                .push(format!("{}:{}", self.descriptor.name(), self.tag));
            Ok(())
        }

        fn defaults(&self) -> Option<ValueMap> {
            (self.tag == "with-defaults").then(|| {
                let mut map = ValueMap::new();
                map.insert("key".into(), Value::from("value"));
                map
            })
        }
    }

    fn fake(name: &str, tag: &'static str, log: &Arc<Mutex<Vec<String>>>) -> Fake {
        Fake {
            descriptor: ModuleDescriptor::builder(ModuleName::new(name)).build(),
            tag,
            log: Arc::clone(log),
        }
    }

    #[test]
    fn register_then_get() {
        let log = Arc::default();
        let mut registry = ModuleRegistry::new();
        registry.register(fake("feature:makefile", "v1", &log));
        let module = registry.get("feature:makefile").unwrap();
        assert_eq!(module.name(), "feature:makefile");
        assert!(registry.get("feature:dockerfile").is_none());
    }

    #[test]
    fn reregistering_keeps_position_and_replaces_value() {
        let log: Arc<Mutex<Vec<String>>> = Arc::default();
        let mut registry = ModuleRegistry::new();
        registry.register(fake("b:two", "v1", &log));
        registry.register(fake("a:one", "v1", &log));
        registry.register(fake("b:two", "v2", &log));

        let names: Vec<_> = registry
            .list()
            .iter()
            .map(|m| m.name().to_string())
            .collect();
        assert_eq!(names, ["b:two", "a:one"]);
        assert_eq!(registry.len(), 2);

        let mut ctx = ModuleContext::new("/tmp/none");
        registry.apply(&mut ctx, &["b:two"]).unwrap();
        assert_eq!(*log.lock().unwrap(), ["b:two:v2"]);
    }

    #[test]
    fn defaults_catalog_skips_modules_without_defaults() {
        let log = Arc::default();
        let mut registry = ModuleRegistry::new();
        registry.register(fake("a:one", "with-defaults", &log));
        registry.register(fake("b:two", "plain", &log));
        let catalog = registry.defaults_catalog();
        assert_eq!(catalog.len(), 1);
        assert!(catalog.contains_key("a:one"));
    }
}
