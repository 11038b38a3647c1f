//! Module identity and declared graph edges.
//!
//! A [`ModuleDescriptor`] is everything the resolution planner needs to know
//! about a module: its [`ModuleName`] plus the static `requires` and
//! `conflicts` edge lists. Label, version, summary and tags ride along for
//! display and never participate in resolution.

use serde::Serialize;

use crate::domain::{DomainError, ModuleName};

/// Static description of a module.
///
/// Edge lists are fixed per instance; they are never computed from the
/// generation context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleDescriptor {
    name: ModuleName,
    label: String,
    version: String,
    summary: String,
    tags: Vec<String>,
    requires: Vec<ModuleName>,
    conflicts: Vec<ModuleName>,
}

impl ModuleDescriptor {
    pub fn builder(name: ModuleName) -> ModuleDescriptorBuilder {
        ModuleDescriptorBuilder::new(name)
    }

    pub fn name(&self) -> &ModuleName {
        &self.name
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn requires(&self) -> &[ModuleName] {
        &self.requires
    }

    pub fn conflicts(&self) -> &[ModuleName] {
        &self.conflicts
    }
}

/// Builder for [`ModuleDescriptor`].
///
/// `label` defaults to the name and `version` to `0.1.0`.
#[derive(Debug, Clone)]
pub struct ModuleDescriptorBuilder {
    name: ModuleName,
    label: Option<String>,
    version: Option<String>,
    summary: String,
    tags: Vec<String>,
    requires: Vec<ModuleName>,
    conflicts: Vec<ModuleName>,
}

impl ModuleDescriptorBuilder {
    fn new(name: ModuleName) -> Self {
        Self {
            name,
            label: None,
            version: None,
            summary: String::new(),
            tags: Vec::new(),
            requires: Vec::new(),
            conflicts: Vec::new(),
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn requires(mut self, name: ModuleName) -> Self {
        if !self.requires.contains(&name) {
            self.requires.push(name);
        }
        self
    }

    pub fn conflicts(mut self, name: ModuleName) -> Self {
        if !self.conflicts.contains(&name) {
            self.conflicts.push(name);
        }
        self
    }

    /// Parse and add requirement edges from string names.
    pub fn try_requires<'a>(
        mut self,
        names: impl IntoIterator<Item = &'a str>,
    ) -> Result<Self, DomainError> {
        for name in names {
            self = self.requires(ModuleName::parse(name)?);
        }
        Ok(self)
    }

    /// Parse and add conflict edges from string names.
    pub fn try_conflicts<'a>(
        mut self,
        names: impl IntoIterator<Item = &'a str>,
    ) -> Result<Self, DomainError> {
        for name in names {
            self = self.conflicts(ModuleName::parse(name)?);
        }
        Ok(self)
    }

    pub fn build(self) -> ModuleDescriptor {
        ModuleDescriptor {
            label: self.label.unwrap_or_else(|| self.name.to_string()),
            version: self.version.unwrap_or_else(|| "0.1.0".into()),
            name: self.name,
            summary: self.summary,
            tags: self.tags,
            requires: self.requires,
            conflicts: self.conflicts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_applies_defaults() {
        let d = ModuleDescriptor::builder(ModuleName::new("feature:makefile")).build();
        assert_eq!(d.label(), "feature:makefile");
        assert_eq!(d.version(), "0.1.0");
        assert!(d.requires().is_empty());
        assert!(d.conflicts().is_empty());
    }

    #[test]
    fn builder_deduplicates_edges() {
        let d = ModuleDescriptor::builder(ModuleName::new("http:chi"))
            .try_requires(["platform:base", "platform:base"])
            .unwrap()
            .try_conflicts(["http:gin"])
            .unwrap()
            .build();
        assert_eq!(d.requires().len(), 1);
        assert_eq!(d.conflicts()[0], "http:gin");
    }

    #[test]
    fn try_requires_rejects_bad_names() {
        let result = ModuleDescriptor::builder(ModuleName::new("http:chi")).try_requires(["base"]);
        assert!(result.is_err());
    }
}
