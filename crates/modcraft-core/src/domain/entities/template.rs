//! Module templates and the files they render to.
//!
//! A [`ModuleTemplate`] is a named bundle of [`TemplateFile`]s whose paths
//! and contents may still contain placeholders. The renderer port turns it
//! into [`GeneratedFile`]s with concrete relative paths, which the writer
//! port materialises under the project root.

use std::borrow::Cow;

use crate::domain::entities::common::{Permissions, RelativePath};

/// One template entry: a `/`-separated path and its unrendered content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateFile {
    pub path: Cow<'static, str>,
    pub content: Cow<'static, str>,
    pub permissions: Permissions,
}

impl TemplateFile {
    pub fn new(path: impl Into<Cow<'static, str>>, content: impl Into<Cow<'static, str>>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            permissions: Permissions::default(),
        }
    }

    pub fn with_permissions(mut self, permissions: Permissions) -> Self {
        self.permissions = permissions;
        self
    }
}

/// A named set of template files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleTemplate {
    pub name: String,
    pub files: Vec<TemplateFile>,
}

impl ModuleTemplate {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            files: Vec::new(),
        }
    }

    pub fn with_file(mut self, file: TemplateFile) -> Self {
        self.files.push(file);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// A rendered file ready to be written relative to the project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: RelativePath,
    pub content: String,
    pub permissions: Permissions,
}

impl GeneratedFile {
    pub fn new(path: RelativePath, content: impl Into<String>) -> Self {
        Self {
            path,
            content: content.into(),
            permissions: Permissions::default(),
        }
    }
}
