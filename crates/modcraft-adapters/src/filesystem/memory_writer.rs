//! In-memory writer for testing.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use modcraft_core::{
    application::{ApplicationError, ports::FsWriter},
    domain::{GeneratedFile, Permissions},
    error::{CraftError, CraftResult},
};

/// Thread-safe in-memory writer with the same no-overwrite rule as
/// [`LocalWriter`](super::LocalWriter).
#[derive(Debug, Clone, Default)]
pub struct MemoryWriter {
    files: Arc<RwLock<BTreeMap<PathBuf, (String, Permissions)>>>,
}

impl MemoryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a file, bypassing the overwrite check.
    pub fn seed(&self, path: impl Into<PathBuf>, content: impl Into<String>) {
        if let Ok(mut files) = self.files.write() {
            files.insert(path.into(), (content.into(), Permissions::default()));
        }
    }

    // Test helpers

    pub fn read_file(&self, path: impl AsRef<Path>) -> Option<String> {
        let files = self.files.read().ok()?;
        files.get(path.as_ref()).map(|(content, _)| content.clone())
    }

    pub fn permissions(&self, path: impl AsRef<Path>) -> Option<Permissions> {
        let files = self.files.read().ok()?;
        files.get(path.as_ref()).map(|(_, perms)| *perms)
    }

    /// All written paths, sorted.
    pub fn list_files(&self) -> Vec<PathBuf> {
        self.files
            .read()
            .map(|files| files.keys().cloned().collect())
            .unwrap_or_default()
    }
}

impl FsWriter for MemoryWriter {
    fn write_all(&self, root: &Path, files: &[GeneratedFile]) -> CraftResult<()> {
        let mut store = self.files.write().map_err(|_| CraftError::Internal {
            message: "memory writer lock poisoned".into(),
        })?;

        let targets: Vec<PathBuf> = files.iter().map(|f| root.join(f.path.as_path())).collect();
        if let Some(existing) = targets.iter().find(|t| store.contains_key(*t)) {
            return Err(ApplicationError::FileExists {
                path: existing.clone(),
            }
            .into());
        }

        for (target, file) in targets.into_iter().zip(files) {
            store.insert(target, (file.content.clone(), file.permissions));
        }
        Ok(())
    }
}
