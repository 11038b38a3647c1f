//! In-place editors for files a project already has: `go.mod`, the
//! composition root and `config/config.yml`.
//!
//! Every editor rewrites through a temporary file in the same directory and
//! renames it over the target, so a failed edit never leaves a half-written
//! file behind.

mod composition_root;
mod config;
mod go_mod;

pub use composition_root::{CompositionRootFileEditor, DEFAULT_COMBINATOR, DEFAULT_ROOT_PATH};
pub use config::{CONFIG_PATH, YamlConfigEditor};
pub use go_mod::GoModEditor;

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::filesystem::map_io_error;
use modcraft_core::error::CraftResult;

/// Replace `path` with `content` atomically, keeping its permissions.
pub(crate) fn atomic_write(path: &Path, content: &str) -> CraftResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| map_io_error(dir, e, "create directory"))?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| map_io_error(dir, e, "create temp file"))?;
    tmp.write_all(content.as_bytes())
        .map_err(|e| map_io_error(tmp.path(), e, "write temp file"))?;

    let permissions = match fs::metadata(path) {
        Ok(meta) => Some(meta.permissions()),
        Err(_) => default_permissions(),
    };
    if let Some(permissions) = permissions {
        tmp.as_file()
            .set_permissions(permissions)
            .map_err(|e| map_io_error(tmp.path(), e, "set permissions"))?;
    }

    tmp.persist(path)
        .map_err(|e| map_io_error(path, e.error, "replace file"))?;
    Ok(())
}

#[cfg(unix)]
fn default_permissions() -> Option<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn default_permissions() -> Option<fs::Permissions> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn atomic_write_replaces_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("go.mod");
        fs::write(&path, "old\n").unwrap();

        atomic_write(&path, "new\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "new\n");
        let leftovers = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[cfg(unix)]
    #[test]
    fn atomic_write_keeps_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("run.sh");
        fs::write(&path, "#!/bin/sh\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();

        atomic_write(&path, "#!/bin/sh\necho hi\n").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }
}
