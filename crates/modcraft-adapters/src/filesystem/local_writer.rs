//! Writer for the real filesystem.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use tracing::{debug, instrument};

use modcraft_core::{
    application::{ApplicationError, ports::FsWriter},
    domain::{GeneratedFile, Permissions},
    error::{CraftError, CraftResult},
};

/// Production writer backed by `std::fs`.
///
/// Existing files are never overwritten: every target is checked before the
/// first byte is written, so a clash leaves the tree untouched.
#[derive(Debug, Clone, Copy)]
pub struct LocalWriter;

impl LocalWriter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl FsWriter for LocalWriter {
    #[instrument(skip_all, fields(root = %root.display(), files = files.len()))]
    fn write_all(&self, root: &Path, files: &[GeneratedFile]) -> CraftResult<()> {
        for file in files {
            let target = root.join(file.path.as_path());
            if target.exists() {
                return Err(ApplicationError::FileExists { path: target }.into());
            }
        }

        for file in files {
            let target = root.join(file.path.as_path());
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)
                    .map_err(|e| map_io_error(parent, e, "create directory"))?;
            }

            // create_new closes the gap between the check above and the write
            let mut handle = OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&target)
                .map_err(|e| match e.kind() {
                    io::ErrorKind::AlreadyExists => ApplicationError::FileExists {
                        path: target.clone(),
                    }
                    .into(),
                    _ => map_io_error(&target, e, "create file"),
                })?;
            handle
                .write_all(file.content.as_bytes())
                .map_err(|e| map_io_error(&target, e, "write file"))?;

            set_mode(&target, file.permissions)?;
            debug!(path = %file.path, "wrote");
        }
        Ok(())
    }
}

#[cfg(unix)]
fn set_mode(path: &Path, permissions: Permissions) -> CraftResult<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(permissions.unix_mode()))
        .map_err(|e| map_io_error(path, e, "set permissions"))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _permissions: Permissions) -> CraftResult<()> {
    Ok(())
}

pub(crate) fn map_io_error(path: &Path, e: io::Error, operation: &str) -> CraftError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {}: {}", operation, e),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use modcraft_core::domain::RelativePath;
    use tempfile::TempDir;

    fn file(path: &str, content: &str) -> GeneratedFile {
        GeneratedFile::new(RelativePath::from_slash(path).unwrap(), content.to_string())
    }

    #[test]
    fn writes_nested_files() {
        let dir = TempDir::new().unwrap();
        LocalWriter::new()
            .write_all(
                dir.path(),
                &[
                    file("go.mod", "module demo\n"),
                    file("internal/core/entity/.gitkeep", ""),
                ],
            )
            .unwrap();

        assert_eq!(
            fs::read_to_string(dir.path().join("go.mod")).unwrap(),
            "module demo\n"
        );
        assert!(dir.path().join("internal/core/entity/.gitkeep").is_file());
    }

    #[test]
    fn refuses_to_overwrite_and_writes_nothing() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("Makefile"), "keep\n").unwrap();

        let err = LocalWriter::new()
            .write_all(
                dir.path(),
                &[file("README.md", "new\n"), file("Makefile", "clobber\n")],
            )
            .unwrap_err();

        assert!(matches!(
            err,
            CraftError::Application(ApplicationError::FileExists { .. })
        ));
        assert!(!dir.path().join("README.md").exists());
        assert_eq!(
            fs::read_to_string(dir.path().join("Makefile")).unwrap(),
            "keep\n"
        );
    }

    #[cfg(unix)]
    #[test]
    fn executable_bit_is_applied() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let mut script = file("scripts/dev.sh", "#!/bin/sh\n");
        script.permissions = Permissions::executable();
        LocalWriter::new().write_all(dir.path(), &[script]).unwrap();

        let mode = fs::metadata(dir.path().join("scripts/dev.sh"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o755);
    }
}
