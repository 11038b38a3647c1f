use super::DomainError;
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// A filesystem path guaranteed to be relative.
///
/// Invariant: Never absolute and never climbs above its base with `..`.
/// Enforced at construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RelativePath(PathBuf);

impl RelativePath {
    /// Create a new relative path.
    ///
    /// # Panics
    /// Panics if path is absolute (use `try_new` for fallible).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        assert!(
            !path.is_absolute(),
            "RelativePath cannot be absolute: {:?}",
            path
        );
        Self(path)
    }

    /// Fallible constructor.
    pub fn try_new(path: impl Into<PathBuf>) -> Result<Self, DomainError> {
        let path = path.into();
        if path.is_absolute() || path.has_root() {
            Err(DomainError::AbsolutePathNotAllowed {
                path: path.display().to_string(),
            })
        } else if path.components().any(|c| c == Component::ParentDir) {
            Err(DomainError::PathEscapesRoot {
                path: path.display().to_string(),
            })
        } else {
            Ok(Self(path))
        }
    }

    /// Build from a `/`-separated template path, independent of platform.
    pub fn from_slash(path: &str) -> Result<Self, DomainError> {
        if path.starts_with('/') {
            return Err(DomainError::AbsolutePathNotAllowed { path: path.into() });
        }
        let buf: PathBuf = path
            .split('/')
            .filter(|segment| !segment.is_empty() && *segment != ".")
            .collect();
        Self::try_new(buf)
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }

    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }
}

impl AsRef<Path> for RelativePath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// Capability-based permissions model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Permissions {
    executable: bool,
}

impl Permissions {
    pub const fn read_write() -> Self {
        Self { executable: false }
    }

    pub const fn executable() -> Self {
        Self { executable: true }
    }

    pub const fn executable_flag(&self) -> bool {
        self.executable
    }

    /// Unix mode bits matching these permissions.
    pub const fn unix_mode(&self) -> u32 {
        if self.executable { 0o755 } else { 0o644 }
    }
}

impl Default for Permissions {
    fn default() -> Self {
        Self::read_write()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_slash_normalises_segments() {
        let path = RelativePath::from_slash("./cmd//demo/main.go").unwrap();
        assert_eq!(
            path.as_path(),
            Path::new("cmd").join("demo").join("main.go")
        );
    }

    #[test]
    fn from_slash_rejects_absolute() {
        assert!(matches!(
            RelativePath::from_slash("/etc/passwd"),
            Err(DomainError::AbsolutePathNotAllowed { .. })
        ));
    }

    #[test]
    fn parent_segments_are_rejected() {
        for path in ["../escaped/go.mod", "cmd/../../x", ".."] {
            assert!(
                matches!(
                    RelativePath::from_slash(path),
                    Err(DomainError::PathEscapesRoot { .. })
                ),
                "{path}"
            );
        }
        assert!(RelativePath::try_new("a/../b").is_err());
        assert!(RelativePath::from_slash("..hidden/file").is_ok());
    }

    #[test]
    fn default_mode_is_not_executable() {
        assert_eq!(Permissions::default().unix_mode(), 0o644);
        assert_eq!(Permissions::executable().unix_mode(), 0o755);
    }
}
