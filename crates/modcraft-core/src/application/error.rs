//! Application layer errors.
//!
//! These errors represent failures in orchestration and I/O, not resolution
//! logic. Resolution and parse errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::{CraftError, ErrorCategory};

/// Errors that occur while applying modules through ports.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// An empty or malformed identifier reached a port.
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Template rendering failed.
    #[error("Rendering template '{template}' failed: {reason}")]
    RenderingFailed { template: String, reason: String },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// Writers never overwrite.
    #[error("File already exists: {path}")]
    FileExists { path: PathBuf },

    /// The manifest (go.mod) could not be edited.
    #[error("Manifest error at {path}: {reason}")]
    ManifestError { path: PathBuf, reason: String },

    /// A persisted configuration document could not be written.
    #[error("Config document error at {path}: {reason}")]
    ConfigDocument { path: PathBuf, reason: String },

    /// A generation value a module depends on is absent.
    #[error("Missing generation value '{key}'")]
    MissingValue { key: String },

    /// A module's apply step failed; resolution stops here.
    #[error("Module '{module}' failed: {source}")]
    ModuleFailed {
        module: String,
        #[source]
        source: Box<CraftError>,
    },
}

impl ApplicationError {
    pub fn filesystem(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        Self::FilesystemError {
            path: path.into(),
            reason: err.to_string(),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
            ],
            Self::FileExists { path } => vec![
                format!("Refusing to overwrite {}", path.display()),
                "Remove the file or apply the module to a fresh directory".into(),
            ],
            Self::RenderingFailed { template, .. } => vec![
                format!("Template '{}' references a value that is not set", template),
                "Pass it with --set key=value".into(),
            ],
            Self::MissingValue { key } => vec![
                format!("Set it with --set {}=...", key),
                "Run inside a directory containing go.mod to detect it automatically".into(),
            ],
            Self::ManifestError { path, .. } => vec![
                format!("Check that {} is a readable go.mod file", path.display()),
            ],
            Self::ConfigDocument { path, .. } => vec![
                format!("Check that {} is writable", path.display()),
            ],
            Self::ModuleFailed { module, source } => {
                let mut out = vec![format!(
                    "Modules applied before '{}' were not rolled back",
                    module
                )];
                out.extend(source.suggestions());
                out
            }
            Self::InvalidArgument { .. } => vec!["Check the error details above".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidArgument { .. } | Self::MissingValue { .. } => ErrorCategory::Validation,
            Self::FileExists { .. } => ErrorCategory::Validation,
            Self::RenderingFailed { .. } => ErrorCategory::Validation,
            Self::FilesystemError { .. }
            | Self::ManifestError { .. }
            | Self::ConfigDocument { .. } => ErrorCategory::Internal,
            Self::ModuleFailed { source, .. } => source.category(),
        }
    }
}
