// ============================================================================
// domain/error.rs - RESOLUTION AND SOURCE-MODEL ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (module failures are wrapped and re-reported)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors (400-level equivalent)
    // ========================================================================
    #[error("Invalid module name '{name}': {reason}")]
    InvalidModuleName { name: String, reason: String },

    #[error("Invalid value path '{path}': {reason}")]
    InvalidValuePath { path: String, reason: String },

    #[error("Syntax error at {location}: {message}")]
    SyntaxError { location: String, message: String },

    #[error("Absolute paths not allowed: {path}")]
    AbsolutePathNotAllowed { path: String },

    #[error("Path escapes the project root: {path}")]
    PathEscapesRoot { path: String },

    // ========================================================================
    // Compatibility Errors (409-level equivalent)
    // ========================================================================
    #[error("Module '{module}' conflicts with '{conflicts_with}'")]
    ConflictDetected {
        module: String,
        conflicts_with: String,
    },

    #[error("Dependency cycle detected at '{module}': {}", .path.join(" -> "))]
    CycleDetected { module: String, path: Vec<String> },

    // ========================================================================
    // Not Found Errors (404-level equivalent)
    // ========================================================================
    #[error("Unknown module: {name}{}", .required_by.as_ref().map(|by| format!(" (required by {by})")).unwrap_or_default())]
    ModuleNotFound {
        name: String,
        required_by: Option<String>,
    },
}

impl DomainError {
    /// Attach a file name to a syntax error's location.
    ///
    /// Other variants are returned unchanged.
    pub fn in_file(self, file: impl std::fmt::Display) -> Self {
        match self {
            Self::SyntaxError { location, message } => Self::SyntaxError {
                location: format!("{file}:{location}"),
                message,
            },
            other => other,
        }
    }

    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::ModuleNotFound { name, required_by } => {
                let mut out = vec![format!("No module named '{}' is registered", name)];
                if let Some(by) = required_by {
                    out.push(format!("'{}' declares it as a requirement", by));
                }
                out.push("Try: modcraft list to see available modules".into());
                out
            }
            Self::ConflictDetected {
                module,
                conflicts_with,
            } => vec![
                format!("'{}' and '{}' cannot be applied together", module, conflicts_with),
                "Pick one of them; conflicts also apply to modules pulled in as requirements"
                    .into(),
            ],
            Self::CycleDetected { path, .. } => vec![
                format!("Requirement cycle: {}", path.join(" -> ")),
                "This is a bug in the module definitions, please report it".into(),
            ],
            Self::InvalidModuleName { .. } => vec![
                "Module names look like 'category:variant', e.g. http:gin".into(),
            ],
            Self::SyntaxError { location, .. } => vec![
                format!("Fix the source file near {}", location),
                "The file was left untouched".into(),
            ],
            Self::InvalidValuePath { .. } => {
                vec!["Value paths are dotted keys such as gorm.driver".into()]
            }
            Self::AbsolutePathNotAllowed { path } => vec![
                format!("'{}' must be relative to the project root", path),
                "Template paths are joined onto the project directory".into(),
            ],
            Self::PathEscapesRoot { path } => vec![
                format!("'{}' contains a '..' segment", path),
                "Check values such as Name that are used in output paths".into(),
            ],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidModuleName { .. }
            | Self::InvalidValuePath { .. }
            | Self::SyntaxError { .. }
            | Self::AbsolutePathNotAllowed { .. }
            | Self::PathEscapesRoot { .. } => ErrorCategory::Validation,
            Self::ConflictDetected { .. } => ErrorCategory::Compatibility,
            Self::ModuleNotFound { .. } => ErrorCategory::NotFound,
            Self::CycleDetected { .. } => ErrorCategory::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Compatibility,
    NotFound,
    Internal,
}
