//! Unified error handling for Modcraft Core.
//!
//! This module provides a unified error type that wraps domain and application
//! errors, with rich context and user-actionable suggestions.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// Root error type for Modcraft Core operations.
#[derive(Debug, Error, Clone)]
pub enum CraftError {
    /// Resolution or parse failures.
    #[error("{0}")]
    Domain(#[from] DomainError),

    /// Orchestration and I/O failures.
    #[error("{0}")]
    Application(#[from] ApplicationError),

    /// Configuration or setup errors.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl CraftError {
    /// Innermost error, looking through module-failure wrappers.
    pub fn root_cause(&self) -> &CraftError {
        match self {
            Self::Application(ApplicationError::ModuleFailed { source, .. }) => source.root_cause(),
            other => other,
        }
    }

    /// The module whose apply step failed, if any.
    pub fn failed_module(&self) -> Option<&str> {
        match self {
            Self::Application(ApplicationError::ModuleFailed { module, .. }) => Some(module),
            _ => None,
        }
    }

    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Configuration { message } => vec![
                format!("Configuration issue: {}", message),
                "Check your config file and MODCRAFT_* variables".into(),
            ],
            Self::Internal { .. } => vec!["This appears to be a bug in Modcraft".into()],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Validation => ErrorCategory::Validation,
                crate::domain::ErrorCategory::Compatibility => ErrorCategory::Compatibility,
                crate::domain::ErrorCategory::NotFound => ErrorCategory::NotFound,
                crate::domain::ErrorCategory::Internal => ErrorCategory::Internal,
            },
            Self::Application(e) => e.category(),
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Compatibility,
    NotFound,
    Configuration,
    Internal,
}

/// Convenient result type alias.
pub type CraftResult<T> = Result<T, CraftError>;

/// Extension trait for turning foreign errors into internal errors with context.
pub trait Context<T> {
    fn context(self, msg: impl Into<String>) -> CraftResult<T>;
}

impl<T, E> Context<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, msg: impl Into<String>) -> CraftResult<T> {
        self.map_err(|e| CraftError::Internal {
            message: format!("{}: {}", msg.into(), e),
        })
    }
}
