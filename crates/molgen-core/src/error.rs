//! Unified error handling for moleculer-gen core.
//!
//! This module provides a unified error type that wraps domain and application
//! errors, with a stable machine code and user-actionable suggestions.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// Root error type for core operations.
#[derive(Debug, Error, Clone)]
pub enum MolgenError {
    /// Configuration rejected by validation.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Orchestration or I/O failures.
    #[error(transparent)]
    Application(#[from] ApplicationError),

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl MolgenError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Internal { .. } => vec![
                "This appears to be a bug in moleculer-gen".into(),
                "Please report this issue at: https://github.com/cosecruz/moleculer-gen/issues"
                    .into(),
            ],
        }
    }

    /// Error kind for display and exit codes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(_) => ErrorCategory::Configuration,
            Self::Application(e) => e.category(),
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// Stable machine-readable code, e.g. `INVALID_CONFIG`.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Domain(e) => e.code(),
            Self::Application(e) => e.code(),
            Self::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

/// Error kinds.
///
/// - `Configuration`: user-actionable, always raised before any filesystem
///   mutation
/// - `Filesystem`: an I/O failure or a non-empty target, with the offending
///   path
/// - `Internal`: a defect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Filesystem,
    Internal,
}

/// Convenient result type alias.
pub type MolgenResult<T> = Result<T, MolgenError>;

/// Extension trait for adding context to errors.
pub trait Context<T> {
    /// Turn a foreign error into [`MolgenError::Internal`] with context.
    fn context(self, msg: impl Into<String>) -> MolgenResult<T>;
}

impl<T, E> Context<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, msg: impl Into<String>) -> MolgenResult<T> {
        self.map_err(|e| MolgenError::Internal {
            message: format!("{}: {}", msg.into(), e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn domain_errors_are_configuration_errors() {
        let err: MolgenError = DomainError::MissingRequiredField { field: "database" }.into();
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(err.code(), "INVALID_CONFIG");
        assert_eq!(err.to_string(), "Missing required config field: database");
    }

    #[test]
    fn not_empty_directory_is_a_filesystem_error() {
        let err: MolgenError = ApplicationError::DirectoryNotEmpty {
            path: PathBuf::from("/tmp/x"),
        }
        .into();
        assert_eq!(err.category(), ErrorCategory::Filesystem);
        assert_eq!(err.code(), "DIRECTORY_NOT_EMPTY");
    }

    #[test]
    fn context_wraps_as_internal() {
        let res: Result<(), std::fmt::Error> = Err(std::fmt::Error);
        let err = res.context("formatting").unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Internal);
        assert!(err.to_string().contains("formatting"));
    }
}
