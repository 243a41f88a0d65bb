//! Application layer errors.
//!
//! These errors represent failures in orchestration and I/O, not
//! configuration rules. Rule violations are `DomainError` from
//! `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApplicationError {
    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// Target directory exists and has content.
    #[error("Directory is not empty: {path}")]
    DirectoryNotEmpty { path: PathBuf },

    /// `.moleculer-gen/config.json` is missing.
    #[error("Project is not initialized: {path} not found")]
    ProjectNotInitialized { path: PathBuf },

    /// A configuration file does not exist.
    #[error("Config file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// A configuration file is not valid JSON (or not the expected shape).
    #[error("Invalid JSON in config file {path}: {reason}")]
    InvalidJson { path: PathBuf, reason: String },

    /// A generated document could not be read back.
    #[error("Invalid document {path}: {reason}")]
    InvalidDocument { path: PathBuf, reason: String },

    /// Template rendering failed.
    #[error("Template rendering failed for {template}: {reason}")]
    RenderingFailed { template: String, reason: String },

    /// Some writes of the final batch failed; the others were kept.
    #[error("Generation finished with {} failed write(s) ({written} succeeded)", failures.len())]
    PartialGeneration {
        written: usize,
        failures: Vec<(PathBuf, String)>,
    },

    /// Adapter state access failed (lock poisoned, etc.).
    #[error("Adapter state is unavailable")]
    StoreLockError,
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "Ensure the parent directory exists".into(),
            ],
            Self::DirectoryNotEmpty { path } => vec![
                format!("'{}' already has content", path.display()),
                "Choose another project name or output directory".into(),
                "Or remove the directory and retry".into(),
            ],
            Self::ProjectNotInitialized { .. } => vec![
                "Run this command from the root of a generated project".into(),
                "Or create one first: moleculer-gen init".into(),
            ],
            Self::ConfigNotFound { path } => vec![
                format!("Check that '{}' exists", path.display()),
                "Paths are resolved from the current directory".into(),
            ],
            Self::InvalidJson { .. } => vec![
                "Fix the JSON syntax and retry".into(),
                "Keys are camelCase, e.g. projectName, database, transporter".into(),
            ],
            Self::InvalidDocument { path, .. } => vec![
                format!("'{}' could not be parsed", path.display()),
                "Restore it from version control and retry".into(),
            ],
            Self::PartialGeneration { failures, .. } => {
                let mut out = vec!["The project directory may be partially populated".into()];
                out.extend(
                    failures
                        .iter()
                        .map(|(path, reason)| format!("  • {}: {}", path.display(), reason)),
                );
                out.push("Delete the directory and retry, or fix the files manually".into());
                out
            }
            Self::StoreLockError => vec!["Try again in a moment".into()],
            Self::RenderingFailed { template, .. } => vec![
                format!("Check the template '{}'", template),
                "Set MOLGEN_TEMPLATES_DIR to use a different template root".into(),
            ],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ProjectNotInitialized { .. }
            | Self::ConfigNotFound { .. }
            | Self::InvalidJson { .. } => ErrorCategory::Configuration,
            Self::FilesystemError { .. }
            | Self::DirectoryNotEmpty { .. }
            | Self::InvalidDocument { .. }
            | Self::PartialGeneration { .. } => ErrorCategory::Filesystem,
            Self::RenderingFailed { .. } | Self::StoreLockError => ErrorCategory::Internal,
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::FilesystemError { .. } => "FS_ERROR",
            Self::DirectoryNotEmpty { .. } => "DIRECTORY_NOT_EMPTY",
            Self::ProjectNotInitialized { .. } => "PROJECT_NOT_INITIALIZED",
            Self::ConfigNotFound { .. } => "CONFIG_NOT_FOUND",
            Self::InvalidJson { .. } => "INVALID_JSON",
            Self::InvalidDocument { .. } => "INVALID_DOCUMENT",
            Self::RenderingFailed { .. } => "RENDER_ERROR",
            Self::PartialGeneration { .. } => "PARTIAL_GENERATION",
            Self::StoreLockError => "INTERNAL_ERROR",
        }
    }
}
