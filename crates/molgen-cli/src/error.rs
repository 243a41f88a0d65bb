//! Error handling for the moleculer-gen CLI.
//!
//! Provides structured errors with:
//! - User-friendly messages
//! - Actionable suggestions
//! - Exit code mapping

use std::error::Error;
use std::path::PathBuf;

use owo_colors::OwoColorize;
use thiserror::Error;

use molgen_core::error::{ErrorCategory as CoreCategory, MolgenError};

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// CLI error types.
#[derive(Debug, Error)]
pub enum CliError {
    /// An error propagated from `molgen-core`.
    #[error(transparent)]
    Core(#[from] MolgenError),

    /// The tool configuration could not be read, parsed or written.
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// No directory containing `base/` was found.
    #[error("Template directory not found (searched {})", searched.len())]
    TemplatesNotFound { searched: Vec<PathBuf> },

    /// Prompts were needed but this build has no interactive support.
    #[error("Feature not available: {feature}")]
    FeatureNotAvailable { feature: &'static str },

    /// The user aborted a prompt.
    #[error("Operation cancelled")]
    Cancelled,

    /// A terminal or file operation outside the core failed.
    #[error("I/O error: {message}")]
    IoError {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::IoError {
            message: err.to_string(),
            source: err,
        }
    }
}

impl CliError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Core(core) => core.suggestions(),

            Self::ConfigError { message, .. } => vec![
                format!("Configuration issue: {message}"),
                format!(
                    "Check your config file at {}",
                    crate::config::AppConfig::config_path().display()
                ),
                "Use 'moleculer-gen config init' to create a default config".into(),
            ],

            Self::TemplatesNotFound { searched } => {
                let mut suggestions = vec!["Looked for a directory containing 'base/' in:".into()];
                suggestions.extend(searched.iter().map(|p| format!("  • {}", p.display())));
                suggestions.push(format!(
                    "Set {} or 'templates.path' in the config file",
                    molgen_adapters::TEMPLATES_DIR_ENV
                ));
                suggestions
            }

            Self::FeatureNotAvailable { feature } => vec![
                format!("The '{feature}' feature is not available in this build"),
                "Pass --config-file to skip the prompts".into(),
                format!("Or reinstall with: cargo install molgen-cli --features {feature}"),
            ],

            Self::Cancelled => vec![
                "Operation was cancelled".into(),
                "No changes were made".into(),
            ],

            Self::IoError { message, .. } => vec![
                format!("I/O operation failed: {message}"),
                "Check file permissions".into(),
            ],
        }
    }

    /// Get the error category for styling and exit codes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Core(core) => match core.category() {
                CoreCategory::Configuration => ErrorCategory::UserError,
                CoreCategory::Filesystem => ErrorCategory::Filesystem,
                CoreCategory::Internal => ErrorCategory::Internal,
            },
            Self::ConfigError { .. } => ErrorCategory::Configuration,
            Self::TemplatesNotFound { .. } => ErrorCategory::Configuration,
            Self::FeatureNotAvailable { .. } => ErrorCategory::UserError,
            Self::Cancelled => ErrorCategory::UserError,
            Self::IoError { .. } => ErrorCategory::Internal,
        }
    }

    /// Exit code to pass to the OS.
    ///
    /// | Category      | Code |
    /// |---------------|------|
    /// | User error    |  2   |
    /// | Filesystem    |  3   |
    /// | Configuration |  4   |
    /// | Internal      |  1   |
    pub fn exit_code(&self) -> u8 {
        match self.category() {
            ErrorCategory::UserError => 2,
            ErrorCategory::Filesystem => 3,
            ErrorCategory::Configuration => 4,
            ErrorCategory::Internal => 1,
        }
    }

    /// Per-path failures of a partial generation, if any.
    fn failures(&self) -> &[(PathBuf, String)] {
        match self {
            Self::Core(MolgenError::Application(
                molgen_core::application::ApplicationError::PartialGeneration { failures, .. },
            )) => failures.as_slice(),
            _ => &[],
        }
    }

    /// Format the error for display with colors and suggestions.
    pub fn format_colored(&self, verbose: bool) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "\n{} {}\n\n",
            "✗".red().bold(),
            "Error:".red().bold()
        ));
        output.push_str(&format!("  {}\n", self.to_string().red()));

        for (path, reason) in self.failures() {
            output.push_str(&format!(
                "    {} {}: {}\n",
                "•".red(),
                path.display(),
                reason.dimmed()
            ));
        }

        if verbose {
            let mut source = self.source();
            while let Some(err) = source {
                output.push_str(&format!(
                    "\n  {} {}\n",
                    "→".dimmed(),
                    err.to_string().dimmed()
                ));
                source = err.source();
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            output.push_str(&format!("\n{}\n", "Suggestions:".yellow().bold()));
            for suggestion in suggestions {
                output.push_str(&format!("  {suggestion}\n"));
            }
        }

        if !verbose {
            output.push('\n');
            output.push_str(&format!(
                "{} {}\n",
                "\u{2139}".blue(),
                "Use -v / --verbose for more details.".dimmed(),
            ));
        }

        output
    }

    /// Plain-text version of [`Self::format_colored`], no ANSI codes.
    pub fn format_plain(&self, verbose: bool) -> String {
        let mut out = String::new();
        out.push_str(&format!("\nError: {self}\n"));

        for (path, reason) in self.failures() {
            out.push_str(&format!("  - {}: {reason}\n", path.display()));
        }

        if verbose {
            let mut src = self.source();
            while let Some(err) = src {
                out.push_str(&format!("  Caused by: {err}\n"));
                src = err.source();
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            out.push_str("\nSuggestions:\n");
            for s in &suggestions {
                out.push_str(&format!("  {s}\n"));
            }
        }

        if !verbose {
            out.push_str("\nUse -v / --verbose for more details.\n");
        }

        out
    }

    /// Log the error using tracing.
    pub fn log(&self) {
        let code = match self {
            Self::Core(core) => core.code(),
            _ => "CLI_ERROR",
        };
        match self.category() {
            ErrorCategory::UserError => tracing::warn!(code, "User error: {}", self),
            ErrorCategory::Filesystem => tracing::error!(code, "Filesystem error: {}", self),
            ErrorCategory::Configuration => tracing::error!(code, "Configuration error: {}", self),
            // Internal errors are defects: keep the full debug form.
            ErrorCategory::Internal => tracing::error!(code, error = ?self, "Internal error: {}", self),
        }

        if let Some(source) = self.source() {
            tracing::debug!("Caused by: {}", source);
        }
    }
}

/// Error categories for classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Bad answers, bad config file, uninitialised project.
    UserError,
    /// I/O failure or non-empty target directory.
    Filesystem,
    /// The tool's own configuration is unusable.
    Configuration,
    /// Internal/system error.
    Internal,
}

// ── IntoCli trait ─────────────────────────────────────────────────────────────

/// Extension trait to convert foreign error types into [`CliError`] at
/// call-sites with a descriptive context message.
pub trait IntoCli<T> {
    /// Convert to `CliResult` attaching a human-readable context message.
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T> IntoCli<T> for Result<T, std::io::Error> {
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| CliError::IoError {
            message: f().into(),
            source: e,
        })
    }
}

impl<T> IntoCli<T> for Result<T, MolgenError> {
    /// Core errors already carry their path; the context is dropped.
    fn with_cli_context<F, S>(self, _f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(CliError::Core)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    use molgen_core::{application::ApplicationError, domain::DomainError};

    fn core(err: impl Into<MolgenError>) -> CliError {
        CliError::Core(err.into())
    }

    // ── exit codes ────────────────────────────────────────────────────────

    #[test]
    fn validation_errors_exit_with_two() {
        let err = core(DomainError::MissingRequiredField {
            field: "transporter",
        });
        assert_eq!(err.category(), ErrorCategory::UserError);
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn uninitialised_project_exits_with_two() {
        let err = core(ApplicationError::ProjectNotInitialized {
            path: PathBuf::from(".moleculer-gen/config.json"),
        });
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn non_empty_target_exits_with_three() {
        let err = core(ApplicationError::DirectoryNotEmpty {
            path: PathBuf::from("/tmp/shop"),
        });
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn tool_configuration_exits_with_four() {
        let err = CliError::ConfigError {
            message: "x".into(),
            source: None,
        };
        assert_eq!(err.exit_code(), 4);
        assert_eq!(CliError::TemplatesNotFound { searched: vec![] }.exit_code(), 4);
    }

    #[test]
    fn internal_errors_exit_with_one() {
        assert_eq!(
            core(MolgenError::Internal {
                message: "x".into()
            })
            .exit_code(),
            1
        );
        assert_eq!(
            CliError::IoError {
                message: "x".into(),
                source: io::Error::other("e"),
            }
            .exit_code(),
            1
        );
    }

    // ── format ────────────────────────────────────────────────────────────

    #[test]
    fn format_plain_lists_core_suggestions() {
        let err = core(DomainError::MissingRequiredField { field: "database" });
        let s = err.format_plain(false);
        assert!(s.contains("Error: Missing required config field: database"));
        assert!(s.contains("Suggestions:"));
        assert!(s.contains("--verbose"));
    }

    #[test]
    fn format_plain_lists_every_failed_path() {
        let err = core(ApplicationError::PartialGeneration {
            written: 3,
            failures: vec![
                (PathBuf::from("/p/.env.dev"), "disk full".into()),
                (PathBuf::from("/p/README.md"), "disk full".into()),
            ],
        });
        let s = err.format_plain(true);
        assert!(s.contains("/p/.env.dev: disk full"));
        assert!(s.contains("/p/README.md: disk full"));
        assert!(!s.contains("--verbose"));
    }

    #[test]
    fn templates_not_found_lists_searched_paths() {
        let err = CliError::TemplatesNotFound {
            searched: vec![PathBuf::from("/a/templates"), PathBuf::from("/b/templates")],
        };
        let suggestions = err.suggestions();
        assert!(suggestions.iter().any(|s| s.contains("/a/templates")));
        assert!(suggestions.iter().any(|s| s.contains("MOLGEN_TEMPLATES_DIR")));
    }

    #[test]
    fn format_colored_contains_message() {
        let s = CliError::Cancelled.format_colored(false);
        assert!(s.contains("Operation cancelled"));
    }

    // ── IntoCli ───────────────────────────────────────────────────────────

    #[test]
    fn into_cli_io_error() {
        let result: Result<(), io::Error> = Err(io::Error::new(io::ErrorKind::NotFound, "missing"));
        let cli: CliResult<()> = result.with_cli_context(|| "reading answers");
        assert!(matches!(cli, Err(CliError::IoError { .. })));
    }

    #[test]
    fn into_cli_core_error() {
        let result: Result<(), MolgenError> = Err(MolgenError::Internal {
            message: "x".into(),
        });
        let cli = result.with_cli_context(|| "ignored");
        assert!(matches!(cli, Err(CliError::Core(_))));
    }
}
