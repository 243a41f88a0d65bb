//! Command handlers, one module per subcommand.
//!
//! Handlers translate arguments into core calls and print the outcome.
//! No generation logic lives here.

use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::debug;

use molgen_adapters::{HandlebarsRenderer, LocalFilesystem, TemplateRootLocator};
use molgen_core::application::{ApplicationError, GenerationReport, GenerationService};
use serde_json::json;

use crate::{
    cli::OutputFormat,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

pub mod add_service;
pub mod completions;
pub mod config;
pub mod init;
pub mod list;

/// Read a JSON answers file (`--config-file`).
///
/// A missing file is `CONFIG_NOT_FOUND`, unparsable content `INVALID_JSON`;
/// both are user errors.
pub async fn read_answers<T: DeserializeOwned>(path: &Path) -> CliResult<T> {
    let content = tokio::fs::read_to_string(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            CliError::Core(
                ApplicationError::ConfigNotFound {
                    path: path.to_path_buf(),
                }
                .into(),
            )
        } else {
            CliError::IoError {
                message: format!("Failed to read {}", path.display()),
                source: e,
            }
        }
    })?;

    serde_json::from_str(&content).map_err(|e| {
        CliError::Core(
            ApplicationError::InvalidJson {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
            .into(),
        )
    })
}

/// Generation service over the local filesystem and the discovered
/// template root.
pub fn generation_service(config: &AppConfig) -> CliResult<GenerationService> {
    let locator = TemplateRootLocator::new().with_override(config.templates.path.clone());
    let template_root = locator.locate().ok_or_else(|| CliError::TemplatesNotFound {
        searched: locator.candidates(),
    })?;
    debug!(template_root = %template_root.display(), "Template root located");

    Ok(GenerationService::new(
        Box::new(LocalFilesystem::new()),
        Box::new(HandlebarsRenderer::new()),
        template_root,
    ))
}

/// Print the outcome of a run: the planned actions for a dry-run, the
/// written files otherwise. `summary` is the success line.
pub fn print_report<T>(
    report: &GenerationReport<T>,
    summary: &str,
    output: &OutputManager,
) -> CliResult<()> {
    if output.format() == OutputFormat::Json {
        let actions: Vec<String> = report.actions.iter().map(ToString::to_string).collect();
        output.json(&json!({
            "runId": report.run_id.to_string(),
            "dryRun": report.dry_run,
            "projectDir": report.project_dir,
            "files": report.file_count(),
            "actions": actions,
        }))?;
        return Ok(());
    }

    if report.dry_run {
        output.header(&format!(
            "Dry run: {} file(s) would be written under {}",
            report.file_count(),
            report.project_dir.display()
        ))?;
        for action in &report.actions {
            output.item(&action.to_string())?;
        }
        output.info("No files were written.")?;
        return Ok(());
    }

    output.success(summary)?;
    output.info(&format!(
        "{} file(s) written under {}",
        report.file_count(),
        report.project_dir.display()
    ))?;
    Ok(())
}
