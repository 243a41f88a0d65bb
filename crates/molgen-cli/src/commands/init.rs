//! `moleculer-gen init`: generate a new project.

use tracing::{info, instrument};

use molgen_core::{application::ModuleCatalog, domain::RawProjectConfig};

use crate::{
    cli::{InitArgs, OutputFormat, global::GlobalArgs},
    commands::{generation_service, print_report, read_answers},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
    prompts,
};

/// Execute `moleculer-gen init`.
///
/// 1. Collect answers from `--config-file` or the prompts
/// 2. Locate the template root
/// 3. Validate, assemble and write (or only plan, with `--dry-run`)
/// 4. Print the report and next steps
#[instrument(skip_all, fields(dry_run = args.dry_run))]
pub async fn execute(
    args: InitArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let raw: RawProjectConfig = match &args.config_file {
        Some(path) => read_answers(path).await?,
        None => prompts::project_answers(&ModuleCatalog::default())?,
    };

    let service = generation_service(&config)?;

    let spinner = output.spinner("Generating project...");
    let result = service.init_project(raw, &args.output, args.dry_run).await;
    spinner.finish_and_clear();
    let report = result?;

    info!(
        run_id = %report.run_id,
        project = %report.resolved.project_name_sanitized,
        files = report.file_count(),
        "init finished"
    );

    print_report(
        &report,
        &format!("Project '{}' created!", report.resolved.project_name),
        &output,
    )?;

    if !report.dry_run && !global.quiet && output.format() != OutputFormat::Json {
        output.print("")?;
        output.print("Next steps:")?;
        output.print(&format!("  cd {}", report.project_dir.display()))?;
        output.print("  npm install")?;
        output.print("  docker compose up -d")?;
    }

    Ok(())
}
