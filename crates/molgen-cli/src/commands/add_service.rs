//! `moleculer-gen add-service`: add a backend service to a generated
//! project.

use tracing::{info, instrument};

use molgen_core::domain::RawServiceConfig;

use crate::{
    cli::{AddServiceArgs, OutputFormat, global::GlobalArgs},
    commands::{generation_service, print_report, read_answers},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
    prompts,
};

/// Execute `moleculer-gen add-service`.
///
/// The project is checked for its state file before any prompt, so an
/// uninitialised directory fails fast.
#[instrument(skip_all, fields(project = %args.project.display(), dry_run = args.dry_run))]
pub async fn execute(
    args: AddServiceArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let service = generation_service(&config)?;
    service.ensure_initialized(&args.project).await?;

    let raw: RawServiceConfig = match &args.config_file {
        Some(path) => read_answers(path).await?,
        None => prompts::service_answers()?,
    };

    let report = service.add_service(raw, &args.project, args.dry_run).await?;

    info!(
        run_id = %report.run_id,
        service = %report.resolved.service_name,
        directory = %report.resolved.service_directory_name,
        "add-service finished"
    );

    print_report(
        &report,
        &format!("Service '{}' added!", report.resolved.service_name),
        &output,
    )?;

    if !report.dry_run && !global.quiet && output.format() != OutputFormat::Json {
        let route = if report.resolved.needs_route() {
            format!(" and exposed at /api/v1/{}", report.resolved.service_directory_name)
        } else {
            String::new()
        };
        output.print(&format!(
            "  src/services/{}/{}{route}",
            report.resolved.service_directory_name, report.resolved.service_file_name
        ))?;
    }

    Ok(())
}
