//! Generation Service - main application orchestrator.
//!
//! Coordinates project initialisation:
//! 1. Validate the raw configuration
//! 2. Resolve the ordered module list and assemble it
//! 3. Run the sequential preconditions (empty target, directories, skeleton)
//! 4. Issue every remaining write as one concurrent batch
//!
//! Dry-run stops after step 2 and only reports the plan.

use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{Span, debug, info, instrument};
use uuid::Uuid;

use crate::{
    application::{
        ports::{Filesystem, TemplateRenderer},
        services::{
            batch::{BatchWriter, WriteTask},
            layout::{
                BASE_TEMPLATE_DIR, COMPOSE_FILE, DOCKER_CONFIG_DIR, PACKAGE_FILE, README_FILE,
                README_TEMPLATE, STATE_DIR, STATE_FILE,
            },
            plan::{GenerationReport, PlannedAction},
        },
    },
    domain::{
        AssemblyPlan, ConfigValidator, ENV_FILES, GeneratorState, RawProjectConfig,
        ResolvedConfiguration, assemble,
        artifacts::{package_manifest, readme_data},
        assembly::FRAGMENT_DIR,
        registry::Registries,
    },
    error::{Context, MolgenError, MolgenResult},
};

/// Main generation service.
///
/// Owns the I/O ports and the template root; everything else it needs comes
/// from the domain layer.
pub struct GenerationService {
    pub(crate) filesystem: Box<dyn Filesystem>,
    pub(crate) renderer: Box<dyn TemplateRenderer>,
    pub(crate) template_root: PathBuf,
    pub(crate) registries: &'static Registries,
}

impl GenerationService {
    /// Create a service over the built-in module catalogue.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use molgen_core::application::{GenerationService, ports::*};
    ///
    /// let service = GenerationService::new(
    ///     filesystem, // impl Filesystem
    ///     renderer,   // impl TemplateRenderer
    ///     "/usr/share/moleculer-gen/templates",
    /// );
    /// ```
    pub fn new(
        filesystem: Box<dyn Filesystem>,
        renderer: Box<dyn TemplateRenderer>,
        template_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            filesystem,
            renderer,
            template_root: template_root.into(),
            registries: Registries::builtin(),
        }
    }

    pub fn registries(&self) -> &'static Registries {
        self.registries
    }

    pub fn template_root(&self) -> &Path {
        &self.template_root
    }

    /// Validate a project configuration without generating anything.
    pub fn validate_project(&self, raw: RawProjectConfig) -> MolgenResult<ResolvedConfiguration> {
        Ok(ConfigValidator::new(self.registries).validate_project(raw)?)
    }

    /// Generate a new project under `output_dir/<projectNameSanitized>`.
    ///
    /// Configuration errors surface before any filesystem call. With
    /// `dry_run`, no filesystem call is made at all and the report lists
    /// what a real run would do.
    #[instrument(
        skip_all,
        fields(
            run_id = tracing::field::Empty,
            output = %output_dir.display(),
            dry_run
        )
    )]
    pub async fn init_project(
        &self,
        raw: RawProjectConfig,
        output_dir: &Path,
        dry_run: bool,
    ) -> MolgenResult<GenerationReport<ResolvedConfiguration>> {
        let run_id = Uuid::new_v4();
        Span::current().record("run_id", tracing::field::display(run_id));

        let config = self.validate_project(raw)?;
        info!(
            project = %config.project_name_sanitized,
            database = %config.database,
            transporter = %config.transporter,
            plugins = ?config.plugins,
            "Configuration validated"
        );

        let modules = self.registries.resolve_modules(&config)?;
        let plan = assemble(&modules);
        debug!(
            modules = modules.len(),
            templates = plan.templates.len(),
            "Modules assembled"
        );

        let project_dir = output_dir.join(&config.project_name_sanitized);
        let state = GeneratorState::new(config.clone(), Utc::now());
        let preconditions = self.preconditions(&project_dir);
        let writes = self.init_writes(&project_dir, &config, &plan, &state)?;

        let report = GenerationReport {
            run_id,
            dry_run,
            project_dir: project_dir.clone(),
            resolved: config,
            actions: preconditions
                .iter()
                .cloned()
                .chain(writes.iter().map(WriteTask::action))
                .collect(),
        };

        if dry_run {
            log_dry_run(&report.actions);
            return Ok(report);
        }

        self.run_sequential(&preconditions).await?;
        let written = BatchWriter::new(self.filesystem.as_ref(), self.renderer.as_ref())
            .run(&writes)
            .await?;

        info!(
            files = written,
            project_dir = %project_dir.display(),
            "Project generated"
        );
        Ok(report)
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    /// Empty target, bookkeeping directories, then the skeleton copy.
    fn preconditions(&self, project_dir: &Path) -> Vec<PlannedAction> {
        vec![
            PlannedAction::EnsureEmptyDir(project_dir.to_path_buf()),
            PlannedAction::CreateDir(project_dir.join(STATE_DIR)),
            PlannedAction::CreateDir(project_dir.join(FRAGMENT_DIR)),
            PlannedAction::CreateDir(project_dir.join(DOCKER_CONFIG_DIR)),
            PlannedAction::CopySkeleton {
                from: self.template_root.join(BASE_TEMPLATE_DIR),
                to: project_dir.to_path_buf(),
            },
        ]
    }

    /// Every write issued after the preconditions, in report order.
    fn init_writes(
        &self,
        project_dir: &Path,
        config: &ResolvedConfiguration,
        plan: &AssemblyPlan,
        state: &GeneratorState,
    ) -> MolgenResult<Vec<WriteTask>> {
        let mut writes = Vec::new();

        writes.push(WriteTask::document(
            project_dir.join(COMPOSE_FILE),
            plan.compose.to_value(),
        ));
        for env_file in ENV_FILES {
            writes.push(WriteTask::file(
                project_dir.join(env_file),
                plan.env_content.clone(),
            ));
        }
        for spec in &plan.templates {
            writes.push(WriteTask::render(
                self.template_root.join(&spec.template_path),
                project_dir.join(&spec.output_path),
                spec.data.clone(),
            ));
        }
        for fragment in &plan.fragments {
            writes.push(WriteTask::document(
                project_dir.join(&fragment.output_path),
                fragment.document.clone(),
            ));
        }

        let manifest = serde_json::to_string_pretty(&package_manifest(config))
            .context("Failed to serialise package.json")?;
        writes.push(WriteTask::file(
            project_dir.join(PACKAGE_FILE),
            format!("{manifest}\n"),
        ));

        let state = serde_json::to_string_pretty(state)
            .context("Failed to serialise generator state")?;
        writes.push(WriteTask::file(project_dir.join(STATE_FILE), state));

        writes.push(WriteTask::render(
            self.template_root.join(README_TEMPLATE),
            project_dir.join(README_FILE),
            readme_data(config),
        ));

        Ok(writes)
    }

    /// Run directory-level actions one after the other.
    pub(crate) async fn run_sequential(&self, actions: &[PlannedAction]) -> MolgenResult<()> {
        for action in actions {
            debug!(%action, "Running precondition");
            match action {
                PlannedAction::EnsureEmptyDir(path) => {
                    self.filesystem.ensure_empty_dir(path).await?
                }
                PlannedAction::CreateDir(path) => self.filesystem.create_dir_all(path).await?,
                PlannedAction::CopySkeleton { from, to } => {
                    self.filesystem.copy_dir(from, to).await?
                }
                other => {
                    return Err(MolgenError::Internal {
                        message: format!("'{other}' is not a precondition"),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Report every planned action at INFO.
pub(crate) fn log_dry_run(actions: &[PlannedAction]) {
    for action in actions {
        info!("[dry-run] {action}");
    }
}
