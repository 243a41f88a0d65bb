//! Adding one backend service to an already generated project.
//!
//! The assembly engine in miniature: the new service module is merged into
//! the existing compose file (read, merge, rewrite) instead of a fresh
//! document, and the generator state gains one entry.

use std::path::{Path, PathBuf};

use tracing::{Span, debug, info, instrument};
use uuid::Uuid;

use crate::{
    application::{
        ApplicationError,
        services::{
            GenerationService,
            batch::{BatchWriter, WriteTask},
            generation_service::log_dry_run,
            layout::{
                COMPOSE_FILE, CRUD_SERVICE_TEMPLATE, MODEL_TEMPLATE, MODELS_DIR, ROUTES_FILE,
                SERVICE_SUBDIRS, SERVICE_TEMPLATE, SERVICES_DIR, STATE_FILE,
            },
            plan::{GenerationReport, PlannedAction},
        },
    },
    domain::{
        ComposeDocument, ConfigValidator, GeneratorState, RawServiceConfig, ResolvedService,
        ServiceModuleOptions,
        artifacts::{append_crud_route, service_data},
        assembly::project_module,
        service_module,
    },
    error::{Context, MolgenResult},
};

impl GenerationService {
    /// Fail with `ProjectNotInitialized` unless `project_dir` holds a
    /// generator state file.
    ///
    /// Cheap enough to call before prompting the user.
    pub async fn ensure_initialized(&self, project_dir: &Path) -> MolgenResult<PathBuf> {
        let path = project_dir.join(STATE_FILE);
        if self.filesystem.exists(&path).await {
            Ok(path)
        } else {
            Err(ApplicationError::ProjectNotInitialized { path }.into())
        }
    }

    /// Read and parse `.moleculer-gen/config.json`.
    pub async fn load_state(&self, project_dir: &Path) -> MolgenResult<GeneratorState> {
        let path = self.ensure_initialized(project_dir).await?;
        let text = self.filesystem.read_to_string(&path).await?;
        let state: GeneratorState =
            serde_json::from_str(&text).map_err(|e| ApplicationError::InvalidJson {
                path,
                reason: e.to_string(),
            })?;
        state.check()?;
        Ok(state)
    }

    /// Validate service answers without generating anything.
    pub fn validate_service(&self, raw: RawServiceConfig) -> MolgenResult<ResolvedService> {
        Ok(ConfigValidator::new(self.registries).validate_service(raw)?)
    }

    /// Add a backend service to the project at `project_dir`.
    ///
    /// Every read and every check happens before the first mutation: a
    /// missing state, compose or routes file, or an unparseable one, leaves
    /// the project untouched.
    #[instrument(
        skip_all,
        fields(
            run_id = tracing::field::Empty,
            project = %project_dir.display(),
            dry_run
        )
    )]
    pub async fn add_service(
        &self,
        raw: RawServiceConfig,
        project_dir: &Path,
        dry_run: bool,
    ) -> MolgenResult<GenerationReport<ResolvedService>> {
        let run_id = Uuid::new_v4();
        Span::current().record("run_id", tracing::field::display(run_id));

        let mut state = self.load_state(project_dir).await?;
        let service = self.validate_service(raw)?;
        info!(
            service = %service.service_name,
            directory = %service.service_directory_name,
            crud = service.is_crud,
            expose_api = service.expose_api,
            "Service validated"
        );

        let compose_path = project_dir.join(COMPOSE_FILE);
        let mut compose = self.read_compose(&compose_path).await?;
        let module = service_module(
            &state.config.project_name_sanitized,
            &ServiceModuleOptions::new(service.service_directory_name.clone()),
        );
        project_module(&mut compose, &module);
        debug!(service_name = %module.docker.service_name, "Service merged into compose document");

        let routes = if service.needs_route() {
            Some(self.updated_routes(project_dir, &service).await?)
        } else {
            None
        };

        state.record_service(service.clone());
        let state_path = project_dir.join(STATE_FILE);
        let state_text = serde_json::to_string_pretty(&state)
            .context("Failed to serialise generator state")?;

        let service_dir = project_dir
            .join(SERVICES_DIR)
            .join(&service.service_directory_name);
        let mut preconditions = vec![PlannedAction::EnsureEmptyDir(service_dir.clone())];
        preconditions.extend(
            SERVICE_SUBDIRS
                .iter()
                .map(|sub| PlannedAction::CreateDir(service_dir.join(sub))),
        );

        let mut writes = self.service_renders(project_dir, &service_dir, &service);
        writes.push(
            WriteTask::document(compose_path.clone(), compose.to_value())
                .described_as(PlannedAction::MergeCompose(compose_path)),
        );
        writes.push(
            WriteTask::file(state_path.clone(), state_text)
                .described_as(PlannedAction::RecordService(state_path)),
        );
        if let Some((routes_path, routes_text)) = routes {
            writes.push(
                WriteTask::file(routes_path.clone(), routes_text)
                    .described_as(PlannedAction::AppendRoute(routes_path)),
            );
        }

        let report = GenerationReport {
            run_id,
            dry_run,
            project_dir: project_dir.to_path_buf(),
            resolved: service,
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
            service_dir = %service_dir.display(),
            "Service added"
        );
        Ok(report)
    }

    // ---- Internal Helpers ----

    /// Service file, plus the model for CRUD services.
    fn service_renders(
        &self,
        project_dir: &Path,
        service_dir: &Path,
        service: &ResolvedService,
    ) -> Vec<WriteTask> {
        let data = service_data(service);
        let service_template = if service.is_crud {
            CRUD_SERVICE_TEMPLATE
        } else {
            SERVICE_TEMPLATE
        };

        let mut renders = vec![WriteTask::render(
            self.template_root.join(service_template),
            service_dir.join(&service.service_file_name),
            data.clone(),
        )];
        if service.is_crud {
            renders.push(WriteTask::render(
                self.template_root.join(MODEL_TEMPLATE),
                project_dir.join(MODELS_DIR).join(&service.model_file_name),
                data,
            ));
        }
        renders
    }

    async fn read_compose(&self, path: &Path) -> MolgenResult<ComposeDocument> {
        if !self.filesystem.exists(path).await {
            return Err(ApplicationError::ConfigNotFound {
                path: path.to_path_buf(),
            }
            .into());
        }

        let invalid = |reason: String| ApplicationError::InvalidDocument {
            path: path.to_path_buf(),
            reason,
        };
        let text = self.filesystem.read_to_string(path).await?;
        let value: serde_yaml::Value =
            serde_yaml::from_str(&text).map_err(|e| invalid(e.to_string()))?;
        Ok(ComposeDocument::from_value(value).map_err(invalid)?)
    }

    /// Path and new content of the routes file.
    async fn updated_routes(
        &self,
        project_dir: &Path,
        service: &ResolvedService,
    ) -> MolgenResult<(PathBuf, String)> {
        let path = project_dir.join(ROUTES_FILE);
        if !self.filesystem.exists(&path).await {
            return Err(ApplicationError::ConfigNotFound { path }.into());
        }

        let source = self.filesystem.read_to_string(&path).await?;
        match append_crud_route(&source, &service.service_directory_name) {
            Ok(updated) => Ok((path, updated)),
            Err(reason) => Err(ApplicationError::InvalidDocument { path, reason }.into()),
        }
    }
}
