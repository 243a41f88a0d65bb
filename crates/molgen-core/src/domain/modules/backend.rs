//! Backend-service modules: the API gateway and user services.
//!
//! These are never selected through configuration. The gateway is always
//! the first module of a project; user services are added one at a time by
//! the add-service flow.

use crate::domain::{
    module::{
        InfrastructureService, ModuleCategory, ModuleDefinition, ModuleMeta, RestartPolicy,
        env_map, strings,
    },
    naming::sanitize_name,
    registry::{API_GATEWAY_KEY, ModuleContext},
};

const GATEWAY_DISPLAY_NAME: &str = "Api Gateway";

/// Options for one Moleculer service container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceModuleOptions {
    /// Human name, e.g. `"Api Gateway"` or `"blog-posts"`.
    pub service_name: String,
    pub depends_on: Vec<String>,
    pub labels: Vec<String>,
}

impl ServiceModuleOptions {
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            ..Default::default()
        }
    }
}

/// A Moleculer service running from the shared application image.
pub fn service_module(project_name_sanitized: &str, options: &ServiceModuleOptions) -> ModuleDefinition {
    let service_slug = sanitize_name(&options.service_name);

    ModuleDefinition {
        meta: ModuleMeta::new(
            service_slug.clone(),
            format!("{} Service", options.service_name),
            format!("{} Moleculer.js Service", options.service_name),
            ModuleCategory::BackendService,
        )
        .enabled_by_default(true),
        docker: InfrastructureService {
            service_name: format!("{project_name_sanitized}-{service_slug}"),
            image: "${DOCKER_IMAGE_NAME_APP}:${DOCKER_IMAGE_TAG_APP}".into(),
            container_name: Some(format!("${{DOCKER_CONTAINER_BASENAME_APP}}-{service_slug}")),
            command: vec![
                "node_modules/.bin/moleculer-runner".into(),
                "--config".into(),
                "./src/config/moleculer.config.js".into(),
                "-E".into(),
                "${DOCKER_ENV_FILE_APP}".into(),
                format!("./src/services/{service_slug}"),
            ],
            env_file: strings(["${DOCKER_ENV_FILE_APP}"]),
            networks: strings(["backend"]),
            depends_on: options.depends_on.clone(),
            labels: options.labels.clone(),
            restart: Some(RestartPolicy::UnlessStopped),
            ..Default::default()
        },
        env: env_map([
            ("DOCKER_CONTAINER_BASENAME_APP", project_name_sanitized),
            ("DOCKER_IMAGE_NAME_APP", project_name_sanitized),
            ("DOCKER_IMAGE_TAG_APP", "0.0.1"),
        ]),
        templates: Vec::new(),
    }
}

pub fn api_gateway_meta() -> ModuleMeta {
    ModuleMeta::new(
        API_GATEWAY_KEY,
        format!("{GATEWAY_DISPLAY_NAME} Service"),
        format!("{GATEWAY_DISPLAY_NAME} Moleculer.js Service"),
        ModuleCategory::BackendService,
    )
    .enabled_by_default(true)
}

/// The HTTP entry point of every generated project.
pub fn api_gateway(ctx: &ModuleContext) -> ModuleDefinition {
    let labels = if ctx.needs_traefik_labels {
        strings([
            "traefik.enable=true",
            "traefik.http.routers.api.rule=Host(`${DOCKER_CONTAINER_BASENAME_APP}.local`)",
            "traefik.http.routers.api.entrypoints=web",
            "traefik.http.services.api.loadbalancer.server.port=${APP_MOLECULER_API_GATEWAY_PORT}",
        ])
    } else {
        Vec::new()
    };

    let mut module = service_module(
        &ctx.project_name_sanitized,
        &ServiceModuleOptions {
            service_name: GATEWAY_DISPLAY_NAME.into(),
            depends_on: Vec::new(),
            labels,
        },
    );
    module.docker.expose = Some("${APP_MOLECULER_API_GATEWAY_PORT}".into());
    module
        .env
        .insert("APP_MOLECULER_API_GATEWAY_PORT".into(), ctx.gateway_port.clone());
    module
        .env
        .insert("DOCKER_ENV_FILE_APP".into(), ".env.dev".into());
    module
}
