//! MongoDB database module.

use crate::domain::{
    module::{
        InfrastructureService, ModuleCategory, ModuleDefinition, ModuleMeta, RestartPolicy,
        env_map, strings,
    },
    registry::ModuleContext,
};

pub fn meta() -> ModuleMeta {
    ModuleMeta::new(
        "mongodb",
        "MongoDB",
        "Document database used by the generated CRUD services.",
        ModuleCategory::Database,
    )
    .enabled_by_default(true)
}

pub fn module(_ctx: &ModuleContext) -> ModuleDefinition {
    ModuleDefinition {
        meta: meta(),
        docker: InfrastructureService {
            service_name: "mongo".into(),
            image: "${DOCKER_IMAGE_NAME_DB}:${DOCKER_IMAGE_TAG_DB}".into(),
            container_name: Some("mongo".into()),
            environment: env_map([
                ("MONGO_INITDB_ROOT_USERNAME", "${APP_DB_USERNAME}"),
                ("MONGO_INITDB_ROOT_PASSWORD", "${APP_DB_PASSWORD}"),
            ]),
            networks: strings(["backend"]),
            volumes: strings(["db_data:/data/db"]),
            restart: Some(RestartPolicy::Always),
            ..Default::default()
        },
        env: env_map([
            ("APP_DB_TYPE", "mongodb"),
            ("APP_DB_HOSTNAME", "mongo"),
            ("APP_DB_PORT", "27017"),
            ("APP_DB_USERNAME", "root"),
            ("APP_DB_PASSWORD", "rootpassword"),
            ("DOCKER_IMAGE_NAME_DB", "mongo"),
            ("DOCKER_IMAGE_TAG_DB", "8.0.6"),
        ]),
        templates: Vec::new(),
    }
}
