//! NATS transporter module.

use crate::domain::{
    module::{
        InfrastructureService, ModuleCategory, ModuleDefinition, ModuleMeta, RestartPolicy,
        env_map, strings,
    },
    registry::ModuleContext,
};

pub fn meta() -> ModuleMeta {
    ModuleMeta::new(
        "nats",
        "NATS Message Broker",
        "Handles pub/sub communication between Moleculer services.",
        ModuleCategory::Transporter,
    )
    .enabled_by_default(true)
}

pub fn module(_ctx: &ModuleContext) -> ModuleDefinition {
    ModuleDefinition {
        meta: meta(),
        docker: InfrastructureService {
            service_name: "nats".into(),
            image: "${DOCKER_IMAGE_NAME_TRANSPORTER}:${DOCKER_IMAGE_TAG_TRANSPORTER}".into(),
            container_name: Some("${DOCKER_CONTAINER_NAME_TRANSPORTER}".into()),
            networks: strings(["backend"]),
            restart: Some(RestartPolicy::UnlessStopped),
            ..Default::default()
        },
        env: env_map([
            ("APP_TRANSPORTER_TYPE", "nats"),
            ("APP_TRANSPORTER_HOSTNAME", "nats"),
            ("APP_TRANSPORTER_PORT", "4222"),
            ("APP_TRANSPORTER_USERNAME", "natsusername"),
            ("APP_TRANSPORTER_PASSWORD", "natspassword"),
            ("DOCKER_CONTAINER_NAME_TRANSPORTER", "nats"),
            ("DOCKER_IMAGE_NAME_TRANSPORTER", "nats"),
            ("DOCKER_IMAGE_TAG_TRANSPORTER", "2.11.1-alpine"),
        ]),
        templates: Vec::new(),
    }
}
