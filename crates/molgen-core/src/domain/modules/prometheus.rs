//! Prometheus monitoring plugin.
//!
//! Contributes a `global` fragment for its data volume and one rendered
//! configuration file.

use serde_json::json;

use crate::domain::{
    module::{
        InfrastructureService, ModuleCategory, ModuleDefinition, ModuleMeta, TemplateSpec, env_map,
        strings,
    },
    registry::ModuleContext,
};

pub fn meta() -> ModuleMeta {
    ModuleMeta::new(
        "prometheus",
        "Prometheus",
        "Monitoring for Moleculer services.",
        ModuleCategory::Plugin,
    )
}

pub fn module(ctx: &ModuleContext) -> ModuleDefinition {
    let labels = if ctx.needs_traefik_labels {
        strings([
            "traefik.enable=true",
            "traefik.http.routers.prometheus.rule=Host(`${DOCKER_CONTAINER_NAME_MONITORING}.local`)",
            "traefik.http.routers.prometheus.entrypoints=web",
            "traefik.http.services.prometheus.loadbalancer.server.port=9090",
        ])
    } else {
        Vec::new()
    };

    ModuleDefinition {
        meta: meta(),
        docker: InfrastructureService {
            service_name: "prometheus".into(),
            image: "${DOCKER_IMAGE_NAME_MONITORING}:${DOCKER_IMAGE_TAG_MONITORING}".into(),
            container_name: Some("${DOCKER_CONTAINER_NAME_MONITORING}".into()),
            networks: strings(["backend"]),
            volumes: strings([
                "./docker/config/prometheus.yml:/etc/prometheus/prometheus.yml:ro",
                "prometheus_data:/prometheus",
            ]),
            labels,
            global: Some(data_volume_fragment()),
            ..Default::default()
        },
        env: env_map([
            ("DOCKER_CONTAINER_NAME_MONITORING", "prometheus"),
            ("DOCKER_IMAGE_NAME_MONITORING", "prom/prometheus"),
            ("DOCKER_IMAGE_TAG_MONITORING", "v3.7.3"),
        ]),
        templates: vec![TemplateSpec {
            template_path: "config/prometheus.hbs".into(),
            output_path: "docker/config/prometheus.yml".into(),
            data: json!({ "projectNameSanitized": ctx.project_name_sanitized }),
        }],
    }
}

/// `volumes: { prometheus_data: {} }`
fn data_volume_fragment() -> serde_yaml::Value {
    let mut volumes = serde_yaml::Mapping::new();
    volumes.insert(
        "prometheus_data".into(),
        serde_yaml::Value::Mapping(serde_yaml::Mapping::new()),
    );
    let mut root = serde_yaml::Mapping::new();
    root.insert("volumes".into(), serde_yaml::Value::Mapping(volumes));
    serde_yaml::Value::Mapping(root)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_only_behind_reverse_proxy() {
        let plain = module(&ModuleContext::new("shop"));
        assert!(plain.docker.labels.is_empty());

        let proxied = module(&ModuleContext::new("shop").with_traefik_labels(true));
        assert_eq!(proxied.docker.labels.len(), 4);
    }

    #[test]
    fn has_no_restart_policy() {
        assert!(module(&ModuleContext::new("shop")).docker.restart.is_none());
    }

    #[test]
    fn declares_its_volume_globally() {
        let module = module(&ModuleContext::new("shop"));
        let global = module.docker.global.unwrap();
        assert!(global["volumes"]["prometheus_data"].is_mapping());
    }

    #[test]
    fn config_template_gets_project_name() {
        let module = module(&ModuleContext::new("shop"));
        assert_eq!(module.templates.len(), 1);
        assert_eq!(module.templates[0].data["projectNameSanitized"], "shop");
    }
}
