//! Traefik reverse-proxy plugin.
//!
//! Selecting this plugin also flips `needs_traefik_labels` for every other
//! module, which then emit their own router labels.

use crate::domain::{
    module::{
        InfrastructureService, ModuleCategory, ModuleDefinition, ModuleMeta, RestartPolicy,
        env_map, strings,
    },
    registry::ModuleContext,
};

pub fn meta() -> ModuleMeta {
    ModuleMeta::new(
        "traefik",
        "Traefik Reverse Proxy",
        "Manages HTTP routing and load balancing between services.",
        ModuleCategory::Plugin,
    )
    .enabled_by_default(true)
}

pub fn module(ctx: &ModuleContext) -> ModuleDefinition {
    let options = ctx.traefik;

    let mut ports = strings(["80:80"]);
    let mut command = strings([
        "--providers.docker=true",
        "--providers.docker.exposedbydefault=false",
        "--entrypoints.web.address=:80",
    ]);
    if options.tls {
        ports.push("443:443".into());
        command.push("--entrypoints.websecure.address=:443".into());
    }
    if options.dashboard {
        ports.push("8080:8080".into());
        command.push("--api.insecure=true".into());
    }

    ModuleDefinition {
        meta: meta(),
        docker: InfrastructureService {
            service_name: "traefik".into(),
            image: "${DOCKER_IMAGE_NAME_REVERSE_PROXY}:${DOCKER_IMAGE_TAG_REVERSE_PROXY}".into(),
            container_name: Some("${DOCKER_CONTAINER_NAME_REVERSE_PROXY}".into()),
            command,
            networks: strings(["publique", "backend"]),
            volumes: strings(["/var/run/docker.sock:/var/run/docker.sock:ro"]),
            ports,
            security_opt: strings(["no-new-privileges:true"]),
            restart: Some(RestartPolicy::UnlessStopped),
            ..Default::default()
        },
        env: env_map([
            ("DOCKER_CONTAINER_NAME_REVERSE_PROXY", "traefik".to_owned()),
            ("DOCKER_IMAGE_NAME_REVERSE_PROXY", "traefik".to_owned()),
            ("DOCKER_IMAGE_TAG_REVERSE_PROXY", "v3.3".to_owned()),
            (
                "APP_MOLECULER_API_DOMAIN",
                format!("{}.local", ctx.project_name_sanitized),
            ),
        ]),
        templates: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::TraefikOptions;

    #[test]
    fn plain_proxy_publishes_http_only() {
        let module = module(&ModuleContext::new("shop"));
        assert_eq!(module.docker.ports, ["80:80"]);
        assert!(!module.docker.command.iter().any(|c| c.contains("api.insecure")));
        assert_eq!(module.env["APP_MOLECULER_API_DOMAIN"], "shop.local");
    }

    #[test]
    fn tls_and_dashboard_add_ports_and_entrypoints() {
        let mut ctx = ModuleContext::new("shop");
        ctx.traefik = TraefikOptions {
            dashboard: true,
            tls: true,
        };
        let module = module(&ctx);
        assert_eq!(module.docker.ports, ["80:80", "443:443", "8080:8080"]);
        assert!(
            module
                .docker
                .command
                .contains(&"--entrypoints.websecure.address=:443".to_string())
        );
        assert!(module.docker.command.contains(&"--api.insecure=true".to_string()));
    }
}
