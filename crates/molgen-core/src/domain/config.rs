//! Project and service configuration values.
//!
//! `Raw*` types are what prompts or a JSON file produce: every field is
//! optional and nothing is checked. `Resolved*` types only come out of
//! [`ConfigValidator`](crate::domain::ConfigValidator) and carry every
//! derived default.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::domain::{error::DomainError, naming::sanitize_name, registry::ModuleContext};

/// Default internal port of the API gateway.
pub const DEFAULT_GATEWAY_PORT: &str = "5000";

/// Key of the reverse-proxy plugin. Its presence switches on routing labels.
pub const REVERSE_PROXY_PLUGIN: &str = "traefik";

/// Options of the Traefik plugin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraefikOptions {
    pub dashboard: bool,
    pub tls: bool,
}

// ── project init ─────────────────────────────────────────────────────────────

/// Unvalidated project configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawProjectConfig {
    pub project_name: Option<String>,
    /// Accepted for compatibility. Always re-derived from `project_name`.
    pub project_name_sanitized: Option<String>,
    pub database: Option<String>,
    pub transporter: Option<String>,
    pub plugins: Option<Vec<String>>,
    pub traefik: Option<TraefikOptions>,
    pub gateway_port: Option<String>,
}

/// Validated, defaults-filled project configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedConfiguration {
    pub project_name: String,
    pub project_name_sanitized: String,
    pub database: String,
    pub transporter: String,
    /// Ordered, duplicate-free, every key resolvable.
    pub plugins: Vec<String>,
    #[serde(default)]
    pub traefik: TraefikOptions,
    #[serde(default = "default_gateway_port")]
    pub gateway_port: String,
}

fn default_gateway_port() -> String {
    DEFAULT_GATEWAY_PORT.to_owned()
}

impl ResolvedConfiguration {
    /// Does the selection include the reverse-proxy plugin?
    pub fn needs_traefik_labels(&self) -> bool {
        self.plugins.iter().any(|p| p == REVERSE_PROXY_PLUGIN)
    }

    /// Options handed to every module factory.
    pub fn module_context(&self) -> ModuleContext {
        ModuleContext {
            project_name_sanitized: self.project_name_sanitized.clone(),
            needs_traefik_labels: self.needs_traefik_labels(),
            gateway_port: self.gateway_port.clone(),
            traefik: self.traefik,
        }
    }
}

// ── add-service ──────────────────────────────────────────────────────────────

/// Unvalidated answers for one new backend service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawServiceConfig {
    pub service_name: Option<String>,
    pub is_crud: Option<bool>,
    pub expose_api: Option<bool>,
    pub service_file_name: Option<String>,
    pub service_directory_name: Option<String>,
    pub model_file_name: Option<String>,
    pub model_name: Option<String>,
    pub model_variable_name: Option<String>,
    pub schema_name: Option<String>,
    pub collection_name: Option<String>,
}

/// Validated service answers, persisted under `services` in the state file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedService {
    pub service_name: String,
    pub is_crud: bool,
    pub expose_api: bool,
    pub service_file_name: String,
    pub service_directory_name: String,
    pub model_file_name: String,
    pub model_name: String,
    pub model_variable_name: String,
    pub schema_name: String,
    pub collection_name: String,
}

impl ResolvedService {
    /// Should a REST route block be added to the gateway?
    pub fn needs_route(&self) -> bool {
        self.is_crud && self.expose_api
    }
}

// ── generator state ──────────────────────────────────────────────────────────

/// Contents of `.moleculer-gen/config.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorState {
    #[serde(flatten)]
    pub config: ResolvedConfiguration,
    pub generator_version: String,
    pub generated_at: DateTime<Utc>,
    /// Keyed by service name. A later answer for the same name replaces the
    /// earlier one.
    #[serde(default)]
    pub services: IndexMap<String, ResolvedService>,
}

impl GeneratorState {
    pub fn new(config: ResolvedConfiguration, generated_at: DateTime<Utc>) -> Self {
        Self {
            config,
            generator_version: crate::VERSION.to_owned(),
            generated_at,
            services: IndexMap::new(),
        }
    }

    /// Record (or replace) one service's resolved answers.
    pub fn record_service(&mut self, service: ResolvedService) {
        self.services.insert(service.service_name.clone(), service);
    }

    /// Reject a state file whose stored slug no longer matches its project
    /// name. Compose service names are built from that slug.
    pub fn check(&self) -> Result<(), DomainError> {
        let expected = sanitize_name(&self.config.project_name);
        if expected.is_empty() || expected != self.config.project_name_sanitized {
            return Err(DomainError::InvalidState(format!(
                "projectNameSanitized '{}' does not match projectName '{}'",
                self.config.project_name_sanitized, self.config.project_name
            )));
        }
        Ok(())
    }
}
