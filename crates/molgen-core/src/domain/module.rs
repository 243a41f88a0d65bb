//! The module model.
//!
//! A module is one unit of infrastructure (a database, a message
//! transporter, a plugin, or a backend service). Every module is consumed the
//! same way by the assembly engine, so there is one concrete shape,
//! [`ModuleDefinition`], and the category lives in its metadata.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Ordered map of environment variable name to value.
///
/// Insertion order is the declaration order and is preserved verbatim in the
/// generated `.env` files.
pub type EnvironmentMap = IndexMap<String, String>;

/// Module category. Metadata only, never a type distinction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModuleCategory {
    Database,
    Transporter,
    Plugin,
    BackendService,
}

impl ModuleCategory {
    pub const ALL: [ModuleCategory; 4] = [
        Self::Database,
        Self::Transporter,
        Self::Plugin,
        Self::BackendService,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Database => "database",
            Self::Transporter => "transporter",
            Self::Plugin => "plugin",
            Self::BackendService => "backend-service",
        }
    }
}

impl fmt::Display for ModuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ModuleCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown module category '{s}'"))
    }
}

/// Identity and display data for a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleMeta {
    /// Unique within its category. Also the base of fragment file names.
    pub key: String,
    pub name: String,
    pub description: String,
    pub category: ModuleCategory,
    /// Selection hint for prompts. Has no effect on assembly.
    pub enabled_by_default: bool,
}

impl ModuleMeta {
    pub fn new(
        key: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        category: ModuleCategory,
    ) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            description: description.into(),
            category,
            enabled_by_default: false,
        }
    }

    pub fn enabled_by_default(mut self, enabled: bool) -> Self {
        self.enabled_by_default = enabled;
        self
    }
}

/// Container restart policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RestartPolicy {
    No,
    OnFailure,
    Always,
    UnlessStopped,
}

/// A deployable unit, projected into one entry of the compose `services`
/// section under [`InfrastructureService::service_name`].
///
/// `global` is the only field whose effect crosses module boundaries: it is
/// deep-merged into the document's top-level sections rather than into the
/// service entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InfrastructureService {
    pub service_name: String,
    pub image: String,
    pub container_name: Option<String>,
    pub command: Vec<String>,
    pub environment: EnvironmentMap,
    pub env_file: Vec<String>,
    pub networks: Vec<String>,
    pub volumes: Vec<String>,
    pub ports: Vec<String>,
    /// Internal-only port, distinct from the published `ports`.
    pub expose: Option<String>,
    pub depends_on: Vec<String>,
    pub labels: Vec<String>,
    pub security_opt: Vec<String>,
    pub restart: Option<RestartPolicy>,
    pub global: Option<serde_yaml::Value>,
}

/// A request to render one template with its own data context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateSpec {
    /// Relative to the template root.
    pub template_path: String,
    /// Relative to the project root.
    pub output_path: String,
    pub data: serde_json::Value,
}

/// Everything one module contributes to a generated project.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleDefinition {
    pub meta: ModuleMeta,
    pub docker: InfrastructureService,
    pub env: EnvironmentMap,
    pub templates: Vec<TemplateSpec>,
}

impl ModuleDefinition {
    pub fn key(&self) -> &str {
        &self.meta.key
    }
}

/// Build an [`EnvironmentMap`] from literal pairs, keeping their order.
pub fn env_map<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> EnvironmentMap
where
    K: Into<String>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Convert string literals into an owned list.
pub fn strings<S: AsRef<str>>(items: impl IntoIterator<Item = S>) -> Vec<String> {
    items.into_iter().map(|s| s.as_ref().to_owned()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_round_trips_through_str() {
        for category in ModuleCategory::ALL {
            let parsed: ModuleCategory = category.as_str().parse().unwrap();
            assert_eq!(parsed, category);
        }
        assert!("queue".parse::<ModuleCategory>().is_err());
    }

    #[test]
    fn env_map_keeps_declaration_order() {
        let env = env_map([("B", "2"), ("A", "1"), ("C", "3")]);
        let keys: Vec<_> = env.keys().map(String::as_str).collect();
        assert_eq!(keys, ["B", "A", "C"]);
    }

    #[test]
    fn restart_policy_serialises_kebab_case() {
        let yaml = serde_yaml::to_string(&RestartPolicy::UnlessStopped).unwrap();
        assert_eq!(yaml.trim(), "unless-stopped");
    }
}
