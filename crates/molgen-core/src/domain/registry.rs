//! Module registries.
//!
//! One registry per [`ModuleCategory`], each a static `key → factory` table.
//! Factories are plain `fn` pointers closed over constant data only, so
//! resolving the same key twice with the same context yields structurally
//! equal definitions.
//!
//! # Adding a Module
//!
//! 1. Write a `*_meta()` and a factory function under `domain::modules`
//! 2. Add one [`RegistryEntry`] to the matching table in [`Registries::builtin`]
//! 3. That's it: validation, listing and assembly all derive from the tables

use std::sync::LazyLock;

use indexmap::IndexMap;

use crate::domain::{
    config::{DEFAULT_GATEWAY_PORT, ResolvedConfiguration, TraefikOptions},
    error::DomainError,
    module::{ModuleCategory, ModuleDefinition, ModuleMeta},
    modules,
};

/// Everything a factory may depend on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleContext {
    pub project_name_sanitized: String,
    /// True when the reverse-proxy plugin is selected.
    pub needs_traefik_labels: bool,
    pub gateway_port: String,
    pub traefik: TraefikOptions,
}

impl ModuleContext {
    pub fn new(project_name_sanitized: impl Into<String>) -> Self {
        Self {
            project_name_sanitized: project_name_sanitized.into(),
            needs_traefik_labels: false,
            gateway_port: DEFAULT_GATEWAY_PORT.to_owned(),
            traefik: TraefikOptions::default(),
        }
    }

    pub fn with_traefik_labels(mut self, needs: bool) -> Self {
        self.needs_traefik_labels = needs;
        self
    }
}

/// Pure factory producing one module definition.
pub type ModuleFactory = fn(&ModuleContext) -> ModuleDefinition;

/// One registered module.
#[derive(Debug, Clone, Copy)]
pub struct RegistryEntry {
    pub meta: fn() -> ModuleMeta,
    pub factory: ModuleFactory,
}

/// Category-scoped `key → factory` table.
#[derive(Debug, Clone)]
pub struct ModuleRegistry {
    category: ModuleCategory,
    entries: IndexMap<&'static str, RegistryEntry>,
}

impl ModuleRegistry {
    fn new(category: ModuleCategory, entries: &[(&'static str, RegistryEntry)]) -> Self {
        Self {
            category,
            entries: entries.iter().copied().collect(),
        }
    }

    pub fn category(&self) -> ModuleCategory {
        self.category
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&RegistryEntry> {
        self.entries.get(key)
    }

    /// Run the factory registered under `key`.
    pub fn resolve(&self, key: &str, ctx: &ModuleContext) -> Option<ModuleDefinition> {
        self.get(key).map(|entry| (entry.factory)(ctx))
    }

    /// Like [`Self::resolve`] but a missing key is an error.
    pub fn require(&self, key: &str, ctx: &ModuleContext) -> Result<ModuleDefinition, DomainError> {
        self.resolve(key, ctx)
            .ok_or_else(|| DomainError::InvalidModuleKey {
                category: self.category,
                key: key.to_owned(),
            })
    }

    /// Registered keys in registration order.
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.keys().copied()
    }

    /// Metadata for selection prompts and `list`.
    pub fn metas(&self) -> Vec<ModuleMeta> {
        self.entries.values().map(|e| (e.meta)()).collect()
    }
}

/// The four category registries.
#[derive(Debug, Clone)]
pub struct Registries {
    pub database: ModuleRegistry,
    pub transporter: ModuleRegistry,
    pub plugin: ModuleRegistry,
    pub backend_service: ModuleRegistry,
}

/// Key of the always-included gateway module.
pub const API_GATEWAY_KEY: &str = "api-gateway";

static BUILTIN: LazyLock<Registries> = LazyLock::new(|| Registries {
    database: ModuleRegistry::new(
        ModuleCategory::Database,
        &[(
            "mongodb",
            RegistryEntry {
                meta: modules::mongodb::meta,
                factory: modules::mongodb::module,
            },
        )],
    ),
    transporter: ModuleRegistry::new(
        ModuleCategory::Transporter,
        &[(
            "nats",
            RegistryEntry {
                meta: modules::nats::meta,
                factory: modules::nats::module,
            },
        )],
    ),
    plugin: ModuleRegistry::new(
        ModuleCategory::Plugin,
        &[
            (
                "traefik",
                RegistryEntry {
                    meta: modules::traefik::meta,
                    factory: modules::traefik::module,
                },
            ),
            (
                "prometheus",
                RegistryEntry {
                    meta: modules::prometheus::meta,
                    factory: modules::prometheus::module,
                },
            ),
        ],
    ),
    backend_service: ModuleRegistry::new(
        ModuleCategory::BackendService,
        &[(
            API_GATEWAY_KEY,
            RegistryEntry {
                meta: modules::backend::api_gateway_meta,
                factory: modules::backend::api_gateway,
            },
        )],
    ),
});

impl Registries {
    /// Built-in module catalogue.
    pub fn builtin() -> &'static Registries {
        &BUILTIN
    }

    pub fn for_category(&self, category: ModuleCategory) -> &ModuleRegistry {
        match category {
            ModuleCategory::Database => &self.database,
            ModuleCategory::Transporter => &self.transporter,
            ModuleCategory::Plugin => &self.plugin,
            ModuleCategory::BackendService => &self.backend_service,
        }
    }

    /// Resolve a validated configuration into its ordered module list:
    /// gateway, database, transporter, then plugins in selection order.
    ///
    /// Order is a semantic input to assembly: it decides env block order and
    /// which entry wins a service-name collision.
    pub fn resolve_modules(
        &self,
        config: &ResolvedConfiguration,
    ) -> Result<Vec<ModuleDefinition>, DomainError> {
        let ctx = config.module_context();

        let mut resolved = Vec::with_capacity(3 + config.plugins.len());
        resolved.push(self.backend_service.require(API_GATEWAY_KEY, &ctx)?);
        resolved.push(self.database.require(&config.database, &ctx)?);
        resolved.push(self.transporter.require(&config.transporter, &ctx)?);
        resolved.extend(
            config
                .plugins
                .iter()
                .filter_map(|key| self.plugin.resolve(key, &ctx)),
        );
        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_registry_holds_its_own_category() {
        let registries = Registries::builtin();
        for category in ModuleCategory::ALL {
            let registry = registries.for_category(category);
            assert_eq!(registry.category(), category);
            for meta in registry.metas() {
                assert_eq!(meta.category, category, "{} misfiled", meta.key);
            }
        }
    }

    #[test]
    fn registry_key_matches_meta_key() {
        let registries = Registries::builtin();
        for category in ModuleCategory::ALL {
            let registry = registries.for_category(category);
            for key in registry.keys() {
                let meta = (registry.get(key).unwrap().meta)();
                assert_eq!(meta.key, key);
            }
        }
    }

    #[test]
    fn lookup_is_category_scoped() {
        let registries = Registries::builtin();
        assert!(registries.database.contains("mongodb"));
        assert!(!registries.plugin.contains("mongodb"));
        assert!(!registries.database.contains("nats"));
    }

    #[test]
    fn factories_are_idempotent() {
        let registries = Registries::builtin();
        let ctx = ModuleContext::new("my-shop").with_traefik_labels(true);
        for category in ModuleCategory::ALL {
            let registry = registries.for_category(category);
            for key in registry.keys() {
                let first = registry.resolve(key, &ctx).unwrap();
                let second = registry.resolve(key, &ctx).unwrap();
                assert_eq!(first.meta, second.meta);
                assert_eq!(first.docker, second.docker);
                assert_eq!(first.env, second.env);
                assert_eq!(first, second);
            }
        }
    }

    #[test]
    fn require_names_category_and_key() {
        let err = Registries::builtin()
            .transporter
            .require("kafka", &ModuleContext::new("x"))
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid transporter key: kafka");
    }
}
