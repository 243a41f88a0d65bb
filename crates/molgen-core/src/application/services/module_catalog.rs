//! Module Catalog - read-only queries over the module registries.
//!
//! Feeds the selection prompts and `moleculer-gen list`. Separated from
//! GenerationService since it needs no I/O port.

use crate::domain::{ModuleCategory, ModuleMeta, Registries};

/// Service for module metadata queries.
#[derive(Debug, Clone, Copy)]
pub struct ModuleCatalog {
    registries: &'static Registries,
}

impl Default for ModuleCatalog {
    fn default() -> Self {
        Self::new(Registries::builtin())
    }
}

impl ModuleCatalog {
    pub fn new(registries: &'static Registries) -> Self {
        Self { registries }
    }

    /// Metadata of one category, in registration order.
    pub fn by_category(&self, category: ModuleCategory) -> Vec<ModuleMeta> {
        self.registries.for_category(category).metas()
    }

    /// Metadata of every category, or only `category` when given.
    pub fn list(&self, category: Option<ModuleCategory>) -> Vec<ModuleMeta> {
        match category {
            Some(category) => self.by_category(category),
            None => ModuleCategory::ALL
                .into_iter()
                .flat_map(|c| self.by_category(c))
                .collect(),
        }
    }

    /// Keys a user may pick for `category`.
    ///
    /// Backend services are never user-selectable, so that list is empty.
    pub fn selectable(&self, category: ModuleCategory) -> Vec<ModuleMeta> {
        match category {
            ModuleCategory::BackendService => Vec::new(),
            other => self.by_category(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_every_builtin_module_grouped_by_category() {
        let keys: Vec<_> = ModuleCatalog::default()
            .list(None)
            .into_iter()
            .map(|m| m.key)
            .collect();
        assert_eq!(
            keys,
            ["mongodb", "nats", "traefik", "prometheus", "api-gateway"]
        );
    }

    #[test]
    fn filters_by_category() {
        let plugins = ModuleCatalog::default().list(Some(ModuleCategory::Plugin));
        assert!(plugins.iter().all(|m| m.category == ModuleCategory::Plugin));
        assert_eq!(plugins.len(), 2);
    }

    #[test]
    fn backend_services_are_not_selectable() {
        let catalog = ModuleCatalog::default();
        assert!(catalog.selectable(ModuleCategory::BackendService).is_empty());
        assert_eq!(catalog.selectable(ModuleCategory::Database).len(), 1);
    }
}
