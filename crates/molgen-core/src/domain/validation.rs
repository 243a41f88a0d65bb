use std::path::Path;

use tracing::{debug, warn};

use crate::domain::{
    config::{
        DEFAULT_GATEWAY_PORT, RawProjectConfig, RawServiceConfig, ResolvedConfiguration,
        ResolvedService,
    },
    error::DomainError,
    module::ModuleCategory,
    naming::{DefaultNames, sanitize_name, to_camel_case},
    registry::Registries,
};

/// Longest accepted project or service name.
pub const MAX_NAME_LEN: usize = 50;

/// Centralised configuration validation.
///
/// Prompts and config files both produce `Raw*` values and both come
/// through here, so the assembly engine never knows which path produced its
/// input. Validation is all-or-nothing: the first violation is returned and
/// nothing is partially resolved.
#[derive(Debug, Clone, Copy)]
pub struct ConfigValidator<'r> {
    registries: &'r Registries,
}

impl Default for ConfigValidator<'static> {
    fn default() -> Self {
        Self::new(Registries::builtin())
    }
}

impl<'r> ConfigValidator<'r> {
    pub fn new(registries: &'r Registries) -> Self {
        Self { registries }
    }

    /// Validate a project-init configuration.
    ///
    /// Required fields are checked in order `projectName`, `database`,
    /// `transporter`. Unknown database or transporter keys are errors;
    /// unknown plugin keys are dropped with a warning.
    pub fn validate_project(
        &self,
        raw: RawProjectConfig,
    ) -> Result<ResolvedConfiguration, DomainError> {
        let project_name = required(raw.project_name, "projectName")?;
        let database = required(raw.database, "database")?;
        let transporter = required(raw.transporter, "transporter")?;

        check_name_rules(&project_name).map_err(|reason| DomainError::InvalidProjectName {
            name: project_name.clone(),
            reason,
        })?;
        let project_name_sanitized = sanitize_name(&project_name);
        if project_name_sanitized.is_empty() {
            return Err(DomainError::InvalidProjectName {
                name: project_name,
                reason: "contains no letters or digits".into(),
            });
        }

        self.check_key(ModuleCategory::Database, &database)?;
        self.check_key(ModuleCategory::Transporter, &transporter)?;
        let plugins = self.filter_plugins(raw.plugins.unwrap_or_default());

        let gateway_port = raw
            .gateway_port
            .map(|p| p.trim().to_owned())
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| DEFAULT_GATEWAY_PORT.to_owned());

        debug!(
            project = %project_name_sanitized,
            %database,
            %transporter,
            plugins = ?plugins,
            "Project configuration resolved"
        );

        Ok(ResolvedConfiguration {
            project_name,
            project_name_sanitized,
            database,
            transporter,
            plugins,
            traefik: raw.traefik.unwrap_or_default(),
            gateway_port,
        })
    }

    /// Validate add-service answers, filling every unset name from
    /// [`DefaultNames`].
    pub fn validate_service(&self, raw: RawServiceConfig) -> Result<ResolvedService, DomainError> {
        let given = required(raw.service_name, "serviceName")?;
        check_name_rules(&given).map_err(|reason| DomainError::InvalidServiceName {
            name: given.clone(),
            reason,
        })?;

        let service_name = to_camel_case(&given);
        if service_name.is_empty() {
            return Err(DomainError::InvalidServiceName {
                name: given,
                reason: "contains no letters or digits".into(),
            });
        }

        let defaults = DefaultNames::derive(&service_name);
        let is_crud = raw.is_crud.unwrap_or(true);
        let expose_api = raw.expose_api.unwrap_or(is_crud);

        let service_directory_name =
            or_default(raw.service_directory_name, defaults.service_directory_name);
        if sanitize_name(&service_directory_name) != service_directory_name {
            return Err(DomainError::InvalidServiceName {
                name: service_directory_name,
                reason: "directory name must be lowercase letters, digits and hyphens".into(),
            });
        }

        let service_file_name = or_default(raw.service_file_name, defaults.service_file_name);
        check_file_name("serviceFileName", &service_file_name)?;
        let model_file_name = or_default(raw.model_file_name, defaults.model_file_name);
        check_file_name("modelFileName", &model_file_name)?;

        Ok(ResolvedService {
            service_name,
            is_crud,
            expose_api,
            service_file_name,
            service_directory_name,
            model_file_name,
            model_name: or_default(raw.model_name, defaults.model_name),
            model_variable_name: or_default(raw.model_variable_name, defaults.model_variable_name),
            schema_name: or_default(raw.schema_name, defaults.schema_name),
            collection_name: or_default(raw.collection_name, defaults.collection_name),
        })
    }

    fn check_key(&self, category: ModuleCategory, key: &str) -> Result<(), DomainError> {
        if self.registries.for_category(category).contains(key) {
            Ok(())
        } else {
            Err(DomainError::InvalidModuleKey {
                category,
                key: key.to_owned(),
            })
        }
    }

    /// Keep resolvable plugin keys in first-seen order.
    fn filter_plugins(&self, requested: Vec<String>) -> Vec<String> {
        let mut plugins: Vec<String> = Vec::with_capacity(requested.len());
        for key in requested {
            let key = key.trim().to_owned();
            if !self.registries.plugin.contains(&key) {
                warn!(plugin = %key, "Unknown plugin key, skipping");
                continue;
            }
            if !plugins.contains(&key) {
                plugins.push(key);
            }
        }
        plugins
    }
}

/// A field is missing when absent, or blank.
fn required(value: Option<String>, field: &'static str) -> Result<String, DomainError> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
        .ok_or(DomainError::MissingRequiredField { field })
}

fn or_default(value: Option<String>, default: String) -> String {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
        .unwrap_or(default)
}

/// Shared project/service name rules. Returns the reason on failure.
fn check_name_rules(name: &str) -> Result<(), String> {
    if name.contains("..") || name.contains('/') || name.contains('\\') {
        return Err("path separators and '..' are not allowed".into());
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(format!("must be at most {MAX_NAME_LEN} characters"));
    }
    Ok(())
}

/// A generated file name is joined onto a project directory, so it must stay
/// a single relative component.
fn check_file_name(field: &'static str, name: &str) -> Result<(), DomainError> {
    let invalid = |reason: &str| DomainError::InvalidFileName {
        field,
        name: name.to_owned(),
        reason: reason.to_owned(),
    };
    if Path::new(name).is_absolute() || name.contains(':') {
        return Err(invalid("absolute paths are not allowed"));
    }
    if name.contains("..") || name.contains('/') || name.contains('\\') {
        return Err(invalid("path separators and '..' are not allowed"));
    }
    if name.trim_matches('.').is_empty() {
        return Err(invalid("must name a file"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(
        name: Option<&str>,
        database: Option<&str>,
        transporter: Option<&str>,
        plugins: &[&str],
    ) -> RawProjectConfig {
        RawProjectConfig {
            project_name: name.map(Into::into),
            database: database.map(Into::into),
            transporter: transporter.map(Into::into),
            plugins: Some(plugins.iter().map(|p| p.to_string()).collect()),
            ..Default::default()
        }
    }

    fn validator() -> ConfigValidator<'static> {
        ConfigValidator::default()
    }

    // ── project ──────────────────────────────────────────────────────────

    #[test]
    fn accepts_minimal_configuration() {
        let resolved = validator()
            .validate_project(raw(Some("shop"), Some("mongodb"), Some("nats"), &[]))
            .unwrap();
        assert_eq!(resolved.project_name_sanitized, "shop");
        assert!(resolved.plugins.is_empty());
        assert_eq!(resolved.gateway_port, "5000");
    }

    #[test]
    fn scenario_my_shop_with_traefik() {
        let resolved = validator()
            .validate_project(raw(
                Some("My Shop"),
                Some("mongodb"),
                Some("nats"),
                &["traefik"],
            ))
            .unwrap();
        assert_eq!(resolved.project_name_sanitized, "my-shop");

        let modules = Registries::builtin().resolve_modules(&resolved).unwrap();
        let keys: Vec<_> = modules.iter().map(|m| m.key()).collect();
        assert_eq!(keys, ["api-gateway", "mongodb", "nats", "traefik"]);

        let count = |c: ModuleCategory| modules.iter().filter(|m| m.meta.category == c).count();
        assert_eq!(count(ModuleCategory::Database), 1);
        assert_eq!(count(ModuleCategory::Transporter), 1);
        assert_eq!(count(ModuleCategory::Plugin), 1);
        assert_eq!(count(ModuleCategory::BackendService), 1);

        assert!(resolved.module_context().needs_traefik_labels);
        assert!(!modules[0].docker.labels.is_empty());
    }

    #[test]
    fn unknown_plugin_is_dropped_not_rejected() {
        let resolved = validator()
            .validate_project(raw(
                Some("shop"),
                Some("mongodb"),
                Some("nats"),
                &["does-not-exist"],
            ))
            .unwrap();
        assert!(resolved.plugins.is_empty());

        let modules = Registries::builtin().resolve_modules(&resolved).unwrap();
        assert!(modules.iter().all(|m| m.key() != "does-not-exist"));
        assert_eq!(modules.len(), 3);
    }

    #[test]
    fn duplicate_plugins_collapse_in_first_seen_order() {
        let resolved = validator()
            .validate_project(raw(
                Some("shop"),
                Some("mongodb"),
                Some("nats"),
                &["prometheus", "traefik", "prometheus"],
            ))
            .unwrap();
        assert_eq!(resolved.plugins, ["prometheus", "traefik"]);
    }

    #[test]
    fn missing_transporter_is_named() {
        let err = validator()
            .validate_project(raw(Some("shop"), Some("mongodb"), None, &[]))
            .unwrap_err();
        assert_eq!(
            err,
            DomainError::MissingRequiredField {
                field: "transporter"
            }
        );
    }

    #[test]
    fn first_missing_field_wins() {
        let err = validator()
            .validate_project(raw(None, None, None, &[]))
            .unwrap_err();
        assert_eq!(
            err,
            DomainError::MissingRequiredField {
                field: "projectName"
            }
        );
        let err = validator()
            .validate_project(raw(Some("x"), Some("  "), None, &[]))
            .unwrap_err();
        assert_eq!(err, DomainError::MissingRequiredField { field: "database" });
    }

    #[test]
    fn unknown_database_is_rejected() {
        let err = validator()
            .validate_project(raw(Some("shop"), Some("oracle"), Some("nats"), &[]))
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid database key: oracle");
    }

    #[test]
    fn database_key_is_not_accepted_as_transporter() {
        let err = validator()
            .validate_project(raw(Some("shop"), Some("mongodb"), Some("mongodb"), &[]))
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::InvalidModuleKey {
                category: ModuleCategory::Transporter,
                ..
            }
        ));
    }

    #[test]
    fn project_name_rules() {
        for bad in ["../escape", "a/b", "a\\b", "!!!"] {
            let err = validator()
                .validate_project(raw(Some(bad), Some("mongodb"), Some("nats"), &[]))
                .unwrap_err();
            assert!(
                matches!(err, DomainError::InvalidProjectName { .. }),
                "{bad} accepted"
            );
        }
        let long = "x".repeat(MAX_NAME_LEN + 1);
        assert!(
            validator()
                .validate_project(raw(Some(&long), Some("mongodb"), Some("nats"), &[]))
                .is_err()
        );
    }

    // ── service ──────────────────────────────────────────────────────────

    #[test]
    fn service_defaults_are_derived() {
        let svc = validator()
            .validate_service(RawServiceConfig {
                service_name: Some("Blog Post".into()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(svc.service_name, "blogPost");
        assert!(svc.is_crud);
        assert!(svc.expose_api);
        assert_eq!(svc.service_directory_name, "blog-posts");
        assert_eq!(svc.model_name, "BlogPost");
        assert!(svc.needs_route());
    }

    #[test]
    fn explicit_service_fields_are_kept() {
        let svc = validator()
            .validate_service(RawServiceConfig {
                service_name: Some("users".into()),
                is_crud: Some(false),
                collection_name: Some("people".into()),
                ..Default::default()
            })
            .unwrap();
        assert!(!svc.is_crud);
        assert!(!svc.expose_api);
        assert_eq!(svc.collection_name, "people");
        assert!(!svc.needs_route());
    }

    #[test]
    fn service_name_is_required() {
        let err = validator()
            .validate_service(RawServiceConfig::default())
            .unwrap_err();
        assert_eq!(
            err,
            DomainError::MissingRequiredField {
                field: "serviceName"
            }
        );
    }

    #[test]
    fn service_name_rules() {
        for bad in ["../users", "a/b", "???"] {
            let err = validator()
                .validate_service(RawServiceConfig {
                    service_name: Some(bad.into()),
                    ..Default::default()
                })
                .unwrap_err();
            assert!(matches!(err, DomainError::InvalidServiceName { .. }));
        }
    }

    #[test]
    fn file_names_must_stay_inside_the_project() {
        let cases = [
            ("/etc/evil.js", None),
            ("../../escape.js", None),
            ("nested/user.js", None),
            ("C:\\evil.js", None),
            (".", None),
            ("user.service.js", Some("../user.model.js")),
            ("user.service.js", Some("/tmp/user.model.js")),
        ];
        for (service_file, model_file) in cases {
            let err = validator()
                .validate_service(RawServiceConfig {
                    service_name: Some("user".into()),
                    service_file_name: Some(service_file.into()),
                    model_file_name: model_file.map(Into::into),
                    ..Default::default()
                })
                .unwrap_err();
            let expected = if model_file.is_some() {
                "modelFileName"
            } else {
                "serviceFileName"
            };
            assert!(
                matches!(err, DomainError::InvalidFileName { field, .. } if field == expected),
                "{service_file} / {model_file:?} accepted"
            );
        }

        let svc = validator()
            .validate_service(RawServiceConfig {
                service_name: Some("user".into()),
                service_file_name: Some("users.service.js".into()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(svc.service_file_name, "users.service.js");
    }

    #[test]
    fn service_validation_is_deterministic() {
        let raw = RawServiceConfig {
            service_name: Some("orders".into()),
            ..Default::default()
        };
        assert_eq!(
            validator().validate_service(raw.clone()).unwrap(),
            validator().validate_service(raw).unwrap()
        );
    }
}
