//! Interactive prompts.
//!
//! Prompts only collect raw answers; they produce the same `Raw*` values a
//! `--config-file` would, and the core validator judges both alike.

#[cfg(feature = "interactive")]
pub use interactive::{project_answers, service_answers};

#[cfg(not(feature = "interactive"))]
pub use fallback::{project_answers, service_answers};

#[cfg(feature = "interactive")]
mod interactive {
    use dialoguer::{Confirm, Input, MultiSelect, Select, theme::ColorfulTheme};

    use molgen_core::{
        application::ModuleCatalog,
        domain::{
            DefaultNames, MAX_NAME_LEN, ModuleCategory, ModuleMeta, RawProjectConfig,
            RawServiceConfig, TraefikOptions, config::REVERSE_PROXY_PLUGIN, naming::to_camel_case,
        },
    };

    use crate::error::{CliError, CliResult};

    fn prompt_error(err: dialoguer::Error) -> CliError {
        match err {
            dialoguer::Error::IO(e) if e.kind() == std::io::ErrorKind::Interrupted => {
                CliError::Cancelled
            }
            dialoguer::Error::IO(e) => CliError::IoError {
                message: "Failed to read prompt answer".into(),
                source: e,
            },
        }
    }

    fn check_name(input: &str, what: &str) -> Result<(), String> {
        if input.trim().is_empty() {
            return Err(format!("The {what} is mandatory."));
        }
        if input.contains("..") || input.contains('/') || input.contains('\\') {
            return Err(format!("Invalid {what} (no ../ or / allowed)."));
        }
        if input.chars().count() > MAX_NAME_LEN {
            return Err(format!("{what} too long (max {MAX_NAME_LEN} characters)."));
        }
        Ok(())
    }

    fn label(meta: &ModuleMeta) -> String {
        format!("{} – {}", meta.name, meta.description)
    }

    fn select_one(
        theme: &ColorfulTheme,
        prompt: &str,
        choices: &[ModuleMeta],
    ) -> CliResult<String> {
        let labels: Vec<String> = choices.iter().map(label).collect();
        let default = choices
            .iter()
            .position(|m| m.enabled_by_default)
            .unwrap_or(0);
        let index = Select::with_theme(theme)
            .with_prompt(prompt)
            .items(&labels)
            .default(default)
            .interact_opt()
            .map_err(prompt_error)?
            .ok_or(CliError::Cancelled)?;
        choices
            .get(index)
            .map(|m| m.key.clone())
            .ok_or(CliError::Cancelled)
    }

    /// Ask for everything `init` needs.
    pub fn project_answers(catalog: &ModuleCatalog) -> CliResult<RawProjectConfig> {
        let theme = ColorfulTheme::default();

        let project_name: String = Input::with_theme(&theme)
            .with_prompt("Project name")
            .validate_with(|input: &String| check_name(input, "project name"))
            .interact_text()
            .map_err(prompt_error)?;

        let database = select_one(
            &theme,
            "Choose a database",
            &catalog.selectable(ModuleCategory::Database),
        )?;
        let transporter = select_one(
            &theme,
            "Choose a transporter",
            &catalog.selectable(ModuleCategory::Transporter),
        )?;

        let plugin_metas = catalog.selectable(ModuleCategory::Plugin);
        let labels: Vec<String> = plugin_metas.iter().map(label).collect();
        let defaults: Vec<bool> = plugin_metas.iter().map(|m| m.enabled_by_default).collect();
        let picked = MultiSelect::with_theme(&theme)
            .with_prompt("Select optional infrastructure modules")
            .items(&labels)
            .defaults(&defaults)
            .interact_opt()
            .map_err(prompt_error)?
            .ok_or(CliError::Cancelled)?;
        let plugins: Vec<String> = picked
            .into_iter()
            .filter_map(|i| plugin_metas.get(i).map(|m| m.key.clone()))
            .collect();

        let traefik = if plugins.iter().any(|p| p == REVERSE_PROXY_PLUGIN) {
            Some(TraefikOptions {
                dashboard: confirm(&theme, "Enable the Traefik dashboard?", false)?,
                tls: confirm(&theme, "Enable TLS on the Traefik entrypoint?", false)?,
            })
        } else {
            None
        };

        Ok(RawProjectConfig {
            project_name: Some(project_name),
            database: Some(database),
            transporter: Some(transporter),
            plugins: Some(plugins),
            traefik,
            ..RawProjectConfig::default()
        })
    }

    /// Ask for everything `add-service` needs, offering derived names as
    /// defaults.
    pub fn service_answers() -> CliResult<RawServiceConfig> {
        let theme = ColorfulTheme::default();

        let given: String = Input::with_theme(&theme)
            .with_prompt("Service name (e.g. Users, Orders, Payments)")
            .validate_with(|input: &String| check_name(input, "service name"))
            .interact_text()
            .map_err(prompt_error)?;
        let service_name = to_camel_case(given.trim());
        let is_crud = confirm(&theme, "Is this a CRUD service?", true)?;

        let defaults = DefaultNames::derive(&service_name);
        let service_file_name = text(&theme, "Service file name", &defaults.service_file_name)?;
        let service_directory_name = text(
            &theme,
            "Service directory name",
            &defaults.service_directory_name,
        )?;

        let mut raw = RawServiceConfig {
            service_name: Some(service_name),
            is_crud: Some(is_crud),
            expose_api: Some(false),
            service_file_name: Some(service_file_name),
            service_directory_name: Some(service_directory_name),
            ..RawServiceConfig::default()
        };

        if is_crud {
            raw.expose_api = Some(confirm(
                &theme,
                "Expose CRUD operations via API Gateway?",
                true,
            )?);
            raw.model_file_name = Some(text(&theme, "Model file name", &defaults.model_file_name)?);
            raw.model_name = Some(text(&theme, "Model name", &defaults.model_name)?);
            raw.model_variable_name = Some(text(
                &theme,
                "Model variable name",
                &defaults.model_variable_name,
            )?);
            raw.schema_name = Some(text(&theme, "Schema name", &defaults.schema_name)?);
            raw.collection_name = Some(text(
                &theme,
                "Collection name",
                &defaults.collection_name,
            )?);
        }

        Ok(raw)
    }

    fn text(theme: &ColorfulTheme, prompt: &str, default: &str) -> CliResult<String> {
        Input::with_theme(theme)
            .with_prompt(prompt)
            .default(default.to_owned())
            .interact_text()
            .map_err(prompt_error)
    }

    fn confirm(theme: &ColorfulTheme, prompt: &str, default: bool) -> CliResult<bool> {
        Confirm::with_theme(theme)
            .with_prompt(prompt)
            .default(default)
            .interact()
            .map_err(prompt_error)
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn name_checks_match_the_validator_rules() {
            assert!(check_name("My Shop", "project name").is_ok());
            assert!(check_name("   ", "project name").is_err());
            assert!(check_name("../up", "project name").is_err());
            assert!(check_name("a\\b", "project name").is_err());
            assert!(check_name(&"x".repeat(MAX_NAME_LEN + 1), "project name").is_err());
        }

        #[test]
        fn labels_show_name_and_description() {
            let meta = ModuleMeta::new("nats", "NATS", "Messaging", ModuleCategory::Transporter);
            assert_eq!(label(&meta), "NATS – Messaging");
        }
    }
}

#[cfg(not(feature = "interactive"))]
mod fallback {
    use molgen_core::{
        application::ModuleCatalog,
        domain::{RawProjectConfig, RawServiceConfig},
    };

    use crate::error::{CliError, CliResult};

    pub fn project_answers(_catalog: &ModuleCatalog) -> CliResult<RawProjectConfig> {
        Err(CliError::FeatureNotAvailable {
            feature: "interactive",
        })
    }

    pub fn service_answers() -> CliResult<RawServiceConfig> {
        Err(CliError::FeatureNotAvailable {
            feature: "interactive",
        })
    }
}
