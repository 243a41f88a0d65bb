//! `moleculer-gen config`: inspect and create the tool configuration.

use std::path::Path;

use chrono::Utc;

use crate::{
    cli::ConfigCommands,
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// Dispatch to the correct config subcommand.
pub fn execute(
    cmd: ConfigCommands,
    config: AppConfig,
    config_file: Option<&Path>,
    output: OutputManager,
) -> CliResult<()> {
    match cmd {
        ConfigCommands::Get { key } => {
            let value = get_config_value(&config, &key)?;
            output.print(&value)?;
        }

        ConfigCommands::List => {
            output.header("Current configuration:")?;
            output.print(&to_toml(&config)?)?;
        }

        ConfigCommands::Path => {
            let path = config_file.map_or_else(AppConfig::config_path, Path::to_path_buf);
            output.print(&path.display().to_string())?;
        }

        ConfigCommands::Init { force } => {
            let path = config_file.map_or_else(AppConfig::config_path, Path::to_path_buf);
            if path.exists() && !force {
                output.warning(&format!(
                    "Config already exists at {} (use --force to overwrite)",
                    path.display(),
                ))?;
                return Ok(());
            }
            write_default_config(&path)?;
            output.success(&format!("Configuration created at {}", path.display()))?;
        }
    }

    Ok(())
}

// ── helpers ───────────────────────────────────────────────────────────────────

fn get_config_value(config: &AppConfig, key: &str) -> CliResult<String> {
    match key {
        "output.no_color" => Ok(config.output.no_color.to_string()),
        "output.format" => Ok(format!("{:?}", config.output.format).to_lowercase()),
        "templates.path" => Ok(config
            .templates
            .path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default()),
        _ => Err(CliError::ConfigError {
            message: format!("Unknown config key: '{key}'"),
            source: None,
        }),
    }
}

fn to_toml(config: &AppConfig) -> CliResult<String> {
    toml::to_string_pretty(config).map_err(|e| CliError::ConfigError {
        message: format!("Failed to serialise config: {e}"),
        source: Some(Box::new(e)),
    })
}

fn write_default_config(path: &Path) -> CliResult<()> {
    let body = to_toml(&AppConfig::default())?;
    let content = format!(
        "# moleculer-gen configuration, created {}\n\
         # Environment variables override these values, e.g. MOLGEN_TEMPLATES__PATH.\n\n{body}",
        Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
    );

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).with_cli_context(|| {
            format!("Failed to create config directory '{}'", parent.display())
        })?;
    }
    std::fs::write(path, content)
        .with_cli_context(|| format!("Failed to write config to '{}'", path.display()))
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn known_keys_are_readable() {
        let mut cfg = AppConfig::default();
        assert_eq!(get_config_value(&cfg, "output.no_color").unwrap(), "false");
        assert_eq!(get_config_value(&cfg, "output.format").unwrap(), "auto");
        assert_eq!(get_config_value(&cfg, "templates.path").unwrap(), "");

        cfg.templates.path = Some(PathBuf::from("/opt/tpl"));
        assert_eq!(get_config_value(&cfg, "templates.path").unwrap(), "/opt/tpl");
    }

    #[test]
    fn unknown_key_is_a_config_error() {
        assert!(matches!(
            get_config_value(&AppConfig::default(), "defaults.lang"),
            Err(CliError::ConfigError { .. })
        ));
    }

    #[test]
    fn written_default_config_loads_back() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested/config.toml");
        write_default_config(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("# moleculer-gen configuration, created "));
        let loaded = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(loaded.output, AppConfig::default().output);
    }
}
