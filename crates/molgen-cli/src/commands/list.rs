//! `moleculer-gen list`: show the module catalogue.

use molgen_core::{
    application::ModuleCatalog,
    domain::{ModuleCategory, ModuleMeta},
};

use crate::{
    cli::{ListArgs, ListFormat},
    error::{CliError, CliResult},
    output::OutputManager,
};

pub fn execute(args: ListArgs, output: OutputManager) -> CliResult<()> {
    let catalog = ModuleCatalog::default();
    let modules = catalog.list(args.category.map(ModuleCategory::from));

    match args.format {
        ListFormat::Table => {
            output.header("Available modules:")?;
            for line in table_lines(&modules) {
                output.print(&line)?;
            }
        }
        ListFormat::List => {
            for meta in &modules {
                output.print(&meta.key)?;
            }
        }
        ListFormat::Json => {
            let value = serde_json::to_value(&modules).map_err(|e| CliError::IoError {
                message: "Failed to serialise the module list".into(),
                source: std::io::Error::other(e),
            })?;
            output.json(&value)?;
        }
    }

    Ok(())
}

/// Aligned `category  key  name – description` rows.
fn table_lines(modules: &[ModuleMeta]) -> Vec<String> {
    let key_width = modules.iter().map(|m| m.key.len()).max().unwrap_or(0);
    let category_width = modules
        .iter()
        .map(|m| m.category.as_str().len())
        .max()
        .unwrap_or(0);

    modules
        .iter()
        .map(|m| {
            let marker = if m.enabled_by_default { " (default)" } else { "" };
            format!(
                "  {:<category_width$}  {:<key_width$}  {} – {}{marker}",
                m.category.as_str(),
                m.key,
                m.name,
                m.description,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_rows_are_aligned_on_key() {
        let modules = vec![
            ModuleMeta::new("nats", "NATS", "Messaging", ModuleCategory::Transporter),
            ModuleMeta::new("mongodb", "MongoDB", "Documents", ModuleCategory::Database),
        ];
        let lines = table_lines(&modules);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "  transporter  nats     NATS – Messaging");
        assert_eq!(lines[1], "  database     mongodb  MongoDB – Documents");
    }

    #[test]
    fn every_builtin_module_gets_a_row() {
        let catalog = ModuleCatalog::default();
        let modules = catalog.list(None);
        assert_eq!(table_lines(&modules).len(), modules.len());
    }
}
