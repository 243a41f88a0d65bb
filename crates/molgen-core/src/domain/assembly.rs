//! The assembly engine.
//!
//! Turns an ordered list of module definitions into the compose document,
//! the environment file text, the per-module template requests and the
//! per-module infrastructure fragments. Pure: nothing here touches the
//! filesystem, so dry-run and real runs compute the exact same plan.

use indexmap::IndexMap;
use serde_yaml::{Mapping, Value};

use crate::domain::{
    compose::ComposeDocument,
    module::{ModuleDefinition, TemplateSpec},
};

/// Both environment files receive byte-identical content.
pub const ENV_FILES: [&str; 2] = [".env.example", ".env.dev"];

/// Directory holding one standalone compose fragment per module.
pub const FRAGMENT_DIR: &str = "docker/services";

/// Everything assembly produces for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct AssemblyPlan {
    pub compose: ComposeDocument,
    pub env_content: String,
    pub templates: Vec<TemplateSpec>,
    pub fragments: Vec<InfrastructureFragment>,
}

/// A module's service entry as its own `services:` document.
#[derive(Debug, Clone, PartialEq)]
pub struct InfrastructureFragment {
    pub module_key: String,
    /// Relative to the project root.
    pub output_path: String,
    pub document: Value,
}

/// Assemble `modules` in order.
///
/// Module order decides the order of env blocks, and which module wins when
/// two share a `service_name` (the later one).
pub fn assemble(modules: &[ModuleDefinition]) -> AssemblyPlan {
    let mut compose = ComposeDocument::baseline();
    let mut env_lines: Vec<String> = Vec::new();
    let mut templates = Vec::new();
    let mut fragments: IndexMap<String, InfrastructureFragment> = IndexMap::new();

    for module in modules {
        project_module(&mut compose, module);
        push_env_block(&mut env_lines, module);
        templates.extend(module.templates.iter().cloned());

        let fragment = fragment_for(module, &compose);
        fragments.insert(fragment.output_path.clone(), fragment);
    }

    AssemblyPlan {
        compose,
        env_content: env_lines.join("\n"),
        templates,
        fragments: fragments.into_values().collect(),
    }
}

/// Insert one module's service and merge its `global` fragment.
///
/// Also used on its own by the add-service flow, against a document read
/// back from disk.
pub fn project_module(compose: &mut ComposeDocument, module: &ModuleDefinition) {
    compose.insert_service(&module.docker);
    if let Some(global) = &module.docker.global {
        compose.merge_global(global);
    }
}

fn push_env_block(lines: &mut Vec<String>, module: &ModuleDefinition) {
    lines.push(format!("# {}", module.meta.name));
    lines.extend(module.env.iter().map(|(k, v)| format!("{k}={v}")));
    lines.push(String::new());
}

fn fragment_for(module: &ModuleDefinition, compose: &ComposeDocument) -> InfrastructureFragment {
    let name = module.docker.service_name.clone();
    let entry = compose.service(&name).cloned().unwrap_or(Value::Null);

    let mut services = Mapping::new();
    services.insert(name.into(), entry);
    let mut root = Mapping::new();
    root.insert("services".into(), Value::Mapping(services));

    InfrastructureFragment {
        module_key: module.meta.key.clone(),
        output_path: format!("{FRAGMENT_DIR}/{}.yaml", module.meta.key),
        document: Value::Mapping(root),
    }
}
