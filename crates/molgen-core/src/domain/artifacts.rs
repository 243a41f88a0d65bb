//! Project files derived from the configuration: `package.json`, the README
//! data context, and the gateway route table.

use serde_json::{Value, json};

use crate::domain::config::{ResolvedConfiguration, ResolvedService};

pub const PACKAGE_VERSION: &str = "0.0.1";

/// Runtime dependencies shared by every generated project.
const DEPENDENCIES: &[(&str, &str)] = &[
    ("dotenv", "16.4.5"),
    ("moleculer", "0.14.35"),
    ("moleculer-db", "0.8.28"),
    ("moleculer-db-adapter-mongoose", "0.10.0"),
    ("moleculer-repl", "0.7.4"),
    ("moleculer-web", "0.10.8"),
    ("nats", "2.29.3"),
    ("slugify", "1.6.6"),
];

/// Extra dependencies per database key.
const DATABASE_DEPENDENCIES: &[(&str, &str, &str)] = &[("mongodb", "mongoose", "7.4.0")];

const DEV_DEPENDENCIES: &[(&str, &str)] = &[("standard", "17.1.2")];

/// `package.json` for a freshly generated project.
pub fn package_manifest(config: &ResolvedConfiguration) -> Value {
    let mut dependencies = serde_json::Map::new();
    for (name, version) in DEPENDENCIES {
        dependencies.insert((*name).into(), (*version).into());
    }
    for (database, name, version) in DATABASE_DEPENDENCIES {
        if *database == config.database {
            dependencies.insert((*name).into(), (*version).into());
        }
    }

    let dev_dependencies: serde_json::Map<String, Value> = DEV_DEPENDENCIES
        .iter()
        .map(|(name, version)| ((*name).to_owned(), Value::from(*version)))
        .collect();

    json!({
        "name": config.project_name_sanitized,
        "version": PACKAGE_VERSION,
        "description": format!("{} Moleculer microservices project", config.project_name),
        "license": "UNLICENSED",
        "scripts": {
            "dev": "moleculer-runner -E .env.dev --repl --hot --config ./src/config/moleculer.config.js ./src/services",
            "start": "moleculer-runner -E .env.dev --config ./src/config/moleculer.config.js ./src/services",
            "lint": "standard"
        },
        "dependencies": dependencies,
        "devDependencies": dev_dependencies,
    })
}

/// Data context for `README.hbs`.
pub fn readme_data(config: &ResolvedConfiguration) -> Value {
    json!({
        "projectName": config.project_name,
        "projectNameSanitized": config.project_name_sanitized,
        "database": config.database,
        "transporter": config.transporter,
        "plugins": config.plugins,
    })
}

/// Data context for the service and model templates.
pub fn service_data(service: &ResolvedService) -> Value {
    serde_json::to_value(service).unwrap_or(Value::Null)
}

// ── routes.config.js ─────────────────────────────────────────────────────────

const EXPORTS_PREFIX: &str = "module.exports";

/// REST route block exposing the CRUD actions of `directory`.
pub fn crud_route(directory: &str) -> Value {
    json!({
        "path": format!("/api/v1/{directory}"),
        "aliases": {
            "POST /": format!("{directory}.create"),
            "GET /": format!("{directory}.list"),
            "GET /:id": format!("{directory}.get"),
            "PUT /:id": format!("{directory}.update"),
            "DELETE /:slug": format!("{directory}.remove"),
        },
        "bodyParsers": { "json": true },
    })
}

/// Parse a `module.exports = { "routes": [...] }` file, append the CRUD route
/// for `directory` and render the file again.
///
/// A route with the same `path` is replaced rather than duplicated.
pub fn append_crud_route(source: &str, directory: &str) -> Result<String, String> {
    let body = source
        .trim()
        .strip_prefix(EXPORTS_PREFIX)
        .map(str::trim_start)
        .and_then(|rest| rest.strip_prefix('='))
        .ok_or_else(|| format!("expected the file to start with `{EXPORTS_PREFIX} =`"))?;
    let body = body.trim().trim_end_matches(';');

    let mut config: Value = serde_json::from_str(body).map_err(|e| e.to_string())?;
    let routes = config
        .get_mut("routes")
        .and_then(Value::as_array_mut)
        .ok_or("missing a `routes` array")?;

    let route = crud_route(directory);
    match routes.iter_mut().find(|r| r.get("path") == route.get("path")) {
        Some(existing) => *existing = route,
        None => routes.push(route),
    }

    let rendered = serde_json::to_string_pretty(&config).map_err(|e| e.to_string())?;
    Ok(format!("{EXPORTS_PREFIX} = {rendered}\n"))
}
