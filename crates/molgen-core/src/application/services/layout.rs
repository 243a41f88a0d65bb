//! Fixed locations inside a generated project and inside the template root.

/// Generator bookkeeping directory.
pub const STATE_DIR: &str = ".moleculer-gen";
pub const STATE_FILE: &str = ".moleculer-gen/config.json";

pub const COMPOSE_FILE: &str = "docker-compose.yml";
pub const PACKAGE_FILE: &str = "package.json";
pub const README_FILE: &str = "README.md";
pub const ROUTES_FILE: &str = "src/config/routes.config.js";
pub const SERVICES_DIR: &str = "src/services";
pub const MODELS_DIR: &str = "src/data/model";
pub const DOCKER_CONFIG_DIR: &str = "docker/config";

/// Sub-directories created inside every new service directory.
pub const SERVICE_SUBDIRS: [&str; 2] = ["actions", "methods"];

// Template root entries.
pub const BASE_TEMPLATE_DIR: &str = "base";
pub const README_TEMPLATE: &str = "README.hbs";
pub const SERVICE_TEMPLATE: &str = "service.hbs";
pub const CRUD_SERVICE_TEMPLATE: &str = "service-crud.hbs";
pub const MODEL_TEMPLATE: &str = "model.hbs";
