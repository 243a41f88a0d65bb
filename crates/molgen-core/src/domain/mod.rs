//! Core domain layer for moleculer-gen.
//!
//! Pure logic only: the module model, the registries, configuration
//! validation and the assembly engine. All I/O goes through the ports
//! defined in the application layer.
//!
//! ## Flow
//!
//! ```text
//! Raw*Config ─► ConfigValidator ─► ResolvedConfiguration
//!                                        │
//!                           Registries::resolve_modules
//!                                        ▼
//!                              Vec<ModuleDefinition> ─► assemble ─► AssemblyPlan
//! ```

pub mod artifacts;
pub mod assembly;
pub mod compose;
pub mod config;
pub mod error;
pub mod module;
pub mod modules;
pub mod naming;
pub mod registry;

mod validation;

pub use assembly::{AssemblyPlan, ENV_FILES, InfrastructureFragment, assemble};
pub use compose::{ComposeDocument, deep_merge};
pub use config::{
    GeneratorState, RawProjectConfig, RawServiceConfig, ResolvedConfiguration, ResolvedService,
    TraefikOptions,
};
pub use error::DomainError;
pub use module::{
    EnvironmentMap, InfrastructureService, ModuleCategory, ModuleDefinition, ModuleMeta,
    RestartPolicy, TemplateSpec,
};
pub use modules::backend::{ServiceModuleOptions, service_module};
pub use naming::{DefaultNames, sanitize_name};
pub use registry::{ModuleContext, ModuleRegistry, Registries};
pub use validation::{ConfigValidator, MAX_NAME_LEN};
