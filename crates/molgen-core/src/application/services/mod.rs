//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "initialise a project" or "add a service".

mod batch;
pub mod generation_service;
pub mod layout;
pub mod module_catalog;
pub mod plan;
mod service_addition;

pub use generation_service::GenerationService;
pub use module_catalog::ModuleCatalog;
pub use plan::{GenerationReport, PlannedAction};
