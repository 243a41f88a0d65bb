//! Application layer for moleculer-gen.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (GenerationService, ModuleCatalog)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! configuration rules itself. Those live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

pub use services::{GenerationReport, GenerationService, ModuleCatalog, PlannedAction};

// Re-export port traits (for adapter implementation)
pub use ports::{Filesystem, TemplateRenderer};

pub use error::ApplicationError;
