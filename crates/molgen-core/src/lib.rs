//! moleculer-gen core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers of the
//! `moleculer-gen` project generator, following hexagonal (ports and
//! adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           molgen-cli (CLI)              │
//! │   prompts, JSON config, exit codes      │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │  (GenerationService, ModuleCatalog)     │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │     (Filesystem, TemplateRenderer)      │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │     molgen-adapters (Infrastructure)    │
//! │ (LocalFilesystem, HandlebarsRenderer)   │
//! └─────────────────────────────────────────┘
//!
//!   Domain layer (pure): module model, registries,
//!   validation, compose document, assembly engine
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use molgen_core::prelude::*;
//!
//! let service = GenerationService::new(filesystem, renderer, template_root);
//! let raw: RawProjectConfig = serde_json::from_str(&json)?;
//! let report = service.init_project(raw, Path::new("."), false).await?;
//! println!("generated {}", report.project_dir.display());
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        GenerationReport, GenerationService, ModuleCatalog, PlannedAction,
        ports::{Filesystem, TemplateRenderer},
    };
    pub use crate::domain::{
        GeneratorState, ModuleCategory, ModuleMeta, RawProjectConfig, RawServiceConfig,
        ResolvedConfiguration, ResolvedService,
    };
    pub use crate::error::{ErrorCategory, MolgenError, MolgenResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
