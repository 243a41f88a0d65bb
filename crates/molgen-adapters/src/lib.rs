//! Infrastructure adapters for moleculer-gen.
//!
//! This crate implements the ports defined in `molgen_core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod filesystem;
pub mod renderer;
pub mod template_root;

// Re-export commonly used adapters
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use renderer::HandlebarsRenderer;
pub use template_root::{TEMPLATES_DIR_ENV, TemplateRootLocator, is_template_root};
