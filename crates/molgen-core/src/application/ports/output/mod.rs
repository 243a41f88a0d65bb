//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `molgen-adapters` crate provides implementations.

use std::path::Path;

use async_trait::async_trait;

use crate::application::ApplicationError;
use crate::error::MolgenResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `molgen_adapters::filesystem::LocalFilesystem` (production)
/// - `molgen_adapters::filesystem::MemoryFilesystem` (testing)
///
/// Every method is a suspension point: the services interleave independent
/// writes on a single thread.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Filesystem: Send + Sync {
    /// Check if path exists.
    async fn exists(&self, path: &Path) -> bool;

    /// Create `path` (and parents) when absent; fail with
    /// `DirectoryNotEmpty` when it exists and has any entry.
    async fn ensure_empty_dir(&self, path: &Path) -> MolgenResult<()>;

    /// Create a directory and all parent directories.
    async fn create_dir_all(&self, path: &Path) -> MolgenResult<()>;

    /// Recursively copy the tree under `from` into `to`.
    async fn copy_dir(&self, from: &Path, to: &Path) -> MolgenResult<()>;

    /// Read a UTF-8 text file.
    async fn read_to_string(&self, path: &Path) -> MolgenResult<String>;

    /// Write UTF-8 content to a file. The parent directory must exist.
    async fn write_file(&self, path: &Path, content: &str) -> MolgenResult<()>;

    /// Serialise `document` as YAML (2-space indent, no anchors) and write it.
    async fn write_document(&self, path: &Path, document: &serde_yaml::Value) -> MolgenResult<()> {
        let text = serde_yaml::to_string(document).map_err(|e| ApplicationError::FilesystemError {
            path: path.to_path_buf(),
            reason: format!("Failed to serialise document: {e}"),
        })?;
        self.write_file(path, &text).await
    }
}

/// Port for template text rendering.
///
/// Implemented by:
/// - `molgen_adapters::renderer::HandlebarsRenderer`
#[cfg_attr(test, mockall::automock)]
pub trait TemplateRenderer: Send + Sync {
    /// Render `template` text against `data`.
    ///
    /// `name` only labels errors.
    fn render(&self, name: &str, template: &str, data: &serde_json::Value)
    -> MolgenResult<String>;
}
