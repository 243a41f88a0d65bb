//! Local filesystem adapter using tokio::fs.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;
use walkdir::WalkDir;

use molgen_core::{
    application::{ApplicationError, ports::Filesystem},
    error::{MolgenError, MolgenResult},
};

/// Production filesystem implementation using `tokio::fs`.
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Filesystem for LocalFilesystem {
    async fn exists(&self, path: &Path) -> bool {
        tokio::fs::try_exists(path).await.unwrap_or(false)
    }

    async fn ensure_empty_dir(&self, path: &Path) -> MolgenResult<()> {
        match tokio::fs::metadata(path).await {
            Ok(meta) if !meta.is_dir() => {
                return Err(ApplicationError::FilesystemError {
                    path: path.to_path_buf(),
                    reason: "exists and is not a directory".into(),
                }
                .into());
            }
            Ok(_) => {
                let mut entries = tokio::fs::read_dir(path)
                    .await
                    .map_err(|e| map_io_error(path, e, "read directory"))?;
                let first = entries
                    .next_entry()
                    .await
                    .map_err(|e| map_io_error(path, e, "read directory"))?;
                if first.is_some() {
                    return Err(ApplicationError::DirectoryNotEmpty {
                        path: path.to_path_buf(),
                    }
                    .into());
                }
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => self.create_dir_all(path).await,
            Err(e) => Err(map_io_error(path, e, "inspect directory")),
        }
    }

    async fn create_dir_all(&self, path: &Path) -> MolgenResult<()> {
        tokio::fs::create_dir_all(path)
            .await
            .map_err(|e| map_io_error(path, e, "create directory"))
    }

    async fn copy_dir(&self, from: &Path, to: &Path) -> MolgenResult<()> {
        let entries = walk(from)?;
        debug!(
            from = %from.display(),
            to = %to.display(),
            entries = entries.len(),
            "Copying tree"
        );

        for (relative, is_dir) in entries {
            let source = from.join(&relative);
            let target = to.join(&relative);
            if is_dir {
                self.create_dir_all(&target).await?;
                continue;
            }
            if self.exists(&target).await {
                return Err(ApplicationError::FilesystemError {
                    path: target,
                    reason: "refusing to overwrite an existing file".into(),
                }
                .into());
            }
            if let Some(parent) = target.parent() {
                self.create_dir_all(parent).await?;
            }
            tokio::fs::copy(&source, &target)
                .await
                .map_err(|e| map_io_error(&target, e, "copy file"))?;
        }
        Ok(())
    }

    async fn read_to_string(&self, path: &Path) -> MolgenResult<String> {
        tokio::fs::read_to_string(path)
            .await
            .map_err(|e| map_io_error(path, e, "read file"))
    }

    async fn write_file(&self, path: &Path, content: &str) -> MolgenResult<()> {
        tokio::fs::write(path, content)
            .await
            .map_err(|e| map_io_error(path, e, "write file"))
    }
}

/// Relative paths under `root`, parents before children, with an is-dir flag.
fn walk(root: &Path) -> MolgenResult<Vec<(PathBuf, bool)>> {
    let mut entries = Vec::new();
    for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| ApplicationError::FilesystemError {
            path: root.to_path_buf(),
            reason: format!("Failed to walk directory: {e}"),
        })?;
        let file_type = entry.file_type();
        if !file_type.is_dir() && !file_type.is_file() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(root)
            .map_err(|_| ApplicationError::FilesystemError {
                path: entry.path().to_path_buf(),
                reason: format!("not under {}", root.display()),
            })?
            .to_path_buf();
        entries.push((relative, file_type.is_dir()));
    }
    Ok(entries)
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> MolgenError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {}: {}", operation, e),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn ensure_empty_dir_creates_missing_directory() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("a/b");
        LocalFilesystem::new().ensure_empty_dir(&target).await.unwrap();
        assert!(target.is_dir());
    }

    #[tokio::test]
    async fn ensure_empty_dir_accepts_empty_and_rejects_populated() {
        let tmp = TempDir::new().unwrap();
        let fs = LocalFilesystem::new();
        fs.ensure_empty_dir(tmp.path()).await.unwrap();

        std::fs::write(tmp.path().join("x.txt"), "x").unwrap();
        let err = fs.ensure_empty_dir(tmp.path()).await.unwrap_err();
        assert_eq!(err.code(), "DIRECTORY_NOT_EMPTY");
    }

    #[tokio::test]
    async fn ensure_empty_dir_rejects_a_file() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("taken");
        std::fs::write(&file, "").unwrap();
        let err = LocalFilesystem::new().ensure_empty_dir(&file).await.unwrap_err();
        assert_eq!(err.code(), "FS_ERROR");
    }

    #[tokio::test]
    async fn copy_dir_copies_nested_tree() {
        let src = TempDir::new().unwrap();
        std::fs::create_dir_all(src.path().join("src/config")).unwrap();
        std::fs::create_dir_all(src.path().join("empty")).unwrap();
        std::fs::write(src.path().join("src/config/app.js"), "module.exports = {}").unwrap();
        std::fs::write(src.path().join(".gitignore"), "node_modules\n").unwrap();

        let dst = TempDir::new().unwrap();
        LocalFilesystem::new()
            .copy_dir(src.path(), dst.path())
            .await
            .unwrap();

        assert_eq!(
            std::fs::read_to_string(dst.path().join("src/config/app.js")).unwrap(),
            "module.exports = {}"
        );
        assert!(dst.path().join(".gitignore").is_file());
        assert!(dst.path().join("empty").is_dir());
    }

    #[tokio::test]
    async fn copy_dir_never_overwrites() {
        let src = TempDir::new().unwrap();
        std::fs::write(src.path().join("a.txt"), "new").unwrap();
        let dst = TempDir::new().unwrap();
        std::fs::write(dst.path().join("a.txt"), "old").unwrap();

        let err = LocalFilesystem::new()
            .copy_dir(src.path(), dst.path())
            .await
            .unwrap_err();
        assert_eq!(err.code(), "FS_ERROR");
        assert_eq!(
            std::fs::read_to_string(dst.path().join("a.txt")).unwrap(),
            "old"
        );
    }

    #[tokio::test]
    async fn write_document_uses_two_space_yaml() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("compose.yml");
        let doc: serde_yaml::Value =
            serde_yaml::from_str("services:\n  api:\n    image: app\n").unwrap();

        LocalFilesystem::new().write_document(&path, &doc).await.unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "services:\n  api:\n    image: app\n");
    }

    #[tokio::test]
    async fn read_missing_file_is_a_filesystem_error() {
        let tmp = TempDir::new().unwrap();
        let err = LocalFilesystem::new()
            .read_to_string(&tmp.path().join("missing"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "FS_ERROR");
    }
}
