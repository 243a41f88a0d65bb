//! In-memory filesystem adapter for testing.

use std::{
    collections::{BTreeMap, BTreeSet, HashSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use async_trait::async_trait;

use molgen_core::{
    application::{ApplicationError, ports::Filesystem},
    error::MolgenResult,
};

/// In-memory filesystem for testing.
///
/// Clones share the same state, so a test can hand one clone to a service
/// and inspect the other afterwards.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<PathBuf, String>,
    directories: BTreeSet<PathBuf>,
    /// Writes to these paths fail.
    failing_writes: HashSet<PathBuf>,
}

impl MemoryFilesystemInner {
    fn add_dir_all(&mut self, path: &Path) {
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            self.directories.insert(current.clone());
        }
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.directories.contains(path)
    }

    fn has_children(&self, path: &Path) -> bool {
        self.files.keys().any(|p| p.parent() == Some(path))
            || self.directories.iter().any(|p| p.parent() == Some(path))
    }
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file, creating its parent directories (testing helper).
    pub fn with_file(self, path: impl AsRef<Path>, content: impl Into<String>) -> Self {
        if let Ok(mut inner) = self.inner.write() {
            let path = path.as_ref();
            if let Some(parent) = path.parent() {
                inner.add_dir_all(parent);
            }
            inner.files.insert(path.to_path_buf(), content.into());
        }
        self
    }

    /// Seed an empty directory (testing helper).
    pub fn with_dir(self, path: impl AsRef<Path>) -> Self {
        if let Ok(mut inner) = self.inner.write() {
            inner.add_dir_all(path.as_ref());
        }
        self
    }

    /// Make every write to `path` fail (testing helper).
    pub fn fail_writes_to(self, path: impl Into<PathBuf>) -> Self {
        if let Ok(mut inner) = self.inner.write() {
            inner.failing_writes.insert(path.into());
        }
        self
    }

    /// Read a file's content (testing helper).
    pub fn read_file(&self, path: impl AsRef<Path>) -> Option<String> {
        let inner = self.inner.read().ok()?;
        inner.files.get(path.as_ref()).cloned()
    }

    /// List all files, sorted.
    pub fn list_files(&self) -> Vec<PathBuf> {
        self.inner
            .read()
            .map(|inner| inner.files.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Is `path` a known directory?
    pub fn is_dir(&self, path: impl AsRef<Path>) -> bool {
        self.inner
            .read()
            .map(|inner| inner.is_dir(path.as_ref()))
            .unwrap_or(false)
    }
}

#[async_trait]
impl Filesystem for MemoryFilesystem {
    async fn exists(&self, path: &Path) -> bool {
        self.inner
            .read()
            .map(|inner| inner.files.contains_key(path) || inner.is_dir(path))
            .unwrap_or(false)
    }

    async fn ensure_empty_dir(&self, path: &Path) -> MolgenResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;

        if inner.files.contains_key(path) {
            return Err(ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "exists and is not a directory".into(),
            }
            .into());
        }
        if inner.has_children(path) {
            return Err(ApplicationError::DirectoryNotEmpty {
                path: path.to_path_buf(),
            }
            .into());
        }
        inner.add_dir_all(path);
        Ok(())
    }

    async fn create_dir_all(&self, path: &Path) -> MolgenResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;
        inner.add_dir_all(path);
        Ok(())
    }

    async fn copy_dir(&self, from: &Path, to: &Path) -> MolgenResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;

        if !inner.is_dir(from) {
            return Err(ApplicationError::FilesystemError {
                path: from.to_path_buf(),
                reason: "Failed to walk directory: not found".into(),
            }
            .into());
        }

        let dirs: Vec<PathBuf> = inner
            .directories
            .iter()
            .filter_map(|d| d.strip_prefix(from).ok())
            .map(|rel| to.join(rel))
            .collect();
        let files: Vec<(PathBuf, String)> = inner
            .files
            .iter()
            .filter_map(|(p, c)| p.strip_prefix(from).ok().map(|rel| (to.join(rel), c.clone())))
            .collect();

        for dir in dirs {
            inner.add_dir_all(&dir);
        }
        for (path, content) in files {
            if inner.files.contains_key(&path) {
                return Err(ApplicationError::FilesystemError {
                    path,
                    reason: "refusing to overwrite an existing file".into(),
                }
                .into());
            }
            if let Some(parent) = path.parent() {
                inner.add_dir_all(parent);
            }
            inner.files.insert(path, content);
        }
        Ok(())
    }

    async fn read_to_string(&self, path: &Path) -> MolgenResult<String> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;
        inner.files.get(path).cloned().ok_or_else(|| {
            ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "Failed to read file: not found".into(),
            }
            .into()
        })
    }

    async fn write_file(&self, path: &Path, content: &str) -> MolgenResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;

        if inner.failing_writes.contains(path) {
            return Err(ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "Failed to write file: injected failure".into(),
            }
            .into());
        }

        // Ensure parent exists
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !inner.is_dir(parent) {
                return Err(ApplicationError::FilesystemError {
                    path: path.to_path_buf(),
                    reason: "Parent directory does not exist".into(),
                }
                .into());
            }
        }

        inner.files.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn write_requires_parent_directory() {
        let fs = MemoryFilesystem::new();
        let err = fs
            .write_file(Path::new("/p/a.txt"), "x")
            .await
            .unwrap_err();
        assert_eq!(err.code(), "FS_ERROR");

        fs.create_dir_all(Path::new("/p")).await.unwrap();
        fs.write_file(Path::new("/p/a.txt"), "x").await.unwrap();
        assert_eq!(fs.read_file("/p/a.txt").as_deref(), Some("x"));
    }

    #[tokio::test]
    async fn ensure_empty_dir_rejects_populated_directory() {
        let fs = MemoryFilesystem::new().with_file("/p/keep.txt", "");
        let err = fs.ensure_empty_dir(Path::new("/p")).await.unwrap_err();
        assert_eq!(err.code(), "DIRECTORY_NOT_EMPTY");

        fs.ensure_empty_dir(Path::new("/q")).await.unwrap();
        assert!(fs.is_dir("/q"));
    }

    #[tokio::test]
    async fn copy_dir_rebases_the_tree() {
        let fs = MemoryFilesystem::new()
            .with_file("/tpl/base/src/config/app.js", "app")
            .with_dir("/tpl/base/src/mixins")
            .with_dir("/out");
        fs.copy_dir(Path::new("/tpl/base"), Path::new("/out"))
            .await
            .unwrap();

        assert_eq!(fs.read_file("/out/src/config/app.js").as_deref(), Some("app"));
        assert!(fs.is_dir("/out/src/mixins"));
    }

    #[tokio::test]
    async fn injected_failures_only_hit_their_path() {
        let fs = MemoryFilesystem::new()
            .with_dir("/p")
            .fail_writes_to("/p/bad.txt");
        assert!(fs.write_file(Path::new("/p/bad.txt"), "").await.is_err());
        assert!(fs.write_file(Path::new("/p/good.txt"), "").await.is_ok());
    }

    #[tokio::test]
    async fn clones_share_state() {
        let fs = MemoryFilesystem::new().with_dir("/p");
        let other = fs.clone();
        fs.write_file(Path::new("/p/a"), "1").await.unwrap();
        assert!(other.exists(Path::new("/p/a")).await);
    }
}
