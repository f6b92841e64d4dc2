//! Filesystem access for `/files/{name}`, confined to one base directory.

use std::io;
use std::path::{Component, Path, PathBuf};

use crate::router::error::RouteError;

#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Joins `name` onto the base directory.
    ///
    /// Only plain path segments are accepted: empty names, absolute paths and
    /// anything containing `..` or `.` are rejected.
    pub fn resolve(&self, name: &str) -> Result<PathBuf, RouteError> {
        let relative = Path::new(name);
        let plain = !name.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));

        if !plain || name.split('/').any(|seg| seg == "." || seg == "..") {
            return Err(RouteError::InvalidFileName(name.to_string()));
        }

        Ok(self.root.join(relative))
    }

    /// True when `path` names an existing regular file.
    pub async fn exists(&self, path: &Path) -> bool {
        tokio::fs::metadata(path)
            .await
            .map(|m| m.is_file())
            .unwrap_or(false)
    }

    pub async fn read_all(&self, path: &Path) -> Result<Vec<u8>, RouteError> {
        tokio::fs::read(path).await.map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => RouteError::FileNotFound(path.to_path_buf()),
            _ => RouteError::FileReadFailure {
                path: path.to_path_buf(),
                source: e,
            },
        })
    }

    /// Writes `bytes` to `path`, replacing any previous content.
    pub async fn write_all(&self, path: &Path, bytes: &[u8]) -> Result<(), RouteError> {
        tokio::fs::write(path, bytes)
            .await
            .map_err(|source| RouteError::FileWriteFailure {
                path: path.to_path_buf(),
                source,
            })
    }
}
