//! Directory-backed object store
//!
//! Each location is a directory under the configured root and each key a
//! relative path inside it. Writes go to a temporary sibling file first and
//! are renamed into place.

use super::traits::ArtifactStore;
use crate::domain::ids::{LocationId, ObjectKey};
use crate::domain::{ReportflowError, Result, StoredObjectRef};
use async_trait::async_trait;
use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Object store rooted at a local directory
#[derive(Debug, Clone)]
pub struct FilesystemStore {
    root: PathBuf,
}

impl FilesystemStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of an object; keys are validated to never contain `..`
    fn object_path(&self, location: &LocationId, key: &ObjectKey) -> PathBuf {
        let mut path = self.root.join(location.as_str());
        for segment in key.as_str().split('/').filter(|s| !s.is_empty()) {
            path.push(segment);
        }
        path
    }
}

fn map_io_error(err: std::io::Error, location: &LocationId, key: &ObjectKey) -> ReportflowError {
    match err.kind() {
        IoErrorKind::NotFound => ReportflowError::NotFound(format!("{location}/{key}")),
        IoErrorKind::PermissionDenied => {
            ReportflowError::Access(format!("{location}/{key}: {err}"))
        }
        _ => ReportflowError::Storage(format!("{location}/{key}: {err}")),
    }
}

#[async_trait]
impl ArtifactStore for FilesystemStore {
    async fn read(&self, location: &LocationId, key: &ObjectKey) -> Result<Vec<u8>> {
        let path = self.object_path(location, key);
        tracing::debug!(path = %path.display(), "Reading object");

        if tokio::fs::metadata(&path)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false)
        {
            return Err(ReportflowError::NotFound(format!("{location}/{key}")));
        }

        tokio::fs::read(&path)
            .await
            .map_err(|e| map_io_error(e, location, key))
    }

    async fn write(
        &self,
        location: &LocationId,
        key: &ObjectKey,
        bytes: Vec<u8>,
    ) -> Result<StoredObjectRef> {
        let path = self.object_path(location, key);
        let parent = path
            .parent()
            .ok_or_else(|| ReportflowError::Storage(format!("{location}/{key}: no parent")))?;

        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| map_io_error(e, location, key))?;

        let tmp = parent.join(format!(".{}.{}.tmp", key.file_name(), Uuid::new_v4()));
        if let Err(e) = tokio::fs::write(&tmp, &bytes).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(map_io_error(e, location, key));
        }
        if let Err(e) = tokio::fs::rename(&tmp, &path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(map_io_error(e, location, key));
        }

        tracing::debug!(path = %path.display(), bytes = bytes.len(), "Wrote object");
        Ok(StoredObjectRef::new(location.clone(), key.clone()))
    }

    fn backend_name(&self) -> &'static str {
        "filesystem"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn ids(location: &str, key: &str) -> (LocationId, ObjectKey) {
        (LocationId::new(location).unwrap(), ObjectKey::new(key).unwrap())
    }

    #[tokio::test]
    async fn test_write_then_read_nested_key() {
        let dir = TempDir::new().unwrap();
        let store = FilesystemStore::new(dir.path());
        let (location, key) = ids("final", "folder/report.csv");

        let stored = store.write(&location, &key, b"a,b\n".to_vec()).await.unwrap();
        assert_eq!(stored.to_string(), "final/folder/report.csv");
        assert_eq!(store.read(&location, &key).await.unwrap(), b"a,b\n");
        assert!(dir.path().join("final/folder/report.csv").exists());
    }

    #[tokio::test]
    async fn test_write_overwrites_and_leaves_no_temp_files() {
        let dir = TempDir::new().unwrap();
        let store = FilesystemStore::new(dir.path());
        let (location, key) = ids("dest", "report.csv");

        store.write(&location, &key, b"old".to_vec()).await.unwrap();
        store.write(&location, &key, b"new".to_vec()).await.unwrap();

        assert_eq!(store.read(&location, &key).await.unwrap(), b"new");
        let entries: Vec<_> = std::fs::read_dir(dir.path().join("dest"))
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(entries, vec!["report.csv".to_string()]);
    }

    #[tokio::test]
    async fn test_read_missing_is_not_found() {
        let dir = TempDir::new().unwrap();
        let store = FilesystemStore::new(dir.path());
        let (location, key) = ids("incoming", "missing.json");

        let err = store.read(&location, &key).await.unwrap_err();
        assert!(matches!(err, ReportflowError::NotFound(_)));
    }
}
