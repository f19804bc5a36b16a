//! Storage backend factory

use super::filesystem::FilesystemStore;
use super::http::HttpStore;
use super::traits::ArtifactStore;
use crate::config::{StorageBackend, StorageConfig};
use crate::domain::{ReportflowError, Result};
use std::sync::Arc;

/// Create an object store based on the configuration
///
/// # Errors
///
/// Returns a configuration error when the selected backend lacks its
/// required settings.
pub fn create_artifact_store(config: &StorageConfig) -> Result<Arc<dyn ArtifactStore>> {
    match config.backend {
        StorageBackend::Filesystem => {
            let root = config.root.as_deref().ok_or_else(|| {
                ReportflowError::Configuration(
                    "storage.root is required for the filesystem backend".to_string(),
                )
            })?;
            tracing::info!(root = %root, "Creating filesystem object store");
            Ok(Arc::new(FilesystemStore::new(root)))
        }
        StorageBackend::Http => {
            tracing::info!(endpoint = ?config.endpoint, "Creating HTTP object store");
            Ok(Arc::new(HttpStore::from_config(config)?))
        }
    }
}
