//! Object storage abstraction
//!
//! The pipeline reads source objects and writes converted or forwarded
//! artifacts through this trait only, so backends can be swapped without
//! touching the stages.

use crate::domain::ids::{LocationId, ObjectKey};
use crate::domain::{Result, StoredObjectRef};
use async_trait::async_trait;

/// Read/write access to named locations holding keyed objects
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Reads the full contents of an object
    ///
    /// # Errors
    ///
    /// - [`ReportflowError::NotFound`](crate::domain::ReportflowError::NotFound)
    ///   when the object does not exist
    /// - [`ReportflowError::Access`](crate::domain::ReportflowError::Access)
    ///   when the backend refuses the read
    /// - [`ReportflowError::Storage`](crate::domain::ReportflowError::Storage)
    ///   for any other backend failure
    async fn read(&self, location: &LocationId, key: &ObjectKey) -> Result<Vec<u8>>;

    /// Writes `bytes` under `key`, replacing any existing object
    ///
    /// A reader never observes a partially written object.
    async fn write(
        &self,
        location: &LocationId,
        key: &ObjectKey,
        bytes: Vec<u8>,
    ) -> Result<StoredObjectRef>;

    /// Short name of the backend, used in logs
    fn backend_name(&self) -> &'static str;
}
