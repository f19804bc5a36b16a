//! Destination routing by source format
//!
//! - `.json` sources are converted and written to the converted location
//!   under the same key with the trailing `.json` replaced by `.csv`
//! - `.csv` sources are forwarded unchanged to the archive location as
//!   `{prefix}/{file name}`
//!
//! The destination depends only on the source key, so a re-delivered event
//! always overwrites the same object.

use crate::config::{RoutingConfig, StorageConfig};
use crate::domain::ids::{LocationId, ObjectKey};
use crate::domain::{IngestionRequest, ReportflowError, Result, SourceFormat, StoredObjectRef};

/// Where one request's artifact goes and whether it is provisioned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub destination: StoredObjectRef,
    pub convert: bool,
    pub provision: bool,
}

/// Maps requests to destinations
#[derive(Debug, Clone)]
pub struct DestinationRouter {
    converted_location: LocationId,
    archive_location: LocationId,
    archive_prefix: String,
    provision_passthrough: bool,
}

impl DestinationRouter {
    pub fn new(
        converted_location: LocationId,
        archive_location: LocationId,
        archive_prefix: impl Into<String>,
        provision_passthrough: bool,
    ) -> Self {
        Self {
            converted_location,
            archive_location,
            archive_prefix: archive_prefix.into().trim_matches('/').to_string(),
            provision_passthrough,
        }
    }

    pub fn from_config(storage: &StorageConfig, routing: &RoutingConfig) -> Result<Self> {
        let converted = LocationId::new(storage.converted_location.as_str())
            .map_err(ReportflowError::Configuration)?;
        let archive = LocationId::new(storage.archive_location.as_str())
            .map_err(ReportflowError::Configuration)?;
        Ok(Self::new(
            converted,
            archive,
            storage.archive_prefix.as_str(),
            routing.provision_passthrough,
        ))
    }

    /// Computes the route for a request
    pub fn route(&self, request: &IngestionRequest) -> Result<Route> {
        let key = request.object_key();
        match request.format() {
            SourceFormat::Json => {
                let destination_key = key
                    .replace_suffix(SourceFormat::Json.suffix(), SourceFormat::Csv.suffix())
                    .ok_or_else(|| {
                        ReportflowError::MalformedEvent(format!("key '{key}' has no .json suffix"))
                    })?;
                Ok(Route {
                    destination: StoredObjectRef::new(
                        self.converted_location.clone(),
                        destination_key,
                    ),
                    convert: true,
                    provision: true,
                })
            }
            SourceFormat::Csv => {
                let file_name = key.file_name();
                let destination_key = if self.archive_prefix.is_empty() {
                    file_name.to_string()
                } else {
                    format!("{}/{}", self.archive_prefix, file_name)
                };
                let destination_key =
                    ObjectKey::new(destination_key).map_err(ReportflowError::MalformedEvent)?;
                Ok(Route {
                    destination: StoredObjectRef::new(
                        self.archive_location.clone(),
                        destination_key,
                    ),
                    convert: false,
                    provision: self.provision_passthrough,
                })
            }
        }
    }
}
