//! REST object store client
//!
//! Objects are addressed as `{endpoint}/{location}/{key}`; `GET` reads and
//! `PUT` writes. Requests are not retried.

use super::traits::ArtifactStore;
use crate::adapters::http_client::{build_client, with_bearer};
use crate::config::{SecretString, StorageConfig};
use crate::domain::ids::{LocationId, ObjectKey};
use crate::domain::{ReportflowError, Result, StoredObjectRef};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use url::Url;

/// Object store reached over HTTP
pub struct HttpStore {
    endpoint: Url,
    client: Client,
    token: Option<SecretString>,
}

impl HttpStore {
    /// Create a new store client
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the endpoint is not an absolute
    /// URL or the HTTP client cannot be built.
    pub fn new(endpoint: &str, token: Option<SecretString>, timeout_seconds: u64) -> Result<Self> {
        let endpoint = Url::parse(endpoint).map_err(|e| {
            ReportflowError::Configuration(format!("Invalid storage endpoint '{endpoint}': {e}"))
        })?;
        if endpoint.cannot_be_a_base() {
            return Err(ReportflowError::Configuration(format!(
                "Storage endpoint cannot be used as a base URL: {endpoint}"
            )));
        }

        Ok(Self {
            endpoint,
            client: build_client(timeout_seconds)?,
            token,
        })
    }

    pub fn from_config(config: &StorageConfig) -> Result<Self> {
        let endpoint = config.endpoint.as_deref().ok_or_else(|| {
            ReportflowError::Configuration("storage.endpoint is required for http".to_string())
        })?;
        Self::new(endpoint, config.token.clone(), config.timeout_seconds)
    }

    /// URL of an object with every key segment percent-encoded
    fn object_url(&self, location: &LocationId, key: &ObjectKey) -> Result<Url> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| {
                ReportflowError::Configuration(format!(
                    "Storage endpoint cannot be used as a base URL: {}",
                    self.endpoint
                ))
            })?
            .pop_if_empty()
            .push(location.as_str())
            .extend(key.as_str().split('/'));
        Ok(url)
    }
}

fn map_status(
    status: StatusCode,
    body: String,
    location: &LocationId,
    key: &ObjectKey,
) -> ReportflowError {
    match status {
        StatusCode::NOT_FOUND => ReportflowError::NotFound(format!("{location}/{key}")),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            ReportflowError::Access(format!("{location}/{key}: {status} {body}"))
        }
        _ => ReportflowError::Storage(format!("{location}/{key}: {status} {body}")),
    }
}

#[async_trait]
impl ArtifactStore for HttpStore {
    async fn read(&self, location: &LocationId, key: &ObjectKey) -> Result<Vec<u8>> {
        let url = self.object_url(location, key)?;
        tracing::debug!(url = %url, "Fetching object");

        let resp = with_bearer(self.client.get(url), self.token.as_ref())
            .send()
            .await
            .map_err(|e| ReportflowError::Storage(format!("{location}/{key}: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(map_status(status, body, location, key));
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| ReportflowError::Storage(format!("{location}/{key}: {e}")))?;
        Ok(bytes.to_vec())
    }

    async fn write(
        &self,
        location: &LocationId,
        key: &ObjectKey,
        bytes: Vec<u8>,
    ) -> Result<StoredObjectRef> {
        let url = self.object_url(location, key)?;
        tracing::debug!(url = %url, bytes = bytes.len(), "Uploading object");

        let resp = with_bearer(self.client.put(url), self.token.as_ref())
            .header(reqwest::header::CONTENT_TYPE, "text/csv")
            .body(bytes)
            .send()
            .await
            .map_err(|e| ReportflowError::Storage(format!("{location}/{key}: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(map_status(status, body, location, key));
        }

        Ok(StoredObjectRef::new(location.clone(), key.clone()))
    }

    fn backend_name(&self) -> &'static str {
        "http"
    }
}
