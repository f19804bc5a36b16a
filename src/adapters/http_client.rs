//! Shared construction of HTTP clients for the REST backends

use crate::config::SecretString;
use crate::domain::{ReportflowError, Result};
use reqwest::{Client, ClientBuilder, RequestBuilder};
use secrecy::ExposeSecret;
use std::time::Duration;

/// Builds a client with the configured request timeout
pub(crate) fn build_client(timeout_seconds: u64) -> Result<Client> {
    ClientBuilder::new()
        .timeout(Duration::from_secs(timeout_seconds))
        .connect_timeout(Duration::from_secs(timeout_seconds.min(30)))
        .build()
        .map_err(|e| ReportflowError::Configuration(format!("Failed to build HTTP client: {e}")))
}

/// Attaches a bearer token when one is configured
pub(crate) fn with_bearer(request: RequestBuilder, token: Option<&SecretString>) -> RequestBuilder {
    match token {
        Some(token) => request.bearer_auth(token.expose_secret().as_ref()),
        None => request,
    }
}

/// Joins a base endpoint and a path without doubling slashes
pub(crate) fn join_url(endpoint: &str, path: &str) -> String {
    format!(
        "{}/{}",
        endpoint.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_url() {
        assert_eq!(join_url("http://x/", "/a/b"), "http://x/a/b");
        assert_eq!(join_url("http://x", "a"), "http://x/a");
    }

    #[test]
    fn test_build_client() {
        assert!(build_client(5).is_ok());
    }
}
