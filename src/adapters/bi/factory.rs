//! BI backend factory

use super::http::HttpBiService;
use super::traits::BiService;
use crate::config::ProvisioningConfig;
use crate::domain::Result;
use std::sync::Arc;

/// Create the BI service client from configuration
pub fn create_bi_service(config: &ProvisioningConfig) -> Result<Arc<dyn BiService>> {
    tracing::info!(endpoint = %config.endpoint, "Creating BI service client");
    Ok(Arc::new(HttpBiService::from_config(config)?))
}
