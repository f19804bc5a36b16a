//! BI provisioning
//!
//! - [`DashboardProvisioner`] - dataset/analysis/dashboard upsert and grants
//! - [`ProvisionLocks`] - per-dataset-id single flight
//! - [`resolve_context`] - account/region context resolved once at startup

pub mod locks;
pub mod provisioner;

pub use locks::ProvisionLocks;
pub use provisioner::{DashboardProvisioner, ProvisioningSettings};

use crate::config::ProvisioningConfig;
use crate::domain::ids::{AccountId, Region};
use crate::domain::{ProvisioningContext, ReportflowError, Result};

/// Builds the provisioning context from configuration
///
/// # Errors
///
/// Returns a configuration error when the account id or region is missing
/// or malformed.
pub fn resolve_context(config: &ProvisioningConfig) -> Result<ProvisioningContext> {
    let account_id = config.account_id.as_deref().ok_or_else(|| {
        ReportflowError::Configuration(
            "provisioning.account_id is not set (or AWS_ACCOUNT_ID)".to_string(),
        )
    })?;
    let region = config.region.as_deref().ok_or_else(|| {
        ReportflowError::Configuration("provisioning.region is not set (or AWS_REGION)".to_string())
    })?;

    let context = ProvisioningContext::new(
        AccountId::new(account_id).map_err(ReportflowError::Configuration)?,
        Region::new(region).map_err(ReportflowError::Configuration)?,
    );
    tracing::debug!(
        account_id = %context.account_id(),
        region = %context.region(),
        "Resolved provisioning context"
    );
    Ok(context)
}
