//! BI service abstraction
//!
//! Mirrors the provisioning API the pipeline consumes: dataset upsert,
//! analysis and dashboard create-or-update, and permission grants. Every
//! call is a single bounded request; callers never retry in-process.

use crate::domain::ids::{AnalysisId, DashboardId, PrincipalArn};
use crate::domain::{
    DatasetDescriptor, ProvisioningContext, ResourceKind, Result, SourceEntity, UpsertOutcome,
};
use async_trait::async_trait;

/// Client for the BI/dashboard service
#[async_trait]
pub trait BiService: Send + Sync {
    /// Creates the dataset if absent, otherwise replaces its definition
    ///
    /// # Errors
    ///
    /// Returns [`ReportflowError::Provision`](crate::domain::ReportflowError::Provision)
    /// when the service rejects the call.
    async fn upsert_dataset(
        &self,
        ctx: &ProvisioningContext,
        dataset: &DatasetDescriptor,
    ) -> Result<UpsertOutcome>;

    /// Creates or updates an analysis bound to `source`
    async fn create_or_update_analysis(
        &self,
        ctx: &ProvisioningContext,
        analysis_id: &AnalysisId,
        name: &str,
        source: &SourceEntity,
    ) -> Result<UpsertOutcome>;

    /// Creates or updates a dashboard bound to `source`
    async fn create_or_update_dashboard(
        &self,
        ctx: &ProvisioningContext,
        dashboard_id: &DashboardId,
        name: &str,
        source: &SourceEntity,
    ) -> Result<UpsertOutcome>;

    /// Grants `actions` on a resource to `principal`
    ///
    /// Granting the same actions twice leaves the resource unchanged.
    async fn grant_permissions(
        &self,
        ctx: &ProvisioningContext,
        kind: ResourceKind,
        resource_id: &str,
        principal: &PrincipalArn,
        actions: &[String],
    ) -> Result<()>;

    /// Short name of the backend, used in logs
    fn backend_name(&self) -> &'static str;
}
