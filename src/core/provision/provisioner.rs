//! Dashboard provisioner
//!
//! For every stored artifact the fixed dataset is upserted to point at it,
//! then the analysis and dashboard are created or refreshed against the
//! dataset, and viewer permissions are granted. There is no rollback: a
//! failing call leaves earlier resources as they are.

use super::locks::ProvisionLocks;
use crate::adapters::bi::BiService;
use crate::config::ProvisioningConfig;
use crate::domain::ids::{AnalysisId, DashboardId, DatasetId, PrincipalArn};
use crate::domain::{
    report_columns, DashboardDescriptor, DatasetDescriptor, DatasetState, ProvisioningContext,
    ReportflowError, ResourceKind, Result, SourceEntity, StoredObjectRef,
};
use crate::log_stage_complete;
use std::sync::Arc;
use std::time::Instant;

/// Typed resource ids, names and grants for provisioning
#[derive(Debug, Clone)]
pub struct ProvisioningSettings {
    pub dataset_id: DatasetId,
    pub dataset_name: String,
    pub analysis_id: AnalysisId,
    pub analysis_name: String,
    pub dashboard_id: DashboardId,
    pub dashboard_name: String,
    pub placeholder: String,
    pub viewer_principal: PrincipalArn,
    pub dashboard_actions: Vec<String>,
    pub analysis_actions: Vec<String>,
}

impl ProvisioningSettings {
    /// Validates and types the configured identifiers
    pub fn from_config(config: &ProvisioningConfig) -> Result<Self> {
        let invalid = |e: String| ReportflowError::Configuration(e);
        Ok(Self {
            dataset_id: DatasetId::new(config.dataset_id.as_str()).map_err(invalid)?,
            dataset_name: config.dataset_name.clone(),
            analysis_id: AnalysisId::new(config.analysis_id.as_str()).map_err(invalid)?,
            analysis_name: config.analysis_name.clone(),
            dashboard_id: DashboardId::new(config.dashboard_id.as_str()).map_err(invalid)?,
            dashboard_name: config.dashboard_name.clone(),
            placeholder: config.placeholder.clone(),
            viewer_principal: PrincipalArn::new(config.viewer_principal.as_str())
                .map_err(invalid)?,
            dashboard_actions: config.dashboard_actions.clone(),
            analysis_actions: config.analysis_actions.clone(),
        })
    }
}

/// Creates or refreshes the BI resources for one artifact
pub struct DashboardProvisioner {
    service: Arc<dyn BiService>,
    context: ProvisioningContext,
    settings: ProvisioningSettings,
    locks: Arc<ProvisionLocks>,
}

impl DashboardProvisioner {
    pub fn new(
        service: Arc<dyn BiService>,
        context: ProvisioningContext,
        settings: ProvisioningSettings,
        locks: Arc<ProvisionLocks>,
    ) -> Self {
        Self {
            service,
            context,
            settings,
            locks,
        }
    }

    pub fn settings(&self) -> &ProvisioningSettings {
        &self.settings
    }

    /// Points the dataset at `source` and refreshes analysis and dashboard
    ///
    /// Runs are serialized per dataset id.
    ///
    /// # Errors
    ///
    /// Returns [`ReportflowError::Provision`] from the first failing BI call.
    pub async fn provision(&self, source: &StoredObjectRef) -> Result<DashboardDescriptor> {
        let started = Instant::now();
        let settings = &self.settings;
        let ctx = &self.context;

        let _guard = self.locks.acquire(&settings.dataset_id).await;

        let dataset = DatasetDescriptor {
            dataset_id: settings.dataset_id.clone(),
            name: settings.dataset_name.clone(),
            source: source.clone(),
            columns: report_columns(),
        };
        let dataset_outcome = self.service.upsert_dataset(ctx, &dataset).await?;
        tracing::info!(
            dataset_id = %settings.dataset_id,
            state = ?DatasetState::from(dataset_outcome),
            source = %source,
            "Dataset {}",
            dataset_outcome
        );

        let entity = SourceEntity {
            dataset_arn: ctx.dataset_arn(&settings.dataset_id)?,
            placeholder: settings.placeholder.clone(),
        };

        let analysis_outcome = self
            .service
            .create_or_update_analysis(
                ctx,
                &settings.analysis_id,
                &settings.analysis_name,
                &entity,
            )
            .await?;
        tracing::debug!(
            analysis_id = %settings.analysis_id,
            outcome = %analysis_outcome,
            "Analysis refreshed"
        );

        let dashboard_outcome = self
            .service
            .create_or_update_dashboard(
                ctx,
                &settings.dashboard_id,
                &settings.dashboard_name,
                &entity,
            )
            .await?;
        tracing::debug!(
            dashboard_id = %settings.dashboard_id,
            outcome = %dashboard_outcome,
            "Dashboard refreshed"
        );

        self.service
            .grant_permissions(
                ctx,
                ResourceKind::Dashboard,
                settings.dashboard_id.as_str(),
                &settings.viewer_principal,
                &settings.dashboard_actions,
            )
            .await?;

        if !settings.analysis_actions.is_empty() {
            self.service
                .grant_permissions(
                    ctx,
                    ResourceKind::Analysis,
                    settings.analysis_id.as_str(),
                    &settings.viewer_principal,
                    &settings.analysis_actions,
                )
                .await?;
        }

        log_stage_complete!(
            "provision",
            started.elapsed(),
            dashboard_id = %settings.dashboard_id
        );

        Ok(DashboardDescriptor {
            dashboard_id: settings.dashboard_id.clone(),
            dataset_id: settings.dataset_id.clone(),
            analysis_id: settings.analysis_id.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::bi::{BiOperation, MemoryBiService};
    use crate::domain::ids::{AccountId, LocationId, ObjectKey, Region};
    use crate::domain::ProvisionError;

    fn settings() -> ProvisioningSettings {
        ProvisioningSettings {
            dataset_id: DatasetId::new("report-dataset").unwrap(),
            dataset_name: "ReportDataset".to_string(),
            analysis_id: AnalysisId::new("report-analysis").unwrap(),
            analysis_name: "ReportAnalysis".to_string(),
            dashboard_id: DashboardId::new("report-dashboard").unwrap(),
            dashboard_name: "ReportDashboard".to_string(),
            placeholder: "ReportDataset".to_string(),
            viewer_principal: PrincipalArn::new(
                "arn:aws:quicksight:us-east-1:123456789012:user/default/viewer",
            )
            .unwrap(),
            dashboard_actions: vec!["quicksight:DescribeDashboard".to_string()],
            analysis_actions: Vec::new(),
        }
    }

    fn provisioner(service: Arc<MemoryBiService>) -> DashboardProvisioner {
        DashboardProvisioner::new(
            service,
            ProvisioningContext::new(
                AccountId::new("123456789012").unwrap(),
                Region::new("us-east-1").unwrap(),
            ),
            settings(),
            Arc::new(ProvisionLocks::new()),
        )
    }

    fn stored(key: &str) -> StoredObjectRef {
        StoredObjectRef::new(LocationId::new("destination").unwrap(), ObjectKey::new(key).unwrap())
    }

    #[tokio::test]
    async fn test_first_run_creates_then_updates() {
        let service = Arc::new(MemoryBiService::new());
        let provisioner = provisioner(service.clone());
        assert_eq!(service.dataset_state("report-dataset"), DatasetState::Absent);

        let descriptor = provisioner.provision(&stored("a.csv")).await.unwrap();
        assert_eq!(descriptor.dashboard_id.as_str(), "report-dashboard");
        assert_eq!(service.dataset_state("report-dataset"), DatasetState::Created);

        provisioner.provision(&stored("b.csv")).await.unwrap();
        assert_eq!(service.dataset_state("report-dataset"), DatasetState::Updated);
        assert_eq!(service.dataset_source("report-dataset"), Some(stored("b.csv")));
        assert_eq!(service.grants().len(), 1);
    }

    #[tokio::test]
    async fn test_call_order() {
        let service = Arc::new(MemoryBiService::new());
        provisioner(service.clone())
            .provision(&stored("a.csv"))
            .await
            .unwrap();

        let operations: Vec<BiOperation> = service.calls().into_iter().map(|(op, _)| op).collect();
        assert_eq!(
            operations,
            vec![
                BiOperation::UpsertDataset,
                BiOperation::UpsertAnalysis,
                BiOperation::UpsertDashboard,
                BiOperation::GrantPermissions,
            ]
        );
    }

    #[tokio::test]
    async fn test_failure_leaves_earlier_resources() {
        let service = Arc::new(MemoryBiService::new());
        service.fail_on(BiOperation::UpsertDashboard);

        let err = provisioner(service.clone())
            .provision(&stored("a.csv"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ReportflowError::Provision(ProvisionError::PermissionDenied { .. })
        ));
        assert_eq!(service.dataset_state("report-dataset"), DatasetState::Created);
        assert!(service.has_analysis("report-analysis"));
        assert!(!service.has_dashboard("report-dashboard"));
        assert!(service.grants().is_empty());
    }

    #[tokio::test]
    async fn test_analysis_grant_only_when_configured() {
        let service = Arc::new(MemoryBiService::new());
        let mut provisioner = provisioner(service.clone());
        provisioner.settings.analysis_actions = vec!["quicksight:DescribeAnalysis".to_string()];

        provisioner.provision(&stored("a.csv")).await.unwrap();

        let kinds: Vec<ResourceKind> = service.grants().into_iter().map(|g| g.kind).collect();
        assert_eq!(kinds, vec![ResourceKind::Dashboard, ResourceKind::Analysis]);
    }
}
