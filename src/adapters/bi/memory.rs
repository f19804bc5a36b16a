//! In-process BI service
//!
//! Records every resource and call so tests can assert on dataset state,
//! call ordering and grants. A single operation can be made to fail to
//! exercise partial-provisioning behaviour.

use super::traits::BiService;
use crate::domain::ids::{AnalysisId, DashboardId, PrincipalArn};
use crate::domain::{
    DatasetDescriptor, DatasetState, ProvisionError, ProvisioningContext, ReportflowError,
    ResourceKind, Result, SourceEntity, StoredObjectRef, UpsertOutcome,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// Operation of the BI API, used for call logs and failure injection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BiOperation {
    UpsertDataset,
    UpsertAnalysis,
    UpsertDashboard,
    GrantPermissions,
}

/// Permission grant recorded by [`MemoryBiService`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedGrant {
    pub kind: ResourceKind,
    pub resource_id: String,
    pub principal: String,
    pub actions: Vec<String>,
}

#[derive(Debug, Default)]
struct BiState {
    datasets: HashMap<String, (DatasetDescriptor, DatasetState)>,
    analyses: HashMap<String, SourceEntity>,
    dashboards: HashMap<String, SourceEntity>,
    grants: Vec<RecordedGrant>,
    calls: Vec<(BiOperation, String)>,
    fail_on: Option<BiOperation>,
}

/// Map-backed BI service
#[derive(Debug, Default)]
pub struct MemoryBiService {
    state: Mutex<BiState>,
    delay_ms: u64,
}

impl MemoryBiService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Service that sleeps before every call, for concurrency tests
    pub fn with_delay(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            ..Self::default()
        }
    }

    /// Makes every subsequent call of `operation` fail with a permission error
    pub fn fail_on(&self, operation: BiOperation) {
        if let Ok(mut state) = self.state.lock() {
            state.fail_on = Some(operation);
        }
    }

    /// Lifecycle state of a dataset id
    pub fn dataset_state(&self, dataset_id: &str) -> DatasetState {
        self.state
            .lock()
            .ok()
            .and_then(|s| s.datasets.get(dataset_id).map(|(_, state)| *state))
            .unwrap_or(DatasetState::Absent)
    }

    /// Artifact the dataset currently points at
    pub fn dataset_source(&self, dataset_id: &str) -> Option<StoredObjectRef> {
        self.state
            .lock()
            .ok()?
            .datasets
            .get(dataset_id)
            .map(|(descriptor, _)| descriptor.source.clone())
    }

    pub fn has_analysis(&self, analysis_id: &str) -> bool {
        self.state
            .lock()
            .map(|s| s.analyses.contains_key(analysis_id))
            .unwrap_or(false)
    }

    pub fn has_dashboard(&self, dashboard_id: &str) -> bool {
        self.state
            .lock()
            .map(|s| s.dashboards.contains_key(dashboard_id))
            .unwrap_or(false)
    }

    pub fn grants(&self) -> Vec<RecordedGrant> {
        self.state
            .lock()
            .map(|s| s.grants.clone())
            .unwrap_or_default()
    }

    /// Every call in the order it was received, with its resource id
    pub fn calls(&self) -> Vec<(BiOperation, String)> {
        self.state
            .lock()
            .map(|s| s.calls.clone())
            .unwrap_or_default()
    }

    /// Records the call and applies failure injection
    async fn enter(&self, operation: BiOperation, resource: String) -> Result<()> {
        if self.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
        }

        let mut state = self.lock()?;
        state.calls.push((operation, resource.clone()));
        if state.fail_on == Some(operation) {
            return Err(ProvisionError::PermissionDenied {
                resource,
                message: "injected failure".to_string(),
            }
            .into());
        }
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, BiState>> {
        self.state
            .lock()
            .map_err(|_| ReportflowError::Io("BI state lock poisoned".to_string()))
    }
}

fn upsert_into(
    map: &mut HashMap<String, SourceEntity>,
    id: &str,
    source: &SourceEntity,
) -> UpsertOutcome {
    match map.insert(id.to_string(), source.clone()) {
        Some(_) => UpsertOutcome::Updated,
        None => UpsertOutcome::Created,
    }
}

#[async_trait]
impl BiService for MemoryBiService {
    async fn upsert_dataset(
        &self,
        _ctx: &ProvisioningContext,
        dataset: &DatasetDescriptor,
    ) -> Result<UpsertOutcome> {
        let id = dataset.dataset_id.as_str();
        self.enter(BiOperation::UpsertDataset, format!("dataset/{id}"))
            .await?;

        let mut state = self.lock()?;
        let outcome = if state.datasets.contains_key(id) {
            UpsertOutcome::Updated
        } else {
            UpsertOutcome::Created
        };
        state
            .datasets
            .insert(id.to_string(), (dataset.clone(), DatasetState::from(outcome)));
        Ok(outcome)
    }

    async fn create_or_update_analysis(
        &self,
        _ctx: &ProvisioningContext,
        analysis_id: &AnalysisId,
        _name: &str,
        source: &SourceEntity,
    ) -> Result<UpsertOutcome> {
        self.enter(BiOperation::UpsertAnalysis, format!("analysis/{analysis_id}"))
            .await?;
        let mut state = self.lock()?;
        Ok(upsert_into(&mut state.analyses, analysis_id.as_str(), source))
    }

    async fn create_or_update_dashboard(
        &self,
        _ctx: &ProvisioningContext,
        dashboard_id: &DashboardId,
        _name: &str,
        source: &SourceEntity,
    ) -> Result<UpsertOutcome> {
        self.enter(BiOperation::UpsertDashboard, format!("dashboard/{dashboard_id}"))
            .await?;
        let mut state = self.lock()?;
        Ok(upsert_into(&mut state.dashboards, dashboard_id.as_str(), source))
    }

    async fn grant_permissions(
        &self,
        _ctx: &ProvisioningContext,
        kind: ResourceKind,
        resource_id: &str,
        principal: &PrincipalArn,
        actions: &[String],
    ) -> Result<()> {
        self.enter(
            BiOperation::GrantPermissions,
            format!("{}/{}", kind.arn_type(), resource_id),
        )
        .await?;

        let grant = RecordedGrant {
            kind,
            resource_id: resource_id.to_string(),
            principal: principal.to_string(),
            actions: actions.to_vec(),
        };
        let mut state = self.lock()?;
        if !state.grants.contains(&grant) {
            state.grants.push(grant);
        }
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
