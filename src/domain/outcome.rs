//! Terminal result of a pipeline run and its process-boundary response

use super::artifact::StoredObjectRef;
use super::descriptors::DashboardDescriptor;
use super::errors::{ErrorKind, ReportflowError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Whether the run reached the end of provisioning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeStatus {
    Success,
    Failure,
}

impl fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => f.write_str("SUCCESS"),
            Self::Failure => f.write_str("FAILURE"),
        }
    }
}

/// Terminal value of one pipeline run
///
/// Computed before notification; the dispatcher reads it but never changes it.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub run_id: Uuid,
    pub status: OutcomeStatus,
    pub detail: String,
    pub error_kind: Option<ErrorKind>,
    pub source: Option<StoredObjectRef>,
    pub destination: Option<StoredObjectRef>,
    pub dashboard: Option<DashboardDescriptor>,
    pub finished_at: DateTime<Utc>,
}

impl PipelineOutcome {
    /// Successful run
    pub fn success(run_id: Uuid, detail: impl Into<String>) -> Self {
        Self {
            run_id,
            status: OutcomeStatus::Success,
            detail: detail.into(),
            error_kind: None,
            source: None,
            destination: None,
            dashboard: None,
            finished_at: Utc::now(),
        }
    }

    /// Failed run, described by the error that aborted it
    pub fn failure(run_id: Uuid, error: &ReportflowError) -> Self {
        Self {
            run_id,
            status: OutcomeStatus::Failure,
            detail: error.to_string(),
            error_kind: Some(error.kind()),
            source: None,
            destination: None,
            dashboard: None,
            finished_at: Utc::now(),
        }
    }

    pub fn with_source(mut self, source: StoredObjectRef) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_destination(mut self, destination: StoredObjectRef) -> Self {
        self.destination = Some(destination);
        self
    }

    pub fn with_dashboard(mut self, dashboard: DashboardDescriptor) -> Self {
        self.dashboard = Some(dashboard);
        self
    }

    pub fn is_success(&self) -> bool {
        self.status == OutcomeStatus::Success
    }

    /// Response returned to the trigger infrastructure
    pub fn response(&self) -> PipelineResponse {
        PipelineResponse::from(self)
    }
}

/// `{ statusCode, body }` returned at the process boundary
///
/// Internal error text is never exposed here, only a generic status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
}

impl PipelineResponse {
    pub fn ok() -> Self {
        Self {
            status_code: 200,
            body: "Success".to_string(),
        }
    }

    pub fn error() -> Self {
        Self {
            status_code: 500,
            body: "Error".to_string(),
        }
    }
}

impl From<&PipelineOutcome> for PipelineResponse {
    fn from(outcome: &PipelineOutcome) -> Self {
        match outcome.status {
            OutcomeStatus::Success => Self::ok(),
            OutcomeStatus::Failure => Self::error(),
        }
    }
}
