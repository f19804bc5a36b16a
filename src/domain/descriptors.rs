//! BI resource descriptors

use super::artifact::StoredObjectRef;
use super::ids::{AnalysisId, DashboardId, DatasetId, ResourceArn};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Physical column type understood by the BI service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ColumnType {
    String,
    Decimal,
}

/// Column of a dataset's physical schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }
}

/// Physical schema matching [`HEADER`](crate::domain::artifact::HEADER)
pub fn report_columns() -> Vec<ColumnDef> {
    vec![
        ColumnDef::new("date", ColumnType::String),
        ColumnDef::new("product", ColumnType::String),
        ColumnDef::new("sales", ColumnType::Decimal),
    ]
}

/// Dataset backing the analysis and dashboard
///
/// Upserted against a fixed id on every successful run; never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetDescriptor {
    pub dataset_id: DatasetId,
    pub name: String,
    pub source: StoredObjectRef,
    pub columns: Vec<ColumnDef>,
}

/// Dashboard produced by a provisioning run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardDescriptor {
    pub dashboard_id: DashboardId,
    pub dataset_id: DatasetId,
    pub analysis_id: AnalysisId,
}

/// What an upsert call did to a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpsertOutcome {
    /// The resource was absent and has been created
    Created,
    /// The resource existed and has been updated in place
    Updated,
}

impl fmt::Display for UpsertOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => f.write_str("created"),
            Self::Updated => f.write_str("updated"),
        }
    }
}

/// Lifecycle of the fixed dataset as seen by the provisioner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetState {
    Absent,
    Created,
    Updated,
}

impl From<UpsertOutcome> for DatasetState {
    fn from(outcome: UpsertOutcome) -> Self {
        match outcome {
            UpsertOutcome::Created => Self::Created,
            UpsertOutcome::Updated => Self::Updated,
        }
    }
}

/// Resource that analyses and dashboards are built from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceEntity {
    pub dataset_arn: ResourceArn,
    /// Placeholder name the dataset is bound to inside the analysis
    pub placeholder: String,
}

/// Kind of BI resource a permission grant targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Dataset,
    Analysis,
    Dashboard,
}

impl ResourceKind {
    /// Path segment used by the BI REST API and in ARNs
    pub fn path_segment(&self) -> &'static str {
        match self {
            Self::Dataset => "data-sets",
            Self::Analysis => "analyses",
            Self::Dashboard => "dashboards",
        }
    }

    /// Resource type inside an ARN
    pub fn arn_type(&self) -> &'static str {
        match self {
            Self::Dataset => "dataset",
            Self::Analysis => "analysis",
            Self::Dashboard => "dashboard",
        }
    }
}
