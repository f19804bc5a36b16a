//! Domain models and types for Reportflow.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`LocationId`], [`ObjectKey`], [`DatasetId`], ...)
//! - **Pipeline data contracts** ([`IngestionRequest`], [`TabularArtifact`],
//!   [`StoredObjectRef`], [`DatasetDescriptor`], [`DashboardDescriptor`])
//! - **Outcomes** ([`PipelineOutcome`], [`PipelineResponse`])
//! - **Error types** ([`ReportflowError`], [`ProvisionError`], [`ErrorKind`])
//!
//! # Type Safety
//!
//! Resource identifiers are newtypes validated once at startup:
//!
//! ```rust
//! use reportflow::domain::{DatasetId, DashboardId};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let dataset = DatasetId::new("sales-dataset")?;
//! let dashboard = DashboardId::new("sales-dashboard")?;
//!
//! // This won't compile - the ids are distinct types
//! // let wrong: DatasetId = dashboard;
//! # Ok(())
//! # }
//! ```

pub mod account;
pub mod artifact;
pub mod descriptors;
pub mod errors;
pub mod event;
pub mod ids;
pub mod outcome;
pub mod result;

pub use account::ProvisioningContext;
pub use artifact::{Row, SalesAmount, StoredObjectRef, TabularArtifact, HEADER};
pub use descriptors::{
    report_columns, ColumnDef, ColumnType, DashboardDescriptor, DatasetDescriptor, DatasetState,
    ResourceKind, SourceEntity, UpsertOutcome,
};
pub use errors::{ErrorKind, ProvisionError, ReportflowError};
pub use event::{IngestionRequest, SourceFormat, StorageEvent};
pub use ids::{
    AccountId, AnalysisId, DashboardId, DatasetId, LocationId, ObjectKey, PrincipalArn, Region,
    ResourceArn, TopicArn,
};
pub use outcome::{OutcomeStatus, PipelineOutcome, PipelineResponse};
pub use result::Result;
