//! Domain error types
//!
//! This module defines the error hierarchy for Reportflow. Every stage reports
//! its failure as a [`ReportflowError`]; the orchestrator maps it onto a
//! terminal [`PipelineOutcome`](crate::domain::PipelineOutcome).
//! No variant exposes a third-party type.

use std::fmt;
use thiserror::Error;

/// Main Reportflow error type
#[derive(Debug, Error)]
pub enum ReportflowError {
    /// The trigger payload is missing required fields or names an unusable key
    #[error("Malformed event: {0}")]
    MalformedEvent(String),

    /// The requested object does not exist in the storage backend
    #[error("Object not found: {0}")]
    NotFound(String),

    /// The storage backend refused the request
    #[error("Access denied: {0}")]
    Access(String),

    /// The source bytes are not UTF-8 JSON holding a top-level array
    #[error("Decode error: {0}")]
    Decode(String),

    /// A record lacks a required field or carries an unusable value
    #[error("Schema error at record {index}: {message}")]
    Schema { index: usize, message: String },

    /// A BI-service call failed
    #[error("Provisioning error: {0}")]
    Provision(#[from] ProvisionError),

    /// Publishing the completion message failed
    #[error("Notification error: {0}")]
    Notify(String),

    /// The storage backend could not be reached or answered unexpectedly
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Validation errors for identifiers and other typed values
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

impl ReportflowError {
    /// Stable taxonomy name for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MalformedEvent(_) => ErrorKind::MalformedEvent,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Access(_) => ErrorKind::Access,
            Self::Decode(_) => ErrorKind::Decode,
            Self::Schema { .. } => ErrorKind::Schema,
            Self::Provision(_) => ErrorKind::Provision,
            Self::Notify(_) => ErrorKind::Notify,
            Self::Storage(_) => ErrorKind::Storage,
            Self::Configuration(_) | Self::Validation(_) => ErrorKind::Configuration,
            Self::Serialization(_) | Self::Io(_) => ErrorKind::Internal,
        }
    }
}

/// Failure taxonomy reported in outcomes and notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MalformedEvent,
    NotFound,
    Access,
    Decode,
    Schema,
    Provision,
    Notify,
    Storage,
    Configuration,
    Internal,
}

impl ErrorKind {
    /// Name used in notification text and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MalformedEvent => "MalformedEventError",
            Self::NotFound => "NotFoundError",
            Self::Access => "AccessError",
            Self::Decode => "DecodeError",
            Self::Schema => "SchemaError",
            Self::Provision => "ProvisionError",
            Self::Notify => "NotifyError",
            Self::Storage => "StorageError",
            Self::Configuration => "ConfigurationError",
            Self::Internal => "InternalError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// BI-service errors
///
/// Each variant names the resource (`dataset/<id>`, `dashboard/<id>`, ...)
/// whose call failed. Previously created resources are left untouched.
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// The caller lacks permission for the operation
    #[error("Permission denied on {resource}: {message}")]
    PermissionDenied { resource: String, message: String },

    /// The service rejected the resource definition
    #[error("Invalid definition for {resource}: {message}")]
    InvalidDefinition { resource: String, message: String },

    /// Account quota or request rate exceeded
    #[error("Quota exceeded on {resource}: {message}")]
    QuotaExceeded { resource: String, message: String },

    /// The service could not be reached
    #[error("BI service unavailable for {resource}: {message}")]
    Unavailable { resource: String, message: String },

    /// The service answered with something we cannot interpret
    #[error("Unexpected response for {resource}: {status} - {message}")]
    UnexpectedResponse {
        resource: String,
        status: u16,
        message: String,
    },
}

impl From<std::io::Error> for ReportflowError {
    fn from(err: std::io::Error) -> Self {
        ReportflowError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ReportflowError {
    fn from(err: serde_json::Error) -> Self {
        ReportflowError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for ReportflowError {
    fn from(err: toml::de::Error) -> Self {
        ReportflowError::Configuration(format!("TOML parse error: {err}"))
    }
}

impl From<csv::Error> for ReportflowError {
    fn from(err: csv::Error) -> Self {
        ReportflowError::Serialization(format!("CSV encoding failed: {err}"))
    }
}
