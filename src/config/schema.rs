//! Configuration schema types
//!
//! This module defines the configuration structure mapped from the TOML file.
//! Values stay plain strings here; [`crate::core`] turns them into typed
//! identifiers once at startup.

use crate::config::SecretString;
use serde::{Deserialize, Serialize};

/// Main Reportflow configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportflowConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Artifact storage backend and destination locations
    pub storage: StorageConfig,

    /// Routing decisions per source format
    #[serde(default)]
    pub routing: RoutingConfig,

    /// BI service connection and fixed resource identifiers
    pub provisioning: ProvisioningConfig,

    /// Completion notification settings
    #[serde(default)]
    pub notification: NotificationConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ReportflowConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.storage.validate()?;
        self.provisioning.validate()?;
        self.notification.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

/// Storage backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Locations are directories under `root`
    Filesystem,
    /// Object store reachable at `endpoint`
    Http,
}

/// Artifact storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Backend implementation
    pub backend: StorageBackend,

    /// Root directory (filesystem backend)
    #[serde(default)]
    pub root: Option<String>,

    /// Base URL (http backend)
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Bearer token (http backend)
    #[serde(default)]
    pub token: Option<SecretString>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Location receiving converted `.json` exports
    pub converted_location: String,

    /// Location receiving pass-through `.csv` artifacts
    pub archive_location: String,

    /// Key prefix for pass-through artifacts inside `archive_location`
    #[serde(default = "default_archive_prefix")]
    pub archive_prefix: String,
}

impl StorageConfig {
    fn validate(&self) -> Result<(), String> {
        match self.backend {
            StorageBackend::Filesystem => {
                if self.root.as_deref().map_or(true, |r| r.trim().is_empty()) {
                    return Err(
                        "storage.root is required when storage.backend = 'filesystem'".to_string(),
                    );
                }
            }
            StorageBackend::Http => validate_endpoint("storage.endpoint", self.endpoint.as_deref())?,
        }

        if self.timeout_seconds == 0 || self.timeout_seconds > 300 {
            return Err(format!(
                "storage.timeout_seconds must be between 1 and 300, got {}",
                self.timeout_seconds
            ));
        }

        for (name, value) in [
            ("storage.converted_location", &self.converted_location),
            ("storage.archive_location", &self.archive_location),
        ] {
            if value.trim().is_empty() {
                return Err(format!("{name} cannot be empty"));
            }
            if value.contains('/') {
                return Err(format!("{name} must not contain '/': {value}"));
            }
        }

        if self.archive_prefix.starts_with('/') || self.archive_prefix.contains("..") {
            return Err(format!(
                "storage.archive_prefix must be a relative key prefix, got '{}'",
                self.archive_prefix
            ));
        }

        Ok(())
    }
}

/// Routing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Provision the dashboard from pass-through `.csv` artifacts too
    #[serde(default = "default_true")]
    pub provision_passthrough: bool,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            provision_passthrough: true,
        }
    }
}

/// BI service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvisioningConfig {
    /// Account owning the BI resources (falls back to `AWS_ACCOUNT_ID`)
    #[serde(default)]
    pub account_id: Option<String>,

    /// Region of the BI service (falls back to `AWS_REGION`)
    #[serde(default)]
    pub region: Option<String>,

    /// Base URL of the BI REST API
    pub endpoint: String,

    /// Bearer token for the BI REST API
    #[serde(default)]
    pub token: Option<SecretString>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    #[serde(default = "default_dataset_id")]
    pub dataset_id: String,

    #[serde(default = "default_dataset_name")]
    pub dataset_name: String,

    #[serde(default = "default_analysis_id")]
    pub analysis_id: String,

    #[serde(default = "default_analysis_name")]
    pub analysis_name: String,

    #[serde(default = "default_dashboard_id")]
    pub dashboard_id: String,

    #[serde(default = "default_dashboard_name")]
    pub dashboard_name: String,

    /// Placeholder the dataset is bound to inside analysis and dashboard
    #[serde(default = "default_placeholder")]
    pub placeholder: String,

    /// Principal granted viewing permissions
    pub viewer_principal: String,

    /// Actions granted on the dashboard
    #[serde(default = "default_dashboard_actions")]
    pub dashboard_actions: Vec<String>,

    /// Actions granted on the analysis (empty = no analysis grant)
    #[serde(default)]
    pub analysis_actions: Vec<String>,
}

impl ProvisioningConfig {
    fn validate(&self) -> Result<(), String> {
        validate_endpoint("provisioning.endpoint", Some(self.endpoint.as_str()))?;

        if self.account_id.is_none() {
            return Err(
                "provisioning.account_id is required (or set AWS_ACCOUNT_ID)".to_string(),
            );
        }
        if self.region.is_none() {
            return Err("provisioning.region is required (or set AWS_REGION)".to_string());
        }

        if self.timeout_seconds == 0 || self.timeout_seconds > 300 {
            return Err(format!(
                "provisioning.timeout_seconds must be between 1 and 300, got {}",
                self.timeout_seconds
            ));
        }

        for (name, value) in [
            ("provisioning.dataset_name", &self.dataset_name),
            ("provisioning.analysis_name", &self.analysis_name),
            ("provisioning.dashboard_name", &self.dashboard_name),
            ("provisioning.placeholder", &self.placeholder),
        ] {
            if value.trim().is_empty() {
                return Err(format!("{name} cannot be empty"));
            }
        }

        if self.dashboard_actions.is_empty() {
            return Err("provisioning.dashboard_actions cannot be empty".to_string());
        }

        Ok(())
    }
}

/// Notification backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationBackend {
    /// Publish to the topic through the HTTP publish endpoint
    Http,
    /// Only emit a structured log event
    Log,
}

/// Notification configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    #[serde(default = "default_notification_backend")]
    pub backend: NotificationBackend,

    /// Publish endpoint (http backend)
    #[serde(default)]
    pub endpoint: Option<String>,

    #[serde(default)]
    pub token: Option<SecretString>,

    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Explicit topic ARN; derived from `topic_name` when absent
    #[serde(default)]
    pub topic_arn: Option<String>,

    #[serde(default = "default_topic_name")]
    pub topic_name: String,

    #[serde(default = "default_subject")]
    pub subject: String,

    #[serde(default = "default_success_message")]
    pub success_message: String,

    #[serde(default = "default_failure_message")]
    pub failure_message: String,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            backend: default_notification_backend(),
            endpoint: None,
            token: None,
            timeout_seconds: default_timeout_seconds(),
            topic_arn: None,
            topic_name: default_topic_name(),
            subject: default_subject(),
            success_message: default_success_message(),
            failure_message: default_failure_message(),
        }
    }
}

impl NotificationConfig {
    fn validate(&self) -> Result<(), String> {
        if self.backend == NotificationBackend::Http {
            validate_endpoint("notification.endpoint", self.endpoint.as_deref())?;
        }

        if self.topic_arn.is_none() && self.topic_name.trim().is_empty() {
            return Err(
                "notification.topic_name cannot be empty when topic_arn is not set".to_string(),
            );
        }

        // Subjects are limited to 100 characters by the publish API
        if self.subject.len() > 100 {
            return Err(format!(
                "notification.subject must be at most 100 characters, got {}",
                self.subject.len()
            ));
        }

        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Write JSON logs to rolling files under `local_path`
    #[serde(default)]
    pub local_enabled: bool,

    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Rotation policy (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,

    /// Emit console logs as JSON instead of plain text
    #[serde(default)]
    pub json_console: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
            json_console: false,
        }
    }
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local_enabled".to_string());
        }

        Ok(())
    }
}

fn validate_endpoint(name: &str, endpoint: Option<&str>) -> Result<(), String> {
    match endpoint {
        None | Some("") => Err(format!("{name} cannot be empty")),
        Some(url) if !url.starts_with("http://") && !url.starts_with("https://") => Err(format!(
            "{name} must start with http:// or https://, got '{url}'"
        )),
        Some(_) => Ok(()),
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_archive_prefix() -> String {
    "folder".to_string()
}

fn default_dataset_id() -> String {
    "report-dataset".to_string()
}

fn default_dataset_name() -> String {
    "ReportDataset".to_string()
}

fn default_analysis_id() -> String {
    "report-analysis".to_string()
}

fn default_analysis_name() -> String {
    "ReportAnalysis".to_string()
}

fn default_dashboard_id() -> String {
    "report-dashboard".to_string()
}

fn default_dashboard_name() -> String {
    "ReportDashboard".to_string()
}

fn default_placeholder() -> String {
    "ReportDataset".to_string()
}

fn default_dashboard_actions() -> Vec<String> {
    vec![
        "quicksight:DescribeDashboard".to_string(),
        "quicksight:ListDashboardVersions".to_string(),
        "quicksight:QueryDashboard".to_string(),
    ]
}

fn default_notification_backend() -> NotificationBackend {
    NotificationBackend::Log
}

fn default_topic_name() -> String {
    "report_topic".to_string()
}

fn default_subject() -> String {
    "Report Notification".to_string()
}

fn default_success_message() -> String {
    "A report has been generated in the final bucket!".to_string()
}

fn default_failure_message() -> String {
    "Report generation failed.".to_string()
}

fn default_local_path() -> String {
    "/var/log/reportflow".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
