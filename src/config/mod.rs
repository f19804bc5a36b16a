//! Configuration management for Reportflow.
//!
//! Reportflow reads a TOML file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `REPORTFLOW_<SECTION>_<KEY>` overrides
//! - Default values for optional settings
//! - Validation on load
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [storage]
//! backend = "filesystem"
//! root = "/var/lib/reportflow/objects"
//! converted_location = "destinationbucket"
//! archive_location = "finalbucket"
//! archive_prefix = "folder"
//!
//! [provisioning]
//! account_id = "123456789012"
//! region = "us-east-1"
//! endpoint = "https://bi.example.com"
//! token = "${REPORTFLOW_BI_TOKEN}"
//! viewer_principal = "arn:aws:quicksight:us-east-1:123456789012:user/default/viewer"
//!
//! [notification]
//! backend = "http"
//! endpoint = "https://notify.example.com"
//! topic_name = "report_topic"
//! ```
//!
//! # Sections
//!
//! - [`ApplicationConfig`] - log level
//! - [`StorageConfig`] - storage backend and destination locations
//! - [`RoutingConfig`] - pass-through provisioning choice
//! - [`ProvisioningConfig`] - BI service and fixed resource ids
//! - [`NotificationConfig`] - topic, subject and messages
//! - [`LoggingConfig`] - console and file logging

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::{load_config, parse_config};
pub use schema::{
    ApplicationConfig, LoggingConfig, NotificationBackend, NotificationConfig, ProvisioningConfig,
    ReportflowConfig, RoutingConfig, StorageBackend, StorageConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
