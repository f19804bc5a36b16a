//! Integration tests for configuration loading and validation
//!
//! Tests that modify environment variables hold `ENV_MUTEX` to avoid
//! interference between tests.

use reportflow::config::{load_config, NotificationBackend, StorageBackend};
use reportflow::core::pipeline::Pipeline;
use secrecy::ExposeSecret;
use std::io::Write;
use std::sync::Mutex;
use tempfile::NamedTempFile;

// Mutex to serialize tests that modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

const BASE_CONFIG: &str = r#"
[storage]
backend = "filesystem"
root = "/tmp/reportflow-objects"
converted_location = "destinationbucket"
archive_location = "finalbucket"

[provisioning]
account_id = "123456789012"
region = "us-east-1"
endpoint = "https://bi.example.com"
viewer_principal = "arn:aws:quicksight:us-east-1:123456789012:user/default/viewer"
"#;

/// Helper function to clean up environment variables
fn cleanup_env_vars() {
    for name in [
        "REPORTFLOW_APPLICATION_LOG_LEVEL",
        "REPORTFLOW_STORAGE_ROOT",
        "REPORTFLOW_ROUTING_PROVISION_PASSTHROUGH",
        "REPORTFLOW_LOGGING_LOCAL_ENABLED",
        "REPORTFLOW_PROVISIONING_DATASET_ID",
        "REPORTFLOW_PROVISIONING_REGION",
        "REPORTFLOW_NOTIFICATION_TOPIC_ARN",
        "TEST_REPORTFLOW_BI_TOKEN",
    ] {
        std::env::remove_var(name);
    }
}

fn write_config(contents: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(contents.as_bytes()).unwrap();
    temp_file.flush().unwrap();
    temp_file
}

#[test]
fn test_load_complete_config() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();
    std::env::set_var("TEST_REPORTFLOW_BI_TOKEN", "bi-secret");

    let toml_content = r#"
[application]
log_level = "debug"

[storage]
backend = "http"
endpoint = "https://objects.example.com"
timeout_seconds = 10
converted_location = "destinationbucket"
archive_location = "finalbucket"
archive_prefix = "reports/archive"

[routing]
provision_passthrough = false

[provisioning]
account_id = "123456789012"
region = "eu-west-1"
endpoint = "https://bi.example.com"
token = "${TEST_REPORTFLOW_BI_TOKEN}"
dataset_id = "sales-dataset"
dataset_name = "Sales"
analysis_id = "sales-analysis"
dashboard_id = "sales-dashboard"
placeholder = "Sales"
viewer_principal = "arn:aws:quicksight:eu-west-1:123456789012:user/default/viewer"
analysis_actions = ["quicksight:DescribeAnalysis"]

[notification]
backend = "http"
endpoint = "https://notify.example.com"
topic_name = "sales_topic"
subject = "Sales report"

[logging]
local_enabled = true
local_path = "/tmp/reportflow-logs"
local_rotation = "hourly"
json_console = true
"#;

    let temp_file = write_config(toml_content);
    let config = load_config(temp_file.path()).unwrap();

    assert_eq!(config.application.log_level, "debug");
    assert_eq!(config.storage.backend, StorageBackend::Http);
    assert_eq!(config.storage.timeout_seconds, 10);
    assert_eq!(config.storage.archive_prefix, "reports/archive");
    assert!(!config.routing.provision_passthrough);
    assert_eq!(config.provisioning.region.as_deref(), Some("eu-west-1"));
    assert_eq!(
        config
            .provisioning
            .token
            .as_ref()
            .map(|t| t.expose_secret().as_ref().to_string()),
        Some("bi-secret".to_string())
    );
    assert_eq!(config.provisioning.dataset_id, "sales-dataset");
    assert_eq!(config.provisioning.analysis_actions.len(), 1);
    assert_eq!(config.notification.backend, NotificationBackend::Http);
    assert_eq!(config.notification.subject, "Sales report");
    assert!(config.logging.json_console);

    cleanup_env_vars();
}

#[test]
fn test_defaults_applied() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let temp_file = write_config(BASE_CONFIG);
    let config = load_config(temp_file.path()).unwrap();

    assert_eq!(config.application.log_level, "info");
    assert_eq!(config.storage.archive_prefix, "folder");
    assert!(config.routing.provision_passthrough);
    assert_eq!(config.provisioning.dataset_id, "report-dataset");
    assert_eq!(config.provisioning.analysis_id, "report-analysis");
    assert_eq!(config.provisioning.dashboard_id, "report-dashboard");
    assert_eq!(config.notification.backend, NotificationBackend::Log);
    assert_eq!(config.notification.topic_name, "report_topic");
    assert!(!config.logging.local_enabled);
}

#[test]
fn test_env_overrides() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();
    std::env::set_var("REPORTFLOW_APPLICATION_LOG_LEVEL", "warn");
    std::env::set_var("REPORTFLOW_STORAGE_ROOT", "/srv/objects");
    std::env::set_var("REPORTFLOW_ROUTING_PROVISION_PASSTHROUGH", "false");
    std::env::set_var("REPORTFLOW_PROVISIONING_DATASET_ID", "override-dataset");
    std::env::set_var(
        "REPORTFLOW_NOTIFICATION_TOPIC_ARN",
        "arn:aws:sns:us-east-1:123456789012:override",
    );

    let temp_file = write_config(BASE_CONFIG);
    let config = load_config(temp_file.path()).unwrap();

    assert_eq!(config.application.log_level, "warn");
    assert_eq!(config.storage.root.as_deref(), Some("/srv/objects"));
    assert!(!config.routing.provision_passthrough);
    assert_eq!(config.provisioning.dataset_id, "override-dataset");
    assert_eq!(
        config.notification.topic_arn.as_deref(),
        Some("arn:aws:sns:us-east-1:123456789012:override")
    );

    cleanup_env_vars();
}

#[test]
fn test_non_boolean_override_rejected() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();
    std::env::set_var("REPORTFLOW_ROUTING_PROVISION_PASSTHROUGH", "False");

    let temp_file = write_config(BASE_CONFIG);
    let err = load_config(temp_file.path()).unwrap_err().to_string();
    assert!(err.contains("REPORTFLOW_ROUTING_PROVISION_PASSTHROUGH"));
    assert!(err.contains("'False'"));

    cleanup_env_vars();
    std::env::set_var("REPORTFLOW_LOGGING_LOCAL_ENABLED", "yes");
    assert!(load_config(temp_file.path()).is_err());

    cleanup_env_vars();
}

#[test]
fn test_missing_env_var_is_reported() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let contents = format!(
        "{BASE_CONFIG}\n[notification]\nbackend = \"http\"\nendpoint = \"https://n.example.com\"\ntoken = \"${{TEST_REPORTFLOW_BI_TOKEN}}\"\n"
    );
    let temp_file = write_config(&contents);

    let err = load_config(temp_file.path()).unwrap_err().to_string();
    assert!(err.contains("TEST_REPORTFLOW_BI_TOKEN"));
}

#[test]
fn test_invalid_configs_rejected() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    // Location names cannot carry a key path
    let contents = BASE_CONFIG.replace("\"destinationbucket\"", "\"destination/bucket\"");
    assert!(load_config(write_config(&contents).path()).is_err());

    // The http backend needs an endpoint
    let contents = BASE_CONFIG.replace("backend = \"filesystem\"", "backend = \"http\"");
    assert!(load_config(write_config(&contents).path()).is_err());

    // Unknown log level
    let contents = format!("[application]\nlog_level = \"verbose\"\n{BASE_CONFIG}");
    assert!(load_config(write_config(&contents).path()).is_err());

    // Not TOML at all
    assert!(load_config(write_config("this is not toml").path()).is_err());
}

#[test]
fn test_pipeline_from_config_rejects_bad_identifiers() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let temp_file = write_config(BASE_CONFIG);
    let config = load_config(temp_file.path()).unwrap();
    assert!(Pipeline::from_config(&config).is_ok());

    let mut bad = config.clone();
    bad.provisioning.dataset_id = "has spaces and / slashes".to_string();
    assert!(Pipeline::from_config(&bad).is_err());

    let mut bad = config;
    bad.notification.topic_name = "bad:topic".to_string();
    assert!(Pipeline::from_config(&bad).is_err());
}
