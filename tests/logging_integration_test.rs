//! Integration tests for logging functionality

use reportflow::config::{parse_config, LoggingConfig};
use reportflow::logging::init_logging;
use tempfile::TempDir;

#[test]
fn test_logging_config_default() {
    let config = LoggingConfig::default();
    assert!(!config.local_enabled);
    assert_eq!(config.local_rotation, "daily");
    assert!(!config.json_console);
}

#[test]
fn test_logging_section_rejects_unknown_rotation() {
    let toml_content = r#"
[storage]
backend = "filesystem"
root = "/tmp/reportflow-objects"
converted_location = "destination"
archive_location = "final"

[provisioning]
account_id = "123456789012"
region = "us-east-1"
endpoint = "https://bi.example.com"
viewer_principal = "arn:aws:quicksight:us-east-1:123456789012:user/default/viewer"

[logging]
local_rotation = "weekly"
"#;

    let err = parse_config(toml_content).unwrap_err().to_string();
    assert!(err.contains("local_rotation"));
}

// The global subscriber can only be installed once per process, so the
// file layer and the second-install failure are checked together.
#[test]
fn test_init_logging_with_file_layer() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("logs");

    let config = LoggingConfig {
        local_enabled: true,
        local_path: log_path.to_string_lossy().to_string(),
        local_rotation: "never".to_string(),
        json_console: true,
    };

    assert!(!log_path.exists());
    let guard = init_logging("debug", &config).unwrap();
    assert!(log_path.exists());
    assert!(log_path.join("reportflow.log").exists());

    assert!(init_logging("info", &LoggingConfig::default()).is_err());
    drop(guard);
}

#[test]
fn test_init_logging_rejects_invalid_level() {
    let result = init_logging("verbose", &LoggingConfig::default());
    assert!(result.is_err());
}
