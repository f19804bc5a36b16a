//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::ReportflowConfig;
use super::secret::secret_string;
use crate::domain::errors::ReportflowError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (`${VAR}` syntax)
/// 3. Parses the TOML into [`ReportflowConfig`]
/// 4. Applies environment variable overrides (`REPORTFLOW_*` prefix, then
///    `AWS_ACCOUNT_ID` / `AWS_REGION` fallbacks)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns [`ReportflowError::Configuration`] if the file cannot be read,
/// a referenced variable is unset, parsing fails or validation fails.
///
/// # Examples
///
/// ```no_run
/// use reportflow::config::loader::load_config;
///
/// let config = load_config("reportflow.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<ReportflowConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ReportflowError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        ReportflowError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_config(&contents)
}

/// Parses, overrides and validates configuration from TOML text
pub fn parse_config(contents: &str) -> Result<ReportflowConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: ReportflowConfig = toml::from_str(&contents)
        .map_err(|e| ReportflowError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        ReportflowError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format `${VAR_NAME}`
///
/// Comment lines are copied verbatim so documented placeholders do not have
/// to be set.
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").map_err(|e| {
        ReportflowError::Configuration(format!("Invalid substitution pattern: {e}"))
    })?;
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    processed_line = processed_line.replace(&format!("${{{var_name}}}"), &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(ReportflowError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the `REPORTFLOW_` prefix
///
/// Variables follow `REPORTFLOW_<SECTION>_<KEY>`, e.g.
/// `REPORTFLOW_STORAGE_ROOT` or `REPORTFLOW_PROVISIONING_DATASET_ID`.
fn apply_env_overrides(config: &mut ReportflowConfig) -> Result<()> {
    let env = |name: &str| std::env::var(name).ok();

    // Application
    if let Some(val) = env("REPORTFLOW_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Storage
    if let Some(val) = env("REPORTFLOW_STORAGE_ROOT") {
        config.storage.root = Some(val);
    }
    if let Some(val) = env("REPORTFLOW_STORAGE_ENDPOINT") {
        config.storage.endpoint = Some(val);
    }
    if let Some(val) = env("REPORTFLOW_STORAGE_TOKEN") {
        config.storage.token = Some(secret_string(val));
    }
    if let Some(val) = env("REPORTFLOW_STORAGE_CONVERTED_LOCATION") {
        config.storage.converted_location = val;
    }
    if let Some(val) = env("REPORTFLOW_STORAGE_ARCHIVE_LOCATION") {
        config.storage.archive_location = val;
    }
    if let Some(val) = env("REPORTFLOW_STORAGE_ARCHIVE_PREFIX") {
        config.storage.archive_prefix = val;
    }

    // Routing
    if let Some(val) = env("REPORTFLOW_ROUTING_PROVISION_PASSTHROUGH") {
        config.routing.provision_passthrough =
            parse_bool_override("REPORTFLOW_ROUTING_PROVISION_PASSTHROUGH", &val)?;
    }

    // Provisioning
    if let Some(val) = env("REPORTFLOW_PROVISIONING_ACCOUNT_ID") {
        config.provisioning.account_id = Some(val);
    }
    if let Some(val) = env("REPORTFLOW_PROVISIONING_REGION") {
        config.provisioning.region = Some(val);
    }
    if let Some(val) = env("REPORTFLOW_PROVISIONING_ENDPOINT") {
        config.provisioning.endpoint = val;
    }
    if let Some(val) = env("REPORTFLOW_PROVISIONING_TOKEN") {
        config.provisioning.token = Some(secret_string(val));
    }
    if let Some(val) = env("REPORTFLOW_PROVISIONING_DATASET_ID") {
        config.provisioning.dataset_id = val;
    }
    if let Some(val) = env("REPORTFLOW_PROVISIONING_ANALYSIS_ID") {
        config.provisioning.analysis_id = val;
    }
    if let Some(val) = env("REPORTFLOW_PROVISIONING_DASHBOARD_ID") {
        config.provisioning.dashboard_id = val;
    }
    if let Some(val) = env("REPORTFLOW_PROVISIONING_VIEWER_PRINCIPAL") {
        config.provisioning.viewer_principal = val;
    }

    // Caller context fallbacks
    if config.provisioning.account_id.is_none() {
        config.provisioning.account_id = env("AWS_ACCOUNT_ID");
    }
    if config.provisioning.region.is_none() {
        config.provisioning.region = env("AWS_REGION").or_else(|| env("AWS_DEFAULT_REGION"));
    }

    // Notification
    if let Some(val) = env("REPORTFLOW_NOTIFICATION_ENDPOINT") {
        config.notification.endpoint = Some(val);
    }
    if let Some(val) = env("REPORTFLOW_NOTIFICATION_TOKEN") {
        config.notification.token = Some(secret_string(val));
    }
    if let Some(val) = env("REPORTFLOW_NOTIFICATION_TOPIC_ARN") {
        config.notification.topic_arn = Some(val);
    }

    // Logging
    if let Some(val) = env("REPORTFLOW_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled =
            parse_bool_override("REPORTFLOW_LOGGING_LOCAL_ENABLED", &val)?;
    }
    if let Some(val) = env("REPORTFLOW_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}

fn parse_bool_override(name: &str, val: &str) -> Result<bool> {
    val.parse().map_err(|_| {
        ReportflowError::Configuration(format!("{name} must be true or false, got '{val}'"))
    })
}
