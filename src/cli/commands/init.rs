//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "reportflow.toml")]
    pub output: String,

    /// Include example values and comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing Reportflow configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2); // Configuration error exit code
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Set account_id, region and viewer_principal under [provisioning]");
                println!("  3. Create a .env file with REPORTFLOW_BI_TOKEN if the BI endpoint needs one");
                println!("  4. Validate configuration: reportflow validate-config");
                println!("  5. Process an event: reportflow run --event event.json");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(5) // Fatal error exit code
            }
        }
    }

    /// Generate minimal configuration
    pub(crate) fn generate_minimal_config() -> String {
        r#"# Reportflow Configuration File
# JSON report conversion and dashboard provisioning

[application]
log_level = "info"

[storage]
backend = "filesystem"  # filesystem | http
root = "/var/lib/reportflow/objects"
converted_location = "destinationbucket"
archive_location = "finalbucket"
archive_prefix = "folder"

[routing]
provision_passthrough = true

[provisioning]
account_id = "123456789012"
region = "us-east-1"
endpoint = "https://bi.example.com"
viewer_principal = "arn:aws:quicksight:us-east-1:123456789012:user/default/viewer"

[notification]
backend = "log"  # http | log
topic_name = "report_topic"

[logging]
local_enabled = false
local_path = "/var/log/reportflow"
local_rotation = "daily"
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    pub(crate) fn generate_config_with_examples() -> String {
        r#"# Reportflow Configuration File
#
# This file contains all configuration options with examples and explanations.
#
# Values of the form ${VAR} are replaced from the environment when the file
# is loaded. Any key can also be overridden with REPORTFLOW_<SECTION>_<KEY>.

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# ============================================================================
# Storage Configuration
# ============================================================================
[storage]
# Backend: "filesystem" (locations are directories under root) or "http"
backend = "filesystem"
root = "/var/lib/reportflow/objects"

# HTTP object store (backend = "http")
# endpoint = "https://objects.example.com"
# token = "${REPORTFLOW_STORAGE_TOKEN}"

# Request timeout in seconds (1-300)
timeout_seconds = 30

# Converted CSV output is written here under the source key with .csv suffix
converted_location = "destinationbucket"

# Objects that already are CSV are copied here as <archive_prefix>/<file name>
archive_location = "finalbucket"
archive_prefix = "folder"

# ============================================================================
# Routing
# ============================================================================
[routing]
# Provision the dashboard for pass-through CSV objects as well
provision_passthrough = true

# ============================================================================
# BI Provisioning
# ============================================================================
[provisioning]
# Account and region; fall back to AWS_ACCOUNT_ID and AWS_REGION when unset
account_id = "123456789012"
region = "us-east-1"

# BI service endpoint and optional bearer token
endpoint = "https://bi.example.com"
# token = "${REPORTFLOW_BI_TOKEN}"
timeout_seconds = 30

# Fixed resource identifiers; every run updates the same resources
dataset_id = "report-dataset"
dataset_name = "ReportDataset"
analysis_id = "report-analysis"
analysis_name = "ReportAnalysis"
dashboard_id = "report-dashboard"
dashboard_name = "ReportDashboard"

# Placeholder name binding the dataset into the analysis and dashboard
placeholder = "ReportDataset"

# Principal granted read access to the dashboard
viewer_principal = "arn:aws:quicksight:us-east-1:123456789012:user/default/viewer"

dashboard_actions = [
    "quicksight:DescribeDashboard",
    "quicksight:ListDashboardVersions",
    "quicksight:QueryDashboard",
]

# Actions granted on the analysis (empty = no analysis grant)
analysis_actions = []

# ============================================================================
# Notification
# ============================================================================
[notification]
# Backend: "http" publishes to the topic, "log" only writes a log event
backend = "http"
endpoint = "https://notify.example.com"
# token = "${REPORTFLOW_NOTIFY_TOKEN}"

# Full topic ARN, or a topic name resolved against account and region
# topic_arn = "arn:aws:sns:us-east-1:123456789012:report_topic"
topic_name = "report_topic"

subject = "Report Notification"
success_message = "A report has been generated in the final bucket!"
failure_message = "Report generation failed."

# ============================================================================
# Logging Configuration
# ============================================================================
[logging]
# Enable JSON file logging
local_enabled = false
local_path = "/var/log/reportflow"

# Log rotation (daily, hourly, never)
local_rotation = "daily"

# Emit console logs as JSON
json_console = false
"#
        .to_string()
    }
}
