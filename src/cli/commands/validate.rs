//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the Reportflow configuration file.

use crate::config::{load_config, NotificationBackend, StorageBackend};
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates before returning
        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration is valid");
                c
            }
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                return Ok(2); // Configuration error exit code
            }
        };

        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);

        match config.storage.backend {
            StorageBackend::Filesystem => {
                println!(
                    "  Storage: filesystem ({})",
                    config.storage.root.as_deref().unwrap_or("-")
                );
            }
            StorageBackend::Http => {
                println!(
                    "  Storage: http ({})",
                    config.storage.endpoint.as_deref().unwrap_or("-")
                );
            }
        }
        println!("  Converted Location: {}", config.storage.converted_location);
        println!(
            "  Archive Location: {}/{}",
            config.storage.archive_location, config.storage.archive_prefix
        );
        println!(
            "  Provision Pass-through: {}",
            config.routing.provision_passthrough
        );

        let provisioning = &config.provisioning;
        println!("  BI Endpoint: {}", provisioning.endpoint);
        println!(
            "  Account / Region: {} / {}",
            provisioning.account_id.as_deref().unwrap_or("-"),
            provisioning.region.as_deref().unwrap_or("-")
        );
        println!("  Dataset: {}", provisioning.dataset_id);
        println!("  Analysis: {}", provisioning.analysis_id);
        println!("  Dashboard: {}", provisioning.dashboard_id);
        println!("  Viewer: {}", provisioning.viewer_principal);

        let notification = &config.notification;
        match notification.backend {
            NotificationBackend::Http => println!(
                "  Notification: http ({})",
                notification.endpoint.as_deref().unwrap_or("-")
            ),
            NotificationBackend::Log => println!("  Notification: log"),
        }
        println!(
            "  Topic: {}",
            notification
                .topic_arn
                .as_deref()
                .unwrap_or(notification.topic_name.as_str())
        );
        println!();

        Ok(0)
    }
}
