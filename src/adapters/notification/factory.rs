//! Notification backend factory

use super::http::HttpPublisher;
use super::log::LogPublisher;
use super::traits::NotificationPublisher;
use crate::config::{NotificationBackend, NotificationConfig};
use crate::domain::Result;
use std::sync::Arc;

/// Create the notification publisher from configuration
pub fn create_publisher(config: &NotificationConfig) -> Result<Arc<dyn NotificationPublisher>> {
    match config.backend {
        NotificationBackend::Http => {
            tracing::info!(endpoint = ?config.endpoint, "Creating HTTP notification publisher");
            Ok(Arc::new(HttpPublisher::from_config(config)?))
        }
        NotificationBackend::Log => {
            tracing::info!("Notifications will be written to the log");
            Ok(Arc::new(LogPublisher::new()))
        }
    }
}
