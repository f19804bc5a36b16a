//! Notification dispatcher
//!
//! Publishes exactly one message per pipeline run. Publishing is best
//! effort: failures are logged and never alter the outcome.

use crate::adapters::notification::NotificationPublisher;
use crate::config::NotificationConfig;
use crate::domain::ids::TopicArn;
use crate::domain::{PipelineOutcome, ProvisioningContext, ReportflowError, Result};
use std::fmt::Write as _;
use std::sync::Arc;

/// Topic, subject and message templates
#[derive(Debug, Clone)]
pub struct NotificationSettings {
    pub topic: TopicArn,
    pub subject: String,
    pub success_message: String,
    pub failure_message: String,
}

impl NotificationSettings {
    /// Resolves the topic ARN once, from `topic_arn` or from `topic_name`
    /// within the provisioning account and region
    pub fn from_config(config: &NotificationConfig, ctx: &ProvisioningContext) -> Result<Self> {
        let topic = match config.topic_arn.as_deref() {
            Some(arn) => TopicArn::new(arn).map_err(ReportflowError::Configuration)?,
            None => ctx
                .topic_arn(&config.topic_name)
                .map_err(|e| ReportflowError::Configuration(e.to_string()))?,
        };

        Ok(Self {
            topic,
            subject: config.subject.clone(),
            success_message: config.success_message.clone(),
            failure_message: config.failure_message.clone(),
        })
    }
}

/// Sends the completion message for a run
pub struct NotificationDispatcher {
    publisher: Arc<dyn NotificationPublisher>,
    settings: NotificationSettings,
}

impl NotificationDispatcher {
    pub fn new(publisher: Arc<dyn NotificationPublisher>, settings: NotificationSettings) -> Self {
        Self {
            publisher,
            settings,
        }
    }

    pub fn topic(&self) -> &TopicArn {
        &self.settings.topic
    }

    /// Publishes the outcome; errors are logged at `warn` and dropped
    pub async fn notify(&self, outcome: &PipelineOutcome) {
        let message = self.compose(outcome);
        let subject = Some(self.settings.subject.as_str()).filter(|s| !s.is_empty());

        match self
            .publisher
            .publish(&self.settings.topic, &message, subject)
            .await
        {
            Ok(receipt) => tracing::info!(
                topic = %self.settings.topic,
                message_id = %receipt.message_id,
                status = %outcome.status,
                "Notification published"
            ),
            Err(e) => tracing::warn!(
                topic = %self.settings.topic,
                error = %e,
                kind = %e.kind(),
                "Notification failed, outcome unchanged"
            ),
        }
    }

    /// Message body for an outcome
    ///
    /// Names the status, failure kind, source, destination and run id. The
    /// raw error detail is left out.
    pub fn compose(&self, outcome: &PipelineOutcome) -> String {
        let headline = if outcome.is_success() {
            &self.settings.success_message
        } else {
            &self.settings.failure_message
        };

        let mut message = format!("{headline}\n\nStatus: {}\n", outcome.status);
        if let Some(kind) = outcome.error_kind {
            let _ = writeln!(message, "Error kind: {kind}");
        }
        if let Some(source) = &outcome.source {
            let _ = writeln!(message, "Source: {source}");
        }
        if let Some(destination) = &outcome.destination {
            let _ = writeln!(message, "Destination: {destination}");
        }
        if let Some(dashboard) = &outcome.dashboard {
            let _ = writeln!(message, "Dashboard: {}", dashboard.dashboard_id);
        }
        let _ = write!(message, "Run: {}", outcome.run_id);
        message
    }
}
