//! Publisher that only emits a structured log event

use super::traits::{NotificationPublisher, PublishReceipt};
use crate::domain::ids::TopicArn;
use crate::domain::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// Writes notifications to the log instead of a transport
#[derive(Debug, Default, Clone, Copy)]
pub struct LogPublisher;

impl LogPublisher {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl NotificationPublisher for LogPublisher {
    async fn publish(
        &self,
        topic: &TopicArn,
        message: &str,
        subject: Option<&str>,
    ) -> Result<PublishReceipt> {
        let message_id = Uuid::new_v4().to_string();
        tracing::info!(
            topic = %topic,
            subject = subject.unwrap_or_default(),
            message_id = %message_id,
            body = message,
            "Notification"
        );
        Ok(PublishReceipt { message_id })
    }

    fn backend_name(&self) -> &'static str {
        "log"
    }
}
