//! Notification transport abstraction

use crate::domain::ids::TopicArn;
use crate::domain::Result;
use async_trait::async_trait;

/// Acknowledgement of a published message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReceipt {
    pub message_id: String,
}

/// Publishes messages to a topic
#[async_trait]
pub trait NotificationPublisher: Send + Sync {
    /// Publishes one message
    ///
    /// # Errors
    ///
    /// Returns [`ReportflowError::Notify`](crate::domain::ReportflowError::Notify)
    /// when the transport rejects or cannot deliver the message.
    async fn publish(
        &self,
        topic: &TopicArn,
        message: &str,
        subject: Option<&str>,
    ) -> Result<PublishReceipt>;

    /// Short name of the backend, used in logs
    fn backend_name(&self) -> &'static str;
}
