//! In-process publisher recording every message

use super::traits::{NotificationPublisher, PublishReceipt};
use crate::domain::ids::TopicArn;
use crate::domain::{ReportflowError, Result};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Message captured by [`MemoryPublisher`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedMessage {
    pub topic: String,
    pub message: String,
    pub subject: Option<String>,
}

/// Publisher that keeps messages in memory and can be told to fail
#[derive(Debug, Default)]
pub struct MemoryPublisher {
    messages: Mutex<Vec<PublishedMessage>>,
    failing: AtomicBool,
}

impl MemoryPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publisher whose every publish attempt fails
    pub fn failing() -> Self {
        let publisher = Self::default();
        publisher.failing.store(true, Ordering::SeqCst);
        publisher
    }

    /// Messages published so far, in order
    pub fn messages(&self) -> Vec<PublishedMessage> {
        self.messages.lock().map(|m| m.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl NotificationPublisher for MemoryPublisher {
    async fn publish(
        &self,
        topic: &TopicArn,
        message: &str,
        subject: Option<&str>,
    ) -> Result<PublishReceipt> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(ReportflowError::Notify(format!("publish to {topic} rejected")));
        }

        let mut messages = self
            .messages
            .lock()
            .map_err(|_| ReportflowError::Notify("publisher lock poisoned".to_string()))?;
        messages.push(PublishedMessage {
            topic: topic.to_string(),
            message: message.to_string(),
            subject: subject.map(str::to_string),
        });

        Ok(PublishReceipt {
            message_id: format!("msg-{}", messages.len()),
        })
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
