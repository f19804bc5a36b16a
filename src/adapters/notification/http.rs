//! HTTP publish endpoint
//!
//! `POST {endpoint}/publish` with `{ TopicArn, Message, Subject? }`; the
//! response carries `{ MessageId }`.

use super::traits::{NotificationPublisher, PublishReceipt};
use crate::adapters::http_client::{build_client, join_url, with_bearer};
use crate::config::{NotificationConfig, SecretString};
use crate::domain::ids::TopicArn;
use crate::domain::{ReportflowError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct PublishRequest<'a> {
    topic_arn: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    subject: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PublishResponse {
    message_id: String,
}

/// Publisher backed by a REST endpoint
pub struct HttpPublisher {
    publish_url: String,
    client: Client,
    token: Option<SecretString>,
}

impl HttpPublisher {
    pub fn new(endpoint: &str, token: Option<SecretString>, timeout_seconds: u64) -> Result<Self> {
        Ok(Self {
            publish_url: join_url(endpoint, "publish"),
            client: build_client(timeout_seconds)?,
            token,
        })
    }

    pub fn from_config(config: &NotificationConfig) -> Result<Self> {
        let endpoint = config.endpoint.as_deref().ok_or_else(|| {
            ReportflowError::Configuration(
                "notification.endpoint is required for the http backend".to_string(),
            )
        })?;
        Self::new(endpoint, config.token.clone(), config.timeout_seconds)
    }
}

#[async_trait]
impl NotificationPublisher for HttpPublisher {
    async fn publish(
        &self,
        topic: &TopicArn,
        message: &str,
        subject: Option<&str>,
    ) -> Result<PublishReceipt> {
        let body = PublishRequest {
            topic_arn: topic.as_str(),
            message,
            subject,
        };

        let resp = with_bearer(self.client.post(&self.publish_url), self.token.as_ref())
            .json(&body)
            .send()
            .await
            .map_err(|e| ReportflowError::Notify(format!("publish to {topic} failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(ReportflowError::Notify(format!(
                "publish to {topic} failed with status {status}: {text}"
            )));
        }

        let parsed: PublishResponse = resp.json().await.map_err(|e| {
            ReportflowError::Notify(format!("invalid publish response from {topic}: {e}"))
        })?;

        Ok(PublishReceipt {
            message_id: parsed.message_id,
        })
    }

    fn backend_name(&self) -> &'static str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_request_omits_missing_subject() {
        let body = PublishRequest {
            topic_arn: "arn:aws:sns:us-east-1:1:t",
            message: "hello",
            subject: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["TopicArn"], "arn:aws:sns:us-east-1:1:t");
        assert!(json.get("Subject").is_none());
    }
}
