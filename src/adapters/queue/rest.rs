//! REST queue publisher
//!
//! Publishes to a topic endpoint with the payload base64-encoded and the
//! attribute map alongside, returning the message ID the queue assigned.

use super::traits::QueuePublisher;
use crate::config::QueueConfig;
use crate::domain::ids::MessageId;
use crate::domain::{QueueError, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use reqwest::{Client, ClientBuilder};
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use std::time::Duration;

/// REST client publishing to one topic
pub struct RestQueuePublisher {
    base_url: String,
    topic: String,
    client: Client,
    auth_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PublishResponse {
    message_ids: Vec<String>,
}

impl RestQueuePublisher {
    /// Create a publisher scoped to the given topic
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &QueueConfig, topic: impl Into<String>) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| QueueError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            topic: topic.into(),
            client,
            auth_token: config
                .auth_token
                .as_ref()
                .map(|t| t.expose_secret().to_string()),
        })
    }

    /// Topic this publisher is bound to
    pub fn topic(&self) -> &str {
        &self.topic
    }
}

#[async_trait]
impl QueuePublisher for RestQueuePublisher {
    async fn publish(
        &self,
        payload: &[u8],
        attributes: &HashMap<String, String>,
    ) -> Result<MessageId> {
        let url = format!("{}/topics/{}:publish", self.base_url, self.topic);

        let body = json!({
            "messages": [{
                "data": general_purpose::STANDARD.encode(payload),
                "attributes": attributes,
            }]
        });

        let mut request = self.client.post(&url).json(&body);
        if let Some(token) = &self.auth_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| QueueError::ConnectionFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(QueueError::PublishFailed {
                status: status.as_u16(),
                message,
            }
            .into());
        }

        let body: PublishResponse = response
            .json()
            .await
            .map_err(|e| QueueError::InvalidResponse(e.to_string()))?;

        let id = body
            .message_ids
            .into_iter()
            .next()
            .ok_or_else(|| QueueError::InvalidResponse("empty messageIds".to_string()))?;

        Ok(MessageId::new(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(base_url: String) -> QueueConfig {
        QueueConfig {
            api_base_url: base_url,
            auth_token: None,
            timeout_seconds: 5,
        }
    }

    #[tokio::test]
    async fn test_publish_returns_message_id() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/topics/tables-list:publish")
            .match_body(mockito::Matcher::PartialJsonString(
                // "orders,customers" base64-encoded
                r#"{"messages": [{"data": "b3JkZXJzLGN1c3RvbWVycw==", "attributes": {"batch_no": "2"}}]}"#
                    .to_string(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"messageIds": ["981"]}"#)
            .create_async()
            .await;

        let publisher =
            RestQueuePublisher::new(&test_config(server.url()), "tables-list").unwrap();

        let mut attributes = HashMap::new();
        attributes.insert("batch_no".to_string(), "2".to_string());
        attributes.insert("max_batches".to_string(), "5".to_string());

        let id = publisher
            .publish(b"orders,customers", &attributes)
            .await
            .unwrap();

        assert_eq!(id.as_str(), "981");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_publish_failure_is_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/topics/tables-list:publish")
            .with_status(503)
            .with_body("unavailable")
            .create_async()
            .await;

        let publisher =
            RestQueuePublisher::new(&test_config(server.url()), "tables-list").unwrap();

        let err = publisher
            .publish(b"orders", &HashMap::new())
            .await
            .unwrap_err();

        assert!(err.to_string().contains("503"));
    }
}
