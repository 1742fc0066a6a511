//! REST database admin client
//!
//! Concrete [`DatabaseAdmin`] implementation against the admin API the
//! source database exposes for instance-level operations. Exports are
//! triggered with a CSV export context and polled via the operations
//! endpoint.

use super::traits::{DatabaseAdmin, ExportRequest, ExportStart};
use crate::config::SourceConfig;
use crate::domain::ids::OperationId;
use crate::domain::operation::OperationStatus;
use crate::domain::{DatabaseError, Result};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, StatusCode};
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

/// REST client for the database admin API
pub struct RestDatabaseAdmin {
    base_url: String,
    client: Client,
    auth_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OperationResponse {
    name: String,
}

#[derive(Debug, Deserialize)]
struct OperationStatusResponse {
    status: String,
}

impl RestDatabaseAdmin {
    /// Create a new admin client from source configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &SourceConfig) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            base_url: config.admin_api_base_url.trim_end_matches('/').to_string(),
            client,
            auth_token: config
                .auth_token
                .as_ref()
                .map(|t| t.expose_secret().to_string()),
        })
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[async_trait]
impl DatabaseAdmin for RestDatabaseAdmin {
    async fn start_export(&self, request: &ExportRequest) -> Result<ExportStart> {
        let url = format!(
            "{}/instances/{}/export",
            self.base_url, request.instance
        );

        // The trigger is not idempotent, so it is never retried here; a
        // failed invocation is redelivered whole by the queue.
        let body = json!({
            "exportContext": {
                "fileType": "CSV",
                "uri": request.destination_uri,
                "csvExportOptions": {
                    "selectQuery": request.select_query,
                },
                "databases": [request.database],
            }
        });

        let response = self
            .authorize(self.client.post(&url).json(&body))
            .send()
            .await
            .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

        match response.status() {
            StatusCode::CONFLICT => {
                tracing::debug!(
                    instance = %request.instance,
                    "Export trigger returned conflict"
                );
                Ok(ExportStart::Conflict)
            }
            status if status.is_success() => {
                let operation: OperationResponse = response
                    .json()
                    .await
                    .map_err(|e| DatabaseError::InvalidResponse(e.to_string()))?;
                let id = OperationId::new(operation.name)
                    .map_err(DatabaseError::InvalidResponse)?;
                Ok(ExportStart::Accepted(id))
            }
            status => {
                let message = response.text().await.unwrap_or_default();
                Err(DatabaseError::RequestFailed {
                    status: status.as_u16(),
                    message,
                }
                .into())
            }
        }
    }

    async fn operation_status(&self, id: &OperationId) -> Result<OperationStatus> {
        let url = format!("{}/operations/{}", self.base_url, id.as_str());

        let response = self
            .authorize(self.client.get(&url))
            .send()
            .await
            .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(DatabaseError::RequestFailed {
                status: status.as_u16(),
                message,
            }
            .into());
        }

        let body: OperationStatusResponse = response
            .json()
            .await
            .map_err(|e| DatabaseError::InvalidResponse(e.to_string()))?;

        Ok(OperationStatus::from_wire(&body.status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(base_url: String) -> SourceConfig {
        SourceConfig {
            instance: "prod-db".to_string(),
            database: "shop".to_string(),
            admin_api_base_url: base_url,
            auth_token: None,
            timeout_seconds: 5,
            max_connections: 1,
            connection_timeout_seconds: 5,
        }
    }

    fn sample_request() -> ExportRequest {
        ExportRequest {
            instance: "prod-db".to_string(),
            database: "shop".to_string(),
            select_query: "SELECT * FROM `orders`;".to_string(),
            destination_uri: "shop-exports/exports/2026-08-06/orders.csv".to_string(),
        }
    }

    #[tokio::test]
    async fn test_start_export_accepted() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/instances/prod-db/export")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"name": "op-8254"}"#)
            .create_async()
            .await;

        let admin = RestDatabaseAdmin::new(&test_config(server.url())).unwrap();
        let start = admin.start_export(&sample_request()).await.unwrap();

        assert_eq!(
            start,
            ExportStart::Accepted(OperationId::new("op-8254").unwrap())
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_start_export_conflict_is_not_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/instances/prod-db/export")
            .with_status(409)
            .with_body(r#"{"error": "operation in progress"}"#)
            .create_async()
            .await;

        let admin = RestDatabaseAdmin::new(&test_config(server.url())).unwrap();
        let start = admin.start_export(&sample_request()).await.unwrap();

        assert_eq!(start, ExportStart::Conflict);
    }

    #[tokio::test]
    async fn test_start_export_server_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/instances/prod-db/export")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let admin = RestDatabaseAdmin::new(&test_config(server.url())).unwrap();
        let err = admin.start_export(&sample_request()).await.unwrap_err();

        assert!(err.to_string().contains("500"));
    }

    #[tokio::test]
    async fn test_operation_status_running() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/operations/op-8254")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"status": "RUNNING"}"#)
            .create_async()
            .await;

        let admin = RestDatabaseAdmin::new(&test_config(server.url())).unwrap();
        let status = admin
            .operation_status(&OperationId::new("op-8254").unwrap())
            .await
            .unwrap();

        assert_eq!(status, OperationStatus::Running);
    }

    #[tokio::test]
    async fn test_operation_status_unrecognized_maps_to_unknown() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/operations/op-1")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"status": "SOMETHING_NEW"}"#)
            .create_async()
            .await;

        let admin = RestDatabaseAdmin::new(&test_config(server.url())).unwrap();
        let status = admin
            .operation_status(&OperationId::new("op-1").unwrap())
            .await
            .unwrap();

        assert_eq!(status, OperationStatus::Unknown);
    }
}
