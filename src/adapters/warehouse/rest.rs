//! REST warehouse client
//!
//! Issues truncate-and-load jobs into a dataset and waits for them with a
//! fixed-interval status loop bounded by the configured wait ceiling.

use super::traits::{LoadJobRequest, WarehouseLoader};
use crate::config::WarehouseConfig;
use crate::domain::ids::LoadJobId;
use crate::domain::{Result, WarehouseError};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

/// REST client for the warehouse load API
pub struct RestWarehouseLoader {
    base_url: String,
    dataset: String,
    client: Client,
    auth_token: Option<String>,
    poll_interval: Duration,
    wait_timeout: Duration,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoadJobResponse {
    job_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JobStatusResponse {
    state: String,
    #[serde(default)]
    output_rows: Option<u64>,
    #[serde(default)]
    error_message: Option<String>,
}

impl RestWarehouseLoader {
    /// Create a loader client from warehouse configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &WarehouseConfig) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| WarehouseError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            dataset: config.dataset.clone(),
            client,
            auth_token: config
                .auth_token
                .as_ref()
                .map(|t| t.expose_secret().to_string()),
            poll_interval: Duration::from_secs(config.job_poll_interval_seconds),
            wait_timeout: Duration::from_secs(config.job_wait_timeout_seconds),
        })
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn job_status(&self, id: &LoadJobId) -> Result<JobStatusResponse> {
        let url = format!("{}/jobs/{}", self.base_url, id.as_str());

        let response = self
            .authorize(self.client.get(&url))
            .send()
            .await
            .map_err(|e| WarehouseError::ConnectionFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(WarehouseError::RequestFailed {
                status: status.as_u16(),
                message,
            }
            .into());
        }

        response
            .json()
            .await
            .map_err(|e| WarehouseError::InvalidResponse(e.to_string()).into())
    }
}

#[async_trait]
impl WarehouseLoader for RestWarehouseLoader {
    async fn start_load(&self, request: &LoadJobRequest) -> Result<LoadJobId> {
        let url = format!("{}/datasets/{}/loadJobs", self.base_url, self.dataset);

        let body = json!({
            "sourceUri": request.source_uri,
            "destinationTable": request.table,
            "schema": { "fields": request.schema },
            "writeDisposition": "WRITE_TRUNCATE",
            "skipLeadingRows": 0,
            "sourceFormat": "CSV",
        });

        let response = self
            .authorize(self.client.post(&url).json(&body))
            .send()
            .await
            .map_err(|e| WarehouseError::ConnectionFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(WarehouseError::RequestFailed {
                status: status.as_u16(),
                message,
            }
            .into());
        }

        let body: LoadJobResponse = response
            .json()
            .await
            .map_err(|e| WarehouseError::InvalidResponse(e.to_string()))?;

        Ok(LoadJobId::new(body.job_id))
    }

    async fn wait_for_load(&self, id: &LoadJobId) -> Result<u64> {
        let started = tokio::time::Instant::now();

        loop {
            let status = self.job_status(id).await?;

            match status.state.as_str() {
                "DONE" => {
                    if let Some(message) = status.error_message {
                        return Err(WarehouseError::JobFailed {
                            table: id.to_string(),
                            message,
                        }
                        .into());
                    }
                    return Ok(status.output_rows.unwrap_or(0));
                }
                "FAILED" => {
                    return Err(WarehouseError::JobFailed {
                        table: id.to_string(),
                        message: status
                            .error_message
                            .unwrap_or_else(|| "load job failed".to_string()),
                    }
                    .into());
                }
                _ => {}
            }

            if started.elapsed() >= self.wait_timeout {
                return Err(WarehouseError::WaitTimeout(id.to_string()).into());
            }

            tokio::time::sleep(self.poll_interval).await;
        }
    }
}
