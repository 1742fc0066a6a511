//! REST secret store client
//!
//! Fetches the latest version of a named secret. Payloads travel
//! base64-encoded, as secret-manager APIs deliver them.

use super::traits::SecretProvider;
use crate::config::{secret_string, SecretString, SecretsConfig};
use crate::domain::{Result, SecretError};
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use reqwest::{Client, ClientBuilder, StatusCode};
use secrecy::ExposeSecret;
use serde::Deserialize;
use std::time::Duration;

/// REST client for the secret store
pub struct RestSecretProvider {
    base_url: String,
    client: Client,
    auth_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SecretPayload {
    data: String,
}

#[derive(Debug, Deserialize)]
struct SecretVersionResponse {
    payload: SecretPayload,
}

impl RestSecretProvider {
    /// Create a secret store client
    ///
    /// # Errors
    ///
    /// Returns an error if the secret store is not configured or the
    /// HTTP client cannot be constructed.
    pub fn new(config: &SecretsConfig) -> Result<Self> {
        if config.api_base_url.is_empty() {
            return Err(SecretError::ConnectionFailed(
                "secrets.api_base_url is not configured".to_string(),
            )
            .into());
        }

        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| SecretError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            client,
            auth_token: config
                .auth_token
                .as_ref()
                .map(|t| t.expose_secret().to_string()),
        })
    }
}

#[async_trait]
impl SecretProvider for RestSecretProvider {
    async fn fetch(&self, name: &str) -> Result<SecretString> {
        let url = format!(
            "{}/secrets/{}/versions/latest:access",
            self.base_url, name
        );

        let mut request = self.client.get(&url);
        if let Some(token) = &self.auth_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| SecretError::ConnectionFailed(e.to_string()))?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(SecretError::NotFound(name.to_string()).into()),
            status if status.is_success() => {
                let body: SecretVersionResponse = response
                    .json()
                    .await
                    .map_err(|_| SecretError::InvalidPayload(name.to_string()))?;

                let bytes = general_purpose::STANDARD
                    .decode(&body.payload.data)
                    .map_err(|_| SecretError::InvalidPayload(name.to_string()))?;

                let value = String::from_utf8(bytes)
                    .map_err(|_| SecretError::InvalidPayload(name.to_string()))?;

                Ok(secret_string(value))
            }
            status => {
                let message = response.text().await.unwrap_or_default();
                Err(SecretError::RequestFailed {
                    status: status.as_u16(),
                    message,
                }
                .into())
            }
        }
    }
}
