//! REST object store client

use super::traits::ObjectStore;
use crate::config::StorageConfig;
use crate::domain::{Result, StorageError};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, StatusCode};
use secrecy::ExposeSecret;
use std::time::Duration;
use url::Url;

/// REST client for one bucket of the object store
pub struct RestObjectStore {
    base_url: Url,
    bucket: String,
    client: Client,
    auth_token: Option<String>,
}

impl RestObjectStore {
    /// Create a store client scoped to the given bucket
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client
    /// cannot be constructed.
    pub fn new(config: &StorageConfig, bucket: impl Into<String>) -> Result<Self> {
        let base_url = Url::parse(&config.api_base_url)
            .map_err(|e| StorageError::ConnectionFailed(format!("invalid base URL: {e}")))?;

        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| StorageError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            base_url,
            bucket: bucket.into(),
            client,
            auth_token: config
                .auth_token
                .as_ref()
                .map(|t| t.expose_secret().to_string()),
        })
    }

    /// URL for an object, with the name percent-encoded as one segment
    fn object_url(&self, name: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| StorageError::ConnectionFailed("base URL cannot be a base".to_string()))?
            .pop_if_empty()
            .push("b")
            .push(&self.bucket)
            .push("o")
            .push(name);
        Ok(url)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[async_trait]
impl ObjectStore for RestObjectStore {
    async fn fetch(&self, name: &str) -> Result<Vec<u8>> {
        let url = self.object_url(name)?;

        let response = self
            .authorize(self.client.get(url))
            .send()
            .await
            .map_err(|e| StorageError::ConnectionFailed(e.to_string()))?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(StorageError::NotFound(name.to_string()).into()),
            status if status.is_success() => {
                let bytes = response
                    .bytes()
                    .await
                    .map_err(|e| StorageError::ConnectionFailed(e.to_string()))?;
                Ok(bytes.to_vec())
            }
            status => {
                let message = response.text().await.unwrap_or_default();
                Err(StorageError::RequestFailed {
                    status: status.as_u16(),
                    message,
                }
                .into())
            }
        }
    }

    async fn store(&self, name: &str, bytes: Vec<u8>) -> Result<()> {
        let url = self.object_url(name)?;

        let response = self
            .authorize(self.client.put(url).body(bytes))
            .send()
            .await
            .map_err(|e| StorageError::ConnectionFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StorageError::RequestFailed {
                status: status.as_u16(),
                message,
            }
            .into());
        }

        Ok(())
    }

    fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(base_url: String) -> StorageConfig {
        StorageConfig {
            api_base_url: base_url,
            auth_token: None,
            bucket: "raw".to_string(),
            clean_destination_bucket: "clean".to_string(),
            timeout_seconds: 5,
        }
    }

    #[tokio::test]
    async fn test_fetch_object() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/b/raw/o/exports%2F2026-08-06%2Forders.csv")
            .with_status(200)
            .with_body("1,alice\n2,bob\n")
            .create_async()
            .await;

        let store = RestObjectStore::new(&test_config(server.url()), "raw").unwrap();
        let bytes = store.fetch("exports/2026-08-06/orders.csv").await.unwrap();

        assert_eq!(bytes, b"1,alice\n2,bob\n");
    }

    #[tokio::test]
    async fn test_fetch_missing_object_is_not_found() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/b/raw/o/missing.csv")
            .with_status(404)
            .create_async()
            .await;

        let store = RestObjectStore::new(&test_config(server.url()), "raw").unwrap();
        let err = store.fetch("missing.csv").await.unwrap_err();

        assert!(matches!(
            err,
            crate::domain::SluiceError::Storage(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_store_object() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", "/b/clean/o/csv%2Forders.csv")
            .match_body("cleaned")
            .with_status(200)
            .create_async()
            .await;

        let store = RestObjectStore::new(&test_config(server.url()), "clean").unwrap();
        store
            .store("csv/orders.csv", b"cleaned".to_vec())
            .await
            .unwrap();

        mock.assert_async().await;
    }
}
