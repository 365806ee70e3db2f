//! Client for the service's HTTP API.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::domain::{ErrorResponse, HealthResponse};

use super::error::SdkError;
use super::logger::Logger;

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    pub timeout: Duration,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
        }
    }
}

pub struct HttpClient {
    http_client: Client,
    base_url: String,
    logger: Arc<dyn Logger>,
}

impl HttpClient {
    pub fn new(
        base_url: impl Into<String>,
        config: HttpClientConfig,
        logger: Arc<dyn Logger>,
    ) -> Result<Self, SdkError> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| SdkError::Configuration(e.to_string()))?;
        let base_url: String = base_url.into();
        let base_url = base_url.trim_end_matches('/').to_string();
        Ok(Self {
            http_client,
            base_url,
            logger,
        })
    }

    pub fn with_defaults(
        base_url: impl Into<String>,
        logger: Arc<dyn Logger>,
    ) -> Result<Self, SdkError> {
        Self::new(base_url, HttpClientConfig::default(), logger)
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /healthz`
    pub async fn health(&self) -> Result<HealthResponse, SdkError> {
        self.get("/healthz").await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, SdkError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.http_client.get(&url).send().await.map_err(|e| {
            self.logger.error(&format!("GET {url} failed: {e}"));
            SdkError::Request(e.to_string())
        })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| {
            self.logger
                .error(&format!("Failed to read response body from {url}: {e}"));
            SdkError::Request(e.to_string())
        })?;

        if status.is_client_error() || status.is_server_error() {
            self.logger.warn(&format!("GET {url} returned {status}"));
            return Err(match serde_json::from_slice::<ErrorResponse>(&body) {
                Ok(err) => SdkError::Api {
                    status,
                    message: err.error,
                },
                Err(_) => SdkError::Http {
                    status,
                    body: String::from_utf8_lossy(&body).into_owned(),
                },
            });
        }

        serde_json::from_slice(&body).map_err(|e| SdkError::Decode(e.to_string()))
    }
}
