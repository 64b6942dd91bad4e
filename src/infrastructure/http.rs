//! HTTP client seam for the embedding provider

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::RetrievalError;

/// Trait for HTTP client operations (for mocking)
#[async_trait]
pub trait HttpClientTrait: Send + Sync + std::fmt::Debug {
    async fn post_json(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, RetrievalError>;
}

/// Real HTTP client using reqwest
///
/// Non-2xx responses surface as `Provider { status, body }`; timeouts
/// and connection failures as `ProviderUnavailable`. The request timeout
/// bounds every provider call made through this client.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new() -> Result<Self, RetrievalError> {
        Self::with_timeout(Duration::from_secs(30))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, RetrievalError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                RetrievalError::configuration(format!("failed to build HTTP client: {}", e))
            })?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClientTrait for HttpClient {
    async fn post_json(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, RetrievalError> {
        let mut request = self.client.post(url);

        for (key, value) in headers {
            request = request.header(key, value);
        }

        let response = request.json(body).send().await.map_err(|e| {
            RetrievalError::provider_unavailable(format!("request to {} failed: {}", url, e))
        })?;

        let status = response.status();

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(RetrievalError::provider(status.as_u16(), error_body));
        }

        response.json().await.map_err(|e| {
            RetrievalError::internal(format!("failed to parse provider response: {}", e))
        })
    }
}
