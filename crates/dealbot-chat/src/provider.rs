//! Search provider client.
//!
//! The provider is any HTTP service answering `GET {base}/search?q=<query>`
//! with a JSON array of products. Tests substitute their own
//! [`SearchProvider`] implementations.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use dealbot_core::config::ProviderConfig;
use dealbot_core::types::Product;

use crate::error::ChatError;

/// Something that turns a query into a list of products.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<Product>, ChatError>;
}

/// HTTP client for the product search endpoint.
#[derive(Debug, Clone)]
pub struct HttpSearchProvider {
    client: Client,
    base_url: String,
}

impl HttpSearchProvider {
    /// Build a client against `base_url` with a per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ChatError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ChatError::Transport(e.to_string()))?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    pub fn from_config(config: &ProviderConfig) -> Result<Self, ChatError> {
        Self::new(&config.base_url, Duration::from_secs(config.timeout_secs))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl SearchProvider for HttpSearchProvider {
    async fn search(&self, query: &str) -> Result<Vec<Product>, ChatError> {
        let url = format!("{}/search", self.base_url);
        debug!(url = %url, query = %query, "Sending search request");

        // `query()` percent-encodes the value.
        let response = self
            .client
            .get(&url)
            .query(&[("q", query)])
            .send()
            .await
            .map_err(|e| ChatError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ChatError::Status(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ChatError::Transport(e.to_string()))?;
        let products: Vec<Product> =
            serde_json::from_slice(&body).map_err(|e| ChatError::Payload(e.to_string()))?;

        debug!(count = products.len(), "Search response decoded");
        Ok(products)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let provider =
            HttpSearchProvider::new("http://localhost:4000/", Duration::from_secs(1)).unwrap();
        assert_eq!(provider.base_url(), "http://localhost:4000");
    }

    #[test]
    fn test_from_config_uses_base_url() {
        let config = ProviderConfig {
            base_url: "http://deals.internal:8080".to_string(),
            timeout_secs: 3,
        };
        let provider = HttpSearchProvider::from_config(&config).unwrap();
        assert_eq!(provider.base_url(), "http://deals.internal:8080");
    }

    #[tokio::test]
    async fn test_unreachable_provider_is_transport_error() {
        // Port 9 (discard) on loopback is closed in test environments.
        let provider =
            HttpSearchProvider::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let err = provider.search("iphone").await.unwrap_err();
        assert!(matches!(err, ChatError::Transport(_)));
        assert!(err.is_provider_failure());
    }
}
