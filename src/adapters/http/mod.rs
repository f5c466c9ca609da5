//! Reqwest HTTP Transport
//!
//! Production implementation of `HttpTransport`. One client is shared by all
//! exchange adapters; every request carries the configured timeout.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::ports::http::{HttpRequest, HttpTransport, TransportError};

/// Maximum number of body characters kept in status errors
const ERROR_BODY_LIMIT: usize = 200;

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Per-request timeout
    pub timeout: Duration,
    /// User-Agent header sent to exchanges
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
            user_agent: concat!("spread-scanner/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// `HttpTransport` backed by reqwest
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    config: HttpConfig,
    http: Client,
}

impl ReqwestTransport {
    /// Create a transport with default configuration
    pub fn new() -> Result<Self, TransportError> {
        Self::with_config(HttpConfig::default())
    }

    /// Create a transport with custom configuration
    pub fn with_config(config: HttpConfig) -> Result<Self, TransportError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| TransportError::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, http })
    }

    /// Configured per-request timeout
    pub fn timeout(&self) -> Duration {
        self.config.timeout
    }
}

fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout(err.to_string())
    } else {
        TransportError::Http(err.to_string())
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get_text(&self, request: &HttpRequest) -> Result<String, TransportError> {
        tracing::debug!(url = %request.url, query = ?request.query, "GET");

        let response = self
            .http
            .get(&request.url)
            .query(&request.query)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            let body: String = response
                .text()
                .await
                .unwrap_or_default()
                .chars()
                .take(ERROR_BODY_LIMIT)
                .collect();
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response.text().await.map_err(map_reqwest_error)
    }
}
