// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! CryptoAPIs integration
//!
//! This module provides an implementation of the `ApiClient` trait for the CryptoAPIs
//! blockchain info endpoint (`/v1/bc/{blockchain}/{network}/info`), which reports the
//! current difficulty and height of a chain.

use std::time::{Duration, Instant};

use api_client::{ApiClient, ApiError, HealthStatus, MetricQuery, MetricReading};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use shared_types::{Blockchain, Endpoint, Network};
use thiserror::Error;
use tokio::time::timeout;
use tracing::{debug, info, warn};
use url::Url;

const DEFAULT_CRYPTOAPIS_BASE_URL: &str = "https://api.cryptoapis.io";
const DEFAULT_CRYPTOAPIS_TIMEOUT_SECONDS: u64 = 20;
const DEFAULT_CRYPTOAPIS_HEALTH_CHECK_TIMEOUT_SECONDS: u64 = 5;
const API_KEY_HEADER: &str = "X-API-Key";
const RATE_LIMIT_RETRY_AFTER_SECONDS: u64 = 1;

// Field locations of each metric in the info payload; UTXO chains report the
// height as `blocks`, account chains as `height`.
const DIFFICULTY_PATHS: &[&[&str]] = &[&["payload", "difficulty"]];
const HEIGHT_PATHS: &[&[&str]] = &[&["payload", "blocks"], &["payload", "height"]];

/// Configuration for the CryptoAPIs client
#[derive(Debug, Clone)]
pub struct CryptoApisConfig {
    /// Base URL of the CryptoAPIs service
    pub base_url: Url,
    /// API key sent in the `X-API-Key` header
    pub api_key: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// Health check timeout in seconds
    pub health_check_timeout_seconds: u64,
}

impl CryptoApisConfig {
    /// Create a configuration with default URL and timeouts for the given API key
    #[allow(clippy::missing_panics_doc)]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: Url::parse(DEFAULT_CRYPTOAPIS_BASE_URL)
                .expect("default CryptoAPIs URL is valid"),
            api_key: api_key.into(),
            timeout_seconds: DEFAULT_CRYPTOAPIS_TIMEOUT_SECONDS,
            health_check_timeout_seconds: DEFAULT_CRYPTOAPIS_HEALTH_CHECK_TIMEOUT_SECONDS,
        }
    }

    /// Point the client at a different base URL
    #[must_use]
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }
}

/// CryptoAPIs client implementation
#[derive(Debug)]
pub struct CryptoApisClient {
    client: Client,
    config: CryptoApisConfig,
}

/// Errors specific to the CryptoAPIs client
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum CryptoApisError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    /// API returned an error response
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimited,

    /// Authentication failed
    #[error("Authentication failed with status {status}")]
    Unauthorized { status: u16 },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Timeout error
    #[error("Request timeout")]
    Timeout { seconds: u64 },
}

impl From<CryptoApisError> for ApiError {
    fn from(value: CryptoApisError) -> Self {
        match value {
            CryptoApisError::Http(error) => ApiError::Http {
                message: error.to_string(),
            },
            CryptoApisError::Json(error) => ApiError::InvalidResponse {
                message: error.to_string(),
            },
            CryptoApisError::ApiError { status, message } => {
                ApiError::UpstreamStatus { status, message }
            }
            CryptoApisError::RateLimited => ApiError::RateLimitExceeded {
                retry_after_seconds: RATE_LIMIT_RETRY_AFTER_SECONDS,
            },
            CryptoApisError::Unauthorized { status } => ApiError::Authentication {
                status,
                message: value.to_string(),
            },
            CryptoApisError::Config(message) => ApiError::Configuration { message },
            CryptoApisError::Timeout { seconds } => ApiError::Timeout {
                timeout_seconds: seconds,
            },
        }
    }
}

impl CryptoApisClient {
    /// Create a new CryptoAPIs client
    ///
    /// # Arguments
    ///
    /// * `config` - Configuration for the CryptoAPIs client
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is empty, the base URL cannot carry a
    /// path, or the HTTP client cannot be created
    pub fn new(config: CryptoApisConfig) -> Result<Self, CryptoApisError> {
        if config.api_key.trim().is_empty() {
            return Err(CryptoApisError::Config("API key cannot be empty".to_string()));
        }

        if config.base_url.cannot_be_a_base() {
            return Err(CryptoApisError::Config(format!(
                "Base URL cannot be used as a base: {}",
                config.base_url
            )));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("bc-info-adapter/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(CryptoApisError::Http)?;

        Ok(Self { client, config })
    }

    /// Build the info URL for a blockchain and network
    ///
    /// # Errors
    ///
    /// Returns `CryptoApisError::Config` if the base URL cannot carry a path
    pub fn info_url(
        &self,
        blockchain: Blockchain,
        network: Network,
    ) -> Result<Url, CryptoApisError> {
        let mut url = self.config.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| CryptoApisError::Config("Base URL cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend([
                "v1",
                "bc",
                blockchain.vendor_name(),
                network.as_str(),
                "info",
            ]);
        Ok(url)
    }

    /// Fetch the raw info document for a blockchain
    ///
    /// Performs exactly one request.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, times out, answers with a
    /// non-success status, or the body is not valid JSON
    pub async fn get_blockchain_info(
        &self,
        blockchain: Blockchain,
        network: Network,
    ) -> Result<Value, CryptoApisError> {
        let url = self.info_url(blockchain, network)?;

        debug!(%url, %blockchain, %network, "fetching blockchain info from CryptoAPIs");

        let request = self
            .client
            .get(url)
            .header(API_KEY_HEADER, &self.config.api_key)
            .header("accept", "application/json");

        let response = timeout(
            Duration::from_secs(self.config.timeout_seconds),
            request.send(),
        )
        .await
        .map_err(|_| CryptoApisError::Timeout {
            seconds: self.config.timeout_seconds,
        })?
        .map_err(CryptoApisError::Http)?;

        let status = response.status();
        if status.is_success() {
            let text = response.text().await.map_err(CryptoApisError::Http)?;
            return serde_json::from_str(&text).map_err(CryptoApisError::Json);
        }

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(CryptoApisError::Unauthorized {
                status: status.as_u16(),
            }),
            StatusCode::TOO_MANY_REQUESTS => Err(CryptoApisError::RateLimited),
            status => {
                let error_text = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".to_string());
                let message = upstream_error_message(&error_text);
                warn!("CryptoAPIs error: {} - {}", status.as_u16(), message);
                Err(CryptoApisError::ApiError {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }

    /// Where a metric lives in the info payload
    fn result_paths(endpoint: Endpoint) -> &'static [&'static [&'static str]] {
        match endpoint {
            Endpoint::Difficulty => DIFFICULTY_PATHS,
            Endpoint::Height => HEIGHT_PATHS,
        }
    }
}

/// Pull `meta.error.message` out of a CryptoAPIs error body, falling back to the raw text
fn upstream_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| {
            value
                .pointer("/meta/error/message")
                .and_then(Value::as_str)
                .map(ToString::to_string)
        })
        .unwrap_or_else(|| body.to_string())
}

impl ApiClient for CryptoApisClient {
    async fn health_check(&self) -> Result<HealthStatus, ApiError> {
        let url = self.info_url(Blockchain::Bitcoin, Network::Mainnet)?;

        debug!(%url, "performing health check on CryptoAPIs");

        let request = self
            .client
            .get(url)
            .header(API_KEY_HEADER, &self.config.api_key)
            .header("accept", "application/json");

        let start_time = Instant::now();
        let response = timeout(
            Duration::from_secs(self.config.health_check_timeout_seconds),
            request.send(),
        )
        .await
        .map_err(|_| CryptoApisError::Timeout {
            seconds: self.config.health_check_timeout_seconds,
        })?
        .map_err(CryptoApisError::Http)?;

        let status = HealthStatus::from_http_status(response.status().as_u16());
        match &status {
            HealthStatus::Up => {
                info!("CryptoAPIs health check passed in {:?}", start_time.elapsed());
            }
            other => warn!("CryptoAPIs health check failed: {}", other.description()),
        }
        Ok(status)
    }

    async fn fetch_metric(&self, query: &MetricQuery) -> Result<MetricReading, ApiError> {
        let body = self
            .get_blockchain_info(query.blockchain, query.network)
            .await?;

        let reading = MetricReading::from_body(body, Self::result_paths(query.endpoint))?;
        debug!(%query, value = %reading.value, "extracted metric from CryptoAPIs");
        Ok(reading)
    }

    fn name(&self) -> &'static str {
        "cryptoapis"
    }
}
