// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Generic API client traits and utilities for blockchain data providers
//!
//! This crate provides the abstraction the adapter executes against, so the
//! executor never depends on a concrete provider.
//!
//! # Core Abstractions
//!
//! - **`ApiClient` Trait**: Common interface for blockchain metric providers with async support
//! - **Health Check System**: Standardized health status reporting
//! - **Error Handling**: `ApiError` variants that keep the upstream status code when one exists
//! - **Data Types**: [`MetricQuery`] going out, [`MetricReading`] coming back

use thiserror::Error;

pub mod health;
pub mod types;

pub use health::*;
pub use types::*;

/// Status reported for upstream failures that carry no HTTP status of their own
pub const GENERIC_FAILURE_STATUS: u16 = 500;

/// Generic trait for blockchain data providers
///
/// Implementations perform exactly one outbound request per call and never
/// retry internally.
pub trait ApiClient: Send + Sync {
    /// Check the health of this API client
    ///
    /// # Errors
    ///
    /// Returns an error if the health check request cannot be performed
    fn health_check(&self) -> impl Future<Output = Result<HealthStatus, ApiError>> + Send;

    /// Fetch a single numeric metric for a blockchain
    ///
    /// # Arguments
    ///
    /// * `query` - Which blockchain, network and metric to fetch
    ///
    /// # Returns
    ///
    /// * `Ok(reading)` with the extracted value and the upstream body it came from
    /// * `Err(error)` if the request failed or the body carried no usable number
    ///
    /// # Errors
    ///
    /// Returns an error on network failure, timeout, a non-2xx reply, or a
    /// malformed body
    fn fetch_metric(
        &self,
        query: &MetricQuery,
    ) -> impl Future<Output = Result<MetricReading, ApiError>> + Send;

    /// Get the name/identifier of this API client
    fn name(&self) -> &'static str;
}

/// Common errors that can occur when working with API clients
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum ApiError {
    /// HTTP request failed before a response was received
    #[error("HTTP request failed: {message}")]
    Http { message: String },

    /// Rate limit exceeded
    #[error("Rate limit exceeded, retry after {retry_after_seconds} seconds")]
    RateLimitExceeded { retry_after_seconds: u64 },

    /// Authentication failed
    #[error("Authentication failed: {message}")]
    Authentication { status: u16, message: String },

    /// Invalid response format
    #[error("Invalid response format: {message}")]
    InvalidResponse { message: String },

    /// Upstream answered with a non-success status
    #[error("Upstream returned {status}: {message}")]
    UpstreamStatus { status: u16, message: String },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Network timeout
    #[error("Request timeout after {timeout_seconds} seconds")]
    Timeout { timeout_seconds: u64 },

    /// Client independent error
    #[error(transparent)]
    Custom { error: anyhow::Error },
}

impl ApiError {
    /// The upstream HTTP status, when the failure came with one
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            Self::RateLimitExceeded { .. } => Some(429),
            Self::Authentication { status, .. } | Self::UpstreamStatus { status, .. } => {
                Some(*status)
            }
            Self::Http { .. }
            | Self::InvalidResponse { .. }
            | Self::Configuration { .. }
            | Self::Timeout { .. }
            | Self::Custom { .. } => None,
        }
    }

    /// Status code to report to the caller for this failure
    pub fn status_code(&self) -> u16 {
        self.upstream_status().unwrap_or(GENERIC_FAILURE_STATUS)
    }
}
