// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Server state management module
//!
//! This module provides shared application state for the adapter server,
//! including configuration, the job executor, and coordinated cancellation.

use std::{collections::HashMap, sync::Arc};

use api_client::ApiClient;
use external_apis::CryptoApisClient;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use utoipa::ToSchema;

use crate::{
    config::{Environment, ServerConfig},
    executor::Executor,
};

/// Executor wired to the production upstream
pub type AdapterExecutor = Executor<CryptoApisClient>;

/// Shared application state with cancellation token support
#[derive(Debug, Clone)]
pub struct ServerState {
    /// Server configuration
    config: ServerConfig,
    /// Job executor
    executor: Arc<AdapterExecutor>,
    /// Cancellation token for coordinated shutdown
    pub cancellation_token: CancellationToken,
}

impl ServerState {
    /// Create new server state
    ///
    /// # Arguments
    ///
    /// * `config` - Server configuration
    /// * `executor` - Executor for adapter jobs
    /// * `cancellation_token` - Token for coordinated cancellation
    pub fn new(
        config: ServerConfig,
        executor: Arc<AdapterExecutor>,
        cancellation_token: CancellationToken,
    ) -> Self {
        Self {
            config,
            executor,
            cancellation_token,
        }
    }

    /// Server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Job executor
    pub fn executor(&self) -> &Arc<AdapterExecutor> {
        &self.executor
    }

    /// Report service health, including the upstream client's status
    ///
    /// The service is `Degraded` whenever the upstream is not `Up`.
    pub async fn health_check(&self) -> HealthCheck {
        let client = self.executor.client();
        let upstream = match client.health_check().await {
            Ok(status) => HealthStatus::from(status),
            Err(error) => HealthStatus::Down {
                reason: error.to_string().into_boxed_str(),
            },
        };

        let status = match &upstream {
            HealthStatus::Up => HealthStatus::Up,
            HealthStatus::Degraded { .. } | HealthStatus::Down { .. } => HealthStatus::Degraded {
                reason: Box::from("upstream is not fully available"),
            },
        };

        HealthCheck {
            status,
            version: Box::from(env!("CARGO_PKG_VERSION")),
            environment: self.config.environment,
            timestamp: chrono::Utc::now().to_rfc3339(),
            api_clients: HashMap::from([(client.name().to_string(), upstream)]),
        }
    }
}

/// Health status of a service or dependency
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub enum HealthStatus {
    /// Service is fully operational and responding normally
    Up,

    /// Service is not operational or has critical failures
    Down {
        /// Human-readable explanation of why the service is down
        reason: Box<str>,
    },

    /// Service is operational but experiencing performance issues or partial failures
    Degraded {
        /// Human-readable explanation of the degradation condition
        reason: Box<str>,
    },
}

impl From<api_client::HealthStatus> for HealthStatus {
    fn from(status: api_client::HealthStatus) -> Self {
        match status {
            api_client::HealthStatus::Up => Self::Up,
            api_client::HealthStatus::Degraded { reason } => Self::Degraded {
                reason: reason.into_boxed_str(),
            },
            api_client::HealthStatus::Down { reason } => Self::Down {
                reason: reason.into_boxed_str(),
            },
        }
    }
}

/// Health check status
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthCheck {
    /// Service status
    pub status: HealthStatus,
    /// Service version
    pub version: Box<str>,
    /// Environment
    pub environment: Environment,
    /// Timestamp
    pub timestamp: String,
    /// Status of the upstream API client
    #[schema(value_type = Object)]
    pub api_clients: HashMap<String, HealthStatus>,
}

#[cfg(test)]
mod tests {
    use external_apis::CryptoApisConfig;
    use url::Url;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path},
    };

    use super::*;

    fn state_for(base_url: &str, token: CancellationToken) -> ServerState {
        let config = ServerConfig::for_testing(Url::parse(base_url).unwrap());
        let client = CryptoApisClient::new(
            CryptoApisConfig::new("test-api-key").with_base_url(Url::parse(base_url).unwrap()),
        )
        .unwrap();
        ServerState::new(config, Arc::new(Executor::new(client)), token)
    }

    #[test]
    fn server_state_with_cancellation_token() {
        let token = CancellationToken::new();
        let state = state_for("http://127.0.0.1:1", token.clone());

        assert!(!state.cancellation_token.is_cancelled());

        token.cancel();
        assert!(state.cancellation_token.is_cancelled());
    }

    #[tokio::test]
    async fn health_reports_upstream_status() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/bc/btc/mainnet/info"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .mount(&mock_server)
            .await;

        let state = state_for(&mock_server.uri(), CancellationToken::new());
        let health = state.health_check().await;

        assert_eq!(health.status, HealthStatus::Up);
        assert_eq!(health.environment, Environment::Testing);
        assert_eq!(health.api_clients.get("cryptoapis"), Some(&HealthStatus::Up));
    }

    #[tokio::test]
    async fn rejected_key_degrades_service() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/bc/btc/mainnet/info"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&mock_server)
            .await;

        let state = state_for(&mock_server.uri(), CancellationToken::new());
        let health = state.health_check().await;

        assert!(matches!(health.status, HealthStatus::Degraded { .. }));
        assert!(matches!(
            health.api_clients.get("cryptoapis"),
            Some(HealthStatus::Down { .. })
        ));
    }
}
