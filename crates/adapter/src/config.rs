// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Server configuration module
//!
//! This module provides configuration structures and logic for the adapter server,
//! supporting different environments and validation of configuration parameters.

use std::{
    fmt,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::Path,
    time::Duration,
};

use anyhow::{Result, anyhow, ensure};
use config::{Config, ConfigError, Environment as ConfigEnv, File};
use external_apis::CryptoApisConfig;
use serde::{Deserialize, Deserializer, Serialize, de};
use url::Url;

use crate::error::{ServerError, ServerResult};

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_CRYPTOAPIS_BASE_URL: &str = "https://api.cryptoapis.io";
const API_KEY_ENV: &str = "API_KEY";
const DEFAULT_INBOUND_TIMEOUT_SECONDS: u64 = 30;
const DEFAULT_UPSTREAM_TIMEOUT_SECONDS: u64 = 20;
const DEFAULT_HEALTH_CHECK_TIMEOUT_SECONDS: u64 = 5;

/// A validated server port that ensures the value is appropriate for the environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ServerPort {
    port: u16,
    environment: Environment,
}

impl ServerPort {
    /// Create a new `ServerPort`, ensuring it's valid for the given environment
    ///
    /// # Errors
    ///
    /// Returns an error if the port is 0 in non-testing environments
    pub fn new(port: u16, environment: Environment) -> Result<Self> {
        if port == 0 && environment != Environment::Testing {
            return Err(anyhow!("port cannot be 0 in non-testing environments"));
        }
        Ok(Self { port, environment })
    }

    /// Default port for development
    pub const fn default_development() -> Self {
        Self {
            port: DEFAULT_PORT,
            environment: Environment::Development,
        }
    }

    /// Create a safe testing port (port 0)
    pub const fn testing() -> Self {
        Self {
            port: 0,
            environment: Environment::Testing,
        }
    }

    /// Get the port value
    pub fn value(&self) -> u16 {
        self.port
    }
}

impl<'de> Deserialize<'de> for ServerPort {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let port = u16::deserialize(deserializer)?;
        // Re-validated in `load_from` once the environment is known
        Ok(Self {
            port,
            environment: Environment::Development,
        })
    }
}

/// A validated timeout duration in seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeoutSeconds(Duration);

impl TimeoutSeconds {
    /// Create a new `TimeoutSeconds`, ensuring the value is within valid bounds
    ///
    /// # Errors
    ///
    /// Returns an error if timeout is 0 or greater than 300 seconds
    pub fn new(seconds: u64) -> Result<Self> {
        ensure!(seconds != 0, "timeout must be greater than 0");
        ensure!(seconds <= 300, "timeout cannot exceed 300");
        Ok(Self(Duration::from_secs(seconds)))
    }

    /// Create a safe default timeout (30 seconds)
    pub const fn default_value() -> Self {
        Self(Duration::from_secs(DEFAULT_INBOUND_TIMEOUT_SECONDS))
    }

    /// Create a safe testing timeout (5 seconds)
    pub const fn testing() -> Self {
        Self(Duration::from_secs(5))
    }

    /// Create a testing timeout for inbound requests (10 seconds)
    ///
    /// Leaves room for the [`TimeoutSeconds::testing`] upstream timeout.
    pub const fn testing_inbound() -> Self {
        Self(Duration::from_secs(10))
    }

    /// Get the timeout value
    pub fn value(&self) -> Duration {
        self.0
    }

    /// Get the timeout value in whole seconds
    pub fn as_secs(&self) -> u64 {
        self.0.as_secs()
    }
}

impl<'de> Deserialize<'de> for TimeoutSeconds {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let seconds = u64::deserialize(deserializer)?;
        Self::new(seconds).map_err(|e| de::Error::custom(e.to_string()))
    }
}

impl Default for TimeoutSeconds {
    fn default() -> Self {
        Self::default_value()
    }
}

/// Environment types for configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Production environment
    Production,
    /// Development environment
    Development,
    /// Testing environment
    Testing,
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Production => write!(f, "production"),
            Environment::Development => write!(f, "development"),
            Environment::Testing => write!(f, "testing"),
        }
    }
}

/// Upstream CryptoAPIs settings
#[derive(Clone, Serialize, Deserialize)]
pub struct CryptoApisSettings {
    /// Base URL of the CryptoAPIs service
    pub base_url: Url,
    /// API key; never serialized
    #[serde(default, skip_serializing)]
    pub api_key: String,
    /// Per-request timeout
    pub timeout_seconds: TimeoutSeconds,
    /// Health check timeout
    pub health_check_timeout_seconds: TimeoutSeconds,
}

impl fmt::Debug for CryptoApisSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CryptoApisSettings")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &"<redacted>")
            .field("timeout_seconds", &self.timeout_seconds)
            .field(
                "health_check_timeout_seconds",
                &self.health_check_timeout_seconds,
            )
            .finish()
    }
}

impl CryptoApisSettings {
    /// Client configuration for these settings
    pub fn client_config(&self) -> CryptoApisConfig {
        CryptoApisConfig {
            base_url: self.base_url.clone(),
            api_key: self.api_key.clone(),
            timeout_seconds: self.timeout_seconds.as_secs(),
            health_check_timeout_seconds: self.health_check_timeout_seconds.as_secs(),
        }
    }
}

/// Server configuration for different environments
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    pub host: IpAddr,
    /// Server port (validated for environment compatibility)
    pub port: ServerPort,
    /// Inbound request timeout in seconds (validated range: 1-300)
    ///
    /// Must exceed both upstream timeouts so that an upstream that hangs is
    /// reported as an errored job instead of a bare timeout.
    pub timeout_seconds: TimeoutSeconds,
    /// Environment type
    pub environment: Environment,
    /// Upstream provider settings
    pub cryptoapis: CryptoApisSettings,
}

impl Default for ServerConfig {
    #[allow(clippy::missing_panics_doc)]
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: ServerPort::default_development(),
            timeout_seconds: TimeoutSeconds::default(),
            environment: Environment::Development,
            cryptoapis: CryptoApisSettings {
                base_url: Url::parse(DEFAULT_CRYPTOAPIS_BASE_URL)
                    .expect("default CryptoAPIs URL is valid"),
                api_key: String::new(),
                timeout_seconds: TimeoutSeconds(Duration::from_secs(
                    DEFAULT_UPSTREAM_TIMEOUT_SECONDS,
                )),
                health_check_timeout_seconds: TimeoutSeconds(Duration::from_secs(
                    DEFAULT_HEALTH_CHECK_TIMEOUT_SECONDS,
                )),
            },
        }
    }
}

impl ServerConfig {
    /// Create configuration from environment variables and optional configuration files
    ///
    /// # Errors
    ///
    /// Returns `ServerError::Config` if configuration is invalid or cannot be loaded.
    pub fn from_env() -> ServerResult<Self> {
        Self::load().map_err(|e| ServerError::Config {
            message: format!("failed to load configuration: {e}"),
        })
    }

    /// Load configuration from the working directory
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if configuration cannot be loaded or is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Path::new("."))
    }

    /// Load configuration using the config crate with hierarchical sources
    ///
    /// Configuration is loaded in the following order (later sources override earlier ones):
    /// 1. Default values
    /// 2. Configuration file (`{dir}/config.json`)
    /// 3. Environment-specific file (`{dir}/config.{env}.json`)
    /// 4. Environment variables with `SERVER_` prefix, nested keys joined by `__`
    ///    (`SERVER_CRYPTOAPIS__TIMEOUT_SECONDS`)
    /// 5. `API_KEY`, overriding `cryptoapis.api_key`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if configuration cannot be loaded or is invalid.
    pub fn load_from(dir: &Path) -> Result<Self, ConfigError> {
        let env_var = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let mut config_builder = Config::builder()
            .set_default("host", DEFAULT_HOST)?
            .set_default("port", i64::from(DEFAULT_PORT))?
            .set_default("timeout_seconds", DEFAULT_INBOUND_TIMEOUT_SECONDS)?
            .set_default("environment", "development")?
            .set_default("cryptoapis.base_url", DEFAULT_CRYPTOAPIS_BASE_URL)?
            .set_default("cryptoapis.api_key", "")?
            .set_default("cryptoapis.timeout_seconds", DEFAULT_UPSTREAM_TIMEOUT_SECONDS)?
            .set_default(
                "cryptoapis.health_check_timeout_seconds",
                DEFAULT_HEALTH_CHECK_TIMEOUT_SECONDS,
            )?
            .add_source(File::from(dir.join("config.json")).required(false))
            .add_source(
                File::from(dir.join(format!("config.{}.json", env_var.to_lowercase())))
                    .required(false),
            )
            .add_source(
                ConfigEnv::with_prefix("SERVER")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        if std::env::var("ENVIRONMENT").is_ok() {
            config_builder = config_builder.set_override("environment", env_var.to_lowercase())?;
        }

        if let Ok(api_key) = std::env::var(API_KEY_ENV) {
            config_builder = config_builder.set_override("cryptoapis.api_key", api_key)?;
        }

        let config = config_builder.build()?;
        let mut server_config: Self = config.try_deserialize()?;

        server_config.port = ServerPort::new(server_config.port.value(), server_config.environment)
            .map_err(|e| ConfigError::Message(format!("invalid port configuration: {e}")))?;

        server_config
            .validate()
            .map_err(|e| ConfigError::Message(format!("invalid timeout configuration: {e}")))?;

        Ok(server_config)
    }

    /// Check that the inbound timeout outlasts every upstream call
    ///
    /// # Errors
    ///
    /// Returns an error if `timeout_seconds` is not strictly greater than
    /// `cryptoapis.timeout_seconds` and `cryptoapis.health_check_timeout_seconds`.
    pub fn validate(&self) -> Result<()> {
        let inbound = self.timeout_seconds.as_secs();
        let upstream = self.cryptoapis.timeout_seconds.as_secs();
        let health = self.cryptoapis.health_check_timeout_seconds.as_secs();

        ensure!(
            inbound > upstream,
            "timeout_seconds ({inbound}) must exceed cryptoapis.timeout_seconds ({upstream})"
        );
        ensure!(
            inbound > health,
            "timeout_seconds ({inbound}) must exceed cryptoapis.health_check_timeout_seconds ({health})"
        );
        Ok(())
    }

    /// Create configuration optimized for testing
    ///
    /// The upstream points at `base_url` with a placeholder key.
    pub fn for_testing(base_url: Url) -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: ServerPort::testing(),
            timeout_seconds: TimeoutSeconds::testing_inbound(),
            environment: Environment::Testing,
            cryptoapis: CryptoApisSettings {
                base_url,
                api_key: "test-api-key".to_string(),
                timeout_seconds: TimeoutSeconds::testing(),
                health_check_timeout_seconds: TimeoutSeconds::testing(),
            },
        }
    }

    /// Get socket address for binding
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port.value())
    }
}
