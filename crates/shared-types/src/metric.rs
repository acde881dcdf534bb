// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Metric and network enumerations

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Blockchain metric a job can request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Endpoint {
    /// Current mining difficulty
    #[default]
    Difficulty,
    /// Current block height
    Height,
}

/// Network of the blockchain to query
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// Production network
    #[default]
    Mainnet,
    /// Public test network
    Testnet,
}

/// Error returned when a metric or network name is not recognized
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[allow(missing_docs)]
pub enum MetricParseError {
    #[error("unsupported endpoint: {0} (expected one of: difficulty, height)")]
    Endpoint(String),

    #[error("unsupported network: {0} (expected one of: mainnet, testnet)")]
    Network(String),
}

impl Endpoint {
    /// Returns the lowercase wire name of the endpoint
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Difficulty => "difficulty",
            Self::Height => "height",
        }
    }

    /// Returns all supported endpoints
    pub const fn all() -> &'static [Self] {
        &[Self::Difficulty, Self::Height]
    }
}

impl Network {
    /// Returns the lowercase wire name of the network
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mainnet => "mainnet",
            Self::Testnet => "testnet",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Endpoint {
    type Err = MetricParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "difficulty" => Ok(Self::Difficulty),
            "height" => Ok(Self::Height),
            _ => Err(MetricParseError::Endpoint(s.to_string())),
        }
    }
}

impl FromStr for Network {
    type Err = MetricParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mainnet" => Ok(Self::Mainnet),
            "testnet" => Ok(Self::Testnet),
            _ => Err(MetricParseError::Network(s.to_string())),
        }
    }
}
