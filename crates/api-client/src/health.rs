// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Health status reported by API clients

use serde::{Deserialize, Serialize};

/// Health status of an upstream provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum HealthStatus {
    /// Provider answered normally
    Up,
    /// Provider answered but cannot serve requests reliably (rate limited, 5xx)
    Degraded { reason: String },
    /// Provider rejected us or could not be reached
    Down { reason: String },
}

impl HealthStatus {
    /// Human-readable description of the status
    pub fn description(&self) -> &str {
        match self {
            HealthStatus::Up => "Service is healthy",
            HealthStatus::Degraded { reason } | HealthStatus::Down { reason } => reason,
        }
    }

    /// Map an upstream HTTP status onto a health status
    pub fn from_http_status(status: u16) -> Self {
        match status {
            200..=299 => HealthStatus::Up,
            401 | 403 => HealthStatus::Down {
                reason: "Authentication failed".to_string(),
            },
            429 => HealthStatus::Degraded {
                reason: "Rate limited".to_string(),
            },
            other => HealthStatus::Degraded {
                reason: format!("API returned status {other}"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_http_status_mapping() {
        assert_eq!(HealthStatus::from_http_status(200), HealthStatus::Up);
        assert!(matches!(
            HealthStatus::from_http_status(401),
            HealthStatus::Down { .. }
        ));
        assert!(matches!(
            HealthStatus::from_http_status(403),
            HealthStatus::Down { .. }
        ));
        assert_eq!(
            HealthStatus::from_http_status(429).description(),
            "Rate limited"
        );
        assert_eq!(
            HealthStatus::from_http_status(503).description(),
            "API returned status 503"
        );
    }
}
