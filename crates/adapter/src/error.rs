// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Error handling module
//!
//! Error types for server operations and their HTTP response mapping. Job-level
//! failures never surface here; they are rendered as envelopes by the executor.

use std::net::SocketAddr;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::{executor::VALIDATION_ERROR_NAME, request::JobRunId, response::AdapterResponse};

/// Error types for server operations
#[derive(Error, Debug)]
pub enum ServerError {
    /// Configuration validation errors
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// Network binding errors
    #[error("Failed to bind to {address}: {source}")]
    Bind {
        /// Socket address that failed to bind
        address: SocketAddr,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// Server startup errors
    #[error("Server startup failed: {source}")]
    Startup {
        /// Underlying IO error
        source: std::io::Error,
    },

    /// Server shutdown errors
    #[error("Server shutdown failed: {source}")]
    Shutdown {
        /// Underlying IO error
        source: std::io::Error,
    },

    /// The request body could not be read as a job request
    #[error("Invalid JSON request: {message}")]
    JsonError {
        /// Detailed error message
        message: String,
    },
}

/// Result type for server operations
pub type ServerResult<T> = Result<T, ServerError>;

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        match &self {
            // The body never parsed, so there is no id to echo
            ServerError::JsonError { .. } => AdapterResponse::errored(
                JobRunId::default(),
                StatusCode::BAD_REQUEST.as_u16(),
                VALIDATION_ERROR_NAME,
                self.to_string(),
            )
            .into_response(),
            ServerError::Config { .. }
            | ServerError::Bind { .. }
            | ServerError::Startup { .. }
            | ServerError::Shutdown { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "error": self.to_string(),
                    "status": StatusCode::INTERNAL_SERVER_ERROR.as_u16()
                })),
            )
                .into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn json_error_renders_errored_envelope() {
        let response = ServerError::JsonError {
            message: "request body is empty".to_string(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["jobRunID"], "1");
        assert_eq!(body["status"], "errored");
        assert_eq!(body["statusCode"], 400);
        assert_eq!(body["error"]["name"], "ValidationError");
        assert_eq!(
            body["error"]["message"],
            "Invalid JSON request: request body is empty"
        );
    }

    #[tokio::test]
    async fn server_failures_are_internal_errors() {
        let response = ServerError::Config {
            message: "API key cannot be empty".to_string(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["status"], 500);
        assert!(
            body["error"]
                .as_str()
                .unwrap()
                .contains("API key cannot be empty")
        );
    }
}
