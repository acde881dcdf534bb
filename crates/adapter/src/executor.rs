// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Job execution
//!
//! The [`Executor`] turns validated parameters into exactly one upstream call and
//! wraps the outcome in an [`AdapterResponse`]. [`Executor::handle`] is the full
//! request path: validate, execute, render.

use std::time::Instant;

use api_client::{ApiClient, ApiError};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    metrics::{UNRESOLVED_ENDPOINT, inc_adapter_requests, observe_upstream_duration},
    request::{AdapterRequest, JobRunId},
    response::AdapterResponse,
    validator::{ValidatedParams, validate},
};

/// Error name reported for rejected requests
pub const VALIDATION_ERROR_NAME: &str = "ValidationError";
/// Error name reported for failed upstream calls
pub const UPSTREAM_ERROR_NAME: &str = "UpstreamError";

/// The upstream call failed
#[derive(Debug, Error)]
#[error("{source}")]
pub struct UpstreamError {
    /// Correlation id of the failed job
    pub job_run_id: JobRunId,
    /// What the client reported
    #[source]
    pub source: ApiError,
}

impl UpstreamError {
    /// The upstream status when there was one, 500 otherwise
    pub fn status_code(&self) -> u16 {
        self.source.status_code()
    }
}

/// Executes adapter jobs against an upstream client
#[derive(Debug)]
pub struct Executor<C> {
    client: C,
}

impl<C: ApiClient> Executor<C> {
    /// Create an executor for the given client
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// The upstream client
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Run one validated job
    ///
    /// Performs exactly one upstream request and never retries.
    ///
    /// # Errors
    ///
    /// Returns an [`UpstreamError`] on transport failure, timeout, a non-2xx
    /// upstream status, or a reply without a usable number.
    pub async fn execute(&self, params: &ValidatedParams) -> Result<AdapterResponse, UpstreamError> {
        let query = params.query();
        let provider = self.client.name();

        debug!(job_run_id = %params.job_run_id(), %query, provider, "executing job");

        let start = Instant::now();
        let outcome = self.client.fetch_metric(&query).await;
        let elapsed = start.elapsed().as_secs_f64();

        match outcome {
            Ok(reading) => {
                observe_upstream_duration(provider, "success", elapsed);
                Ok(AdapterResponse::success(params.job_run_id().clone(), reading))
            }
            Err(source) => {
                observe_upstream_duration(provider, "error", elapsed);
                Err(UpstreamError {
                    job_run_id: params.job_run_id().clone(),
                    source,
                })
            }
        }
    }

    /// Validate, execute and render a raw job request
    ///
    /// Never fails: every failure becomes an errored envelope.
    pub async fn handle(&self, request: &AdapterRequest) -> AdapterResponse {
        let params = match validate(request) {
            Ok(params) => params,
            Err(error) => {
                info!(job_run_id = %error.job_run_id, %error, "rejected job request");
                let response = AdapterResponse::errored(
                    error.job_run_id.clone(),
                    error.status_code(),
                    VALIDATION_ERROR_NAME,
                    error.to_string(),
                );
                inc_adapter_requests(UNRESOLVED_ENDPOINT, response.status_code());
                return response;
            }
        };

        let response = match self.execute(&params).await {
            Ok(response) => {
                info!(
                    job_run_id = %params.job_run_id(),
                    query = %params.query(),
                    "job completed"
                );
                response
            }
            Err(error) => {
                warn!(
                    job_run_id = %error.job_run_id,
                    query = %params.query(),
                    %error,
                    "upstream call failed"
                );
                AdapterResponse::errored(
                    error.job_run_id.clone(),
                    error.status_code(),
                    UPSTREAM_ERROR_NAME,
                    error.to_string(),
                )
            }
        };

        inc_adapter_requests(params.endpoint().as_str(), response.status_code());
        response
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use api_client::{HealthStatus, MetricQuery, MetricReading};
    use serde_json::{Value, json};

    use super::*;

    /// Client that answers from a canned body and counts calls
    struct StubClient {
        outcome: fn() -> Result<Value, ApiError>,
        calls: AtomicUsize,
    }

    impl StubClient {
        fn new(outcome: fn() -> Result<Value, ApiError>) -> Self {
            Self {
                outcome,
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl ApiClient for StubClient {
        async fn health_check(&self) -> Result<HealthStatus, ApiError> {
            Ok(HealthStatus::Up)
        }

        async fn fetch_metric(&self, query: &MetricQuery) -> Result<MetricReading, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let paths: &[&[&str]] = match query.endpoint {
                shared_types::Endpoint::Difficulty => &[&["payload", "difficulty"]],
                shared_types::Endpoint::Height => &[&["payload", "blocks"]],
            };
            MetricReading::from_body((self.outcome)()?, paths)
        }

        fn name(&self) -> &'static str {
            "stub"
        }
    }

    fn info_body() -> Result<Value, ApiError> {
        Ok(json!({"payload": {"difficulty": 18_599_593_048_299.49, "blocks": 663_913}}))
    }

    fn unavailable() -> Result<Value, ApiError> {
        Err(ApiError::UpstreamStatus {
            status: 503,
            message: "Service unavailable".to_string(),
        })
    }

    fn timed_out() -> Result<Value, ApiError> {
        Err(ApiError::Timeout { timeout_seconds: 30 })
    }

    fn request(value: Value) -> AdapterRequest {
        serde_json::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn id_not_supplied() {
        let executor = Executor::new(StubClient::new(info_body));
        let response = executor
            .handle(&request(json!({"data": {"blockchain": "BTC"}})))
            .await;

        assert_eq!(response.status_code(), 200);
        assert_eq!(response.job_run_id(), &JobRunId::default());
        assert!(response.result().unwrap().as_f64().unwrap() > 0.0);
    }

    #[tokio::test]
    async fn blockchain_and_coin_for_each_endpoint() {
        let executor = Executor::new(StubClient::new(info_body));
        for field in ["blockchain", "coin"] {
            for endpoint in ["difficulty", "height"] {
                let response = executor
                    .handle(&request(
                        json!({"id": "1", "data": {field: "BTC", "endpoint": endpoint}}),
                    ))
                    .await;

                assert_eq!(response.status_code(), 200, "{field}/{endpoint}");
                let value = serde_json::to_value(&response).unwrap();
                assert_eq!(value["jobRunID"], "1");
                assert!(value["result"].as_f64().unwrap() > 0.0);
                assert_eq!(value["result"], value["data"]["result"]);
            }
        }
        assert_eq!(executor.client().calls(), 4);
    }

    #[tokio::test]
    async fn validation_failures_make_no_upstream_call() {
        let executor = Executor::new(StubClient::new(info_body));
        let cases = [
            json!({}),
            json!({"data": {}}),
            json!({"id": "1", "data": {"blockchain": "not_real"}}),
        ];

        for case in cases {
            let response = executor.handle(&request(case.clone())).await;
            assert_eq!(response.status_code(), 400, "{case}");

            let value = serde_json::to_value(&response).unwrap();
            assert_eq!(value["status"], "errored");
            assert_eq!(value["error"]["name"], VALIDATION_ERROR_NAME);
            assert_eq!(value["jobRunID"], "1");
        }
        assert_eq!(executor.client().calls(), 0);
    }

    #[tokio::test]
    async fn upstream_status_is_reported() {
        let executor = Executor::new(StubClient::new(unavailable));
        let response = executor
            .handle(&request(json!({"id": "abc", "data": {"coin": "ETH"}})))
            .await;

        assert_eq!(response.status_code(), 503);
        assert_eq!(response.job_run_id(), &JobRunId::from("abc"));
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["error"]["name"], UPSTREAM_ERROR_NAME);
        assert_eq!(executor.client().calls(), 1);
    }

    #[tokio::test]
    async fn failures_without_status_report_500() {
        let executor = Executor::new(StubClient::new(timed_out));
        let params = validate(&request(json!({"data": {"coin": "LTC"}}))).unwrap();

        let error = executor.execute(&params).await.unwrap_err();
        assert_eq!(error.status_code(), 500);
        assert!(matches!(error.source, ApiError::Timeout { .. }));
    }

    #[tokio::test]
    async fn missing_result_field_is_an_upstream_error() {
        fn no_payload() -> Result<Value, ApiError> {
            Ok(json!({"meta": {}}))
        }

        let executor = Executor::new(StubClient::new(no_payload));
        let response = executor
            .handle(&request(json!({"data": {"blockchain": "BTC", "endpoint": "height"}})))
            .await;

        assert_eq!(response.status_code(), 500);
        assert!(!response.is_success());
    }
}
