// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Normalized response envelope
//!
//! Success:
//!
//! ```json
//! { "jobRunID": "1", "statusCode": 200, "result": 42, "data": { "payload": {}, "result": 42 } }
//! ```
//!
//! Failure:
//!
//! ```json
//! { "jobRunID": "1", "status": "errored", "statusCode": 400, "error": { "name": "ValidationError", "message": "..." } }
//! ```

use api_client::MetricReading;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use utoipa::ToSchema;

use crate::request::JobRunId;

const SUCCESS_STATUS: u16 = 200;
const ERRORED: &str = "errored";
const RESULT_FIELD: &str = "result";

/// Response to a job request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum AdapterResponse {
    /// The metric was retrieved
    Success(SuccessResponse),
    /// The job failed validation or the upstream call failed
    Errored(ErroredResponse),
}

/// Successful job result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SuccessResponse {
    /// Correlation id copied from the request
    #[serde(rename = "jobRunID")]
    #[schema(value_type = String, example = "1")]
    pub job_run_id: JobRunId,
    /// Always 200
    #[schema(example = 200)]
    pub status_code: u16,
    /// The requested metric
    #[schema(value_type = f64, example = 18_599_593_048_299.49)]
    pub result: Number,
    /// Upstream body with `result` duplicated into it
    #[schema(value_type = Object)]
    pub data: Map<String, Value>,
}

/// Failed job result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErroredResponse {
    /// Correlation id copied from the request, or the default
    #[serde(rename = "jobRunID")]
    #[schema(value_type = String, example = "1")]
    pub job_run_id: JobRunId,
    /// Always `errored`
    #[schema(example = "errored")]
    pub status: String,
    /// 400 for validation failures, the upstream status (or 500) otherwise
    #[schema(example = 400)]
    pub status_code: u16,
    /// What went wrong
    pub error: ErrorDetails,
}

/// Error kind and message of a failed job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetails {
    /// Error kind, `ValidationError` or `UpstreamError`
    pub name: String,
    /// Human-readable message
    pub message: String,
}

impl AdapterResponse {
    /// Build a success envelope from an upstream reading
    pub fn success(job_run_id: JobRunId, reading: MetricReading) -> Self {
        let MetricReading { value, mut body } = reading;
        body.insert(RESULT_FIELD.to_string(), Value::Number(value.clone()));

        Self::Success(SuccessResponse {
            job_run_id,
            status_code: SUCCESS_STATUS,
            result: value,
            data: body,
        })
    }

    /// Build a failure envelope
    pub fn errored(
        job_run_id: JobRunId,
        status_code: u16,
        name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Errored(ErroredResponse {
            job_run_id,
            status: ERRORED.to_string(),
            status_code,
            error: ErrorDetails {
                name: name.into(),
                message: message.into(),
            },
        })
    }

    /// Correlation id of the job
    pub fn job_run_id(&self) -> &JobRunId {
        match self {
            Self::Success(success) => &success.job_run_id,
            Self::Errored(errored) => &errored.job_run_id,
        }
    }

    /// HTTP-like status of the job
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Success(success) => success.status_code,
            Self::Errored(errored) => errored.status_code,
        }
    }

    /// The metric, when the job succeeded
    pub fn result(&self) -> Option<&Number> {
        match self {
            Self::Success(success) => Some(&success.result),
            Self::Errored(_) => None,
        }
    }

    /// Whether the job succeeded
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

impl IntoResponse for AdapterResponse {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn reading() -> MetricReading {
        MetricReading::from_body(
            json!({"payload": {"blocks": 663_913, "chain": "main"}}),
            &[&["payload", "blocks"]],
        )
        .unwrap()
    }

    #[test]
    fn success_duplicates_result_into_data() {
        let response = AdapterResponse::success(JobRunId::from("1"), reading());
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(
            value,
            json!({
                "jobRunID": "1",
                "statusCode": 200,
                "result": 663_913,
                "data": {
                    "payload": {"blocks": 663_913, "chain": "main"},
                    "result": 663_913
                }
            })
        );
        assert_eq!(value["result"], value["data"]["result"]);
        assert!(response.is_success());
    }

    #[test]
    fn errored_envelope_shape() {
        let response = AdapterResponse::errored(
            JobRunId::default(),
            400,
            "ValidationError",
            "missing required input: data",
        );

        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "jobRunID": "1",
                "status": "errored",
                "statusCode": 400,
                "error": {
                    "name": "ValidationError",
                    "message": "missing required input: data"
                }
            })
        );
        assert_eq!(response.result(), None);
    }

    #[test]
    fn deserializes_both_variants() {
        let success: AdapterResponse = serde_json::from_value(json!({
            "jobRunID": "9",
            "statusCode": 200,
            "result": 1.5,
            "data": {"result": 1.5}
        }))
        .unwrap();
        assert!(success.is_success());
        assert_eq!(success.job_run_id(), &JobRunId::from("9"));

        let errored: AdapterResponse = serde_json::from_value(json!({
            "jobRunID": 3,
            "status": "errored",
            "statusCode": 502,
            "error": {"name": "UpstreamError", "message": "bad gateway"}
        }))
        .unwrap();
        assert!(!errored.is_success());
        assert_eq!(errored.status_code(), 502);
    }

    #[test]
    fn into_response_uses_envelope_status() {
        let response =
            AdapterResponse::errored(JobRunId::default(), 503, "UpstreamError", "down")
                .into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let response = AdapterResponse::success(JobRunId::default(), reading()).into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
