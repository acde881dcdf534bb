// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Prometheus metrics module
//!
//! Provides global metrics using the default Prometheus registry via macros and
//! an Axum-compatible metrics handler.

use std::sync::LazyLock;

use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use prometheus::{
    Encoder, HistogramVec, IntCounterVec, TextEncoder, register_histogram_vec,
    register_int_counter_vec,
};
use tracing::error;

/// Label used for requests rejected before a metric was resolved
pub const UNRESOLVED_ENDPOINT: &str = "unresolved";

/// Total number of adapter jobs handled, labeled by `endpoint` and `status`.
pub static ADAPTER_REQUESTS: LazyLock<IntCounterVec> = LazyLock::new(|| {
    register_int_counter_vec!(
        "bc_info_adapter_requests_total",
        "Total number of adapter jobs, labeled by endpoint and status code",
        &["endpoint", "status"]
    )
    .expect("Failed to create bc_info_adapter_requests_total counter vec")
});

/// Histogram for upstream request durations in seconds.
pub static UPSTREAM_REQUEST_DURATION: LazyLock<HistogramVec> = LazyLock::new(|| {
    register_histogram_vec!(
        "bc_info_adapter_upstream_request_duration",
        "Upstream request durations in seconds",
        &["provider", "result"],
        vec![0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]
    )
    .expect("Failed to create upstream request duration histogram")
});

/// Count a handled job
///
/// # Arguments
/// * `endpoint` - The resolved metric, or [`UNRESOLVED_ENDPOINT`]
/// * `status` - The status code reported in the envelope
pub fn inc_adapter_requests(endpoint: &str, status: u16) {
    ADAPTER_REQUESTS
        .with_label_values(&[endpoint, &status.to_string()])
        .inc();
}

/// Observe the duration of an upstream request
///
/// # Arguments
/// * `provider` - The name of the upstream client
/// * `result` - `success` or `error`
/// * `duration_secs` - The duration of the request in seconds
pub fn observe_upstream_duration(provider: &str, result: &str, duration_secs: f64) {
    UPSTREAM_REQUEST_DURATION
        .with_label_values(&[provider, result])
        .observe(duration_secs);
}

/// Axum handler that exports metrics in Prometheus text format
pub async fn metrics_handler() -> Response {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = vec![];
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        error!("Failed to encode metrics: {}", e);
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, encoder.format_type().to_string())],
        buffer,
    )
        .into_response()
}
