// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! HTTP request handlers module

use axum::{Json, extract::State};

use crate::{
    extractors::JsonExtractor,
    request::AdapterRequest,
    response::AdapterResponse,
    state::{HealthCheck, ServerState},
};

/// Health check endpoint handler
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    summary = "Health check endpoint",
    description = "Returns the current health status of the adapter including version, environment and the status of the CryptoAPIs upstream.",
    responses(
        (status = 200, description = "Health report", body = HealthCheck)
    )
)]
pub async fn health_handler(State(state): State<ServerState>) -> Json<HealthCheck> {
    Json(state.health_check().await)
}

/// Run an adapter job
///
/// Validates the job, performs a single upstream call and answers with the
/// normalized envelope. The HTTP status always equals the envelope's
/// `statusCode`. Bodies that are not JSON job requests are rejected by
/// [`JsonExtractor`] with an errored envelope and status 400.
#[utoipa::path(
    post,
    path = "/",
    tag = "adapter",
    summary = "Fetch a blockchain metric",
    description = "Returns the current difficulty or height of a blockchain. `data.blockchain` (alias `data.coin`) is required; `data.endpoint` defaults to `difficulty` and `data.network` to `mainnet`.",
    request_body = AdapterRequest,
    responses(
        (status = 200, description = "Metric retrieved", body = AdapterResponse),
        (status = 400, description = "Invalid job request", body = AdapterResponse),
        (status = 500, description = "Upstream failed without a status", body = AdapterResponse)
    )
)]
pub async fn adapter_handler(
    State(state): State<ServerState>,
    JsonExtractor(request): JsonExtractor<AdapterRequest>,
) -> AdapterResponse {
    state.executor().handle(&request).await
}
