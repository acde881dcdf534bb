// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! `OpenAPI` document for the adapter

use shared_types::{Blockchain, Endpoint, Network};
use utoipa::OpenApi;

use crate::{
    config::Environment,
    request::AdapterRequest,
    response::{AdapterResponse, ErrorDetails, ErroredResponse, SuccessResponse},
    routes::handlers,
    state::{HealthCheck, HealthStatus},
};

/// Generated `OpenAPI` specification
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "Blockchain Info Adapter",
        description = "Reports the current difficulty or block height of a blockchain, fetched from CryptoAPIs and wrapped in a job envelope."
    ),
    paths(handlers::adapter_handler, handlers::health_handler),
    components(schemas(
        AdapterRequest,
        Blockchain,
        Endpoint,
        Network,
        AdapterResponse,
        SuccessResponse,
        ErroredResponse,
        ErrorDetails,
        HealthCheck,
        HealthStatus,
        Environment
    )),
    tags(
        (name = "adapter", description = "Blockchain metric jobs"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;
