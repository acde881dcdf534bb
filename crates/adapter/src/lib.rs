// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Blockchain info adapter
//!
//! Accepts a job request naming a blockchain and a metric (difficulty or block
//! height), validates it, makes one call to the CryptoAPIs info endpoint and
//! answers with a normalized envelope echoing the job run id.
//!
//! # Module Structure
//!
//! - [`request`]: The raw, untrusted job request
//! - [`validator`]: Turns a request into [`validator::ValidatedParams`] or a 400
//! - [`executor`]: One upstream call per job, rendered into an [`AdapterResponse`]
//! - [`response`]: Success and errored envelopes
//! - [`config`]: Hierarchical configuration for the server and the upstream
//! - [`server`], [`routes`], [`state`]: The axum host with graceful shutdown
//! - [`metrics`]: Prometheus counters and histograms
//! - [`openapi`], [`docs`]: `OpenAPI` specification and Swagger UI

pub mod config;
pub mod docs;
pub mod error;
pub mod executor;
pub mod extractors;
pub mod metrics;
pub mod openapi;
pub mod request;
pub mod response;
pub mod routes;
pub mod server;
pub mod state;
pub mod validator;

pub use config::{CryptoApisSettings, Environment, ServerConfig, TimeoutSeconds};
pub use error::{ServerError, ServerResult};
pub use executor::{Executor, UpstreamError};
pub use request::{AdapterRequest, JobRunId};
pub use response::AdapterResponse;
pub use server::{Server, ShutdownConfig};
pub use state::{AdapterExecutor, HealthCheck, ServerState};
pub use validator::{ValidatedParams, ValidationError, validate};
