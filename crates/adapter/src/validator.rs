// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Input validation for job requests
//!
//! [`validate`] is the single conversion from a raw [`AdapterRequest`] into
//! [`ValidatedParams`]. Defaults (`difficulty`, `mainnet`) are resolved here and
//! carried explicitly in the output, so nothing downstream applies hidden defaults.
//!
//! An unknown blockchain symbol is a validation failure (400), not an upstream
//! failure: the symbol table is consulted before any request is built.

use api_client::MetricQuery;
use serde_json::{Map, Value};
use shared_types::{Blockchain, BlockchainParseError, Endpoint, MetricParseError, Network};
use thiserror::Error;

use crate::request::{AdapterRequest, JobRunId};

/// HTTP-like status reported for every validation failure
pub const VALIDATION_ERROR_STATUS: u16 = 400;

const BLOCKCHAIN_FIELD: &str = "blockchain";
const COIN_FIELD: &str = "coin";
const ENDPOINT_FIELD: &str = "endpoint";
const NETWORK_FIELD: &str = "network";

/// Parameters of a request that passed validation
///
/// Only [`validate`] constructs this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedParams {
    job_run_id: JobRunId,
    blockchain: Blockchain,
    endpoint: Endpoint,
    network: Network,
}

impl ValidatedParams {
    /// Correlation id to echo in the response
    pub fn job_run_id(&self) -> &JobRunId {
        &self.job_run_id
    }

    /// Resolved blockchain
    pub fn blockchain(&self) -> Blockchain {
        self.blockchain
    }

    /// Resolved metric, `difficulty` when the request named none
    pub fn endpoint(&self) -> Endpoint {
        self.endpoint
    }

    /// Resolved network, `mainnet` when the request named none
    pub fn network(&self) -> Network {
        self.network
    }

    /// The outbound query for these parameters
    pub fn query(&self) -> MetricQuery {
        MetricQuery::new(self.blockchain, self.network, self.endpoint)
    }
}

/// A request rejected before any outbound call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}")]
pub struct ValidationError {
    /// Correlation id of the rejected request, or the default
    pub job_run_id: JobRunId,
    /// What was wrong with the request
    pub kind: ValidationErrorKind,
}

/// Reasons a request can fail validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[allow(missing_docs)]
pub enum ValidationErrorKind {
    #[error("request body is empty")]
    EmptyRequest,

    #[error("missing required input: data")]
    MissingData,

    #[error("data must be a JSON object")]
    DataNotAnObject,

    #[error("missing required input: blockchain (or its alias coin)")]
    MissingBlockchain,

    #[error("blockchain and coin are aliases, only one may be given")]
    AmbiguousBlockchain,

    #[error("{field} must be a string")]
    NotAString { field: &'static str },

    #[error(transparent)]
    UnsupportedBlockchain(#[from] BlockchainParseError),

    #[error(transparent)]
    UnsupportedMetric(#[from] MetricParseError),
}

impl ValidationError {
    /// Status code reported for this failure
    pub fn status_code(&self) -> u16 {
        VALIDATION_ERROR_STATUS
    }
}

/// Validate a raw request
///
/// # Errors
///
/// Returns a [`ValidationError`] when the payload is empty, `data` is missing or
/// not an object, neither or both of `blockchain`/`coin` are given, the symbol is
/// unsupported, or `endpoint`/`network` name an unsupported value.
pub fn validate(request: &AdapterRequest) -> Result<ValidatedParams, ValidationError> {
    let job_run_id = request.job_run_id();
    match resolve(request) {
        Ok((blockchain, endpoint, network)) => Ok(ValidatedParams {
            job_run_id,
            blockchain,
            endpoint,
            network,
        }),
        Err(kind) => Err(ValidationError { job_run_id, kind }),
    }
}

fn resolve(
    request: &AdapterRequest,
) -> Result<(Blockchain, Endpoint, Network), ValidationErrorKind> {
    if request.is_empty() {
        return Err(ValidationErrorKind::EmptyRequest);
    }

    let data = match &request.data {
        None | Some(Value::Null) => return Err(ValidationErrorKind::MissingData),
        Some(Value::Object(data)) => data,
        Some(_) => return Err(ValidationErrorKind::DataNotAnObject),
    };

    let symbol = match (
        optional_str(data, BLOCKCHAIN_FIELD)?,
        optional_str(data, COIN_FIELD)?,
    ) {
        (Some(symbol), None) | (None, Some(symbol)) => symbol,
        (Some(_), Some(_)) => return Err(ValidationErrorKind::AmbiguousBlockchain),
        (None, None) => return Err(ValidationErrorKind::MissingBlockchain),
    };
    let blockchain = symbol.parse::<Blockchain>()?;

    let endpoint = optional_str(data, ENDPOINT_FIELD)?
        .map(str::parse::<Endpoint>)
        .transpose()?
        .unwrap_or_default();

    let network = optional_str(data, NETWORK_FIELD)?
        .map(str::parse::<Network>)
        .transpose()?
        .unwrap_or_default();

    Ok((blockchain, endpoint, network))
}

/// A string field of `data`; JSON `null` counts as absent
fn optional_str<'a>(
    data: &'a Map<String, Value>,
    field: &'static str,
) -> Result<Option<&'a str>, ValidationErrorKind> {
    match data.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.as_str())),
        Some(_) => Err(ValidationErrorKind::NotAString { field }),
    }
}
