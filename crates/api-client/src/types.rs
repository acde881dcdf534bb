// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Common data types for metric queries and readings

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use shared_types::{Blockchain, Endpoint, Network};

use crate::ApiError;

/// Outbound query for a single blockchain metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MetricQuery {
    /// Blockchain to query
    pub blockchain: Blockchain,
    /// Network of the blockchain
    pub network: Network,
    /// Metric to extract
    pub endpoint: Endpoint,
}

/// A numeric metric extracted from an upstream reply
#[derive(Debug, Clone, PartialEq)]
pub struct MetricReading {
    /// The extracted value, kept in the upstream's numeric representation
    pub value: Number,
    /// The full upstream JSON body the value was extracted from
    pub body: Map<String, Value>,
}

impl MetricQuery {
    /// Create a new metric query
    pub fn new(blockchain: Blockchain, network: Network, endpoint: Endpoint) -> Self {
        Self {
            blockchain,
            network,
            endpoint,
        }
    }
}

impl fmt::Display for MetricQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.blockchain, self.network, self.endpoint)
    }
}

impl MetricReading {
    /// Extract a reading from an upstream body
    ///
    /// `paths` are tried in order; the first path that resolves to a value is
    /// used. Numbers are taken as-is and numeric strings are parsed. Difficulty
    /// and height are strictly positive on a live chain, so anything else is
    /// treated as a broken reply.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidResponse` if the body is not a JSON object, no
    /// path resolves, or the resolved value is not a finite positive number.
    pub fn from_body(body: Value, paths: &[&[&str]]) -> Result<Self, ApiError> {
        let Value::Object(body) = body else {
            return Err(ApiError::InvalidResponse {
                message: "response body is not a JSON object".to_string(),
            });
        };

        let Some((path, raw)) = paths
            .iter()
            .find_map(|path| lookup(&body, path).map(|value| (path, value)))
        else {
            let tried = paths
                .iter()
                .map(|path| path.join("."))
                .collect::<Vec<_>>()
                .join(", ");
            return Err(ApiError::InvalidResponse {
                message: format!("result field not found (tried: {tried})"),
            });
        };

        let value = to_number(raw).ok_or_else(|| ApiError::InvalidResponse {
            message: format!("result at {} is not a number: {raw}", path.join(".")),
        })?;

        if !value.as_f64().is_some_and(|number| number > 0.0) {
            return Err(ApiError::InvalidResponse {
                message: format!("result at {} is not positive: {value}", path.join(".")),
            });
        }

        Ok(Self { value, body })
    }
}

fn lookup<'a>(body: &'a Map<String, Value>, path: &[&str]) -> Option<&'a Value> {
    let (first, rest) = path.split_first()?;
    rest.iter()
        .try_fold(body.get(*first)?, |value, key| value.get(key))
        .filter(|value| !value.is_null())
}

fn to_number(value: &Value) -> Option<Number> {
    match value {
        Value::Number(number) => Some(number.clone()),
        Value::String(text) => {
            let trimmed = text.trim();
            if let Ok(integer) = trimmed.parse::<u64>() {
                return Some(Number::from(integer));
            }
            trimmed
                .parse::<f64>()
                .ok()
                .filter(|float| float.is_finite())
                .and_then(Number::from_f64)
        }
        _ => None,
    }
}
