// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Raw job request as received from the caller
//!
//! Nothing in here is trusted. The only way to turn an [`AdapterRequest`] into
//! something the executor accepts is [`crate::validator::validate`].

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use utoipa::ToSchema;

/// Job run id reported when the request carries none
pub const DEFAULT_JOB_RUN_ID: &str = "1";

/// Opaque correlation token, echoed back exactly as received
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JobRunId {
    /// A string id such as `"1"` or a UUID
    Text(String),
    /// A numeric id
    Number(Number),
}

impl Default for JobRunId {
    fn default() -> Self {
        Self::Text(DEFAULT_JOB_RUN_ID.to_string())
    }
}

impl fmt::Display for JobRunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Number(number) => write!(f, "{number}"),
        }
    }
}

impl From<&str> for JobRunId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Loosely-typed adapter job request
///
/// Recognized `data` keys are `blockchain` (alias `coin`), `endpoint` and
/// `network`; anything else is ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({"id": "1", "data": {"blockchain": "BTC", "endpoint": "difficulty"}}))]
pub struct AdapterRequest {
    /// Correlation id echoed back as `jobRunID`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub id: Option<JobRunId>,
    /// Job parameters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub data: Option<Value>,
}

impl AdapterRequest {
    /// The job run id to report, falling back to the default when absent
    pub fn job_run_id(&self) -> JobRunId {
        self.id.clone().unwrap_or_default()
    }

    /// Whether neither `id` nor `data` was supplied
    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.data.is_none()
    }
}
