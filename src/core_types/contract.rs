//! Outward-facing payloads: the error contract and the response carrying it.
//!
//! The serialized contract is the only thing a client ever sees:
//!
//! ```json
//! {"error_id": "<opaque>", "errors": [{"code": "...", "message": "...", "metadata": {...}}]}
//! ```

use crate::core_types::descriptor::{Descriptor, Metadata};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Status used by the last-resort response.
pub const LAST_RESORT_STATUS: u16 = 500;
/// Code used by the last-resort response.
pub const LAST_RESORT_CODE: &str = "10";
/// Message used by the last-resort response.
pub const LAST_RESORT_MESSAGE: &str = "An error occurred while fulfilling the request";

/// One public error entry as rendered to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractError {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: Metadata,
}

impl From<&Descriptor> for ContractError {
    fn from(descriptor: &Descriptor) -> Self {
        Self {
            code: descriptor.code().to_string(),
            message: descriptor.message().to_string(),
            metadata: descriptor.metadata().clone(),
        }
    }
}

/// The public payload for one handled failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorContract {
    /// Correlation id linking this response to its server-side log entry.
    #[serde(rename = "error_id")]
    pub correlation_id: String,
    pub errors: Vec<ContractError>,
}

impl ErrorContract {
    pub fn new(correlation_id: impl Into<String>, descriptors: &[Descriptor]) -> Self {
        Self {
            correlation_id: correlation_id.into(),
            errors: descriptors.iter().map(ContractError::from).collect(),
        }
    }

    /// Contract used when nothing else can be built. Constructing it cannot fail.
    pub fn last_resort(correlation_id: impl Into<String>) -> Self {
        Self {
            correlation_id: correlation_id.into(),
            errors: vec![ContractError {
                code: LAST_RESORT_CODE.to_string(),
                message: LAST_RESORT_MESSAGE.to_string(),
                metadata: Metadata::new(),
            }],
        }
    }
}

/// The complete response handed back to the transport adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    pub http_status: u16,
    pub body: ErrorContract,
    /// Header name → ordered values. Always contains the correlation-id header.
    pub headers: BTreeMap<String, Vec<String>>,
}

impl ErrorResponse {
    /// Build a response whose headers are `extra_headers` plus the correlation id.
    ///
    /// Extra headers named like the correlation header (case-insensitively) are
    /// dropped; the correlation id always wins.
    pub fn new(
        http_status: u16,
        body: ErrorContract,
        correlation_header: &str,
        extra_headers: &[(String, Vec<String>)],
    ) -> Self {
        let mut headers = BTreeMap::new();
        for (name, values) in extra_headers {
            if name.eq_ignore_ascii_case(correlation_header) {
                continue;
            }
            headers
                .entry(name.clone())
                .or_insert_with(Vec::new)
                .extend(values.iter().cloned());
        }
        headers.insert(
            correlation_header.to_string(),
            vec![body.correlation_id.clone()],
        );
        Self {
            http_status,
            body,
            headers,
        }
    }

    /// Fixed-status, fixed-body response with a freshly minted id.
    pub fn last_resort(correlation_header: &str) -> Self {
        let correlation_id = uuid::Uuid::new_v4().to_string();
        Self::new(
            LAST_RESORT_STATUS,
            ErrorContract::last_resort(correlation_id),
            correlation_header,
            &[],
        )
    }

    pub fn correlation_id(&self) -> &str {
        &self.body.correlation_id
    }

    /// Render the body as JSON. Falls back to a static literal instead of failing.
    pub fn body_json(&self) -> String {
        serde_json::to_string(&self.body).unwrap_or_else(|_| {
            format!(
                r#"{{"error_id":"{}","errors":[{{"code":"{}","message":"{}"}}]}}"#,
                self.body.correlation_id, LAST_RESORT_CODE, LAST_RESORT_MESSAGE
            )
        })
    }
}
