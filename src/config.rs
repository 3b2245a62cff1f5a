use crate::catalog::StatusPriority;
use crate::error::{EngineError, EngineResult};
use crate::logging::log_debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Header carrying the correlation id on every error response.
pub const DEFAULT_CORRELATION_HEADER: &str = "error_uid";
/// Inbound header consulted first for the trace id.
pub const DEFAULT_TRACE_ID_HEADER: &str = "traceparent";
/// Request attribute consulted when the trace header is absent.
pub const DEFAULT_TRACE_ID_ATTRIBUTE: &str = "trace_id";
/// Replacement for the values of masked headers.
pub const DEFAULT_MASK_TOKEN: &str = "[MASKED]";

/// How the diagnostic recorder renders log lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecorderConfig {
    /// Response header the correlation id is returned under
    pub correlation_header: String,
    /// Request header holding the distributed trace id
    pub trace_id_header: String,
    /// Request attribute holding the trace id (set by tracing middleware)
    pub trace_id_attribute: String,
    /// Header names whose values never reach the log (case-insensitive)
    pub masked_headers: BTreeSet<String>,
    pub mask_token: String,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            correlation_header: DEFAULT_CORRELATION_HEADER.to_string(),
            trace_id_header: DEFAULT_TRACE_ID_HEADER.to_string(),
            trace_id_attribute: DEFAULT_TRACE_ID_ATTRIBUTE.to_string(),
            masked_headers: BTreeSet::from(["authorization".to_string()]),
            mask_token: DEFAULT_MASK_TOKEN.to_string(),
        }
    }
}

impl RecorderConfig {
    /// Whether `header` is in the masked set, ignoring case.
    pub fn is_masked(&self, header: &str) -> bool {
        self.masked_headers
            .iter()
            .any(|masked| masked.eq_ignore_ascii_case(header))
    }

    /// Validate recorder configuration
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Configuration`] if:
    /// - The correlation header name is empty or not a valid header token
    /// - The trace id header or attribute name is empty
    /// - A masked header name is empty
    pub fn validate(&self) -> EngineResult<()> {
        if !is_header_token(&self.correlation_header) {
            return Err(EngineError::configuration_error(format!(
                "Correlation header '{}' is not a valid header name",
                self.correlation_header
            )));
        }
        if self.trace_id_header.trim().is_empty() {
            return Err(EngineError::configuration_error(
                "Trace id header name must not be empty",
            ));
        }
        if self.trace_id_attribute.trim().is_empty() {
            return Err(EngineError::configuration_error(
                "Trace id attribute name must not be empty",
            ));
        }
        if self.masked_headers.iter().any(|h| h.trim().is_empty()) {
            return Err(EngineError::configuration_error(
                "Masked header names must not be empty",
            ));
        }
        Ok(())
    }
}

// RFC 9110 token characters.
fn is_header_token(name: &str) -> bool {
    !name.is_empty()
        && name.bytes().all(|b| {
            b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b)
        })
}

/// Engine-wide settings that are not part of the catalog itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub recorder: RecorderConfig,
    /// Priority order applied by `CatalogBuilder::from_config` and `ErrorBoundary::from_config`
    pub status_priority: StatusPriority,
}

impl EngineConfig {
    /// Validate the full configuration
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Configuration`] if:
    /// - Recorder configuration is invalid (see [`RecorderConfig::validate`])
    /// - The status priority order is empty
    /// - A status lies outside 100..=599
    /// - A status appears more than once
    pub fn validate(&self) -> EngineResult<()> {
        self.recorder.validate()?;

        let order = self.status_priority.as_slice();
        if order.is_empty() {
            return Err(EngineError::configuration_error(
                "Status priority order must not be empty",
            ));
        }
        if let Some(status) = order.iter().find(|s| !(100..=599).contains(*s)) {
            return Err(EngineError::configuration_error(format!(
                "Status {status} in priority order is not a valid HTTP status"
            )));
        }
        let mut seen = BTreeSet::new();
        if let Some(status) = order.iter().find(|s| !seen.insert(**s)) {
            return Err(EngineError::configuration_error(format!(
                "Status {status} appears more than once in priority order"
            )));
        }
        Ok(())
    }

    /// Load configuration from environment variables
    /// This is the ONLY method that should access environment variables
    ///
    /// Unset variables keep their defaults:
    /// - `ERROR_CONTRACT_CORRELATION_HEADER`
    /// - `ERROR_CONTRACT_TRACE_ID_HEADER`
    /// - `ERROR_CONTRACT_TRACE_ID_ATTRIBUTE`
    /// - `ERROR_CONTRACT_MASKED_HEADERS` (comma-separated)
    /// - `ERROR_CONTRACT_STATUS_PRIORITY` (comma-separated integers)
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Configuration`] if a status in
    /// `ERROR_CONTRACT_STATUS_PRIORITY` is not an integer, or if the resulting
    /// configuration fails [`EngineConfig::validate`].
    pub fn from_env() -> EngineResult<Self> {
        let mut config = Self::default();

        if let Ok(header) = std::env::var("ERROR_CONTRACT_CORRELATION_HEADER") {
            config.recorder.correlation_header = header.trim().to_string();
        }
        if let Ok(header) = std::env::var("ERROR_CONTRACT_TRACE_ID_HEADER") {
            config.recorder.trace_id_header = header.trim().to_string();
        }
        if let Ok(attribute) = std::env::var("ERROR_CONTRACT_TRACE_ID_ATTRIBUTE") {
            config.recorder.trace_id_attribute = attribute.trim().to_string();
        }
        if let Ok(masked) = std::env::var("ERROR_CONTRACT_MASKED_HEADERS") {
            config.recorder.masked_headers = split_list(&masked)
                .map(|h| h.to_ascii_lowercase())
                .collect();
        }
        if let Ok(priority) = std::env::var("ERROR_CONTRACT_STATUS_PRIORITY") {
            config.status_priority = Self::parse_priority(&priority)?;
        }

        config.validate()?;

        log_debug!(
            correlation_header = %config.recorder.correlation_header,
            trace_id_header = %config.recorder.trace_id_header,
            masked_headers = config.recorder.masked_headers.len(),
            status_priority = ?config.status_priority.as_slice(),
            "Engine configuration loaded and validated"
        );

        Ok(config)
    }

    fn parse_priority(raw: &str) -> EngineResult<StatusPriority> {
        let statuses = split_list(raw)
            .map(|entry| {
                entry.parse::<u16>().map_err(|_| {
                    EngineError::configuration_error(format!(
                        "Invalid status '{entry}' in ERROR_CONTRACT_STATUS_PRIORITY"
                    ))
                })
            })
            .collect::<EngineResult<Vec<u16>>>()?;
        Ok(StatusPriority::new(statuses))
    }
}

fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|entry| !entry.is_empty())
}
