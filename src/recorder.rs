//! Correlation ids and the server-side diagnostic log line.
//!
//! Every handled failure produces exactly one log entry whose first field is
//! the correlation id returned to the client:
//!
//! ```text
//! error_uid=<uuid>, trace_id=<id|null>, exception_class=<kind>, returned_http_status_code=<status>,
//! contributing_errors="A,B", request_uri=<uri>, request_method=<method>, query_string=<query>,
//! request_headers="<name>=<value>, <name>=[<v1>,<v2>]", <extra fields...>
//! ```
//!
//! Rendering never fails. Request data is read through the adapter's
//! [`RequestContext`] and any read that panics is rendered as an empty string.

use crate::config::RecorderConfig;
use crate::context::RequestContext;
use crate::core_types::descriptor::Descriptor;
use crate::core_types::errors::ErrorSeverity;
use crate::error::{panic_message, EngineError, EngineResult};
use crate::failure::{causes, Failure};
use crate::logging::{current_span_id, log_error, log_info, log_warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

/// W3C `traceparent`: `version-traceid-parentid-flags`.
static TRACEPARENT: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(r"^[0-9a-f]{2}-([0-9a-f]{32})-[0-9a-f]{16}-[0-9a-f]{2}$").ok()
});

/// Rendered in place of a trace id when none can be found.
pub const MISSING_TRACE_ID: &str = "null";

/// One fully rendered diagnostic entry handed to a [`LogSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub severity: ErrorSeverity,
    pub correlation_id: String,
    /// The key/value line described in the module docs.
    pub line: String,
    /// Internal message of the failure; never sent to clients.
    pub failure_message: String,
    /// Source chain plus captured backtrace, when the policy asks for it.
    pub stack_trace: Option<String>,
}

/// Destination for diagnostic entries.
#[cfg_attr(test, mockall::automock)]
pub trait LogSink: Send + Sync {
    /// Emit one entry.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Recording`] if the entry could not be written.
    fn emit(&self, entry: &LogEntry) -> EngineResult<()>;
}

/// Default sink: writes entries through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn emit(&self, entry: &LogEntry) -> EngineResult<()> {
        let stack_trace = entry.stack_trace.as_deref();
        match entry.severity {
            ErrorSeverity::Critical | ErrorSeverity::Error => log_error!(
                correlation_id = %entry.correlation_id,
                failure = %entry.failure_message,
                stack_trace = stack_trace,
                "{}",
                entry.line
            ),
            ErrorSeverity::Warning => log_warn!(
                correlation_id = %entry.correlation_id,
                failure = %entry.failure_message,
                stack_trace = stack_trace,
                "{}",
                entry.line
            ),
            ErrorSeverity::Info => log_info!(
                correlation_id = %entry.correlation_id,
                failure = %entry.failure_message,
                stack_trace = stack_trace,
                "{}",
                entry.line
            ),
        }
        Ok(())
    }
}

/// How loudly a failure is recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogPolicy {
    pub severity: ErrorSeverity,
    pub include_stack_trace: bool,
}

impl LogPolicy {
    /// Severity from the status, stack trace for everything but 4xx.
    ///
    /// `stack_trace_override` (set on the failure) wins over the status rule.
    pub fn for_status(status: u16, stack_trace_override: Option<bool>) -> Self {
        let is_client_error = (400..500).contains(&status);
        Self {
            severity: ErrorSeverity::for_status(status),
            include_stack_trace: stack_trace_override.unwrap_or(!is_client_error),
        }
    }

    /// Highest severity, full detail.
    pub fn critical() -> Self {
        Self {
            severity: ErrorSeverity::Critical,
            include_stack_trace: true,
        }
    }
}

/// Mints correlation ids and records diagnostic entries.
#[derive(Clone)]
pub struct DiagnosticRecorder {
    config: RecorderConfig,
    sink: Arc<dyn LogSink>,
}

impl Default for DiagnosticRecorder {
    fn default() -> Self {
        Self::new(RecorderConfig::default(), Arc::new(TracingSink))
    }
}

impl std::fmt::Debug for DiagnosticRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiagnosticRecorder")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl DiagnosticRecorder {
    pub fn new(config: RecorderConfig, sink: Arc<dyn LogSink>) -> Self {
        Self { config, sink }
    }

    pub fn config(&self) -> &RecorderConfig {
        &self.config
    }

    /// A fresh, globally unique correlation id.
    ///
    /// Never derived from inbound trace headers.
    pub fn correlation_id(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }

    /// Mint a correlation id and render the log line for one failure.
    pub fn build_log_line(
        &self,
        ctx: &dyn RequestContext,
        descriptors: &[Descriptor],
        status: u16,
        failure: &Failure,
        extra_fields: &[(String, String)],
    ) -> (String, String) {
        let correlation_id = self.correlation_id();
        let names: Vec<&str> = descriptors.iter().map(Descriptor::name).collect();

        let mut fields: Vec<(&str, String)> = vec![
            (self.config.correlation_header.as_str(), correlation_id.clone()),
            ("trace_id", self.trace_id(ctx)),
            ("exception_class", failure.kind().to_string()),
            ("returned_http_status_code", status.to_string()),
            ("contributing_errors", quoted(&names.join(","))),
            ("request_uri", read_guarded(|| ctx.uri()).unwrap_or_default()),
            ("request_method", read_guarded(|| ctx.http_method()).unwrap_or_default()),
            (
                "query_string",
                read_guarded(|| ctx.query_string()).flatten().unwrap_or_default(),
            ),
            ("request_headers", quoted(&self.render_headers(ctx))),
        ];
        fields.extend(
            extra_fields
                .iter()
                .map(|(key, value)| (key.as_str(), render_value(value))),
        );

        let line = fields
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join(", ");
        (correlation_id, line)
    }

    /// Build the log line and hand it to the sink. Returns the correlation id.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Recording`] if the sink fails or panics.
    pub fn record(
        &self,
        ctx: &dyn RequestContext,
        descriptors: &[Descriptor],
        status: u16,
        failure: &Failure,
        extra_fields: &[(String, String)],
        policy: LogPolicy,
    ) -> EngineResult<String> {
        let (correlation_id, line) =
            self.build_log_line(ctx, descriptors, status, failure, extra_fields);

        let entry = LogEntry {
            severity: policy.severity,
            correlation_id,
            line,
            failure_message: failure.safe_message(),
            stack_trace: policy
                .include_stack_trace
                .then(|| render_stack_trace(failure)),
        };

        match catch_unwind(AssertUnwindSafe(|| self.sink.emit(&entry))) {
            Ok(Ok(())) => Ok(entry.correlation_id),
            Ok(Err(error)) => Err(error),
            Err(payload) => Err(EngineError::recording_failed(format!(
                "log sink panicked: {}",
                panic_message(payload.as_ref())
            ))),
        }
    }

    /// Trace id from the configured header, then attribute, then the current span.
    fn trace_id(&self, ctx: &dyn RequestContext) -> String {
        let from_header = read_guarded(|| ctx.single_header(&self.config.trace_id_header))
            .flatten()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .map(|value| extract_trace_id(&value));

        from_header
            .or_else(|| {
                read_guarded(|| ctx.attribute(&self.config.trace_id_attribute))
                    .flatten()
                    .filter(|value| !value.trim().is_empty())
            })
            .or_else(current_span_id)
            .unwrap_or_else(|| MISSING_TRACE_ID.to_string())
    }

    fn render_headers(&self, ctx: &dyn RequestContext) -> String {
        read_guarded(|| {
            ctx.header_names()
                .into_iter()
                .map(|name| {
                    let values = if self.config.is_masked(&name) {
                        vec![self.config.mask_token.clone()]
                    } else {
                        ctx.header_values(&name)
                    };
                    match values.as_slice() {
                        [single] => format!("{name}={single}"),
                        _ => format!("{name}=[{}]", values.join(",")),
                    }
                })
                .collect::<Vec<_>>()
                .join(", ")
        })
        .unwrap_or_default()
    }
}

/// Reduce a W3C `traceparent` value to its trace id; other values pass through.
pub(crate) fn extract_trace_id(value: &str) -> String {
    TRACEPARENT
        .as_ref()
        .and_then(|re| re.captures(value))
        .and_then(|captures| captures.get(1))
        .map(|trace_id| trace_id.as_str().to_string())
        .unwrap_or_else(|| value.to_string())
}

fn read_guarded<T>(read: impl FnOnce() -> T) -> Option<T> {
    catch_unwind(AssertUnwindSafe(read)).ok()
}

fn quoted(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

fn render_value(value: &str) -> String {
    let needs_quotes = value.is_empty()
        || value
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, ',' | '=' | '"'));
    if needs_quotes {
        quoted(value)
    } else {
        value.to_string()
    }
}

fn render_stack_trace(failure: &Failure) -> String {
    read_guarded(|| {
        let mut rendered = String::new();
        for (depth, cause) in causes(failure.error()).enumerate() {
            if depth == 0 {
                rendered.push_str(&format!("{}: {cause}\n", failure.kind()));
            } else {
                rendered.push_str(&format!("caused by: {cause}\n"));
            }
        }
        rendered.push_str(&failure.backtrace().to_string());
        rendered
    })
    .unwrap_or_default()
}
