//! Failure kinds recognized by the built-in classifiers.
//!
//! Application code raises these (or wraps them) so the engine can turn them
//! into a public contract without guessing.

use super::StackTraceLogging;
use crate::core_types::descriptor::Descriptor;
use crate::error::BodyReadError;
use std::error::Error;
use std::fmt;
use thiserror::Error;

// ============================================================================
// Application-raised failures
// ============================================================================

/// A failure raised deliberately by application code, naming its descriptors.
///
/// ```rust
/// use error_contract::{Descriptor, ServiceFailure, StackTraceLogging};
///
/// let not_found = Descriptor::new("ORDER_NOT_FOUND", "99001", "Order not found", 404);
/// let failure = ServiceFailure::new(not_found)
///     .with_message("order 42 missing from primary store")
///     .with_diagnostic("order_id", "42")
///     .with_stack_trace(StackTraceLogging::Suppress);
///
/// assert_eq!(failure.descriptors().len(), 1);
/// ```
#[derive(Debug)]
pub struct ServiceFailure {
    descriptors: Vec<Descriptor>,
    diagnostic_fields: Vec<(String, String)>,
    response_headers: Vec<(String, Vec<String>)>,
    message: Option<String>,
    stack_trace: StackTraceLogging,
    source: Option<Box<dyn Error + Send + Sync>>,
}

impl ServiceFailure {
    pub fn new(descriptor: Descriptor) -> Self {
        Self::with_descriptors(vec![descriptor])
    }

    pub fn with_descriptors(descriptors: Vec<Descriptor>) -> Self {
        Self {
            descriptors,
            diagnostic_fields: Vec::new(),
            response_headers: Vec::new(),
            message: None,
            stack_trace: StackTraceLogging::Default,
            source: None,
        }
    }

    pub fn and_descriptor(mut self, descriptor: Descriptor) -> Self {
        self.descriptors.push(descriptor);
        self
    }

    /// Internal message; logged, never shown to clients.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_diagnostic(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.diagnostic_fields.push((key.into(), value.into()));
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, values: Vec<String>) -> Self {
        self.response_headers.push((name.into(), values));
        self
    }

    pub fn with_stack_trace(mut self, stack_trace: StackTraceLogging) -> Self {
        self.stack_trace = stack_trace;
        self
    }

    pub fn with_source(mut self, source: impl Into<Box<dyn Error + Send + Sync>>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn descriptors(&self) -> &[Descriptor] {
        &self.descriptors
    }

    pub fn diagnostic_fields(&self) -> &[(String, String)] {
        &self.diagnostic_fields
    }

    pub fn response_headers(&self) -> &[(String, Vec<String>)] {
        &self.response_headers
    }

    pub fn stack_trace(&self) -> StackTraceLogging {
        self.stack_trace
    }
}

impl fmt::Display for ServiceFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => f.write_str(message),
            None => {
                let names: Vec<&str> = self.descriptors.iter().map(Descriptor::name).collect();
                write!(f, "Service failure raised for [{}]", names.join(", "))
            }
        }
    }
}

impl Error for ServiceFailure {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source
            .as_deref()
            .map(|source| source as &(dyn Error + 'static))
    }
}

// ============================================================================
// Validation failures
// ============================================================================

/// Who is at fault for a set of violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationScope {
    /// The caller sent invalid data (4xx).
    Client,
    /// Data produced by the service itself failed validation (5xx).
    Server,
}

impl fmt::Display for ValidationScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationScope::Client => write!(f, "client"),
            ValidationScope::Server => write!(f, "server-side"),
        }
    }
}

/// One constraint violation produced by a validation framework.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Field path that failed, when the constraint is field-scoped.
    pub field: Option<String>,
    /// Symbolic message key; resolved against the catalog by descriptor name.
    pub message_key: String,
    /// Internal detail for the log line.
    pub detail: Option<String>,
}

impl Violation {
    pub fn new(field: impl Into<String>, message_key: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            message_key: message_key.into(),
            detail: None,
        }
    }

    /// A violation not tied to a single field (class-level constraint).
    pub fn global(message_key: impl Into<String>) -> Self {
        Self {
            field: None,
            message_key: message_key.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// Violations reported by a validation framework.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{scope} validation failed with {} violation(s)", .violations.len())]
pub struct ValidationFailure {
    pub scope: ValidationScope,
    pub violations: Vec<Violation>,
}

impl ValidationFailure {
    pub fn client(violations: Vec<Violation>) -> Self {
        Self {
            scope: ValidationScope::Client,
            violations,
        }
    }

    pub fn server(violations: Vec<Violation>) -> Self {
        Self {
            scope: ValidationScope::Server,
            violations,
        }
    }
}

// ============================================================================
// Framework-level request rejections
// ============================================================================

/// A request the framework refused before application code ran.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestRejection {
    #[error("No handler for the requested path")]
    NotFound,

    #[error("Method not allowed (allowed: {allowed:?})")]
    MethodNotAllowed { allowed: Vec<String> },

    #[error("No acceptable representation for Accept header")]
    NotAcceptable,

    #[error("Unsupported media type: {content_type:?}")]
    UnsupportedMediaType { content_type: Option<String> },

    #[error("Missing required parameter '{name}'")]
    MissingParameter { name: String },

    #[error("Parameter '{name}' could not be converted to {expected}")]
    TypeMismatch { name: String, expected: String },

    #[error("Malformed request body: {detail}")]
    MalformedBody { detail: String },

    #[error(transparent)]
    BodyUnreadable(#[from] BodyReadError),

    #[error("Missing or invalid credentials")]
    Unauthorized { challenge: Option<String> },

    #[error("Caller is not permitted to perform this operation")]
    Forbidden,

    #[error("Too many requests")]
    TooManyRequests { retry_after_secs: Option<u64> },

    #[error("Bad request: {detail}")]
    BadRequest { detail: String },

    #[error("Service temporarily unavailable")]
    ServiceUnavailable,
}

// ============================================================================
// Network-origin failures
// ============================================================================

/// How a call to a downstream service failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionFailureKind {
    /// No response within the deadline.
    Timeout { after_ms: u64 },
    /// Connection could not be established.
    Unreachable,
    /// The downstream answered with a non-success status.
    Status { status: u16, body: Option<String> },
}

impl fmt::Display for ConnectionFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout { after_ms } => write!(f, "timed out after {after_ms}ms"),
            Self::Unreachable => write!(f, "unreachable"),
            Self::Status { status, .. } => write!(f, "responded with status {status}"),
        }
    }
}

/// Longest downstream body excerpt copied into diagnostics.
const REMOTE_BODY_EXCERPT_LEN: usize = 512;

/// A failed call to a downstream service.
#[derive(Error, Debug)]
#[error("Call to {service} failed: {kind}")]
pub struct RemoteCallFailure {
    pub service: String,
    pub kind: ConnectionFailureKind,
    #[source]
    pub source: Option<Box<dyn Error + Send + Sync>>,
}

impl RemoteCallFailure {
    pub fn new(service: impl Into<String>, kind: ConnectionFailureKind) -> Self {
        Self {
            service: service.into(),
            kind,
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<Box<dyn Error + Send + Sync>>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Connection context for the log line.
    pub fn diagnostic_fields(&self) -> Vec<(String, String)> {
        let mut fields = vec![("remote_service".to_string(), self.service.clone())];
        match &self.kind {
            ConnectionFailureKind::Timeout { after_ms } => {
                fields.push(("remote_failure".to_string(), "timeout".to_string()));
                fields.push(("remote_timeout_ms".to_string(), after_ms.to_string()));
            }
            ConnectionFailureKind::Unreachable => {
                fields.push(("remote_failure".to_string(), "unreachable".to_string()));
            }
            ConnectionFailureKind::Status { status, body } => {
                fields.push(("remote_failure".to_string(), "status".to_string()));
                fields.push(("remote_status".to_string(), status.to_string()));
                if let Some(body) = body {
                    let excerpt: String = body.chars().take(REMOTE_BODY_EXCERPT_LEN).collect();
                    fields.push(("remote_body".to_string(), excerpt));
                }
            }
        }
        fields
    }
}
