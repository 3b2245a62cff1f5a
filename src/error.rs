//! Error types for the engine itself.
//!
//! These are failures *of* error handling, not the failures being handled:
//!
//! - [`EngineError`] covers startup problems (invalid catalog, invalid
//!   configuration) and log-sink failures.
//! - [`HandlerInternalError`] is the single signal the
//!   [`ExceptionResolutionHandler`](crate::ExceptionResolutionHandler) may
//!   surface. It means "use the fallback handler instead".
//! - [`BodyReadError`] is what a [`RequestContext`](crate::RequestContext)
//!   returns when the request body cannot be read.
//!
//! # Example
//!
//! ```rust
//! use error_contract::{EngineError, error::ErrorCategory};
//!
//! let err = EngineError::catalog_configuration(vec![
//!     "descriptor ORDER_MISSING has code 9001 outside the declared range".to_string(),
//! ]);
//! assert_eq!(err.category(), ErrorCategory::Configuration);
//! assert!(err.to_string().contains("ORDER_MISSING"));
//! ```

use crate::logging::{log_error, log_warn};
use thiserror::Error;

pub use crate::core_types::errors::{ErrorCategory, ErrorSeverity};

/// Convenient result type for engine operations.
pub type EngineResult<T> = std::result::Result<T, EngineError>;

/// Errors raised by the engine's own construction and collaborators.
///
/// | Variant | Category | Severity |
/// |---------|----------|----------|
/// | `CatalogConfiguration` | Configuration | Critical |
/// | `Configuration` | Configuration | Critical |
/// | `Recording` | External | Error |
#[derive(Error, Debug)]
pub enum EngineError {
    /// The error catalog violates one or more invariants.
    ///
    /// Every violation found is reported at once so a deployment can be fixed
    /// in a single pass.
    #[error("Invalid error catalog ({} violation(s)):\n  - {}", .violations.len(), .violations.join("\n  - "))]
    CatalogConfiguration {
        /// Human-readable description of each violated invariant.
        violations: Vec<String>,
    },

    /// Engine configuration is invalid or incomplete.
    #[error("Engine configuration error: {message}")]
    Configuration {
        /// Description of the configuration problem.
        message: String,
    },

    /// The log sink refused a diagnostic entry.
    #[error("Diagnostic recording failed: {message}")]
    Recording {
        /// Description of the sink failure.
        message: String,
    },
}

impl EngineError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::CatalogConfiguration { .. } => ErrorCategory::Configuration,
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Recording { .. } => ErrorCategory::External,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::CatalogConfiguration { .. } => ErrorSeverity::Critical,
            Self::Configuration { .. } => ErrorSeverity::Critical,
            Self::Recording { .. } => ErrorSeverity::Error,
        }
    }

    // =========================================================================
    // Constructor methods with automatic logging
    // =========================================================================

    /// Create a catalog configuration error (logs at ERROR level).
    pub fn catalog_configuration(violations: Vec<String>) -> Self {
        log_error!(
            error_type = "catalog_configuration",
            violation_count = violations.len(),
            violations = ?violations,
            "Error catalog failed validation"
        );
        Self::CatalogConfiguration { violations }
    }

    pub fn configuration_error(message: impl Into<String>) -> Self {
        let message = message.into();
        log_error!(
            error_type = "configuration_error",
            message = %message,
            "Engine configuration validation failed"
        );
        Self::Configuration { message }
    }

    pub fn recording_failed(message: impl Into<String>) -> Self {
        let message = message.into();
        log_warn!(
            error_type = "recording_failed",
            message = %message,
            "Log sink rejected diagnostic entry"
        );
        Self::Recording { message }
    }
}

/// A bug inside the exception handler's own logic.
///
/// Wraps the handling failure (as `source`) together with a description of
/// the original failure that was being handled. Callers must respond by
/// invoking the fallback handler.
#[derive(Error, Debug)]
#[error("Error handler failed while handling {original_kind}: {message}")]
pub struct HandlerInternalError {
    /// What went wrong inside the handler.
    pub message: String,
    /// Concrete kind of the failure that was being handled.
    pub original_kind: &'static str,
    /// Rendered message of the failure that was being handled.
    pub original_message: String,
    /// The handling failure itself.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl HandlerInternalError {
    /// Create a handler internal error (logs at ERROR level).
    pub fn new(
        message: impl Into<String>,
        original_kind: &'static str,
        original_message: impl Into<String>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        let message = message.into();
        let original_message = original_message.into();
        log_error!(
            error_type = "handler_internal_error",
            message = %message,
            original_kind = original_kind,
            has_source = source.is_some(),
            "Exception handler failed internally"
        );
        Self {
            message,
            original_kind,
            original_message,
            source,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::Internal
    }

    pub fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Critical
    }
}

/// The request body could not be read (already consumed, I/O failure, too large).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Request body could not be read: {reason}")]
pub struct BodyReadError {
    pub reason: String,
}

impl BodyReadError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Render a caught panic payload as text.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
