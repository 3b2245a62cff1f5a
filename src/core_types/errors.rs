//! Shared categorization types used by engine errors and the diagnostic recorder.

/// High-level categorization of engine errors for routing decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Deployment misconfiguration detected at startup (invalid catalog or config).
    ///
    /// The process must not serve traffic until fixed.
    Configuration,

    /// Bug in the classification/resolution machinery itself.
    Internal,

    /// A collaborator outside the engine (log sink, request adapter) failed.
    External,
}

/// Severity level for logging and alerting decisions.
///
/// The recorder maps these onto `tracing` levels: `Critical` and `Error`
/// become `error`, `Warning` becomes `warn`, `Info` becomes `info`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Expected failure (e.g., not found, validation error).
    Info,

    /// Client-caused failure worth monitoring.
    Warning,

    /// Server-side failure; action failed but system is stable.
    Error,

    /// Fallback path or broken handler logic. Requires attention.
    Critical,
}

impl ErrorSeverity {
    /// Default severity for a response with the given HTTP status.
    pub fn for_status(status: u16) -> Self {
        if status >= 500 {
            Self::Error
        } else {
            Self::Warning
        }
    }
}
