//! Logging utilities for error-contract
//!
//! Re-exports tracing macros with log_* naming convention for consistency,
//! plus the one piece of span plumbing the recorder needs.

// Re-export tracing macros with log_* naming
pub use tracing::{
    debug as log_debug,
    error as log_error,
    info as log_info,
    trace as log_trace,
    warn as log_warn,
};

/// Id of the span currently entered on this thread, as lowercase hex.
///
/// Returns `None` when no subscriber is installed or no span is active.
pub(crate) fn current_span_id() -> Option<String> {
    tracing::Span::current()
        .id()
        .map(|id| format!("{:016x}", id.into_u64()))
}
