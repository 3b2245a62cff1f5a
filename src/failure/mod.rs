//! The failure carrier handed to the engine at the request boundary.
//!
//! A [`Failure`] owns whatever went wrong while processing a request, plus the
//! two pieces of context Rust errors don't carry on their own: the concrete
//! type name (for the log line) and a backtrace captured where the failure was
//! wrapped (the "stack trace" the recorder may include).
//!
//! ```rust
//! use error_contract::{Failure, StackTraceLogging, TaskFailure};
//!
//! let io = std::io::Error::new(std::io::ErrorKind::Other, "disk on fire");
//! let failure = Failure::new(TaskFailure::new("nightly-export", io))
//!     .with_stack_trace(StackTraceLogging::Force);
//!
//! assert!(failure.kind().ends_with("TaskFailure"));
//! assert_eq!(failure.stack_trace_override(), Some(true));
//! ```

pub mod kinds;
pub mod wrappers;

pub use kinds::{
    ConnectionFailureKind, RemoteCallFailure, RequestRejection, ServiceFailure,
    ValidationFailure, ValidationScope, Violation,
};
pub use wrappers::{CompletionFailure, ContextFailure, TaskFailure};

use serde::{Deserialize, Serialize};
use std::backtrace::Backtrace;
use std::error::Error;
use std::fmt;

/// Source chains deeper than this are cut off when walked.
pub const MAX_CAUSE_DEPTH: usize = 64;

/// Per-failure override of the recorder's stack-trace policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StackTraceLogging {
    /// Defer to the status-based default (no stack trace for 4xx).
    #[default]
    Default,
    /// Always include the stack trace.
    Force,
    /// Never include the stack trace.
    Suppress,
}

impl StackTraceLogging {
    pub fn as_override(self) -> Option<bool> {
        match self {
            Self::Default => None,
            Self::Force => Some(true),
            Self::Suppress => Some(false),
        }
    }
}

/// A failure raised while processing a request.
pub struct Failure {
    kind: &'static str,
    error: Box<dyn Error + Send + Sync + 'static>,
    backtrace: Backtrace,
    stack_trace: StackTraceLogging,
}

impl Failure {
    /// Wrap a concrete error, recording its type name and capturing a backtrace.
    pub fn new<E>(error: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        Self {
            kind: std::any::type_name::<E>(),
            error: Box::new(error),
            backtrace: Backtrace::capture(),
            stack_trace: StackTraceLogging::Default,
        }
    }

    /// Wrap an already-boxed error whose concrete type is described by `kind`.
    pub fn from_boxed(kind: &'static str, error: Box<dyn Error + Send + Sync + 'static>) -> Self {
        Self {
            kind,
            error,
            backtrace: Backtrace::capture(),
            stack_trace: StackTraceLogging::Default,
        }
    }

    pub fn with_stack_trace(mut self, stack_trace: StackTraceLogging) -> Self {
        self.stack_trace = stack_trace;
        self
    }

    /// Concrete type name of the wrapped error.
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    pub fn error(&self) -> &(dyn Error + 'static) {
        &*self.error
    }

    pub fn backtrace(&self) -> &Backtrace {
        &self.backtrace
    }

    pub fn downcast_ref<T: Error + 'static>(&self) -> Option<&T> {
        self.error.downcast_ref::<T>()
    }

    /// The rendered message, or an empty string if `Display` panics.
    pub fn safe_message(&self) -> String {
        std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| self.error.to_string()))
            .unwrap_or_default()
    }

    /// Explicit stack-trace decision, if anything forces one.
    ///
    /// An override set on the carrier wins; otherwise the first
    /// [`ServiceFailure`] in the source chain with a non-default setting decides.
    pub fn stack_trace_override(&self) -> Option<bool> {
        self.stack_trace.as_override().or_else(|| {
            causes(self.error())
                .filter_map(|cause| cause.downcast_ref::<ServiceFailure>())
                .find_map(|service| service.stack_trace().as_override())
        })
    }
}

impl From<anyhow::Error> for Failure {
    fn from(error: anyhow::Error) -> Self {
        Failure::new(ContextFailure::new(error))
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.error, f)
    }
}

impl fmt::Debug for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Failure")
            .field("kind", &self.kind)
            .field("error", &self.error)
            .field("stack_trace", &self.stack_trace)
            .finish()
    }
}

/// Iterate over `error` and its sources, outermost first.
///
/// Stops at a self-referencing source and after [`MAX_CAUSE_DEPTH`] steps.
pub fn causes<'a>(error: &'a (dyn Error + 'static)) -> Causes<'a> {
    Causes {
        next: Some(error),
        depth: 0,
    }
}

/// Iterator returned by [`causes`].
pub struct Causes<'a> {
    next: Option<&'a (dyn Error + 'static)>,
    depth: usize,
}

impl<'a> Iterator for Causes<'a> {
    type Item = &'a (dyn Error + 'static);

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        self.depth += 1;
        if self.depth < MAX_CAUSE_DEPTH {
            self.next = current
                .source()
                .filter(|source| !same_error(current, *source));
        }
        Some(current)
    }
}

/// Pointer identity between two error trait objects.
pub(crate) fn same_error(left: &(dyn Error + 'static), right: &(dyn Error + 'static)) -> bool {
    std::ptr::eq(
        left as *const dyn Error as *const u8,
        right as *const dyn Error as *const u8,
    )
}
