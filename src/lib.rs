//! # error-contract
//!
//! Turns any failure raised while handling a request into a deterministic,
//! client-safe error contract: one HTTP status, a sorted set of public error
//! descriptors, and a correlation id that links the response to a detailed
//! server-side log entry.
//!
//! ## Key Features
//!
//! - **Validated Catalog**: Every descriptor, code range and role binding is checked once at startup
//! - **Ordered Classification**: Pluggable classifiers, first match wins, wrappers unwrapped first
//! - **Conflict Resolution**: Mixed-status classifications collapse by a configurable priority order
//! - **Never Fails**: A fallback handler and a static last-resort response guarantee an answer
//! - **Diagnostics**: Structured log line with trace id, request data and masked headers
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use error_contract::{
//!     ClassifierChain, CodeRange, Descriptor, ErrorBoundary, ErrorCatalog, Failure,
//!     ServiceFailure, StaticRequestContext,
//! };
//!
//! let out_of_stock = Descriptor::new("OUT_OF_STOCK", "4001", "Item is out of stock", 409);
//! let catalog = ErrorCatalog::with_core(vec![out_of_stock.clone()], CodeRange::between(4000, 4999))
//!     .expect("valid catalog");
//! let boundary = ErrorBoundary::new(Arc::new(catalog), ClassifierChain::standard());
//!
//! let ctx = StaticRequestContext::new("POST", "/cart/checkout");
//! let failure = Failure::new(ServiceFailure::new(out_of_stock));
//! let response = boundary.respond(&failure, &ctx);
//!
//! assert_eq!(response.http_status, 409);
//! assert_eq!(response.body.errors[0].code, "4001");
//! ```

// Allow missing errors documentation - errors are self-documenting via type signatures
#![allow(clippy::missing_errors_doc)]

// Core value types: descriptors, contracts, severities
pub mod core_types;

// Logging utilities (re-exports tracing with log_* naming) - internal only
pub(crate) mod logging;

pub mod catalog;
pub mod classify;
pub mod config;
pub mod context;
pub mod error;
pub mod failure;
pub mod handler;
pub mod recorder;
pub mod resolver;

#[cfg(test)]
pub mod tests;

// Re-export main types
pub use catalog::{CatalogBuilder, CodeRange, ErrorCatalog, Role, StatusPriority};
pub use classify::{
    Classification, Classifier, ClassifierChain, FnClassifier, RemoteCallClassifier,
    RequestRejectionClassifier, ServiceFailureClassifier, ValidationClassifier, Verdict,
    WrapperKind,
};
pub use config::{EngineConfig, RecorderConfig};
pub use context::{RequestContext, StaticRequestContext};
pub use error::{BodyReadError, EngineError, EngineResult, HandlerInternalError};
pub use failure::{
    CompletionFailure, ConnectionFailureKind, ContextFailure, Failure, RemoteCallFailure,
    RequestRejection, ServiceFailure, StackTraceLogging, TaskFailure, ValidationFailure,
    ValidationScope, Violation,
};
pub use handler::{ErrorBoundary, ExceptionResolutionHandler, FallbackResolutionHandler};
pub use recorder::{DiagnosticRecorder, LogEntry, LogPolicy, LogSink, TracingSink};
pub use resolver::{ContractResolver, Resolution};

// Re-export core types
pub use core_types::{
    ContractError, Descriptor, ErrorCategory, ErrorContract, ErrorResponse, ErrorSeverity,
    Metadata,
};
