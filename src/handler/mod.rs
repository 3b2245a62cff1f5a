//! Request-boundary handlers.
//!
//! ```text
//!            ┌──────────────────────────────┐  decline / HandlerInternalError
//! Failure ──▶│ ExceptionResolutionHandler   │──────────────────────────────┐
//!            │ chain → resolver → recorder  │                              ▼
//!            └──────────────┬───────────────┘        ┌───────────────────────────────┐
//!                           │ ErrorResponse          │ FallbackResolutionHandler     │
//!                           ▼                        │ generic error, never fails    │
//!                     ErrorBoundary ◀────────────────┴───────────────────────────────┘
//! ```
//!
//! The fallback handler shares the catalog and recorder with the exception
//! handler but never touches the classifier chain.

pub mod boundary;
pub mod exception;
pub mod fallback;

pub use boundary::ErrorBoundary;
pub use exception::ExceptionResolutionHandler;
pub use fallback::FallbackResolutionHandler;
