//! Core value types shared by every engine component
//!
//! ## Organization
//! - `descriptor` - The immutable error descriptor and its wrapper relationship
//! - `contract` - Public error contract and the response that carries it
//! - `errors` - Category and severity enums for engine errors and log entries

pub mod contract;
pub mod descriptor;
pub mod errors;

// Re-export commonly used types
pub use contract::{ContractError, ErrorContract, ErrorResponse};
pub use descriptor::{Descriptor, Metadata};
pub use errors::{ErrorCategory, ErrorSeverity};
