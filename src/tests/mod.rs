// Test modules for error-contract crate
//
// Test organization follows the template pattern where each source file
// has a corresponding test file that focuses on business logic verification.

// Test helper utilities (fixtures, sinks and request contexts)
pub mod helpers;

pub mod classifiers;
pub mod config;
