//! Conflict resolution: collapsing a classification to one status and a
//! consistent descriptor subset.
//!
//! ```text
//! descriptors {400, 401, 503} ──highest_priority_status──▶ 401
//!                             ──filter_by_status(401)────▶ [the 401 descriptor]
//! ```
//!
//! If anything along the way yields no descriptors (empty classification, a
//! status missing from the priority order) the generic service error is
//! substituted and the substitution is flagged in the diagnostic fields.

use crate::catalog::{ErrorCatalog, Role};
use crate::classify::Classification;
use crate::core_types::descriptor::Descriptor;
use crate::logging::{log_debug, log_error};

/// Diagnostic field set when the resolver had to substitute the generic error.
pub const ANOMALY_FIELD: &str = "bad_handler_logic";

/// The resolved outcome for one classified failure.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub status: u16,
    /// Never empty.
    pub descriptors: Vec<Descriptor>,
    pub diagnostic_fields: Vec<(String, String)>,
    pub response_headers: Vec<(String, Vec<String>)>,
    /// True when the generic service error was substituted.
    pub anomaly: bool,
}

/// Stateless resolver; see the module docs.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContractResolver;

impl ContractResolver {
    pub fn new() -> Self {
        Self
    }

    /// Resolve `classification` against `catalog`.
    ///
    /// Always returns at least one descriptor, all sharing `status`.
    pub fn resolve(&self, classification: Classification, catalog: &ErrorCatalog) -> Resolution {
        let (candidates, mut diagnostic_fields, response_headers) = classification.into_parts();

        let resolved = catalog
            .highest_priority_status(&candidates)
            .map(|status| (status, catalog.filter_by_status(&candidates, status)));

        match resolved {
            Some((status, descriptors)) if !descriptors.is_empty() => {
                log_debug!(
                    status = status,
                    candidate_count = candidates.len(),
                    resolved_count = descriptors.len(),
                    "Classification resolved"
                );
                Resolution {
                    status,
                    descriptors,
                    diagnostic_fields,
                    response_headers,
                    anomaly: false,
                }
            }
            _ => {
                let generic = catalog.role(Role::GenericServiceError).clone();
                let candidate_statuses: Vec<u16> =
                    candidates.iter().map(Descriptor::http_status).collect();
                log_error!(
                    candidate_count = candidates.len(),
                    candidate_statuses = ?candidate_statuses,
                    substituted = generic.name(),
                    "Classification resolved to no descriptors; substituting generic service error"
                );
                diagnostic_fields.push((ANOMALY_FIELD.to_string(), "true".to_string()));
                Resolution {
                    status: generic.http_status(),
                    descriptors: vec![generic],
                    diagnostic_fields,
                    response_headers,
                    anomaly: true,
                }
            }
        }
    }
}
