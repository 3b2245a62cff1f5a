//! Classifier for failures raised deliberately by application code.

use super::{Classification, Classifier, Verdict};
use crate::catalog::ErrorCatalog;
use crate::failure::ServiceFailure;
use std::error::Error;

/// Claims [`ServiceFailure`]s, passing their descriptors, diagnostic fields
/// and response headers through unchanged.
///
/// A `ServiceFailure` raised with no descriptors is still claimed; the
/// resolver substitutes the generic service error for the empty set.
#[derive(Debug, Clone, Copy, Default)]
pub struct ServiceFailureClassifier;

impl Classifier for ServiceFailureClassifier {
    fn name(&self) -> &str {
        "service_failure"
    }

    fn classify(&self, failure: &(dyn Error + 'static), _catalog: &ErrorCatalog) -> Verdict {
        let Some(service) = failure.downcast_ref::<ServiceFailure>() else {
            return Verdict::Decline;
        };

        Verdict::Handle(
            Classification::new(service.descriptors().iter().cloned())
                .with_diagnostics(service.diagnostic_fields().iter().cloned())
                .with_headers(service.response_headers().iter().cloned()),
        )
    }
}
