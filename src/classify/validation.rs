//! Classifier for constraint violations reported by validation frameworks.

use super::{Classification, Classifier, Verdict};
use crate::catalog::{ErrorCatalog, Role};
use crate::core_types::descriptor::Descriptor;
use crate::failure::{ValidationFailure, ValidationScope, Violation};
use std::error::Error;

/// Claims [`ValidationFailure`]s.
///
/// Client-scope violations each become a descriptor: the message key is
/// looked up by name in the catalog (falling back to the generic bad-request
/// role) and the failing field is attached as `field` metadata. Server-scope
/// violations mean the service produced invalid data itself, so they map to
/// the server-side validation role without exposing field names.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidationClassifier;

impl Classifier for ValidationClassifier {
    fn name(&self) -> &str {
        "validation"
    }

    fn classify(&self, failure: &(dyn Error + 'static), catalog: &ErrorCatalog) -> Verdict {
        let Some(validation) = failure.downcast_ref::<ValidationFailure>() else {
            return Verdict::Decline;
        };

        let classification = match validation.scope {
            ValidationScope::Client => classify_client(&validation.violations, catalog),
            ValidationScope::Server => {
                Classification::single(catalog.role(Role::ServersideValidation).clone())
            }
        };

        Verdict::Handle(classification.with_diagnostic(
            "constraint_violation_details",
            render_details(&validation.violations),
        ))
    }
}

fn classify_client(violations: &[Violation], catalog: &ErrorCatalog) -> Classification {
    let bad_request = catalog.role(Role::GenericBadRequest);
    if violations.is_empty() {
        return Classification::single(bad_request.clone());
    }

    let mut unresolved = Vec::new();
    let descriptors: Vec<Descriptor> = violations
        .iter()
        .map(|violation| {
            if catalog.lookup_by_name(&violation.message_key).is_none() {
                unresolved.push(violation.message_key.as_str());
            }
            let descriptor = catalog.lookup_by_name_or(&violation.message_key, bad_request);
            match &violation.field {
                Some(field) => descriptor.with_metadata("field", field.as_str()),
                None => descriptor.clone(),
            }
        })
        .collect();

    let classification = Classification::new(descriptors);
    if unresolved.is_empty() {
        classification
    } else {
        classification.with_diagnostic("unresolved_message_keys", unresolved.join(","))
    }
}

fn render_details(violations: &[Violation]) -> String {
    let rendered: Vec<String> = violations
        .iter()
        .map(|violation| {
            let mut entry = match &violation.field {
                Some(field) => format!("{field}: {}", violation.message_key),
                None => violation.message_key.clone(),
            };
            if let Some(detail) = &violation.detail {
                entry.push_str(&format!(" ({detail})"));
            }
            entry
        })
        .collect();
    format!("[{}]", rendered.join("; "))
}
