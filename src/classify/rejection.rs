//! Classifier for requests the web framework refused before application code ran.

use super::{Classification, Classifier, Verdict};
use crate::catalog::{ErrorCatalog, Role};
use crate::error::BodyReadError;
use crate::failure::RequestRejection;
use std::error::Error;

/// Claims [`RequestRejection`]s and bare [`BodyReadError`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestRejectionClassifier;

impl Classifier for RequestRejectionClassifier {
    fn name(&self) -> &str {
        "request_rejection"
    }

    fn classify(&self, failure: &(dyn Error + 'static), catalog: &ErrorCatalog) -> Verdict {
        if let Some(rejection) = failure.downcast_ref::<RequestRejection>() {
            return Verdict::Handle(classify_rejection(rejection, catalog));
        }
        if let Some(body) = failure.downcast_ref::<BodyReadError>() {
            return Verdict::Handle(
                Classification::single(catalog.role(Role::MalformedRequest).clone())
                    .with_diagnostic("body_read_failure", body.reason.clone()),
            );
        }
        Verdict::Decline
    }
}

fn classify_rejection(rejection: &RequestRejection, catalog: &ErrorCatalog) -> Classification {
    let role = |role: Role| catalog.role(role).clone();

    match rejection {
        RequestRejection::NotFound => Classification::single(role(Role::NotFound)),
        RequestRejection::MethodNotAllowed { allowed } => {
            let classification = Classification::single(role(Role::MethodNotAllowed));
            if allowed.is_empty() {
                classification
            } else {
                classification.with_header("Allow", vec![allowed.join(", ")])
            }
        }
        RequestRejection::NotAcceptable => {
            Classification::single(role(Role::NoAcceptableRepresentation))
        }
        RequestRejection::UnsupportedMediaType { content_type } => {
            let classification = Classification::single(role(Role::UnsupportedMediaType));
            match content_type {
                Some(content_type) => {
                    classification.with_diagnostic("content_type", content_type.clone())
                }
                None => classification,
            }
        }
        RequestRejection::MissingParameter { name } => Classification::single(
            role(Role::MissingExpectedContent).with_metadata("missing_param", name.as_str()),
        ),
        RequestRejection::TypeMismatch { name, expected } => Classification::single(
            role(Role::TypeConversion)
                .with_metadata("bad_property_name", name.as_str())
                .with_metadata("required_type", expected.as_str()),
        ),
        RequestRejection::MalformedBody { detail } => {
            Classification::single(role(Role::MalformedRequest))
                .with_diagnostic("malformed_body_detail", detail.clone())
        }
        RequestRejection::BodyUnreadable(body) => {
            Classification::single(role(Role::MalformedRequest))
                .with_diagnostic("body_read_failure", body.reason.clone())
        }
        RequestRejection::Unauthorized { challenge } => {
            let classification = Classification::single(role(Role::Unauthorized));
            match challenge {
                Some(challenge) => {
                    classification.with_header("WWW-Authenticate", vec![challenge.clone()])
                }
                None => classification,
            }
        }
        RequestRejection::Forbidden => Classification::single(role(Role::Forbidden)),
        RequestRejection::TooManyRequests { retry_after_secs } => {
            let classification = Classification::single(role(Role::TooManyRequests));
            match retry_after_secs {
                Some(secs) => classification.with_header("Retry-After", vec![secs.to_string()]),
                None => classification,
            }
        }
        RequestRejection::BadRequest { detail } => {
            Classification::single(role(Role::GenericBadRequest))
                .with_diagnostic("bad_request_detail", detail.clone())
        }
        RequestRejection::ServiceUnavailable => {
            Classification::single(role(Role::TemporaryServiceProblem))
        }
    }
}
