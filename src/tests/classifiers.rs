// Unit Tests for the Built-in Classifiers
//
// UNIT UNDER TEST: ServiceFailureClassifier, ValidationClassifier,
//                  RequestRejectionClassifier, RemoteCallClassifier
//
// BUSINESS RESPONSIBILITY:
//   - Map each recognized failure family onto catalog descriptors
//   - Attach public metadata and protocol headers clients rely on
//   - Keep internal detail in diagnostic fields, never in the contract
//   - Decline anything outside their family
//
// TEST COVERAGE:
//   - Service failure passthrough of descriptors, fields and headers
//   - Client and server-side validation mapping
//   - Rejection role mapping with Allow / WWW-Authenticate / Retry-After
//   - Remote call temporary vs unrecoverable mapping

use crate::catalog::Role;
use crate::classify::{
    Classification, Classifier, RemoteCallClassifier, RequestRejectionClassifier,
    ServiceFailureClassifier, ValidationClassifier, Verdict,
};
use crate::core_types::descriptor::Descriptor;
use crate::error::BodyReadError;
use crate::failure::{
    ConnectionFailureKind, RemoteCallFailure, RequestRejection, ServiceFailure, ValidationFailure,
    Violation,
};
use crate::tests::helpers::{order_not_found, quantity_too_large, test_catalog, UnknownError};
use std::error::Error;

fn claimed(classifier: &dyn Classifier, failure: &(dyn Error + 'static)) -> Classification {
    let catalog = test_catalog();
    match classifier.classify(failure, &catalog) {
        Verdict::Handle(classification) => classification,
        Verdict::Decline => panic!("{} should have claimed {failure}", classifier.name()),
    }
}

fn names(classification: &Classification) -> Vec<String> {
    classification.descriptors().map(|d| d.name().to_string()).collect()
}

fn header<'a>(classification: &'a Classification, name: &str) -> Option<&'a Vec<String>> {
    classification
        .response_headers()
        .iter()
        .find(|(header, _)| header == name)
        .map(|(_, values)| values)
}

#[cfg(test)]
mod service_failure_tests {
    use super::*;

    #[test]
    fn test_passes_descriptors_fields_and_headers_through() {
        // Arrange
        let failure = ServiceFailure::new(order_not_found())
            .and_descriptor(quantity_too_large())
            .with_diagnostic("order_id", "42")
            .with_header("Cache-Control", vec!["no-store".to_string()]);

        // Act
        let classification = claimed(&ServiceFailureClassifier, &failure);

        // Assert
        assert_eq!(names(&classification), vec!["ORDER_NOT_FOUND", "QUANTITY_TOO_LARGE"]);
        assert_eq!(
            classification.diagnostic_fields(),
            &[("order_id".to_string(), "42".to_string())]
        );
        assert_eq!(
            header(&classification, "Cache-Control"),
            Some(&vec!["no-store".to_string()])
        );
    }

    #[test]
    fn test_repeated_descriptor_is_deduplicated() {
        // Arrange
        let failure = ServiceFailure::with_descriptors(vec![
            order_not_found(),
            order_not_found(),
            order_not_found(),
        ]);

        // Act
        let classification = claimed(&ServiceFailureClassifier, &failure);

        // Assert
        assert_eq!(classification.descriptor_count(), 1);
    }

    #[test]
    fn test_declines_other_failures() {
        // Arrange
        let catalog = test_catalog();

        // Act
        let verdict = ServiceFailureClassifier.classify(&UnknownError("x"), &catalog);

        // Assert
        assert_eq!(verdict, Verdict::Decline);
    }
}

#[cfg(test)]
mod validation_tests {
    use super::*;

    #[test]
    fn test_client_violations_resolve_message_keys_with_field_metadata() {
        // Test verifies message keys map back to catalog descriptors by name
        // and the failing field becomes public metadata

        // Arrange
        let failure = ValidationFailure::client(vec![Violation::new("quantity", "QUANTITY_TOO_LARGE")
            .with_detail("must be <= 100, was 250")]);

        // Act
        let classification = claimed(&ValidationClassifier, &failure);

        // Assert
        let descriptor = classification.descriptors().next().expect("one descriptor");
        assert_eq!(descriptor.name(), "QUANTITY_TOO_LARGE");
        assert_eq!(descriptor.metadata()["field"], "quantity");
        let details = &classification.diagnostic_fields()[0];
        assert_eq!(details.0, "constraint_violation_details");
        assert!(details.1.contains("must be <= 100, was 250"));
    }

    #[test]
    fn test_unknown_message_key_falls_back_to_generic_bad_request() {
        // Arrange
        let failure = ValidationFailure::client(vec![Violation::new("email", "EMAIL_FORMAT")]);

        // Act
        let classification = claimed(&ValidationClassifier, &failure);

        // Assert
        let descriptor = classification.descriptors().next().expect("one descriptor");
        assert_eq!(descriptor.name(), "GENERIC_BAD_REQUEST");
        assert_eq!(descriptor.metadata()["field"], "email");
        assert!(classification
            .diagnostic_fields()
            .contains(&("unresolved_message_keys".to_string(), "EMAIL_FORMAT".to_string())));
    }

    #[test]
    fn test_global_violation_has_no_field_metadata() {
        // Arrange
        let failure = ValidationFailure::client(vec![Violation::global("ORDER_NOT_FOUND")]);

        // Act
        let classification = claimed(&ValidationClassifier, &failure);

        // Assert
        assert_eq!(classification.descriptors().next(), Some(&order_not_found()));
    }

    #[test]
    fn test_server_side_violations_hide_field_names() {
        // Test verifies invalid data produced by the service maps to a 5xx role
        // without exposing internal field names to the client

        // Arrange
        let failure = ValidationFailure::server(vec![Violation::new("internal_total", "NEGATIVE")]);

        // Act
        let classification = claimed(&ValidationClassifier, &failure);

        // Assert
        let descriptor = classification.descriptors().next().expect("one descriptor");
        assert_eq!(descriptor.name(), "SERVERSIDE_VALIDATION_ERROR");
        assert!(descriptor.metadata().is_empty());
        assert!(classification.diagnostic_fields()[0].1.contains("internal_total"));
    }
}

#[cfg(test)]
mod rejection_tests {
    use super::*;

    fn role_name(role: Role) -> String {
        test_catalog().role(role).name().to_string()
    }

    #[test]
    fn test_method_not_allowed_sets_allow_header() {
        // Arrange
        let failure = RequestRejection::MethodNotAllowed {
            allowed: vec!["GET".to_string(), "HEAD".to_string()],
        };

        // Act
        let classification = claimed(&RequestRejectionClassifier, &failure);

        // Assert
        assert_eq!(names(&classification), vec![role_name(Role::MethodNotAllowed)]);
        assert_eq!(header(&classification, "Allow"), Some(&vec!["GET, HEAD".to_string()]));
    }

    #[test]
    fn test_unauthorized_sets_challenge_header() {
        // Arrange
        let failure = RequestRejection::Unauthorized {
            challenge: Some("Bearer realm=\"orders\"".to_string()),
        };

        // Act
        let classification = claimed(&RequestRejectionClassifier, &failure);

        // Assert
        assert_eq!(names(&classification), vec![role_name(Role::Unauthorized)]);
        assert!(header(&classification, "WWW-Authenticate").is_some());
    }

    #[test]
    fn test_too_many_requests_sets_retry_after() {
        // Arrange
        let failure = RequestRejection::TooManyRequests {
            retry_after_secs: Some(30),
        };

        // Act
        let classification = claimed(&RequestRejectionClassifier, &failure);

        // Assert
        assert_eq!(names(&classification), vec![role_name(Role::TooManyRequests)]);
        assert_eq!(header(&classification, "Retry-After"), Some(&vec!["30".to_string()]));
    }

    #[test]
    fn test_missing_parameter_and_type_mismatch_metadata() {
        // Arrange
        let missing = RequestRejection::MissingParameter {
            name: "page".to_string(),
        };
        let mismatch = RequestRejection::TypeMismatch {
            name: "limit".to_string(),
            expected: "integer".to_string(),
        };

        // Act
        let missing = claimed(&RequestRejectionClassifier, &missing);
        let mismatch = claimed(&RequestRejectionClassifier, &mismatch);

        // Assert
        let missing: Vec<&Descriptor> = missing.descriptors().collect();
        assert_eq!(missing[0].name(), role_name(Role::MissingExpectedContent));
        assert_eq!(missing[0].metadata()["missing_param"], "page");
        let mismatch: Vec<&Descriptor> = mismatch.descriptors().collect();
        assert_eq!(mismatch[0].name(), role_name(Role::TypeConversion));
        assert_eq!(mismatch[0].metadata()["bad_property_name"], "limit");
        assert_eq!(mismatch[0].metadata()["required_type"], "integer");
    }

    #[test]
    fn test_unreadable_body_is_malformed_request() {
        // Arrange
        let wrapped = RequestRejection::from(BodyReadError::new("stream closed"));
        let bare = BodyReadError::new("stream closed");

        // Act
        let wrapped = claimed(&RequestRejectionClassifier, &wrapped);
        let bare = claimed(&RequestRejectionClassifier, &bare);

        // Assert
        assert_eq!(names(&wrapped), vec![role_name(Role::MalformedRequest)]);
        assert_eq!(names(&bare), vec![role_name(Role::MalformedRequest)]);
        assert!(bare
            .diagnostic_fields()
            .contains(&("body_read_failure".to_string(), "stream closed".to_string())));
    }

    #[test]
    fn test_simple_rejections_map_to_their_roles() {
        // Arrange
        let cases = vec![
            (RequestRejection::NotFound, Role::NotFound),
            (RequestRejection::NotAcceptable, Role::NoAcceptableRepresentation),
            (
                RequestRejection::UnsupportedMediaType { content_type: None },
                Role::UnsupportedMediaType,
            ),
            (RequestRejection::Forbidden, Role::Forbidden),
            (RequestRejection::ServiceUnavailable, Role::TemporaryServiceProblem),
        ];

        for (rejection, role) in cases {
            // Act
            let classification = claimed(&RequestRejectionClassifier, &rejection);

            // Assert
            assert_eq!(names(&classification), vec![role_name(role)], "{rejection:?}");
        }
    }
}

#[cfg(test)]
mod remote_call_tests {
    use super::*;

    fn remote(kind: ConnectionFailureKind) -> RemoteCallFailure {
        RemoteCallFailure::new("payments", kind)
    }

    #[test]
    fn test_temporary_downstream_failures() {
        // Test verifies timeouts, unreachable hosts, 503 and 429 are temporary

        // Arrange
        let cases = vec![
            remote(ConnectionFailureKind::Timeout { after_ms: 2000 }),
            remote(ConnectionFailureKind::Unreachable),
            remote(ConnectionFailureKind::Status { status: 503, body: None }),
            remote(ConnectionFailureKind::Status { status: 429, body: None }),
        ];

        for failure in cases {
            // Act
            let classification = claimed(&RemoteCallClassifier, &failure);

            // Assert
            assert_eq!(names(&classification), vec!["DOWNSTREAM_TEMPORARY_ERROR"], "{failure}");
        }
    }

    #[test]
    fn test_other_downstream_statuses_are_unrecoverable() {
        // Arrange
        let failure = remote(ConnectionFailureKind::Status {
            status: 500,
            body: Some("x".repeat(2000)),
        });

        // Act
        let classification = claimed(&RemoteCallClassifier, &failure);

        // Assert
        assert_eq!(names(&classification), vec!["DOWNSTREAM_UNRECOVERABLE_ERROR"]);
        let body = failure
            .diagnostic_fields()
            .into_iter()
            .find(|(key, _)| key == "remote_body")
            .expect("body excerpt");
        assert_eq!(body.1.len(), 512);
    }

    #[test]
    fn test_reqwest_builder_error_is_unrecoverable() {
        // Arrange
        let failure = reqwest::Client::new()
            .get("::not a url::")
            .build()
            .expect_err("invalid url should fail to build");

        // Act
        let classification = claimed(&RemoteCallClassifier, &failure);

        // Assert
        assert_eq!(names(&classification), vec!["DOWNSTREAM_UNRECOVERABLE_ERROR"]);
    }
}
