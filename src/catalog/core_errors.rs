//! Organization-wide common descriptors covering every [`Role`].
//!
//! Deployments that don't maintain their own common set build on these via
//! [`ErrorCatalog::with_core`](super::ErrorCatalog::with_core). Common
//! descriptors are exempt from code-range checks.

use super::range::status;
use super::roles::Role;
use crate::core_types::descriptor::Descriptor;

struct CoreEntry {
    role: Role,
    name: &'static str,
    code: &'static str,
    message: &'static str,
    http_status: u16,
}

const CORE_ENTRIES: [CoreEntry; 16] = [
    CoreEntry {
        role: Role::GenericServiceError,
        name: "GENERIC_SERVICE_ERROR",
        code: "10",
        message: "An error occurred while fulfilling the request",
        http_status: status::INTERNAL_SERVER_ERROR,
    },
    CoreEntry {
        role: Role::DownstreamUnrecoverable,
        name: "DOWNSTREAM_UNRECOVERABLE_ERROR",
        code: "20",
        message: "An outside dependency returned an unrecoverable error",
        http_status: status::INTERNAL_SERVER_ERROR,
    },
    CoreEntry {
        role: Role::ServersideValidation,
        name: "SERVERSIDE_VALIDATION_ERROR",
        code: "30",
        message: "An error occurred while fulfilling the request",
        http_status: status::INTERNAL_SERVER_ERROR,
    },
    CoreEntry {
        role: Role::TemporaryServiceProblem,
        name: "TEMPORARY_SERVICE_PROBLEM",
        code: "40",
        message: "A temporary error occurred. The request may be retried",
        http_status: status::SERVICE_UNAVAILABLE,
    },
    CoreEntry {
        role: Role::DownstreamTemporary,
        name: "DOWNSTREAM_TEMPORARY_ERROR",
        code: "50",
        message: "An outside dependency is temporarily unavailable. The request may be retried",
        http_status: status::SERVICE_UNAVAILABLE,
    },
    CoreEntry {
        role: Role::Unauthorized,
        name: "UNAUTHORIZED",
        code: "60",
        message: "Unauthorized access",
        http_status: status::UNAUTHORIZED,
    },
    CoreEntry {
        role: Role::Forbidden,
        name: "FORBIDDEN",
        code: "70",
        message: "Forbidden access",
        http_status: status::FORBIDDEN,
    },
    CoreEntry {
        role: Role::GenericBadRequest,
        name: "GENERIC_BAD_REQUEST",
        code: "80",
        message: "Invalid request",
        http_status: status::BAD_REQUEST,
    },
    CoreEntry {
        role: Role::MissingExpectedContent,
        name: "MISSING_EXPECTED_CONTENT",
        code: "90",
        message: "Missing expected content",
        http_status: status::BAD_REQUEST,
    },
    CoreEntry {
        role: Role::TypeConversion,
        name: "TYPE_CONVERSION_ERROR",
        code: "100",
        message: "Type conversion error",
        http_status: status::BAD_REQUEST,
    },
    CoreEntry {
        role: Role::MalformedRequest,
        name: "MALFORMED_REQUEST",
        code: "110",
        message: "Malformed request",
        http_status: status::BAD_REQUEST,
    },
    CoreEntry {
        role: Role::NotFound,
        name: "NOT_FOUND",
        code: "404",
        message: "The requested resource was not found",
        http_status: status::NOT_FOUND,
    },
    CoreEntry {
        role: Role::MethodNotAllowed,
        name: "METHOD_NOT_ALLOWED",
        code: "405",
        message: "Request method not supported",
        http_status: status::METHOD_NOT_ALLOWED,
    },
    CoreEntry {
        role: Role::NoAcceptableRepresentation,
        name: "NO_ACCEPTABLE_REPRESENTATION",
        code: "406",
        message: "No acceptable representation for this resource",
        http_status: status::NOT_ACCEPTABLE,
    },
    CoreEntry {
        role: Role::UnsupportedMediaType,
        name: "UNSUPPORTED_MEDIA_TYPE",
        code: "415",
        message: "Unsupported media type",
        http_status: status::UNSUPPORTED_MEDIA_TYPE,
    },
    CoreEntry {
        role: Role::TooManyRequests,
        name: "TOO_MANY_REQUESTS",
        code: "429",
        message: "Too many requests",
        http_status: status::TOO_MANY_REQUESTS,
    },
];

impl CoreEntry {
    fn descriptor(&self) -> Descriptor {
        Descriptor::new(self.name, self.code, self.message, self.http_status)
    }
}

/// The common descriptor set, one per role.
pub fn core_descriptors() -> Vec<Descriptor> {
    CORE_ENTRIES.iter().map(CoreEntry::descriptor).collect()
}

/// Bindings of every role to its core descriptor.
pub fn core_role_bindings() -> Vec<(Role, Descriptor)> {
    CORE_ENTRIES
        .iter()
        .map(|entry| (entry.role, entry.descriptor()))
        .collect()
}

/// The core descriptor bound to `role`.
pub fn core_descriptor(role: Role) -> Descriptor {
    CORE_ENTRIES
        .iter()
        .find(|entry| entry.role == role)
        .map(CoreEntry::descriptor)
        .unwrap_or_else(|| CORE_ENTRIES[0].descriptor())
}
