//! Named slots every catalog must fill.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A special-purpose slot in the catalog, bound to exactly one descriptor.
///
/// The engine itself only ever produces descriptors through roles (plus
/// whatever application code names explicitly), so a catalog with every role
/// bound can answer any failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Catch-all for unexpected server-side failures. Also the fallback role.
    GenericServiceError,
    /// A downstream dependency failed in a way retrying won't fix.
    DownstreamUnrecoverable,
    /// Data produced by the service itself failed validation.
    ServersideValidation,
    /// This service is temporarily unable to respond.
    TemporaryServiceProblem,
    /// A downstream dependency is temporarily unavailable.
    DownstreamTemporary,
    GenericBadRequest,
    /// Required body or parameter was absent.
    MissingExpectedContent,
    /// A parameter could not be converted to its declared type.
    TypeConversion,
    /// The body could not be parsed or read.
    MalformedRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    MethodNotAllowed,
    NoAcceptableRepresentation,
    UnsupportedMediaType,
    TooManyRequests,
}

impl Role {
    /// Every role, in declaration order.
    pub const ALL: [Role; 16] = [
        Role::GenericServiceError,
        Role::DownstreamUnrecoverable,
        Role::ServersideValidation,
        Role::TemporaryServiceProblem,
        Role::DownstreamTemporary,
        Role::GenericBadRequest,
        Role::MissingExpectedContent,
        Role::TypeConversion,
        Role::MalformedRequest,
        Role::Unauthorized,
        Role::Forbidden,
        Role::NotFound,
        Role::MethodNotAllowed,
        Role::NoAcceptableRepresentation,
        Role::UnsupportedMediaType,
        Role::TooManyRequests,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::GenericServiceError => "generic_service_error",
            Role::DownstreamUnrecoverable => "downstream_unrecoverable",
            Role::ServersideValidation => "serverside_validation",
            Role::TemporaryServiceProblem => "temporary_service_problem",
            Role::DownstreamTemporary => "downstream_temporary",
            Role::GenericBadRequest => "generic_bad_request",
            Role::MissingExpectedContent => "missing_expected_content",
            Role::TypeConversion => "type_conversion",
            Role::MalformedRequest => "malformed_request",
            Role::Unauthorized => "unauthorized",
            Role::Forbidden => "forbidden",
            Role::NotFound => "not_found",
            Role::MethodNotAllowed => "method_not_allowed",
            Role::NoAcceptableRepresentation => "no_acceptable_representation",
            Role::UnsupportedMediaType => "unsupported_media_type",
            Role::TooManyRequests => "too_many_requests",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
