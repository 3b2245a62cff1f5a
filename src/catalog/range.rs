//! Code-range isolation and status priority configuration.

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// HTTP status codes the engine refers to by name.
pub mod status {
    pub const BAD_REQUEST: u16 = 400;
    pub const UNAUTHORIZED: u16 = 401;
    pub const FORBIDDEN: u16 = 403;
    pub const NOT_FOUND: u16 = 404;
    pub const METHOD_NOT_ALLOWED: u16 = 405;
    pub const NOT_ACCEPTABLE: u16 = 406;
    pub const CONFLICT: u16 = 409;
    pub const UNSUPPORTED_MEDIA_TYPE: u16 = 415;
    pub const TOO_MANY_REQUESTS: u16 = 429;
    pub const INTERNAL_SERVER_ERROR: u16 = 500;
    pub const SERVICE_UNAVAILABLE: u16 = 503;
}

/// The numeric codes a deployment is allowed to use for its own descriptors.
///
/// Keeping each deployment inside its own range guarantees that codes stay
/// unambiguous across an organization's services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodeRange {
    /// No isolation enforced: any code is accepted.
    AllowAll,
    /// One or more inclusive intervals.
    Intervals(Vec<(u32, u32)>),
}

impl CodeRange {
    /// A single inclusive interval.
    pub fn between(start: u32, end: u32) -> Self {
        Self::Intervals(vec![(start, end)])
    }

    pub fn from_ranges(ranges: impl IntoIterator<Item = RangeInclusive<u32>>) -> Self {
        Self::Intervals(
            ranges
                .into_iter()
                .map(|range| (*range.start(), *range.end()))
                .collect(),
        )
    }

    /// Whether a descriptor code is acceptable.
    ///
    /// Codes that don't parse as unsigned integers are only acceptable under
    /// [`CodeRange::AllowAll`].
    pub fn contains(&self, code: &str) -> bool {
        match self {
            CodeRange::AllowAll => true,
            CodeRange::Intervals(intervals) => match code.trim().parse::<u32>() {
                Ok(value) => intervals
                    .iter()
                    .any(|(start, end)| (*start..=*end).contains(&value)),
                Err(_) => false,
            },
        }
    }
}

impl std::fmt::Display for CodeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CodeRange::AllowAll => write!(f, "any code"),
            CodeRange::Intervals(intervals) => {
                let rendered: Vec<String> = intervals
                    .iter()
                    .map(|(start, end)| format!("{start}-{end}"))
                    .collect();
                write!(f, "[{}]", rendered.join(", "))
            }
        }
    }
}

/// Ordered list of HTTP statuses used to resolve mixed-status classifications.
///
/// Earlier entries win.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusPriority(Vec<u16>);

impl StatusPriority {
    pub fn new(order: Vec<u16>) -> Self {
        Self(order)
    }

    pub fn as_slice(&self) -> &[u16] {
        &self.0
    }

    /// First status of the priority order for which `present` holds.
    pub fn first_matching(&self, mut present: impl FnMut(u16) -> bool) -> Option<u16> {
        self.0.iter().copied().find(|status| present(*status))
    }
}

impl Default for StatusPriority {
    // Authorization and availability signals outrank generic client errors.
    fn default() -> Self {
        Self(vec![
            status::FORBIDDEN,
            status::UNAUTHORIZED,
            status::SERVICE_UNAVAILABLE,
            status::TOO_MANY_REQUESTS,
            status::INTERNAL_SERVER_ERROR,
            status::METHOD_NOT_ALLOWED,
            status::NOT_ACCEPTABLE,
            status::UNSUPPORTED_MEDIA_TYPE,
            status::NOT_FOUND,
            status::CONFLICT,
            status::BAD_REQUEST,
        ])
    }
}
