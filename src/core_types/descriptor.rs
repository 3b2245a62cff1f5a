//! Error descriptors: the immutable definition of one kind of public error.
//!
//! A [`Descriptor`] is everything a client is ever told about a failure: a
//! stable machine-readable `code`, a static `message`, the HTTP status, and
//! optional public `metadata`. The `name` is never serialized to clients; it is
//! the key used for logging, catalog lookups, and cross-service correlation.
//!
//! # Wrappers
//!
//! A descriptor may present another descriptor's code/message/status under a
//! different name or with extra metadata. That relationship is plain value
//! comparison ([`Descriptor::wraps`]), not a type hierarchy:
//!
//! ```rust
//! use error_contract::Descriptor;
//!
//! let base = Descriptor::new("GENERIC_BAD_REQUEST", "80", "Invalid request", 400);
//! let field_error = base.with_metadata("field", "email");
//!
//! assert!(field_error.wraps(&base));
//! assert_eq!(field_error.code(), "80");
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

/// Public metadata attached to a descriptor (e.g. which field failed validation).
pub type Metadata = BTreeMap<String, Value>;

/// One kind of error, as defined by the deployment's catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Descriptor {
    name: String,
    code: String,
    message: String,
    http_status: u16,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    metadata: Metadata,
}

impl Descriptor {
    /// Create a descriptor without metadata.
    pub fn new(
        name: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
        http_status: u16,
    ) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
            message: message.into(),
            http_status,
            metadata: Metadata::new(),
        }
    }

    /// Create a wrapper of `base`: same code, message and status under a new name.
    pub fn wrapping(base: &Descriptor, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: base.code.clone(),
            message: base.message.clone(),
            http_status: base.http_status,
            metadata: base.metadata.clone(),
        }
    }

    /// Copy of this descriptor with one metadata entry added (or replaced).
    pub fn with_metadata(&self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut copy = self.clone();
        copy.metadata.insert(key.into(), value.into());
        copy
    }

    /// Copy of this descriptor with every entry of `extra` merged into its metadata.
    pub fn with_all_metadata(&self, extra: Metadata) -> Self {
        let mut copy = self.clone();
        copy.metadata.extend(extra);
        copy
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn http_status(&self) -> u16 {
        self.http_status
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// True when both descriptors present the same code, message and status.
    pub fn same_contract(&self, other: &Descriptor) -> bool {
        self.code == other.code
            && self.message == other.message
            && self.http_status == other.http_status
    }

    /// True when `self` is a wrapper of `base`: same public contract, but a
    /// different name or different metadata.
    pub fn wraps(&self, base: &Descriptor) -> bool {
        self.same_contract(base) && (self.name != base.name || self.metadata != base.metadata)
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}/{})", self.name, self.code, self.http_status)
    }
}

// Natural ordering is by name so classification output is deterministic. The
// remaining fields only break ties between wrappers sharing a name.
impl Ord for Descriptor {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name
            .cmp(&other.name)
            .then_with(|| self.code.cmp(&other.code))
            .then_with(|| self.http_status.cmp(&other.http_status))
            .then_with(|| self.message.cmp(&other.message))
            .then_with(|| compare_metadata(&self.metadata, &other.metadata))
    }
}

impl PartialOrd for Descriptor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn compare_metadata(left: &Metadata, right: &Metadata) -> Ordering {
    let mut left_entries = left.iter();
    let mut right_entries = right.iter();
    loop {
        match (left_entries.next(), right_entries.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some((lk, lv)), Some((rk, rv))) => {
                // serde_json::Value has no total order; its compact rendering does.
                let ordering = lk.cmp(rk).then_with(|| lv.to_string().cmp(&rv.to_string()));
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
        }
    }
}
