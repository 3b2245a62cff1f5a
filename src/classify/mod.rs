//! Classification: mapping an arbitrary failure to candidate descriptors.
//!
//! A [`Classifier`] looks at one (already unwrapped) failure and either
//! declines or returns a [`Classification`]. The [`ClassifierChain`] runs
//! classifiers in registration order and stops at the first one that claims
//! the failure.
//!
//! ## Built-in classifiers
//!
//! - [`ServiceFailureClassifier`] - failures raised deliberately with descriptors
//! - [`ValidationClassifier`] - constraint violations from validation frameworks
//! - [`RequestRejectionClassifier`] - framework-level request rejections
//! - [`RemoteCallClassifier`] - failed calls to downstream services

pub mod chain;
pub mod rejection;
pub mod remote;
pub mod service;
pub mod validation;

pub use chain::{ClassifierChain, WrapperKind};
pub use rejection::RequestRejectionClassifier;
pub use remote::{network_diagnostics, RemoteCallClassifier};
pub use service::ServiceFailureClassifier;
pub use validation::ValidationClassifier;

use crate::catalog::ErrorCatalog;
use crate::core_types::descriptor::Descriptor;
use std::collections::BTreeSet;
use std::error::Error;

/// Outcome of running a classifier (or the whole chain) against a failure.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    /// Not this classifier's failure to interpret.
    Decline,
    /// Claimed, with the resulting classification.
    Handle(Classification),
}

impl Verdict {
    pub fn is_handled(&self) -> bool {
        matches!(self, Verdict::Handle(_))
    }

    pub fn into_classification(self) -> Option<Classification> {
        match self {
            Verdict::Decline => None,
            Verdict::Handle(classification) => Some(classification),
        }
    }
}

/// A single policy unit mapping failures to descriptors.
pub trait Classifier: Send + Sync {
    /// Short identifier for logs.
    fn name(&self) -> &str;

    /// Inspect `failure` and decline or claim it.
    fn classify(&self, failure: &(dyn Error + 'static), catalog: &ErrorCatalog) -> Verdict;
}

/// A classifier built from a closure.
///
/// ```rust
/// use error_contract::{Classification, FnClassifier, Role, Verdict};
///
/// let timeouts = FnClassifier::new("timeouts", |failure, catalog| {
///     match failure.downcast_ref::<std::io::Error>() {
///         Some(io) if io.kind() == std::io::ErrorKind::TimedOut => Verdict::Handle(
///             Classification::single(catalog.role(Role::TemporaryServiceProblem).clone()),
///         ),
///         _ => Verdict::Decline,
///     }
/// });
/// # let _ = timeouts;
/// ```
pub struct FnClassifier<F> {
    name: String,
    classify: F,
}

impl<F> FnClassifier<F>
where
    F: Fn(&(dyn Error + 'static), &ErrorCatalog) -> Verdict + Send + Sync,
{
    pub fn new(name: impl Into<String>, classify: F) -> Self {
        Self {
            name: name.into(),
            classify,
        }
    }
}

impl<F> Classifier for FnClassifier<F>
where
    F: Fn(&(dyn Error + 'static), &ErrorCatalog) -> Verdict + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn classify(&self, failure: &(dyn Error + 'static), catalog: &ErrorCatalog) -> Verdict {
        (self.classify)(failure, catalog)
    }
}

/// Per-failure classifier output: descriptors plus log and header extras.
///
/// Descriptors are deduplicated and kept in natural order (by name) so the
/// resulting contract is deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classification {
    descriptors: BTreeSet<Descriptor>,
    diagnostic_fields: Vec<(String, String)>,
    response_headers: Vec<(String, Vec<String>)>,
}

impl Classification {
    pub fn new(descriptors: impl IntoIterator<Item = Descriptor>) -> Self {
        Self {
            descriptors: descriptors.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn single(descriptor: Descriptor) -> Self {
        Self::new([descriptor])
    }

    pub fn with_diagnostic(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.diagnostic_fields.push((key.into(), value.into()));
        self
    }

    pub fn with_diagnostics(mut self, fields: impl IntoIterator<Item = (String, String)>) -> Self {
        self.diagnostic_fields.extend(fields);
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, values: Vec<String>) -> Self {
        self.response_headers.push((name.into(), values));
        self
    }

    pub fn with_headers(
        mut self,
        headers: impl IntoIterator<Item = (String, Vec<String>)>,
    ) -> Self {
        self.response_headers.extend(headers);
        self
    }

    /// Descriptors in natural order.
    pub fn descriptors(&self) -> impl Iterator<Item = &Descriptor> {
        self.descriptors.iter()
    }

    pub fn descriptor_count(&self) -> usize {
        self.descriptors.len()
    }

    pub fn diagnostic_fields(&self) -> &[(String, String)] {
        &self.diagnostic_fields
    }

    pub fn response_headers(&self) -> &[(String, Vec<String>)] {
        &self.response_headers
    }

    /// Split into (ordered descriptors, diagnostic fields, response headers).
    pub fn into_parts(
        self,
    ) -> (
        Vec<Descriptor>,
        Vec<(String, String)>,
        Vec<(String, Vec<String>)>,
    ) {
        (
            self.descriptors.into_iter().collect(),
            self.diagnostic_fields,
            self.response_headers,
        )
    }
}
