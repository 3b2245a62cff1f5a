//! Ordered classifier dispatch with wrapper unwrapping.
//!
//! The chain works in two steps:
//!
//! ```text
//! failure ──unwrap──▶ cause ──dispatch──▶ classifier 1 ─decline─▶ classifier 2 ─ ... ─▶ Decline
//!    (while kind is a wrapper kind)            │                      │
//!                                            Handle                 Handle
//! ```
//!
//! Unwrapping follows `Error::source()` while the current failure's concrete
//! type is one of the configured wrapper kinds. A failure that reports itself
//! as its own source is returned as-is.

use super::rejection::RequestRejectionClassifier;
use super::remote::{network_diagnostics, RemoteCallClassifier};
use super::service::ServiceFailureClassifier;
use super::validation::ValidationClassifier;
use super::{Classifier, Verdict};
use crate::catalog::ErrorCatalog;
use crate::failure::{same_error, CompletionFailure, ContextFailure, TaskFailure, MAX_CAUSE_DEPTH};
use crate::logging::{log_debug, log_trace};
use std::error::Error;
use std::fmt;

/// A concrete error type the chain looks through.
#[derive(Clone, Copy)]
pub struct WrapperKind {
    name: &'static str,
    matches: fn(&(dyn Error + 'static)) -> bool,
}

fn is_kind<T: Error + 'static>(error: &(dyn Error + 'static)) -> bool {
    error.is::<T>()
}

impl WrapperKind {
    pub fn of<T: Error + 'static>() -> Self {
        Self {
            name: std::any::type_name::<T>(),
            matches: is_kind::<T>,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn matches(&self, error: &(dyn Error + 'static)) -> bool {
        (self.matches)(error)
    }

    /// Execution wrapper, completion wrapper, and the `anyhow` adapter.
    pub fn defaults() -> Vec<WrapperKind> {
        vec![
            WrapperKind::of::<TaskFailure>(),
            WrapperKind::of::<CompletionFailure>(),
            WrapperKind::of::<ContextFailure>(),
        ]
    }
}

impl fmt::Debug for WrapperKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("WrapperKind").field(&self.name).finish()
    }
}

/// Ordered list of classifiers plus the unwrapping step.
pub struct ClassifierChain {
    classifiers: Vec<Box<dyn Classifier>>,
    wrapper_kinds: Vec<WrapperKind>,
}

impl Default for ClassifierChain {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassifierChain {
    /// Empty chain with the default wrapper kinds.
    pub fn new() -> Self {
        Self {
            classifiers: Vec::new(),
            wrapper_kinds: WrapperKind::defaults(),
        }
    }

    /// Chain with every built-in classifier registered.
    pub fn standard() -> Self {
        Self::new()
            .with_classifier(ServiceFailureClassifier)
            .with_classifier(ValidationClassifier)
            .with_classifier(RequestRejectionClassifier)
            .with_classifier(RemoteCallClassifier)
    }

    /// Append a classifier; it runs after every classifier registered before it.
    pub fn with_classifier(mut self, classifier: impl Classifier + 'static) -> Self {
        self.classifiers.push(Box::new(classifier));
        self
    }

    /// Replace the wrapper kinds.
    pub fn with_wrapper_kinds(mut self, wrapper_kinds: Vec<WrapperKind>) -> Self {
        self.wrapper_kinds = wrapper_kinds;
        self
    }

    pub fn add_wrapper_kind(mut self, wrapper_kind: WrapperKind) -> Self {
        self.wrapper_kinds.push(wrapper_kind);
        self
    }

    pub fn classifier_names(&self) -> Vec<&str> {
        self.classifiers.iter().map(|c| c.name()).collect()
    }

    fn is_wrapper(&self, error: &(dyn Error + 'static)) -> bool {
        self.wrapper_kinds.iter().any(|kind| kind.matches(error))
    }

    /// Replace `failure` with its cause while it is a wrapper kind.
    pub fn unwrap<'a>(&self, failure: &'a (dyn Error + 'static)) -> &'a (dyn Error + 'static) {
        let mut current = failure;
        for _ in 0..MAX_CAUSE_DEPTH {
            if !self.is_wrapper(current) {
                break;
            }
            match current.source() {
                Some(cause) if !same_error(current, cause) => {
                    log_trace!(wrapper = %current, "Unwrapping failure to its cause");
                    current = cause;
                }
                _ => break,
            }
        }
        current
    }

    /// Unwrap, then run classifiers in order; the first `Handle` wins.
    ///
    /// Connection diagnostics are appended whenever a network-origin failure
    /// appears anywhere in the original failure's source chain.
    pub fn classify(&self, failure: &(dyn Error + 'static), catalog: &ErrorCatalog) -> Verdict {
        let unwrapped = self.unwrap(failure);

        for classifier in &self.classifiers {
            if let Verdict::Handle(classification) = classifier.classify(unwrapped, catalog) {
                let classification = classification.with_diagnostics(network_diagnostics(failure));
                log_debug!(
                    classifier = classifier.name(),
                    descriptor_count = classification.descriptor_count(),
                    "Failure claimed by classifier"
                );
                return Verdict::Handle(classification);
            }
        }

        log_debug!(
            classifier_count = self.classifiers.len(),
            "No classifier claimed failure"
        );
        Verdict::Decline
    }
}

impl fmt::Debug for ClassifierChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassifierChain")
            .field("classifiers", &self.classifier_names())
            .field("wrapper_kinds", &self.wrapper_kinds)
            .finish()
    }
}
