//! Standard wrapper kinds that the classifier chain unwraps by default.
//!
//! None of these describe what went wrong; they describe *where* it went wrong
//! (inside a spawned task, inside an async completion, inside an `anyhow`
//! context stack). Classification always happens on the cause.

use super::kinds::{RemoteCallFailure, RequestRejection, ServiceFailure, ValidationFailure};
use crate::error::BodyReadError;
use std::error::Error;
use std::fmt;
use thiserror::Error;

/// A failure that surfaced from a background task or executor.
#[derive(Error, Debug)]
#[error("Task '{task}' failed")]
pub struct TaskFailure {
    pub task: String,
    #[source]
    pub cause: Box<dyn Error + Send + Sync>,
}

impl TaskFailure {
    pub fn new(task: impl Into<String>, cause: impl Into<Box<dyn Error + Send + Sync>>) -> Self {
        Self {
            task: task.into(),
            cause: cause.into(),
        }
    }
}

/// A failure delivered through an asynchronous completion (future, callback, channel).
#[derive(Error, Debug)]
#[error("Asynchronous completion failed")]
pub struct CompletionFailure {
    #[source]
    pub cause: Box<dyn Error + Send + Sync>,
}

impl CompletionFailure {
    pub fn new(cause: impl Into<Box<dyn Error + Send + Sync>>) -> Self {
        Self {
            cause: cause.into(),
        }
    }
}

/// An `anyhow::Error` carried as a standard error.
///
/// Its source is the outermost error in the `anyhow` chain that the engine
/// recognizes (a failure kind the built-in classifiers claim, or another
/// wrapper kind). When nothing in the chain is recognized the root cause is
/// used. Either way unwrapping skips every `.context(..)` layer.
pub struct ContextFailure(anyhow::Error);

impl ContextFailure {
    pub fn new(error: anyhow::Error) -> Self {
        Self(error)
    }

    pub fn inner(&self) -> &anyhow::Error {
        &self.0
    }
}

impl fmt::Display for ContextFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl fmt::Debug for ContextFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ContextFailure").field(&self.0).finish()
    }
}

impl Error for ContextFailure {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        let recognized = self.0.chain().find(|error| is_recognized(*error));
        Some(recognized.unwrap_or_else(|| self.0.root_cause()))
    }
}

fn is_recognized(error: &(dyn Error + 'static)) -> bool {
    error.is::<ServiceFailure>()
        || error.is::<ValidationFailure>()
        || error.is::<RequestRejection>()
        || error.is::<RemoteCallFailure>()
        || error.is::<BodyReadError>()
        || error.is::<reqwest::Error>()
        || error.is::<TaskFailure>()
        || error.is::<CompletionFailure>()
}
