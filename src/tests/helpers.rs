//! Test helper utilities shared by the unit test modules.
//!
//! IMPORTANT: These helpers are test-only and should NEVER be used in production code.

// Allow dead code in test utilities - functions are used across different test files
#![allow(dead_code)]

use crate::catalog::{core_descriptor, CodeRange, ErrorCatalog, Role};
use crate::config::RecorderConfig;
use crate::context::{RequestContext, StaticRequestContext};
use crate::core_types::descriptor::Descriptor;
use crate::error::{BodyReadError, EngineError, EngineResult};
use crate::recorder::{DiagnosticRecorder, LogEntry, LogSink};
use std::error::Error;
use std::fmt;
use std::sync::{Arc, Mutex};

pub fn order_not_found() -> Descriptor {
    Descriptor::new("ORDER_NOT_FOUND", "99001", "Order not found", 404)
}

pub fn order_conflict() -> Descriptor {
    Descriptor::new("ORDER_CONFLICT", "99002", "Order was modified concurrently", 409)
}

pub fn quantity_too_large() -> Descriptor {
    Descriptor::new("QUANTITY_TOO_LARGE", "99003", "Quantity exceeds the allowed maximum", 400)
}

/// Wrapper of the core generic bad request, exempt from the code range.
pub fn invalid_email() -> Descriptor {
    Descriptor::wrapping(&core_descriptor(Role::GenericBadRequest), "INVALID_EMAIL")
}

/// Core catalog plus a small order-service deployment set in 99000..=99999.
pub fn test_catalog() -> ErrorCatalog {
    ErrorCatalog::with_core(
        vec![
            order_not_found(),
            order_conflict(),
            quantity_too_large(),
            invalid_email(),
        ],
        CodeRange::between(99000, 99999),
    )
    .expect("test catalog should be valid")
}

pub fn test_context() -> StaticRequestContext {
    StaticRequestContext::new("POST", "/orders/42")
        .with_query("dry_run=true")
        .with_header("Content-Type", "application/json")
        .with_header("Authorization", "Bearer top-secret")
}

/// Sink that keeps every entry in memory.
#[derive(Default)]
pub struct RecordingSink {
    entries: Mutex<Vec<LogEntry>>,
}

impl RecordingSink {
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().expect("sink lock").clone()
    }
}

impl LogSink for RecordingSink {
    fn emit(&self, entry: &LogEntry) -> EngineResult<()> {
        self.entries.lock().expect("sink lock").push(entry.clone());
        Ok(())
    }
}

/// Sink that always refuses entries.
pub struct FailingSink;

impl LogSink for FailingSink {
    fn emit(&self, _entry: &LogEntry) -> EngineResult<()> {
        Err(EngineError::recording_failed("disk full"))
    }
}

/// Sink that panics on every entry.
pub struct PanickingSink;

impl LogSink for PanickingSink {
    fn emit(&self, _entry: &LogEntry) -> EngineResult<()> {
        panic!("log sink exploded")
    }
}

pub fn recorder_with(sink: Arc<dyn LogSink>) -> DiagnosticRecorder {
    DiagnosticRecorder::new(RecorderConfig::default(), sink)
}

pub fn recording_recorder() -> (DiagnosticRecorder, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::default());
    (recorder_with(sink.clone()), sink)
}

/// Request adapter whose every read panics.
pub struct PanickingContext;

impl RequestContext for PanickingContext {
    fn uri(&self) -> String {
        panic!("uri unavailable")
    }

    fn http_method(&self) -> String {
        panic!("method unavailable")
    }

    fn query_string(&self) -> Option<String> {
        panic!("query unavailable")
    }

    fn header_names(&self) -> Vec<String> {
        panic!("headers unavailable")
    }

    fn header_values(&self, _name: &str) -> Vec<String> {
        panic!("headers unavailable")
    }

    fn attribute(&self, _key: &str) -> Option<String> {
        panic!("attributes unavailable")
    }

    fn body(&self) -> Result<Vec<u8>, BodyReadError> {
        panic!("body unavailable")
    }
}

/// An error that reports itself as its own source.
#[derive(Debug)]
pub struct SelfCaused;

impl fmt::Display for SelfCaused {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "I caused myself")
    }
}

impl Error for SelfCaused {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(self)
    }
}

/// An error whose `Display` panics.
#[derive(Debug)]
pub struct UnprintableError;

impl fmt::Display for UnprintableError {
    fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
        panic!("cannot render this error")
    }
}

impl Error for UnprintableError {}

/// A plain error no built-in classifier claims.
#[derive(Debug)]
pub struct UnknownError(pub &'static str);

impl fmt::Display for UnknownError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl Error for UnknownError {}

/// In-memory writer for a `tracing_subscriber::fmt` subscriber.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().expect("log buffer lock")).into_owned()
    }
}

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().expect("log buffer lock").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
