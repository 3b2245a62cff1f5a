//! Test helper utilities for error-contract integration tests
//!
//! This module provides reusable test fixtures and helper functions
//! that are shared across multiple test modules.
//!
//! IMPORTANT: These helpers are test-only and should NEVER be used in production code.

// Allow dead code in test utilities - functions are used across different test files
#![allow(dead_code)]

use error_contract::{
    ClassifierChain, CodeRange, Descriptor, DiagnosticRecorder, EngineResult, ErrorBoundary,
    ErrorCatalog, LogEntry, LogSink, RecorderConfig, StaticRequestContext,
};
use std::sync::{Arc, Mutex};

pub fn account_locked() -> Descriptor {
    Descriptor::new("ACCOUNT_LOCKED", "7001", "The account is locked", 403)
}

pub fn payment_declined() -> Descriptor {
    Descriptor::new("PAYMENT_DECLINED", "7002", "The payment was declined", 409)
}

pub fn invalid_amount() -> Descriptor {
    Descriptor::new("INVALID_AMOUNT", "7003", "The amount is invalid", 400)
}

/// Core catalog plus a payments deployment set in 7000..=7999.
///
/// # Panics
///
/// Panics if the fixture catalog is invalid (test failure is appropriate).
pub fn payments_catalog() -> Arc<ErrorCatalog> {
    let catalog = ErrorCatalog::with_core(
        vec![account_locked(), payment_declined(), invalid_amount()],
        CodeRange::between(7000, 7999),
    )
    .expect("payments catalog should be valid");
    Arc::new(catalog)
}

pub fn payment_request() -> StaticRequestContext {
    StaticRequestContext::new("POST", "/payments")
        .with_query("idempotency=abc")
        .with_header("Content-Type", "application/json")
        .with_header("Authorization", "Bearer secret-token")
        .with_header(
            "traceparent",
            "00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01",
        )
}

/// Sink that keeps every entry in memory.
#[derive(Default)]
pub struct CapturingSink {
    entries: Mutex<Vec<LogEntry>>,
}

impl CapturingSink {
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().expect("sink lock").clone()
    }

    pub fn entry_for(&self, correlation_id: &str) -> Option<LogEntry> {
        self.entries()
            .into_iter()
            .find(|entry| entry.correlation_id == correlation_id)
    }
}

impl LogSink for CapturingSink {
    fn emit(&self, entry: &LogEntry) -> EngineResult<()> {
        self.entries.lock().expect("sink lock").push(entry.clone());
        Ok(())
    }
}

/// Boundary over the payments catalog that records into a capturing sink.
pub fn capturing_boundary() -> (ErrorBoundary, Arc<CapturingSink>) {
    let sink = Arc::new(CapturingSink::default());
    let recorder = DiagnosticRecorder::new(RecorderConfig::default(), sink.clone());
    let boundary =
        ErrorBoundary::with_recorder(payments_catalog(), ClassifierChain::standard(), recorder);
    (boundary, sink)
}
