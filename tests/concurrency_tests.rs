//! Integration Tests for Concurrent Use of the Error Boundary
//!
//! UNIT UNDER TEST: ErrorBoundary shared across tasks
//!
//! BUSINESS RESPONSIBILITY:
//!   - Handle failures from many in-flight requests without shared mutable state
//!   - Give every handled failure its own correlation id and log entry
//!
//! TEST COVERAGE:
//!   - Correlation id uniqueness under a multi-threaded runtime
//!   - One log entry per response

mod common;

use common::{account_locked, capturing_boundary, payment_request};
use error_contract::{Failure, RequestRejection, ServiceFailure};
use std::collections::HashSet;
use std::sync::Arc;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_failures_get_unique_correlation_ids() {
    // Test verifies correlation ids never collide across concurrent requests
    // Ensures each response links to exactly one log entry

    // Arrange
    let (boundary, sink) = capturing_boundary();
    let boundary = Arc::new(boundary);
    let request_count = 200;

    // Act
    let handles: Vec<_> = (0..request_count)
        .map(|i| {
            let boundary = Arc::clone(&boundary);
            tokio::spawn(async move {
                let failure = if i % 2 == 0 {
                    Failure::new(ServiceFailure::new(account_locked()))
                } else {
                    Failure::new(RequestRejection::NotFound)
                };
                boundary.respond(&failure, &payment_request())
            })
        })
        .collect();

    let mut ids = HashSet::new();
    for handle in handles {
        let response = handle.await.expect("task completes");
        ids.insert(response.correlation_id().to_string());
    }

    // Assert
    assert_eq!(ids.len(), request_count);
    let entries = sink.entries();
    assert_eq!(entries.len(), request_count);
    let logged: HashSet<String> = entries.into_iter().map(|e| e.correlation_id).collect();
    assert_eq!(logged, ids);
}
