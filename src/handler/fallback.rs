use crate::catalog::{ErrorCatalog, Role};
use crate::classify::network_diagnostics;
use crate::context::RequestContext;
use crate::core_types::contract::{ErrorContract, ErrorResponse};
use crate::error::{panic_message, EngineResult};
use crate::failure::Failure;
use crate::logging::log_error;
use crate::recorder::{DiagnosticRecorder, LogPolicy};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

/// Last-resort handler: always answers with the generic service error.
///
/// Network-origin failures still get their `remote_*` connection fields on
/// the log line, even though no classifier claimed them.
///
/// If recording or building the response fails, a static response with a
/// freshly minted correlation id is returned instead. `handle` never fails
/// and never panics.
#[derive(Debug, Clone)]
pub struct FallbackResolutionHandler {
    catalog: Arc<ErrorCatalog>,
    recorder: DiagnosticRecorder,
}

impl FallbackResolutionHandler {
    pub fn new(catalog: Arc<ErrorCatalog>, recorder: DiagnosticRecorder) -> Self {
        Self { catalog, recorder }
    }

    pub fn handle(&self, failure: &Failure, ctx: &dyn RequestContext) -> ErrorResponse {
        let correlation_header = self.recorder.config().correlation_header.as_str();

        let reason = match catch_unwind(AssertUnwindSafe(|| self.respond(failure, ctx))) {
            Ok(Ok(response)) => return response,
            Ok(Err(error)) => error.to_string(),
            Err(payload) => format!("panicked: {}", panic_message(payload.as_ref())),
        };

        let response = ErrorResponse::last_resort(correlation_header);
        log_error!(
            correlation_id = %response.correlation_id(),
            failure_kind = failure.kind(),
            reason = %reason,
            "Fallback handler failed; returning last-resort response"
        );
        response
    }

    fn respond(&self, failure: &Failure, ctx: &dyn RequestContext) -> EngineResult<ErrorResponse> {
        let generic = self.catalog.role(Role::GenericServiceError).clone();
        let status = generic.http_status();
        let descriptors = [generic];
        let connection_fields = network_diagnostics(failure.error());

        let correlation_id = self.recorder.record(
            ctx,
            &descriptors,
            status,
            failure,
            &connection_fields,
            LogPolicy::critical(),
        )?;

        Ok(ErrorResponse::new(
            status,
            ErrorContract::new(correlation_id, &descriptors),
            &self.recorder.config().correlation_header,
            &[],
        ))
    }
}
