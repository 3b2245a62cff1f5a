use crate::catalog::ErrorCatalog;
use crate::classify::{Classification, ClassifierChain, Verdict};
use crate::context::RequestContext;
use crate::core_types::contract::{ErrorContract, ErrorResponse};
use crate::core_types::errors::ErrorSeverity;
use crate::error::{panic_message, EngineResult, HandlerInternalError};
use crate::failure::Failure;
use crate::logging::log_debug;
use crate::recorder::{DiagnosticRecorder, LogPolicy};
use crate::resolver::ContractResolver;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

/// Classifies a failure and turns it into an [`ErrorResponse`].
///
/// Declines failures no classifier claims. Anything that goes wrong inside
/// the handler itself (a failing log sink, a panicking classifier or request
/// adapter) surfaces as [`HandlerInternalError`]; callers respond to both by
/// invoking the fallback handler.
#[derive(Debug, Clone)]
pub struct ExceptionResolutionHandler {
    catalog: Arc<ErrorCatalog>,
    chain: Arc<ClassifierChain>,
    resolver: ContractResolver,
    recorder: DiagnosticRecorder,
}

impl ExceptionResolutionHandler {
    pub fn new(
        catalog: Arc<ErrorCatalog>,
        chain: Arc<ClassifierChain>,
        recorder: DiagnosticRecorder,
    ) -> Self {
        Self {
            catalog,
            chain,
            resolver: ContractResolver::new(),
            recorder,
        }
    }

    pub fn catalog(&self) -> &ErrorCatalog {
        &self.catalog
    }

    pub fn recorder(&self) -> &DiagnosticRecorder {
        &self.recorder
    }

    /// Classify `failure` and respond, or decline with `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerInternalError`] if the handler's own logic failed or
    /// panicked while handling `failure`.
    pub fn maybe_handle(
        &self,
        failure: &Failure,
        ctx: &dyn RequestContext,
    ) -> Result<Option<ErrorResponse>, HandlerInternalError> {
        let outcome = catch_unwind(AssertUnwindSafe(|| {
            match self.chain.classify(failure.error(), &self.catalog) {
                Verdict::Decline => Ok(None),
                Verdict::Handle(classification) => self
                    .resolve_and_respond(classification, failure, ctx)
                    .map(Some),
            }
        }));

        match outcome {
            Ok(Ok(None)) => {
                log_debug!(failure_kind = failure.kind(), "Exception handler declined failure");
                Ok(None)
            }
            Ok(Ok(Some(response))) => Ok(Some(response)),
            Ok(Err(error)) => Err(HandlerInternalError::new(
                error.to_string(),
                failure.kind(),
                failure.safe_message(),
                Some(Box::new(error)),
            )),
            Err(payload) => Err(HandlerInternalError::new(
                format!("panicked: {}", panic_message(payload.as_ref())),
                failure.kind(),
                failure.safe_message(),
                None,
            )),
        }
    }

    /// Resolve a classification, record it, and build the response.
    ///
    /// # Errors
    ///
    /// Returns [`crate::EngineError::Recording`] if the diagnostic entry could
    /// not be written.
    pub fn resolve_and_respond(
        &self,
        classification: Classification,
        failure: &Failure,
        ctx: &dyn RequestContext,
    ) -> EngineResult<ErrorResponse> {
        let resolution = self.resolver.resolve(classification, &self.catalog);

        let mut policy = LogPolicy::for_status(resolution.status, failure.stack_trace_override());
        if resolution.anomaly {
            policy.severity = ErrorSeverity::Critical;
        }

        let correlation_id = self.recorder.record(
            ctx,
            &resolution.descriptors,
            resolution.status,
            failure,
            &resolution.diagnostic_fields,
            policy,
        )?;

        let contract = ErrorContract::new(correlation_id, &resolution.descriptors);
        Ok(ErrorResponse::new(
            resolution.status,
            contract,
            &self.recorder.config().correlation_header,
            &resolution.response_headers,
        ))
    }
}
