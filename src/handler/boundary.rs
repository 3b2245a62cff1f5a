use super::{ExceptionResolutionHandler, FallbackResolutionHandler};
use crate::catalog::{CatalogBuilder, ErrorCatalog};
use crate::classify::ClassifierChain;
use crate::config::EngineConfig;
use crate::context::RequestContext;
use crate::core_types::contract::ErrorResponse;
use crate::error::EngineResult;
use crate::failure::{causes, Failure};
use crate::logging::log_error;
use crate::recorder::{DiagnosticRecorder, LogSink, TracingSink};
use std::sync::Arc;

/// The single seam every request failure passes through.
///
/// ```rust
/// use std::sync::Arc;
/// use error_contract::{
///     ClassifierChain, CodeRange, ErrorBoundary, ErrorCatalog, Failure, RequestRejection,
///     StaticRequestContext,
/// };
///
/// let catalog = Arc::new(ErrorCatalog::with_core(vec![], CodeRange::AllowAll).expect("catalog"));
/// let boundary = ErrorBoundary::new(catalog, ClassifierChain::standard());
///
/// let ctx = StaticRequestContext::new("GET", "/orders/42");
/// let response = boundary.respond(&Failure::new(RequestRejection::NotFound), &ctx);
///
/// assert_eq!(response.http_status, 404);
/// assert!(response.headers.contains_key("error_uid"));
/// ```
#[derive(Debug, Clone)]
pub struct ErrorBoundary {
    exception: ExceptionResolutionHandler,
    fallback: FallbackResolutionHandler,
}

impl ErrorBoundary {
    /// Boundary with the default recorder configuration, logging through `tracing`.
    pub fn new(catalog: Arc<ErrorCatalog>, chain: ClassifierChain) -> Self {
        Self::with_recorder(catalog, chain, DiagnosticRecorder::default())
    }

    pub fn with_recorder(
        catalog: Arc<ErrorCatalog>,
        chain: ClassifierChain,
        recorder: DiagnosticRecorder,
    ) -> Self {
        Self {
            exception: ExceptionResolutionHandler::new(
                Arc::clone(&catalog),
                Arc::new(chain),
                recorder.clone(),
            ),
            fallback: FallbackResolutionHandler::new(catalog, recorder),
        }
    }

    /// Boundary configured from an [`EngineConfig`], optionally with a custom sink.
    ///
    /// The configuration is validated, then `catalog` is built with the
    /// configured status priority order (replacing any order already set on
    /// the builder).
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Configuration`](crate::EngineError::Configuration)
    /// if `config` is invalid, or
    /// [`EngineError::CatalogConfiguration`](crate::EngineError::CatalogConfiguration)
    /// if the catalog fails validation.
    pub fn from_config(
        catalog: CatalogBuilder,
        chain: ClassifierChain,
        config: &EngineConfig,
        sink: Option<Arc<dyn LogSink>>,
    ) -> EngineResult<Self> {
        config.validate()?;
        let catalog = catalog
            .status_priority(config.status_priority.clone())
            .build()?;

        let sink = sink.unwrap_or_else(|| Arc::new(TracingSink));
        let recorder = DiagnosticRecorder::new(config.recorder.clone(), sink);
        Ok(Self::with_recorder(Arc::new(catalog), chain, recorder))
    }

    pub fn exception_handler(&self) -> &ExceptionResolutionHandler {
        &self.exception
    }

    pub fn fallback_handler(&self) -> &FallbackResolutionHandler {
        &self.fallback
    }

    /// Produce the response for `failure`. Never fails.
    pub fn respond(&self, failure: &Failure, ctx: &dyn RequestContext) -> ErrorResponse {
        match self.exception.maybe_handle(failure, ctx) {
            Ok(Some(response)) => response,
            Ok(None) => self.fallback.handle(failure, ctx),
            Err(internal) => {
                let chain: Vec<String> = causes(&internal).map(|cause| cause.to_string()).collect();
                log_error!(
                    failure_kind = failure.kind(),
                    internal_error = ?chain,
                    "Exception handler failed internally; using fallback handler"
                );
                self.fallback.handle(failure, ctx)
            }
        }
    }
}
