//! Network-origin failures: classification and connection diagnostics.
//!
//! Two failure types count as network-origin: the engine's own
//! [`RemoteCallFailure`] and `reqwest::Error`. [`network_diagnostics`] is run
//! by the chain for every claimed failure, so connection context reaches the
//! log line no matter which classifier ends up owning the failure.

use super::{Classification, Classifier, Verdict};
use crate::catalog::{status, ErrorCatalog, Role};
use crate::failure::{causes, ConnectionFailureKind, RemoteCallFailure};
use std::error::Error;

/// Claims [`RemoteCallFailure`]s and `reqwest::Error`s.
///
/// Timeouts, connection failures and downstream 503/429 answers are
/// temporary; any other downstream problem is unrecoverable from this
/// service's point of view.
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoteCallClassifier;

impl Classifier for RemoteCallClassifier {
    fn name(&self) -> &str {
        "remote_call"
    }

    fn classify(&self, failure: &(dyn Error + 'static), catalog: &ErrorCatalog) -> Verdict {
        let temporary = if let Some(remote) = failure.downcast_ref::<RemoteCallFailure>() {
            match &remote.kind {
                ConnectionFailureKind::Timeout { .. } | ConnectionFailureKind::Unreachable => true,
                ConnectionFailureKind::Status { status, .. } => is_temporary_status(*status),
            }
        } else if let Some(http) = failure.downcast_ref::<reqwest::Error>() {
            http.is_timeout()
                || http.is_connect()
                || http
                    .status()
                    .is_some_and(|status| is_temporary_status(status.as_u16()))
        } else {
            return Verdict::Decline;
        };

        let role = if temporary {
            Role::DownstreamTemporary
        } else {
            Role::DownstreamUnrecoverable
        };
        Verdict::Handle(Classification::single(catalog.role(role).clone()))
    }
}

fn is_temporary_status(code: u16) -> bool {
    code == status::SERVICE_UNAVAILABLE || code == status::TOO_MANY_REQUESTS
}

/// Connection diagnostic fields for the first network-origin failure in
/// `failure`'s source chain; empty when there is none.
pub fn network_diagnostics(failure: &(dyn Error + 'static)) -> Vec<(String, String)> {
    for cause in causes(failure) {
        if let Some(remote) = cause.downcast_ref::<RemoteCallFailure>() {
            return remote.diagnostic_fields();
        }
        if let Some(http) = cause.downcast_ref::<reqwest::Error>() {
            return reqwest_diagnostics(http);
        }
    }
    Vec::new()
}

fn reqwest_diagnostics(error: &reqwest::Error) -> Vec<(String, String)> {
    let mut fields = Vec::new();
    if let Some(url) = error.url() {
        let mut target = url.clone();
        target.set_query(None);
        target.set_fragment(None);
        let _ = target.set_username("");
        let _ = target.set_password(None);
        fields.push(("remote_service".to_string(), target.to_string()));
    }

    let failure = if error.is_timeout() {
        "timeout"
    } else if error.is_connect() {
        "unreachable"
    } else if error.is_status() {
        "status"
    } else if error.is_decode() {
        "decode"
    } else {
        "request"
    };
    fields.push(("remote_failure".to_string(), failure.to_string()));

    if let Some(code) = error.status() {
        fields.push(("remote_status".to_string(), code.as_u16().to_string()));
    }
    fields
}
