//! Request metadata consumed by the engine.
//!
//! The transport adapter implements [`RequestContext`] over its own request
//! type. The engine only reads from it, and tolerates implementations that
//! panic or return garbage: every read performed while rendering a log line is
//! isolated.

use crate::error::BodyReadError;
use std::collections::BTreeMap;

/// Read-only view of the request being processed when a failure occurred.
#[cfg_attr(test, mockall::automock)]
pub trait RequestContext: Send + Sync {
    /// Request path, without the query string.
    fn uri(&self) -> String;

    /// HTTP method (`GET`, `POST`, ...).
    fn http_method(&self) -> String;

    /// Raw query string, if the request carried one.
    fn query_string(&self) -> Option<String>;

    /// Names of every header present, in the adapter's order.
    fn header_names(&self) -> Vec<String>;

    /// All values of a header (case-insensitive). Empty when absent.
    fn header_values(&self, name: &str) -> Vec<String>;

    /// First value of a header (case-insensitive).
    fn single_header(&self, name: &str) -> Option<String> {
        self.header_values(name).into_iter().next()
    }

    /// Adapter-specific request attribute (e.g. a trace id stashed by middleware).
    fn attribute(&self, key: &str) -> Option<String>;

    /// Request body. Reads are not guaranteed to be repeatable.
    fn body(&self) -> Result<Vec<u8>, BodyReadError>;
}

/// Owned request context, built up front.
///
/// Adapters that can snapshot their request cheaply use this directly; tests
/// use it everywhere.
///
/// ```rust
/// use error_contract::{RequestContext, StaticRequestContext};
///
/// let ctx = StaticRequestContext::new("POST", "/orders")
///     .with_query("dry_run=true")
///     .with_header("Authorization", "Bearer secret")
///     .with_attribute("trace_id", "abc123");
///
/// assert_eq!(ctx.single_header("authorization").as_deref(), Some("Bearer secret"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticRequestContext {
    method: String,
    uri: String,
    query: Option<String>,
    headers: Vec<(String, Vec<String>)>,
    attributes: BTreeMap<String, String>,
    body: Option<Vec<u8>>,
}

impl StaticRequestContext {
    pub fn new(method: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            uri: uri.into(),
            ..Self::default()
        }
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Add a header value. Repeated calls with the same name append values.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        match self
            .headers
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(&name))
        {
            Some((_, values)) => values.push(value),
            None => self.headers.push((name, vec![value])),
        }
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }
}

impl RequestContext for StaticRequestContext {
    fn uri(&self) -> String {
        self.uri.clone()
    }

    fn http_method(&self) -> String {
        self.method.clone()
    }

    fn query_string(&self) -> Option<String> {
        self.query.clone()
    }

    fn header_names(&self) -> Vec<String> {
        self.headers.iter().map(|(name, _)| name.clone()).collect()
    }

    fn header_values(&self, name: &str) -> Vec<String> {
        self.headers
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, values)| values.clone())
            .unwrap_or_default()
    }

    fn attribute(&self, key: &str) -> Option<String> {
        self.attributes.get(key).cloned()
    }

    fn body(&self) -> Result<Vec<u8>, BodyReadError> {
        self.body
            .clone()
            .ok_or_else(|| BodyReadError::new("no body was captured for this request"))
    }
}
