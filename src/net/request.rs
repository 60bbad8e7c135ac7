use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;
use uuid::Uuid;

use crate::errors::RequestError;

/// Characters that survive percent-encoding in a query component: the
/// RFC 3986 unreserved set. Space encodes as `%20`, never `+`.
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Identifier minted for every dispatched request.
///
/// Echoed on the resulting [`Response`](crate::net::Response) and in log
/// output, so a host can correlate terminal events with whatever it has on
/// screen.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct RequestId(Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A single request as assembled by the host UI.
///
/// Plain data: building one performs no I/O. The spec lives exactly as long
/// as its dispatch; it is consumed by [`Dispatcher::send`](crate::net::Dispatcher::send)
/// and gone once the terminal event fires.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    /// HTTP method. Passed through to the transport as-is, the only check is
    /// that it forms a valid method token.
    pub method: String,
    /// Base URL, possibly already carrying a path and query. Not validated
    /// here; a malformed URL surfaces as a transport error.
    pub url: String,
    /// Appended to the URL as a percent-encoded query string.
    pub query_params: BTreeMap<String, String>,
    /// Set verbatim on the outgoing request, overwriting transport defaults
    /// of the same name.
    pub headers: BTreeMap<String, String>,
    /// JSON payload. A `Value::String` is transmitted as a JSON string
    /// literal, which is what the body editor produces for raw text.
    pub body: Option<serde_json::Value>,
    /// Overrides [`ClientConfig::request_timeout`](crate::ClientConfig) for
    /// this request.
    pub timeout: Option<Duration>,
}

impl RequestSpec {
    pub fn new(method: &str, url: &str) -> Self {
        Self {
            method: method.to_string(),
            url: url.to_string(),
            query_params: BTreeMap::new(),
            headers: BTreeMap::new(),
            body: None,
            timeout: None,
        }
    }

    /// Shorthand for a bare GET.
    pub fn get(url: &str) -> Self {
        Self::new("GET", url)
    }

    /// Shorthand for a POST carrying a JSON body.
    pub fn post(url: &str, body: serde_json::Value) -> Self {
        let mut spec = Self::new("POST", url);
        spec.body = Some(body);
        spec
    }

    pub fn set_query_param(&mut self, key: &str, value: &str) {
        self.query_params.insert(key.to_string(), value.to_string());
    }

    pub fn set_header(&mut self, name: &str, value: &str) {
        self.headers.insert(name.to_string(), value.to_string());
    }

    /// Sets a raw text body. The wire payload is the JSON encoding of the
    /// string (quoted and escaped), not the bare bytes.
    pub fn set_body_text(&mut self, text: &str) {
        self.body = Some(serde_json::Value::String(text.to_string()));
    }

    /// Serializes `value` into the request body immediately, so a value that
    /// cannot be represented as JSON fails here rather than at dispatch time.
    pub fn set_body_from<T: Serialize>(&mut self, value: &T) -> Result<(), RequestError> {
        let body = serde_json::to_value(value).map_err(RequestError::BodySerialization)?;
        self.body = Some(body);
        Ok(())
    }

    /// Returns the fully-resolved URL: base plus the percent-encoded query
    /// string. Joins with `&` when the base already carries a query.
    pub fn resolved_url(&self) -> Result<String, RequestError> {
        if self.url.is_empty() {
            return Err(RequestError::EmptyUrl);
        }

        if self.query_params.is_empty() {
            return Ok(self.url.clone());
        }

        let mut resolved = self.url.clone();
        let mut separator = if self.url.contains('?') { '&' } else { '?' };
        for (key, value) in &self.query_params {
            resolved.push(separator);
            resolved.extend(utf8_percent_encode(key, QUERY_COMPONENT));
            resolved.push('=');
            resolved.extend(utf8_percent_encode(value, QUERY_COMPONENT));
            separator = '&';
        }

        Ok(resolved)
    }
}
