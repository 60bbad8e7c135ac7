//! Structured HTTP response model.
//!
//! This struct represents a **fully buffered** reply as the viewer consumes
//! it: status, parsed JSON body, headers, and an echo of the originating
//! request's URL and method for correlation.
//!
//! ## Notes
//! - The body has already been parsed; a reply whose body is not valid JSON
//!   never becomes a `Response` (the dispatch fails with
//!   [`RequestError::ResponseNotParsable`](crate::RequestError) instead).
//! - Header names arrive lowercased, which is how the transport's header map
//!   exposes them. Duplicate names collapse last-write-wins.
//! - `status_text` is the status code's canonical reason phrase and may be
//!   `"Unknown"` for non-standard codes.

use std::collections::HashMap;

use url::Url;

use crate::net::request::RequestId;

/// Everything the viewer needs to render a completed exchange.
///
/// Built exactly once when the reply completes, then handed to the host by
/// value; nothing mutates it afterwards.
#[derive(Debug, Clone)]
pub struct Response {
    /// Id of the dispatch that produced this response.
    pub request_id: RequestId,

    /// Numeric HTTP status code (e.g., `200`, `404`).
    pub status_code: u16,

    /// Human-readable reason phrase (e.g., `"OK"`, `"Not Found"`).
    pub status_text: String,

    /// Parsed JSON body: object, array, or scalar.
    pub response_body: serde_json::Value,

    /// Reply headers as a name → value map.
    pub response_headers: HashMap<String, String>,

    /// The fully-resolved URL that was actually sent (base + path + encoded
    /// query string), as reported back by the transport.
    pub request_url: Url,

    /// HTTP method of the originating request.
    pub request_method: String,
}

impl Response {
    /// True for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// Indented JSON rendering of the body, ready for the viewer's text pane.
    pub fn body_pretty(&self) -> String {
        serde_json::to_string_pretty(&self.response_body)
            .unwrap_or_else(|_| self.response_body.to_string())
    }

    /// Header pairs sorted by name, ready for a two-column table.
    pub fn header_rows(&self) -> Vec<(&str, &str)> {
        let mut rows: Vec<(&str, &str)> = self
            .response_headers
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
            .collect();
        rows.sort_unstable_by(|a, b| a.0.cmp(b.0));
        rows
    }
}
