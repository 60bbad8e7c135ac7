//! Request dispatch.
//!
//! [`Dispatcher`] turns a [`RequestSpec`] into a single outbound HTTP call
//! and the reply into a [`Response`]. One logical request is in flight at a
//! time; a second `send` while one is active is rejected rather than
//! silently replacing the in-flight transport handle.

use std::sync::atomic::{AtomicBool, Ordering};

use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::Method;
use tokio_util::sync::CancellationToken;

use crate::config::ClientConfig;
use crate::errors::RequestError;
use crate::net::request::{RequestId, RequestSpec};
use crate::net::response::Response;

pub struct Dispatcher {
    /// Injected transport; see [`build_transport`](crate::config::build_transport).
    client: reqwest::Client,
    config: ClientConfig,
    /// True while a request is in flight.
    busy: AtomicBool,
}

impl Dispatcher {
    pub fn new(client: reqwest::Client, config: ClientConfig) -> Self {
        Self {
            client,
            config,
            busy: AtomicBool::new(false),
        }
    }

    /// Dispatches `spec` and waits for the terminal event.
    ///
    /// Exactly one outbound call is issued per invocation, and exactly one
    /// terminal event comes back: the `Response`, or the error that ended
    /// the request. Construction problems (empty URL, bad method token, a
    /// body that does not serialize) are reported before any I/O happens.
    ///
    /// Cancellation is cooperative: when `cancel` fires first, the transport
    /// handle is dropped and [`RequestError::Canceled`] is returned.
    pub async fn send(
        &self,
        spec: RequestSpec,
        cancel: CancellationToken,
    ) -> Result<Response, RequestError> {
        self.send_with_id(RequestId::new(), spec, cancel).await
    }

    /// Like [`send`](Self::send), for hosts that mint the id up front to
    /// correlate log lines and poll results.
    pub async fn send_with_id(
        &self,
        request_id: RequestId,
        spec: RequestSpec,
        cancel: CancellationToken,
    ) -> Result<Response, RequestError> {
        let _guard = BusyGuard::acquire(&self.busy)?;

        tokio::select! {
            _ = cancel.cancelled() => {
                log::debug!("request[{request_id}]: canceled");
                Err(RequestError::Canceled)
            }
            outcome = self.round_trip(request_id, spec) => outcome,
        }
    }

    async fn round_trip(
        &self,
        request_id: RequestId,
        spec: RequestSpec,
    ) -> Result<Response, RequestError> {
        let method = Method::from_bytes(spec.method.as_bytes())
            .map_err(|_| RequestError::InvalidMethod(spec.method.clone()))?;
        let url = spec.resolved_url()?;

        let mut request = self.client.request(method, &url);

        if let Some(timeout) = spec.timeout.or(self.config.request_timeout) {
            request = request.timeout(timeout);
        }

        if let Some(body) = &spec.body {
            let payload = serde_json::to_vec(body).map_err(RequestError::BodySerialization)?;
            request = request.body(payload);

            // The serialization step owns the Content-Type unless the caller
            // supplied one.
            let caller_set_content_type = spec
                .headers
                .keys()
                .any(|name| name.eq_ignore_ascii_case("content-type"));
            if !caller_set_content_type {
                request = request.header(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            }
        }

        // Caller headers go on verbatim, overwriting any transport default of
        // the same name. An invalid name or value surfaces as a transport
        // error when the request is sent.
        for (name, value) in &spec.headers {
            request = request.header(name.as_str(), value.as_str());
        }

        log::debug!("request[{request_id}]: {} {}", spec.method, url);
        let reply = request.send().await?;

        let status = reply.status();
        let final_url = reply.url().clone();

        // Collect all reply headers before the body is touched.
        let headers = reply
            .headers()
            .iter()
            .map(|(name, value)| {
                (name.to_string(), value.to_str().unwrap_or("").to_string())
            })
            .collect();

        // Buffer the whole body; JSON parsing is never attempted on a
        // partial read.
        let body = reply.bytes().await?;
        let parsed = serde_json::from_slice(&body).map_err(|e| {
            log::debug!("request[{request_id}]: response body is not parsable JSON: {e}");
            RequestError::ResponseNotParsable(e)
        })?;

        log::debug!("request[{request_id}]: {} {}", status.as_u16(), final_url);

        Ok(Response {
            request_id,
            status_code: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("Unknown").to_string(),
            response_body: parsed,
            response_headers: headers,
            request_url: final_url,
            request_method: spec.method,
        })
    }
}

/// Holds the dispatcher's busy flag for the lifetime of one dispatch.
///
/// Dropping the guard releases the flag on every exit path, including
/// cancellation and early construction failures.
struct BusyGuard<'a> {
    busy: &'a AtomicBool,
}

impl<'a> BusyGuard<'a> {
    fn acquire(busy: &'a AtomicBool) -> Result<Self, RequestError> {
        busy.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| RequestError::RequestInFlight)?;
        Ok(Self { busy })
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}
