use std::sync::Arc;

use futures::FutureExt;
use tokio::runtime::Runtime;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::{build_transport, ClientConfig};
use crate::errors::RequestError;
use crate::net::{Dispatcher, RequestId, RequestSpec, Response};

/// Embedding shim for GUI hosts.
///
/// GUI event loops generally cannot `.await`, so this type owns the Tokio
/// runtime, spawns each dispatch onto it, and exposes a non-blocking
/// [`poll`](Self::poll) for the host to call from its tick/idle handler. At
/// most one request is in flight; starting another while one is active is
/// rejected instead of overwriting the handle.
pub struct ClientInstance {
    runtime: Arc<Runtime>,
    dispatcher: Arc<Dispatcher>,
    in_flight: Option<InFlight>,
}

struct InFlight {
    id: RequestId,
    task: JoinHandle<Result<Response, RequestError>>,
    cancel: CancellationToken,
}

impl ClientInstance {
    /// Builds an instance with its own transport derived from `config`.
    pub fn new(runtime: Arc<Runtime>, config: ClientConfig) -> Result<Self, RequestError> {
        let client = build_transport(&config)?;
        Ok(Self::with_transport(runtime, client, config))
    }

    /// Builds an instance around an externally constructed transport, e.g.
    /// one pointing at a test server.
    pub fn with_transport(
        runtime: Arc<Runtime>,
        client: reqwest::Client,
        config: ClientConfig,
    ) -> Self {
        Self {
            runtime,
            dispatcher: Arc::new(Dispatcher::new(client, config)),
            in_flight: None,
        }
    }

    /// Spawns `spec` onto the runtime and returns the id of the new request.
    ///
    /// Fails with [`RequestError::RequestInFlight`] while a previous request
    /// has not yet delivered its terminal event through [`poll`](Self::poll).
    pub fn start_request(&mut self, spec: RequestSpec) -> Result<RequestId, RequestError> {
        if self.in_flight.is_some() {
            return Err(RequestError::RequestInFlight);
        }

        let id = RequestId::new();
        let cancel = CancellationToken::new();
        let dispatcher = self.dispatcher.clone();
        let task_cancel = cancel.clone();
        let task = self
            .runtime
            .spawn(async move { dispatcher.send_with_id(id, spec, task_cancel).await });

        self.in_flight = Some(InFlight { id, task, cancel });
        Ok(id)
    }

    /// Non-blocking check for the terminal event of the in-flight request.
    ///
    /// Returns `None` while the request is still running, then the single
    /// terminal event exactly once when it has finished.
    pub fn poll(&mut self) -> Option<(RequestId, Result<Response, RequestError>)> {
        let in_flight = self.in_flight.as_mut()?;
        let id = in_flight.id;

        let join_result = (&mut in_flight.task).now_or_never()?;
        self.in_flight = None;

        let result = match join_result {
            Ok(outcome) => outcome,
            Err(e) if e.is_cancelled() => Err(RequestError::Canceled),
            Err(e) => {
                log::error!("request[{id}]: dispatch task failed: {e}");
                Err(RequestError::Canceled)
            }
        };

        Some((id, result))
    }

    /// Cancels the in-flight request, if any.
    ///
    /// The terminal event still arrives through [`poll`](Self::poll), as
    /// [`RequestError::Canceled`].
    pub fn cancel(&mut self) {
        if let Some(in_flight) = &self.in_flight {
            in_flight.cancel.cancel();
        }
    }

    pub fn request_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }
}
