#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("request URL is empty")]
    EmptyUrl,

    #[error("invalid HTTP method: {0:?}")]
    InvalidMethod(String),

    #[error("request body cannot be serialized to JSON")]
    BodySerialization(#[source] serde_json::Error),

    #[error("a request is already in flight")]
    RequestInFlight,

    #[error("request canceled")]
    Canceled,

    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    #[error("response is not parsable JSON")]
    ResponseNotParsable(#[source] serde_json::Error),
}

impl RequestError {
    /// True when the request died because the transport-level timeout fired.
    pub fn is_timeout(&self) -> bool {
        matches!(self, RequestError::Transport(e) if e.is_timeout())
    }
}
