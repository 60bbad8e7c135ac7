use std::time::Duration;

use crate::errors::RequestError;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub user_agent: String,
    /// Applied to every request unless overridden per request. `None`
    /// disables the timeout entirely.
    pub request_timeout: Option<Duration>,
    /// Accept self-signed certificates. Useful when poking at local dev
    /// servers, off by default.
    pub accept_invalid_certs: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: "RestCutie/1.0".to_string(),
            request_timeout: Some(Duration::from_secs(30)),     // Default per-request timeout
            accept_invalid_certs: false,
        }
    }
}

/// Builds the transport client the dispatcher sends through.
///
/// The transport is constructed once by whoever composes the application and
/// handed to [`Dispatcher::new`](crate::net::Dispatcher::new) (or swapped for
/// one pointing at a test server). Nothing in this crate holds a process-wide
/// client.
pub fn build_transport(config: &ClientConfig) -> Result<reqwest::Client, RequestError> {
    let client = reqwest::Client::builder()
        .user_agent(config.user_agent.clone())
        .danger_accept_invalid_certs(config.accept_invalid_certs)
        .build()?;

    Ok(client)
}
