//! HTTP transports.
//!
//! # Design
//! The client is generic over [`HttpTransport`] so the round-trip can be
//! swapped out, e.g. for a scripted transport in tests. The default
//! [`UreqTransport`] drives a blocking `ureq` agent on tokio's blocking pool.
//! If the caller's context finishes first the client stops waiting for it, and
//! the request's own timeout (derived from the context deadline) ends the
//! blocking call as well. A plain cancel without a deadline only stops the
//! wait; the call itself then runs until the transport-wide timeout.

use std::future::Future;
use std::time::Duration;

use crate::error::Error;
use crate::http::{HttpRequest, HttpResponse};

/// Sends a request and returns the response, whatever its status.
///
/// Implementations report only failures to obtain a response, as
/// [`Error::Transport`]; status interpretation is left to the client.
pub trait HttpTransport: Send + Sync {
    fn send(&self, request: HttpRequest) -> impl Future<Output = Result<HttpResponse, Error>> + Send;
}

/// [`HttpTransport`] backed by a [`ureq::Agent`].
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    /// `timeout` bounds each whole call; `None` leaves it unbounded.
    pub fn new(timeout: Option<Duration>) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .build()
            .new_agent();
        Self { agent }
    }

    pub fn from_agent(agent: ureq::Agent) -> Self {
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(None)
    }
}

impl HttpTransport for UreqTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, Error> {
        let agent = self.agent.clone();
        tokio::task::spawn_blocking(move || execute(&agent, request))
            .await
            .map_err(|err| Error::Transport(Box::new(err)))?
    }
}

fn execute(agent: &ureq::Agent, request: HttpRequest) -> Result<HttpResponse, Error> {
    let mut builder = agent.post(&request.url);
    if let Some(timeout) = request.timeout {
        builder = builder.config().timeout_global(Some(timeout)).build();
    }
    for (name, value) in &request.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }

    let mut response = builder
        .send(request.body.as_bytes())
        .map_err(|err| Error::Transport(Box::new(err)))?;

    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|value| (name.as_str().to_string(), value.to_string()))
        })
        .collect();
    let body = response
        .body_mut()
        .read_to_vec()
        .map_err(|err| Error::Transport(Box::new(err)))?;

    Ok(HttpResponse {
        status,
        headers,
        body,
    })
}
