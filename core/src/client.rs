//! The Sync API client.
//!
//! # Design
//! `TodoistClient` holds an immutable configuration and an [`HttpTransport`],
//! and is cheap to clone and safe to share between concurrent calls. A call
//! is split the same way every time:
//!
//! 1. build an [`HttpRequest`] (no I/O, see [`crate::request`]),
//! 2. [`execute`](TodoistClient::execute) it, racing the transport against
//!    the caller's [`Context`],
//! 3. classify the response (see [`crate::classify`]),
//! 4. decode the body, or copy it verbatim into a sink.
//!
//! The resource services in [`crate::services`] are thin wrappers over
//! [`read`](TodoistClient::read) and [`commit`](TodoistClient::commit).

use std::io::Write;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::classify::{check_response, is_blank};
use crate::command::Command;
use crate::config::ClientConfig;
use crate::context::Context;
use crate::error::Error;
use crate::http::{HttpRequest, HttpResponse};
use crate::request;
use crate::services::{ProjectsService, SectionsService, TasksService};
use crate::transport::{HttpTransport, UreqTransport};
use crate::types::{CommandResponse, ReadResponse};

#[derive(Debug, Clone)]
pub struct TodoistClient<T: HttpTransport = UreqTransport> {
    config: Arc<ClientConfig>,
    transport: T,
}

impl TodoistClient<UreqTransport> {
    /// A client using the default `ureq` transport with the configured
    /// timeout.
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        let transport = UreqTransport::new(config.timeout);
        Self::with_transport(config, transport)
    }
}

impl<T: HttpTransport> TodoistClient<T> {
    /// Fails with [`Error::RequiredToken`] if the configured token is empty.
    pub fn with_transport(config: ClientConfig, transport: T) -> Result<Self, Error> {
        if config.token.is_empty() {
            return Err(Error::RequiredToken);
        }
        Ok(Self {
            config: Arc::new(config),
            transport,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn projects(&self) -> ProjectsService<'_, T> {
        ProjectsService::new(self)
    }

    pub fn sections(&self) -> SectionsService<'_, T> {
        SectionsService::new(self)
    }

    pub fn tasks(&self) -> TasksService<'_, T> {
        TasksService::new(self)
    }

    pub fn build_sync_request(
        &self,
        sync_token: Option<&str>,
        resource_types: &[&str],
        commands: &[Command],
    ) -> Result<HttpRequest, Error> {
        request::build_sync_request(&self.config, sync_token, resource_types, commands)
    }

    pub fn build_form_request(
        &self,
        path: &str,
        fields: &[(&'static str, String)],
    ) -> Result<HttpRequest, Error> {
        request::build_form_request(&self.config, path, fields)
    }

    /// Perform the round-trip without interpreting the response.
    ///
    /// Returns the context's error if it is canceled or expires while
    /// waiting, and also in place of a transport failure that happened after
    /// the context was already done.
    pub async fn execute(
        &self,
        ctx: &Context,
        mut request: HttpRequest,
    ) -> Result<HttpResponse, Error> {
        if let Some(deadline) = ctx.deadline() {
            let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
            request.timeout = Some(request.timeout.map_or(remaining, |t| t.min(remaining)));
        }

        let response = tokio::select! {
            biased;
            cause = ctx.done() => Err(cause),
            result = self.transport.send(request) => {
                result.map_err(|err| ctx.err().unwrap_or(err))
            }
        }?;

        if self.config.debug {
            debug!(
                status = response.status,
                bytes = response.body.len(),
                "received response"
            );
        }
        Ok(response)
    }

    /// Send a request and decode a successful response as `R`.
    ///
    /// An empty body decodes to `R::default()`.
    pub async fn send_json<R>(&self, ctx: &Context, request: HttpRequest) -> Result<R, Error>
    where
        R: DeserializeOwned + Default,
    {
        let response = self.execute(ctx, request).await?;
        check_response(&response)?;
        decode(&response.body)
    }

    /// Send a request and copy the body of a successful response, unmodified,
    /// into `sink`. Returns the number of bytes written.
    pub async fn send_raw<W: Write>(
        &self,
        ctx: &Context,
        request: HttpRequest,
        sink: &mut W,
    ) -> Result<usize, Error> {
        let response = self.execute(ctx, request).await?;
        check_response(&response)?;
        sink.write_all(&response.body)?;
        Ok(response.body.len())
    }

    /// Read-only sync of the given resource types.
    pub async fn read(
        &self,
        ctx: &Context,
        sync_token: Option<&str>,
        resource_types: &[&str],
    ) -> Result<ReadResponse, Error> {
        let request = self.build_sync_request(sync_token, resource_types, &[])?;
        self.send_json(ctx, request).await
    }

    /// Submit a batch of commands, reading back the given resource types.
    ///
    /// Fails with an [`ErrorKind::Sync`](crate::ErrorKind::Sync) error if any
    /// command in the batch was rejected.
    pub async fn commit(
        &self,
        ctx: &Context,
        sync_token: Option<&str>,
        resource_types: &[&str],
        commands: &[Command],
    ) -> Result<CommandResponse, Error> {
        if self.config.debug {
            for command in commands {
                debug!(
                    command = command.command_type(),
                    uuid = %command.correlation_id,
                    temp_id = %command.temp_id,
                    "queued command"
                );
            }
        }
        let request = self.build_sync_request(sync_token, resource_types, commands)?;
        self.send_json(ctx, request).await
    }
}

fn decode<R: DeserializeOwned + Default>(body: &[u8]) -> Result<R, Error> {
    if is_blank(body) {
        return Ok(R::default());
    }
    serde_json::from_slice(body).map_err(Error::Decode)
}
