//! Client for the Todoist Sync API.
//!
//! # Overview
//! Every call is one form-encoded POST carrying the API token, a sync token,
//! the resource types to read and the commands to apply. The response is
//! either a read envelope or a command envelope whose `sync_status` reports
//! the outcome of each command.
//!
//! # Design
//! - Building a request ([`request`]) and classifying a response
//!   ([`classify`]) are pure functions over [`HttpRequest`] and
//!   [`HttpResponse`]. Only the [`HttpTransport`] touches the network.
//! - [`TodoistClient`] holds immutable configuration and is safe to share.
//!   Each call takes a [`Context`] for cancellation and deadlines.
//! - A 200 response is only a success when every command in it succeeded;
//!   a rejected command surfaces as an [`ApiError`] of kind
//!   [`ErrorKind::Sync`].
//! - The per-resource services ([`ProjectsService`], [`SectionsService`],
//!   [`TasksService`]) submit one command per call and return both the
//!   resources and the envelope, so the caller can keep the new sync token
//!   and resolve temp ids.
//!
//! ```no_run
//! use todoist_core::{ClientConfig, Context, TodoistClient};
//! use todoist_core::command::AddProject;
//!
//! # async fn demo() -> Result<(), todoist_core::Error> {
//! let client = TodoistClient::new(ClientConfig::new("api-token"))?;
//! let ctx = Context::background();
//! let args = AddProject { name: "Shopping".into(), ..Default::default() };
//! let (_, resp) = client.projects().add(&ctx, args, Some("shopping")).await?;
//! println!("created project {:?}", resp.resolve("shopping"));
//! # Ok(())
//! # }
//! ```

pub mod classify;
pub mod client;
pub mod command;
pub mod config;
pub mod context;
pub mod error;
pub mod http;
pub mod request;
pub mod services;
pub mod transport;
pub mod types;

pub use client::TodoistClient;
pub use command::{Command, CommandArgs};
pub use config::ClientConfig;
pub use context::{CancelHandle, Context};
pub use error::{ApiError, Error, ErrorKind};
pub use http::{HttpRequest, HttpResponse};
pub use services::{ProjectsService, SectionsService, TasksService};
pub use transport::{HttpTransport, UreqTransport};
pub use types::{
    CommandResponse, Pagination, Project, ProjectData, ProjectInfo, ReadResponse, ResourceId,
    Section, Task,
};
