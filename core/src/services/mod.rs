//! Per-resource wrappers over [`TodoistClient::commit`] and
//! [`TodoistClient::read`].
//!
//! Each write sends a batch holding exactly one command and asks for the
//! collection it touched, so the caller gets back both the updated resources
//! and the envelope carrying `temp_id_mapping` and the new `sync_token`.

mod projects;
mod sections;
mod tasks;

pub use projects::ProjectsService;
pub use sections::SectionsService;
pub use tasks::TasksService;

use crate::client::TodoistClient;
use crate::command::{Command, CommandArgs};
use crate::context::Context;
use crate::error::Error;
use crate::transport::HttpTransport;
use crate::types::CommandResponse;

/// Submit a single command, using `temp_id` when the caller chose one.
async fn commit_one<T: HttpTransport>(
    client: &TodoistClient<T>,
    ctx: &Context,
    resource_type: &str,
    args: CommandArgs,
    temp_id: Option<&str>,
) -> Result<CommandResponse, Error> {
    let command = match temp_id {
        Some(temp_id) => Command::with_temp_id(args, temp_id),
        None => Command::new(args),
    };
    client.commit(ctx, None, &[resource_type], &[command]).await
}

fn not_found(resource: &'static str, key: impl ToString) -> Error {
    Error::NotFound {
        resource,
        key: key.to_string(),
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::collections::HashMap;

    use serde_json::Value;

    use crate::client::TodoistClient;
    use crate::config::ClientConfig;
    use crate::http::HttpRequest;
    use crate::transport::testing::StubTransport;

    pub(crate) fn client(status: u16, body: &str) -> (TodoistClient<StubTransport>, StubTransport) {
        let transport = StubTransport::new(status, body);
        let client =
            TodoistClient::with_transport(ClientConfig::new("12345"), transport.clone()).unwrap();
        (client, transport)
    }

    pub(crate) fn form(request: &HttpRequest) -> HashMap<String, String> {
        url::form_urlencoded::parse(request.body.as_bytes())
            .into_owned()
            .collect()
    }

    /// The single command carried by a sync request.
    pub(crate) fn sent_command(request: &HttpRequest) -> Value {
        let commands: Vec<Value> = serde_json::from_str(&form(request)["commands"]).unwrap();
        assert_eq!(commands.len(), 1);
        commands.into_iter().next().unwrap()
    }
}
