use super::{commit_one, not_found};
use crate::client::TodoistClient;
use crate::command::{AddTask, CommandArgs, CompleteTask, MoveTask, ResourceRef, UpdateTask};
use crate::context::Context;
use crate::error::Error;
use crate::transport::HttpTransport;
use crate::types::{CommandResponse, ReadResponse, ResourceId, Task};

/// The Sync API calls tasks "items".
const RESOURCE_TYPE: &str = "items";

/// Task operations, obtained from [`TodoistClient::tasks`].
#[derive(Debug)]
pub struct TasksService<'c, T: HttpTransport> {
    client: &'c TodoistClient<T>,
}

impl<'c, T: HttpTransport> TasksService<'c, T> {
    pub(crate) fn new(client: &'c TodoistClient<T>) -> Self {
        Self { client }
    }

    pub async fn list(
        &self,
        ctx: &Context,
        sync_token: Option<&str>,
    ) -> Result<(Vec<Task>, ReadResponse), Error> {
        let resp = self.client.read(ctx, sync_token, &[RESOURCE_TYPE]).await?;
        Ok((resp.tasks.clone(), resp))
    }

    pub async fn add(
        &self,
        ctx: &Context,
        args: AddTask,
        temp_id: Option<&str>,
    ) -> Result<(Vec<Task>, CommandResponse), Error> {
        self.commit(ctx, CommandArgs::ItemAdd(args), temp_id).await
    }

    pub async fn update(
        &self,
        ctx: &Context,
        args: UpdateTask,
    ) -> Result<(Vec<Task>, CommandResponse), Error> {
        self.commit(ctx, CommandArgs::ItemUpdate(args), None).await
    }

    pub async fn move_to(
        &self,
        ctx: &Context,
        args: MoveTask,
    ) -> Result<(Vec<Task>, CommandResponse), Error> {
        self.commit(ctx, CommandArgs::ItemMove(args), None).await
    }

    pub async fn delete(
        &self,
        ctx: &Context,
        id: impl Into<ResourceId>,
    ) -> Result<(Vec<Task>, CommandResponse), Error> {
        let args = CommandArgs::ItemDelete(ResourceRef::new(id));
        self.commit(ctx, args, None).await
    }

    /// Mark a task and its subtasks completed and move them to history.
    pub async fn complete(
        &self,
        ctx: &Context,
        args: CompleteTask,
    ) -> Result<(Vec<Task>, CommandResponse), Error> {
        self.commit(ctx, CommandArgs::ItemComplete(args), None).await
    }

    pub async fn uncomplete(
        &self,
        ctx: &Context,
        id: impl Into<ResourceId>,
    ) -> Result<(Vec<Task>, CommandResponse), Error> {
        let args = CommandArgs::ItemUncomplete(ResourceRef::new(id));
        self.commit(ctx, args, None).await
    }

    /// Complete a task the way the official apps do: a recurring task moves
    /// to its next occurrence instead.
    pub async fn close(
        &self,
        ctx: &Context,
        id: impl Into<ResourceId>,
    ) -> Result<(Vec<Task>, CommandResponse), Error> {
        let args = CommandArgs::ItemClose(ResourceRef::new(id));
        self.commit(ctx, args, None).await
    }

    pub async fn get_by_id(&self, ctx: &Context, id: i64) -> Result<Task, Error> {
        let (tasks, _) = self.list(ctx, None).await?;
        tasks
            .into_iter()
            .find(|task| task.id == id)
            .ok_or_else(|| not_found("task", id))
    }

    async fn commit(
        &self,
        ctx: &Context,
        args: CommandArgs,
        temp_id: Option<&str>,
    ) -> Result<(Vec<Task>, CommandResponse), Error> {
        let resp = commit_one(self.client, ctx, RESOURCE_TYPE, args, temp_id).await?;
        Ok((resp.tasks.clone(), resp))
    }
}
