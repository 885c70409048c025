use super::{commit_one, not_found};
use crate::client::TodoistClient;
use crate::command::{
    AddProject, CommandArgs, MoveProject, ReorderProjects, ResourceRef, UpdateProject,
};
use crate::context::Context;
use crate::error::Error;
use crate::transport::HttpTransport;
use crate::types::{
    CommandResponse, Pagination, Project, ProjectData, ProjectInfo, ReadResponse, ResourceId,
};

const RESOURCE_TYPE: &str = "projects";

/// Project operations, obtained from [`TodoistClient::projects`].
#[derive(Debug)]
pub struct ProjectsService<'c, T: HttpTransport> {
    client: &'c TodoistClient<T>,
}

impl<'c, T: HttpTransport> ProjectsService<'c, T> {
    pub(crate) fn new(client: &'c TodoistClient<T>) -> Self {
        Self { client }
    }

    /// All projects, as of `sync_token` (or a full sync when `None`).
    pub async fn list(
        &self,
        ctx: &Context,
        sync_token: Option<&str>,
    ) -> Result<(Vec<Project>, ReadResponse), Error> {
        let resp = self.client.read(ctx, sync_token, &[RESOURCE_TYPE]).await?;
        Ok((resp.projects.clone(), resp))
    }

    /// Create a project. Pass `temp_id` to look the new id up afterwards with
    /// [`CommandResponse::resolve`].
    pub async fn add(
        &self,
        ctx: &Context,
        args: AddProject,
        temp_id: Option<&str>,
    ) -> Result<(Vec<Project>, CommandResponse), Error> {
        self.commit(ctx, CommandArgs::ProjectAdd(args), temp_id).await
    }

    pub async fn update(
        &self,
        ctx: &Context,
        args: UpdateProject,
    ) -> Result<(Vec<Project>, CommandResponse), Error> {
        self.commit(ctx, CommandArgs::ProjectUpdate(args), None).await
    }

    pub async fn move_to(
        &self,
        ctx: &Context,
        args: MoveProject,
    ) -> Result<(Vec<Project>, CommandResponse), Error> {
        self.commit(ctx, CommandArgs::ProjectMove(args), None).await
    }

    /// Delete a project and all its descendants.
    pub async fn delete(
        &self,
        ctx: &Context,
        id: impl Into<ResourceId>,
    ) -> Result<(Vec<Project>, CommandResponse), Error> {
        let args = CommandArgs::ProjectDelete(ResourceRef::new(id));
        self.commit(ctx, args, None).await
    }

    pub async fn archive(
        &self,
        ctx: &Context,
        id: impl Into<ResourceId>,
    ) -> Result<(Vec<Project>, CommandResponse), Error> {
        let args = CommandArgs::ProjectArchive(ResourceRef::new(id));
        self.commit(ctx, args, None).await
    }

    pub async fn unarchive(
        &self,
        ctx: &Context,
        id: impl Into<ResourceId>,
    ) -> Result<(Vec<Project>, CommandResponse), Error> {
        let args = CommandArgs::ProjectUnarchive(ResourceRef::new(id));
        self.commit(ctx, args, None).await
    }

    pub async fn reorder(
        &self,
        ctx: &Context,
        args: ReorderProjects,
    ) -> Result<(Vec<Project>, CommandResponse), Error> {
        self.commit(ctx, CommandArgs::ProjectReorder(args), None).await
    }

    pub async fn get_by_id(&self, ctx: &Context, id: i64) -> Result<Project, Error> {
        let (projects, _) = self.list(ctx, None).await?;
        projects
            .into_iter()
            .find(|project| project.id == id)
            .ok_or_else(|| not_found("project", id))
    }

    pub async fn get_by_name(&self, ctx: &Context, name: &str) -> Result<Project, Error> {
        let (projects, _) = self.list(ctx, None).await?;
        projects
            .into_iter()
            .find(|project| project.name == name)
            .ok_or_else(|| not_found("project", name))
    }

    /// A project and its notes. With `all_data` the notes are not truncated.
    pub async fn get_info(
        &self,
        ctx: &Context,
        project_id: i64,
        all_data: bool,
    ) -> Result<ProjectInfo, Error> {
        let request = self.client.build_form_request(
            "projects/get",
            &[
                ("project_id", project_id.to_string()),
                ("all_data", all_data.to_string()),
            ],
        )?;
        self.client.send_json(ctx, request).await
    }

    /// A project with its notes, sections and uncompleted tasks.
    pub async fn get_data(&self, ctx: &Context, project_id: i64) -> Result<ProjectData, Error> {
        let request = self
            .client
            .build_form_request("projects/get_data", &[("project_id", project_id.to_string())])?;
        self.client.send_json(ctx, request).await
    }

    /// Archived projects. Without `page` the server's default page applies.
    pub async fn get_archived(
        &self,
        ctx: &Context,
        page: Option<Pagination>,
    ) -> Result<Vec<Project>, Error> {
        let fields = match page {
            Some(page) => vec![
                ("limit", page.limit.to_string()),
                ("offset", page.offset.to_string()),
            ],
            None => Vec::new(),
        };
        let request = self
            .client
            .build_form_request("projects/get_archived", &fields)?;
        self.client.send_json(ctx, request).await
    }

    async fn commit(
        &self,
        ctx: &Context,
        args: CommandArgs,
        temp_id: Option<&str>,
    ) -> Result<(Vec<Project>, CommandResponse), Error> {
        let resp = commit_one(self.client, ctx, RESOURCE_TYPE, args, temp_id).await?;
        Ok((resp.projects.clone(), resp))
    }
}
