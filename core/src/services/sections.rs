use super::{commit_one, not_found};
use crate::client::TodoistClient;
use crate::command::{
    AddSection, CommandArgs, MoveSection, ReorderSections, ResourceRef, UpdateSection,
};
use crate::context::Context;
use crate::error::Error;
use crate::transport::HttpTransport;
use crate::types::{CommandResponse, ReadResponse, ResourceId, Section};

const RESOURCE_TYPE: &str = "sections";

/// Section operations, obtained from [`TodoistClient::sections`].
#[derive(Debug)]
pub struct SectionsService<'c, T: HttpTransport> {
    client: &'c TodoistClient<T>,
}

impl<'c, T: HttpTransport> SectionsService<'c, T> {
    pub(crate) fn new(client: &'c TodoistClient<T>) -> Self {
        Self { client }
    }

    pub async fn list(
        &self,
        ctx: &Context,
        sync_token: Option<&str>,
    ) -> Result<(Vec<Section>, ReadResponse), Error> {
        let resp = self.client.read(ctx, sync_token, &[RESOURCE_TYPE]).await?;
        Ok((resp.sections.clone(), resp))
    }

    pub async fn add(
        &self,
        ctx: &Context,
        args: AddSection,
        temp_id: Option<&str>,
    ) -> Result<(Vec<Section>, CommandResponse), Error> {
        self.commit(ctx, CommandArgs::SectionAdd(args), temp_id).await
    }

    pub async fn update(
        &self,
        ctx: &Context,
        args: UpdateSection,
    ) -> Result<(Vec<Section>, CommandResponse), Error> {
        self.commit(ctx, CommandArgs::SectionUpdate(args), None).await
    }

    /// Move a section, with its tasks, to another project.
    pub async fn move_to(
        &self,
        ctx: &Context,
        args: MoveSection,
    ) -> Result<(Vec<Section>, CommandResponse), Error> {
        self.commit(ctx, CommandArgs::SectionMove(args), None).await
    }

    pub async fn reorder(
        &self,
        ctx: &Context,
        args: ReorderSections,
    ) -> Result<(Vec<Section>, CommandResponse), Error> {
        self.commit(ctx, CommandArgs::SectionReorder(args), None).await
    }

    pub async fn delete(
        &self,
        ctx: &Context,
        id: impl Into<ResourceId>,
    ) -> Result<(Vec<Section>, CommandResponse), Error> {
        let args = CommandArgs::SectionDelete(ResourceRef::new(id));
        self.commit(ctx, args, None).await
    }

    /// Archiving a section also completes its tasks.
    pub async fn archive(
        &self,
        ctx: &Context,
        id: impl Into<ResourceId>,
    ) -> Result<(Vec<Section>, CommandResponse), Error> {
        let args = CommandArgs::SectionArchive(ResourceRef::new(id));
        self.commit(ctx, args, None).await
    }

    pub async fn unarchive(
        &self,
        ctx: &Context,
        id: impl Into<ResourceId>,
    ) -> Result<(Vec<Section>, CommandResponse), Error> {
        let args = CommandArgs::SectionUnarchive(ResourceRef::new(id));
        self.commit(ctx, args, None).await
    }

    pub async fn get_by_id(&self, ctx: &Context, id: i64) -> Result<Section, Error> {
        let (sections, _) = self.list(ctx, None).await?;
        sections
            .into_iter()
            .find(|section| section.id == id)
            .ok_or_else(|| not_found("section", id))
    }

    async fn commit(
        &self,
        ctx: &Context,
        args: CommandArgs,
        temp_id: Option<&str>,
    ) -> Result<(Vec<Section>, CommandResponse), Error> {
        let resp = commit_one(self.client, ctx, RESOURCE_TYPE, args, temp_id).await?;
        Ok((resp.sections.clone(), resp))
    }
}
