//! Command-line front end for the Todoist Sync API.
//!
//! Every subcommand runs one client call under a context that is canceled on
//! Ctrl+C, and prints the result as pretty JSON on stdout.

mod cli;

use std::io::Write;
use std::time::Duration;

use anyhow::{Context as _, Result};
use clap::Parser;
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

use todoist_core::command::{AddProject, AddSection, AddTask, CompleteTask};
use todoist_core::{ClientConfig, Context, Pagination, TodoistClient};

use cli::{Cli, ProjectKey, ProjectsCommand, Resource, SectionsCommand, TasksCommand};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let mut config = ClientConfig::new(cli.token.clone())
        .with_base_url(cli.base_url.clone())
        .with_debug(cli.debug);
    if let Some(user_agent) = &cli.user_agent {
        config = config.with_user_agent(user_agent.clone());
    }
    if let Some(secs) = cli.timeout_secs {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    let client = TodoistClient::new(config).context("unable to create client")?;

    let (ctx, cancel) = Context::background().with_cancel();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            debug!("interrupted, canceling request");
            cancel.cancel();
        }
    });

    run(&client, &ctx, cli.resource).await
}

/// `TODOIST_LOG` wins over `RUST_LOG`; without either, `--debug` selects the
/// level.
fn init_tracing(debug: bool) {
    let fallback = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_env("TODOIST_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(fallback));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(client: &TodoistClient, ctx: &Context, resource: Resource) -> Result<()> {
    match resource {
        Resource::Sync {
            sync_token,
            resource_types,
        } => {
            let types: Vec<&str> = resource_types.iter().map(String::as_str).collect();
            let request = client.build_sync_request(sync_token.as_deref(), &types, &[])?;
            let mut stdout = std::io::stdout().lock();
            client
                .send_raw(ctx, request, &mut stdout)
                .await
                .context("sync failed")?;
            writeln!(stdout)?;
            Ok(())
        }
        Resource::Projects(command) => run_projects(client, ctx, command).await,
        Resource::Sections(command) => run_sections(client, ctx, command).await,
        Resource::Tasks(command) => run_tasks(client, ctx, command).await,
    }
}

async fn run_projects(
    client: &TodoistClient,
    ctx: &Context,
    command: ProjectsCommand,
) -> Result<()> {
    let projects = client.projects();
    match command {
        ProjectsCommand::List => {
            let (list, _) = projects.list(ctx, None).await.context("listing projects")?;
            print_json(&list)
        }
        ProjectsCommand::Get(ProjectKey { id: Some(id), .. }) => {
            print_json(&projects.get_by_id(ctx, id).await?)
        }
        ProjectsCommand::Get(ProjectKey { name: Some(name), .. }) => {
            print_json(&projects.get_by_name(ctx, &name).await?)
        }
        ProjectsCommand::Get(_) => anyhow::bail!("either --id or --name is required"),
        ProjectsCommand::Add {
            name,
            parent,
            color,
        } => {
            let args = AddProject {
                name,
                color,
                parent_id: parent.map(Into::into),
                ..Default::default()
            };
            let (_, resp) = projects
                .add(ctx, args, Some(NEW_RESOURCE))
                .await
                .context("adding project")?;
            print_created(resp.resolve(NEW_RESOURCE))
        }
        ProjectsCommand::Delete { id } => {
            projects.delete(ctx, id).await.context("deleting project")?;
            Ok(())
        }
        ProjectsCommand::Archive { id } => {
            projects.archive(ctx, id).await.context("archiving project")?;
            Ok(())
        }
        ProjectsCommand::Archived { limit, offset } => {
            let page = limit.map(|limit| Pagination {
                limit,
                offset: offset.unwrap_or(0),
            });
            let archived = projects
                .get_archived(ctx, page)
                .await
                .context("listing archived projects")?;
            print_json(&archived)
        }
    }
}

async fn run_sections(
    client: &TodoistClient,
    ctx: &Context,
    command: SectionsCommand,
) -> Result<()> {
    let sections = client.sections();
    match command {
        SectionsCommand::List => {
            let (list, _) = sections.list(ctx, None).await.context("listing sections")?;
            print_json(&list)
        }
        SectionsCommand::Add { name, project } => {
            let args = AddSection {
                name,
                project_id: project.into(),
                section_order: None,
            };
            let (_, resp) = sections
                .add(ctx, args, Some(NEW_RESOURCE))
                .await
                .context("adding section")?;
            print_created(resp.resolve(NEW_RESOURCE))
        }
    }
}

async fn run_tasks(client: &TodoistClient, ctx: &Context, command: TasksCommand) -> Result<()> {
    let tasks = client.tasks();
    match command {
        TasksCommand::List => {
            let (list, _) = tasks.list(ctx, None).await.context("listing tasks")?;
            print_json(&list)
        }
        TasksCommand::Add { content, project } => {
            let args = AddTask {
                content,
                project_id: Some(project.into()),
                ..Default::default()
            };
            let (_, resp) = tasks
                .add(ctx, args, Some(NEW_RESOURCE))
                .await
                .context("adding task")?;
            print_created(resp.resolve(NEW_RESOURCE))
        }
        TasksCommand::Complete { id } => {
            let args = CompleteTask {
                id: id.into(),
                date_completed: None,
            };
            tasks.complete(ctx, args).await.context("completing task")?;
            Ok(())
        }
    }
}

/// Temp id used for the single resource an `add` creates.
const NEW_RESOURCE: &str = "new";

fn print_created(id: Option<i64>) -> Result<()> {
    let id = id.context("server did not report the new id")?;
    print_json(&serde_json::json!({ "id": id }))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}
