use clap::{Args, Parser, Subcommand};
use todoist_core::config::DEFAULT_BASE_URL;

#[derive(Debug, Parser)]
#[command(version, about = "Talk to the Todoist Sync API")]
pub struct Cli {
    /// API token. Can also be provided via the `TODOIST_API_TOKEN` environment variable.
    #[arg(long, env = "TODOIST_API_TOKEN", hide_env_values = true)]
    pub token: String,

    /// Sync API root, e.g. the mock server's `http://127.0.0.1:3000/sync/v8`.
    #[arg(long, env = "TODOIST_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Abort a call that takes longer than this many seconds.
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Override the `User-Agent` header. An empty value omits it.
    #[arg(long)]
    pub user_agent: Option<String>,

    /// Trace requests and responses.
    #[arg(long)]
    pub debug: bool,

    #[command(subcommand)]
    pub resource: Resource,
}

#[derive(Debug, Subcommand)]
pub enum Resource {
    /// Print the raw sync response
    Sync {
        /// Sync token from a previous call; full sync when omitted
        #[arg(long)]
        sync_token: Option<String>,

        /// Resource types to read, comma separated
        #[arg(long, value_delimiter = ',', default_value = "all")]
        resource_types: Vec<String>,
    },

    #[command(subcommand)]
    Projects(ProjectsCommand),

    #[command(subcommand)]
    Sections(SectionsCommand),

    #[command(subcommand)]
    Tasks(TasksCommand),
}

#[derive(Debug, Subcommand)]
pub enum ProjectsCommand {
    /// List active projects
    List,

    /// Look up one project
    Get(ProjectKey),

    /// Create a project and print its id
    Add {
        name: String,

        /// Parent project id
        #[arg(long)]
        parent: Option<i64>,

        #[arg(long)]
        color: Option<i64>,
    },

    /// Delete a project and its children
    Delete { id: i64 },

    /// Archive a project
    Archive { id: i64 },

    /// List archived projects
    Archived {
        /// Page size, 1 to 500
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=500))]
        limit: Option<u32>,

        #[arg(long, requires = "limit")]
        offset: Option<u32>,
    },
}

#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
pub struct ProjectKey {
    #[arg(long)]
    pub id: Option<i64>,

    #[arg(long)]
    pub name: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum SectionsCommand {
    /// List sections
    List,

    /// Create a section and print its id
    Add {
        name: String,

        #[arg(long)]
        project: i64,
    },
}

#[derive(Debug, Subcommand)]
pub enum TasksCommand {
    /// List open tasks
    List,

    /// Create a task and print its id
    Add {
        content: String,

        #[arg(long)]
        project: i64,
    },

    /// Complete a task
    Complete { id: i64 },
}
