//! Resource shapes and response envelopes of the Sync API.
//!
//! # Design
//! These are plain data-transfer types. Every field is defaulted on decode so
//! a partial object (the API omits fields it considers unchanged) still
//! parses. Flags the API reports as `0`/`1` integers are kept as integers.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Reference to a resource: either its server-assigned id or the temp id of a
/// command that creates it and has not been resolved yet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceId {
    Id(i64),
    Temp(String),
}

impl From<i64> for ResourceId {
    fn from(id: i64) -> Self {
        ResourceId::Id(id)
    }
}

impl From<&str> for ResourceId {
    fn from(temp_id: &str) -> Self {
        ResourceId::Temp(temp_id.to_string())
    }
}

impl From<String> for ResourceId {
    fn from(temp_id: String) -> Self {
        ResourceId::Temp(temp_id)
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceId::Id(id) => write!(f, "{id}"),
            ResourceId::Temp(temp_id) => f.write_str(temp_id),
        }
    }
}

/// A Todoist project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    pub id: i64,
    pub legacy_id: Option<i64>,
    pub name: String,
    pub color: i64,
    pub parent_id: Option<i64>,
    pub legacy_parent_id: Option<i64>,
    pub child_order: i64,
    pub collapsed: i64,
    pub shared: bool,
    pub is_deleted: i64,
    pub is_archived: i64,
    pub is_favorite: i64,
    pub sync_id: Option<i64>,
    pub inbox_project: Option<bool>,
    pub team_inbox: Option<bool>,
}

/// A section groups tasks inside a project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Section {
    pub id: i64,
    pub name: String,
    pub project_id: i64,
    /// Only set for sections created before 1 April 2017.
    pub legacy_project_id: Option<i64>,
    pub section_order: i64,
    pub collapsed: bool,
    pub sync_id: Option<i64>,
    pub is_deleted: bool,
    pub is_archived: bool,
    pub date_archived: Option<String>,
    pub date_added: String,
}

/// Due date of a task.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Due {
    pub date: String,
    pub timezone: Option<String>,
    pub string: String,
    pub lang: String,
    pub is_recurring: bool,
}

/// A task. The Sync API calls these "items".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Task {
    pub id: i64,
    pub legacy_id: Option<i64>,
    pub user_id: i64,
    pub project_id: i64,
    pub legacy_project_id: Option<i64>,
    pub content: String,
    pub description: String,
    pub due: Option<Due>,
    /// 1 (natural) to 4 (very urgent).
    pub priority: i64,
    pub parent_id: Option<i64>,
    pub legacy_parent_id: Option<i64>,
    pub child_order: i64,
    pub section_id: Option<i64>,
    pub day_order: i64,
    pub collapsed: i64,
    pub labels: Vec<i64>,
    pub added_by_uid: Option<i64>,
    pub assigned_by_uid: Option<i64>,
    pub responsible_uid: Option<i64>,
    pub checked: i64,
    pub in_history: i64,
    pub is_deleted: i64,
    pub sync_id: Option<i64>,
    pub date_completed: Option<String>,
    pub date_added: String,
}

/// Envelope of a read-only sync call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadResponse {
    pub sync_token: Option<String>,
    pub full_sync: bool,
    pub temp_id_mapping: HashMap<String, i64>,
    pub projects: Vec<Project>,
    pub sections: Vec<Section>,
    #[serde(rename = "items")]
    pub tasks: Vec<Task>,
}

impl ReadResponse {
    /// Server id assigned to a temp id in this call.
    pub fn resolve(&self, temp_id: &str) -> Option<i64> {
        self.temp_id_mapping.get(temp_id).copied()
    }
}

/// Envelope of a sync call that carried commands.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandResponse {
    pub sync_token: Option<String>,
    pub full_sync: bool,
    pub temp_id_mapping: HashMap<String, i64>,
    /// Correlation id of each submitted command mapped to `"ok"` or an error
    /// payload.
    pub sync_status: BTreeMap<String, Value>,
    pub projects: Vec<Project>,
    pub sections: Vec<Section>,
    #[serde(rename = "items")]
    pub tasks: Vec<Task>,
}

impl CommandResponse {
    /// Server id assigned to a temp id in this call.
    pub fn resolve(&self, temp_id: &str) -> Option<i64> {
        self.temp_id_mapping.get(temp_id).copied()
    }

    /// Whether the command with this correlation id was applied.
    pub fn succeeded(&self, correlation_id: &str) -> bool {
        self.sync_status
            .get(correlation_id)
            .is_some_and(|status| status.as_str() == Some(crate::classify::SYNC_OK))
    }
}

/// A project together with its notes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectInfo {
    pub project: Project,
    pub notes: Vec<Value>,
}

/// A project with its notes, sections and uncompleted tasks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectData {
    pub project: Project,
    pub project_notes: Vec<Value>,
    pub sections: Vec<Section>,
    #[serde(rename = "items")]
    pub tasks: Vec<Task>,
}

/// Page selection for archived projects. The API accepts a limit between 1
/// and 500 (default 500) and a zero-based offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub limit: u32,
    pub offset: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_id_serializes_untagged() {
        assert_eq!(serde_json::to_value(ResourceId::Id(7)).unwrap(), 7);
        assert_eq!(
            serde_json::to_value(ResourceId::from("project1")).unwrap(),
            "project1"
        );
    }

    #[test]
    fn partial_project_decodes() {
        let project: Project = serde_json::from_str(r#"{"id":1,"name":"Inbox"}"#).unwrap();
        assert_eq!(project.id, 1);
        assert_eq!(project.name, "Inbox");
        assert_eq!(project.parent_id, None);
    }

    #[test]
    fn read_response_maps_items_to_tasks() {
        let resp: ReadResponse = serde_json::from_str(
            r#"{"sync_token":"abc","full_sync":true,"items":[{"id":5,"content":"Buy milk"}]}"#,
        )
        .unwrap();
        assert_eq!(resp.sync_token.as_deref(), Some("abc"));
        assert!(resp.full_sync);
        assert_eq!(resp.tasks.len(), 1);
        assert_eq!(resp.tasks[0].content, "Buy milk");
        assert!(resp.projects.is_empty());
    }

    #[test]
    fn command_response_resolves_temp_ids_and_status() {
        let resp: CommandResponse = serde_json::from_str(
            r#"{
                "temp_id_mapping": {"project1": 2203306141},
                "sync_status": {"a": "ok", "b": {"error_tag": "INVALID_ARGUMENT_VALUE"}}
            }"#,
        )
        .unwrap();
        assert_eq!(resp.resolve("project1"), Some(2203306141));
        assert_eq!(resp.resolve("project2"), None);
        assert!(resp.succeeded("a"));
        assert!(!resp.succeeded("b"));
        assert!(!resp.succeeded("missing"));
    }
}
