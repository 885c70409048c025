//! Commands: the mutating operations submitted in a sync batch.
//!
//! # Design
//! The set of command types is closed, so the arguments are an enum with one
//! variant per command type. Serde's adjacent tagging writes the variant name
//! as `type` and the payload as `args`, and the enum is flattened into
//! [`Command`] next to the correlation id and temp id. The request builder
//! only ever needs `Serialize`.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::ResourceId;

/// A single command in a sync batch.
///
/// Serialized as `{"type": ..., "args": {...}, "uuid": ..., "temp_id": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    #[serde(flatten)]
    pub args: CommandArgs,
    /// Matches this command to its `sync_status` entry in the response.
    #[serde(rename = "uuid")]
    pub correlation_id: String,
    /// Placeholder id for the resource this command creates, resolved through
    /// `temp_id_mapping`.
    pub temp_id: String,
}

impl Command {
    /// A command with a fresh correlation id and a fresh temp id.
    pub fn new(args: CommandArgs) -> Self {
        Self::with_temp_id(args, new_id())
    }

    /// A command with a fresh correlation id and a caller-chosen temp id, so
    /// later commands and the caller can refer to the created resource.
    pub fn with_temp_id(args: CommandArgs, temp_id: impl Into<String>) -> Self {
        Self {
            args,
            correlation_id: new_id(),
            temp_id: temp_id.into(),
        }
    }

    /// The wire name of this command's type.
    pub fn command_type(&self) -> &'static str {
        self.args.command_type()
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Arguments of every supported command type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "args", rename_all = "snake_case")]
pub enum CommandArgs {
    ProjectAdd(AddProject),
    ProjectUpdate(UpdateProject),
    ProjectMove(MoveProject),
    ProjectDelete(ResourceRef),
    ProjectArchive(ResourceRef),
    ProjectUnarchive(ResourceRef),
    ProjectReorder(ReorderProjects),
    SectionAdd(AddSection),
    SectionUpdate(UpdateSection),
    SectionMove(MoveSection),
    SectionReorder(ReorderSections),
    SectionDelete(ResourceRef),
    SectionArchive(ResourceRef),
    SectionUnarchive(ResourceRef),
    ItemAdd(AddTask),
    ItemUpdate(UpdateTask),
    ItemMove(MoveTask),
    ItemDelete(ResourceRef),
    ItemComplete(CompleteTask),
    ItemUncomplete(ResourceRef),
    ItemClose(ResourceRef),
}

impl CommandArgs {
    pub fn command_type(&self) -> &'static str {
        match self {
            CommandArgs::ProjectAdd(_) => "project_add",
            CommandArgs::ProjectUpdate(_) => "project_update",
            CommandArgs::ProjectMove(_) => "project_move",
            CommandArgs::ProjectDelete(_) => "project_delete",
            CommandArgs::ProjectArchive(_) => "project_archive",
            CommandArgs::ProjectUnarchive(_) => "project_unarchive",
            CommandArgs::ProjectReorder(_) => "project_reorder",
            CommandArgs::SectionAdd(_) => "section_add",
            CommandArgs::SectionUpdate(_) => "section_update",
            CommandArgs::SectionMove(_) => "section_move",
            CommandArgs::SectionReorder(_) => "section_reorder",
            CommandArgs::SectionDelete(_) => "section_delete",
            CommandArgs::SectionArchive(_) => "section_archive",
            CommandArgs::SectionUnarchive(_) => "section_unarchive",
            CommandArgs::ItemAdd(_) => "item_add",
            CommandArgs::ItemUpdate(_) => "item_update",
            CommandArgs::ItemMove(_) => "item_move",
            CommandArgs::ItemDelete(_) => "item_delete",
            CommandArgs::ItemComplete(_) => "item_complete",
            CommandArgs::ItemUncomplete(_) => "item_uncomplete",
            CommandArgs::ItemClose(_) => "item_close",
        }
    }
}

/// Arguments of commands that only name their target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceRef {
    pub id: ResourceId,
}

impl ResourceRef {
    pub fn new(id: impl Into<ResourceId>) -> Self {
        Self { id: id.into() }
    }
}

/// New position of one resource among its siblings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildOrder {
    pub id: ResourceId,
    pub child_order: i64,
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddProject {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<ResourceId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub child_order: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_favorite: Option<i64>,
}

/// Only the fields that are set are changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateProject {
    pub id: ResourceId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collapsed: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_favorite: Option<i64>,
}

/// A `parent_id` of `None` makes the project a root project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveProject {
    pub id: ResourceId,
    pub parent_id: Option<ResourceId>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReorderProjects {
    pub projects: Vec<ChildOrder>,
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddSection {
    pub name: String,
    pub project_id: ResourceId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_order: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateSection {
    pub id: ResourceId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collapsed: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveSection {
    pub id: ResourceId,
    pub project_id: ResourceId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionOrder {
    pub id: ResourceId,
    pub section_order: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReorderSections {
    pub sections: Vec<SectionOrder>,
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

/// Due date as accepted by `item_add` / `item_update`: either a natural
/// language `string` or a fixed `date`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DueDate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub string: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddTask {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<ResourceId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_id: Option<ResourceId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<ResourceId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due: Option<DueDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub child_order: Option<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateTask {
    pub id: ResourceId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due: Option<DueDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collapsed: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<i64>>,
}

/// Exactly one destination should be set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveTask {
    pub id: ResourceId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<ResourceId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_id: Option<ResourceId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<ResourceId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompleteTask {
    pub id: ResourceId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_completed: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn command_serializes_in_wire_shape() {
        let cmd = Command {
            args: CommandArgs::ProjectAdd(AddProject {
                name: "Shopping".to_string(),
                ..Default::default()
            }),
            correlation_id: "uuid".to_string(),
            temp_id: "temp_id".to_string(),
        };
        assert_eq!(
            serde_json::to_string(&cmd).unwrap(),
            r#"{"type":"project_add","args":{"name":"Shopping"},"uuid":"uuid","temp_id":"temp_id"}"#
        );
    }

    #[test]
    fn command_type_matches_serialized_tag() {
        let commands = [
            CommandArgs::ProjectArchive(ResourceRef::new(1i64)),
            CommandArgs::SectionReorder(ReorderSections::default()),
            CommandArgs::ItemUncomplete(ResourceRef::new("task1")),
            CommandArgs::ItemComplete(CompleteTask {
                id: 3i64.into(),
                date_completed: None,
            }),
        ];
        for args in commands {
            let value = serde_json::to_value(&args).unwrap();
            assert_eq!(value["type"], args.command_type());
        }
    }

    #[test]
    fn new_generates_distinct_ids() {
        let a = Command::new(CommandArgs::ProjectDelete(ResourceRef::new(1i64)));
        let b = Command::new(CommandArgs::ProjectDelete(ResourceRef::new(1i64)));
        assert_ne!(a.correlation_id, b.correlation_id);
        assert_ne!(a.temp_id, b.temp_id);
        assert!(Uuid::parse_str(&a.correlation_id).is_ok());
    }

    #[test]
    fn with_temp_id_keeps_caller_temp_id() {
        let cmd = Command::with_temp_id(
            CommandArgs::ProjectAdd(AddProject {
                name: "Parent".to_string(),
                ..Default::default()
            }),
            "project1",
        );
        assert_eq!(cmd.temp_id, "project1");
        assert_eq!(cmd.command_type(), "project_add");
    }

    #[test]
    fn move_project_to_root_sends_null_parent() {
        let args = CommandArgs::ProjectMove(MoveProject {
            id: 5i64.into(),
            parent_id: None,
        });
        assert_eq!(
            serde_json::to_value(&args).unwrap(),
            json!({"type": "project_move", "args": {"id": 5, "parent_id": null}})
        );
    }

    #[test]
    fn temp_id_references_serialize_as_strings() {
        let args = CommandArgs::SectionAdd(AddSection {
            name: "Groceries".to_string(),
            project_id: "project1".into(),
            section_order: None,
        });
        assert_eq!(
            serde_json::to_value(&args).unwrap()["args"],
            json!({"name": "Groceries", "project_id": "project1"})
        );
    }
}
