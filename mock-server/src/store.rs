//! In-memory state and command application.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::model::{ApiFailure, DueInput, IdRef, Item, Project, RawCommand, Section};

pub const INBOX_ID: i64 = 1;

const DEFAULT_COLOR: i64 = 47;
const DEFAULT_PRIORITY: i64 = 1;

#[derive(Debug)]
pub struct Store {
    next_id: i64,
    sync_seq: u64,
    /// Every temp id ever resolved, so later batches can still use them.
    temp_ids: HashMap<String, i64>,
    pub projects: Vec<Project>,
    pub sections: Vec<Section>,
    pub items: Vec<Item>,
}

impl Default for Store {
    fn default() -> Self {
        Self {
            next_id: INBOX_ID + 1,
            sync_seq: 0,
            temp_ids: HashMap::new(),
            projects: vec![Project {
                id: INBOX_ID,
                name: "Inbox".to_string(),
                color: DEFAULT_COLOR,
                parent_id: None,
                child_order: 0,
                collapsed: 0,
                shared: false,
                is_deleted: 0,
                is_archived: 0,
                is_favorite: 0,
                inbox_project: true,
            }],
            sections: Vec::new(),
            items: Vec::new(),
        }
    }
}

// Argument shapes, one per command type that needs more than an id.

#[derive(Deserialize)]
struct IdArgs {
    id: IdRef,
}

#[derive(Deserialize)]
struct ProjectAdd {
    name: String,
    color: Option<i64>,
    parent_id: Option<IdRef>,
    child_order: Option<i64>,
    is_favorite: Option<i64>,
}

#[derive(Deserialize)]
struct ProjectUpdate {
    id: IdRef,
    name: Option<String>,
    color: Option<i64>,
    collapsed: Option<i64>,
    is_favorite: Option<i64>,
}

#[derive(Deserialize)]
struct ProjectMove {
    id: IdRef,
    parent_id: Option<IdRef>,
}

#[derive(Deserialize)]
struct ChildOrder {
    id: IdRef,
    child_order: i64,
}

#[derive(Deserialize)]
struct ProjectReorder {
    projects: Vec<ChildOrder>,
}

#[derive(Deserialize)]
struct SectionAdd {
    name: String,
    project_id: IdRef,
    section_order: Option<i64>,
}

#[derive(Deserialize)]
struct SectionUpdate {
    id: IdRef,
    name: Option<String>,
    collapsed: Option<bool>,
}

#[derive(Deserialize)]
struct SectionMove {
    id: IdRef,
    project_id: IdRef,
}

#[derive(Deserialize)]
struct SectionOrder {
    id: IdRef,
    section_order: i64,
}

#[derive(Deserialize)]
struct SectionReorder {
    sections: Vec<SectionOrder>,
}

#[derive(Deserialize)]
struct ItemAdd {
    content: String,
    #[serde(default)]
    description: String,
    project_id: Option<IdRef>,
    section_id: Option<IdRef>,
    parent_id: Option<IdRef>,
    due: Option<DueInput>,
    priority: Option<i64>,
    child_order: Option<i64>,
    #[serde(default)]
    labels: Vec<i64>,
}

#[derive(Deserialize)]
struct ItemUpdate {
    id: IdRef,
    content: Option<String>,
    description: Option<String>,
    due: Option<DueInput>,
    priority: Option<i64>,
    collapsed: Option<i64>,
    labels: Option<Vec<i64>>,
}

#[derive(Deserialize)]
struct ItemMove {
    id: IdRef,
    parent_id: Option<IdRef>,
    section_id: Option<IdRef>,
    project_id: Option<IdRef>,
}

#[derive(Deserialize)]
struct ItemComplete {
    id: IdRef,
    date_completed: Option<String>,
}

fn args<T: DeserializeOwned>(value: &Value) -> Result<T, ApiFailure> {
    serde_json::from_value(value.clone())
        .map_err(|err| ApiFailure::invalid_argument(format!("Invalid arguments: {err}")))
}

fn project_not_found() -> ApiFailure {
    ApiFailure::not_found("PROJECT_NOT_FOUND", "Project not found")
}

fn section_not_found() -> ApiFailure {
    ApiFailure::not_found("SECTION_NOT_FOUND", "Section not found")
}

fn item_not_found() -> ApiFailure {
    ApiFailure::not_found("ITEM_NOT_FOUND", "Item not found")
}

impl Store {
    /// Advance and return the sync token handed out with each response.
    pub fn next_sync_token(&mut self) -> String {
        self.sync_seq += 1;
        format!("mock-sync-{}", self.sync_seq)
    }

    /// Apply one command. Returns the id of the resource it created, if any.
    pub fn apply(&mut self, command: &RawCommand) -> Result<Option<i64>, ApiFailure> {
        let a = &command.args;
        match command.kind.as_str() {
            "project_add" => self.project_add(args(a)?).map(Some),
            "project_update" => self.project_update(args(a)?).map(|_| None),
            "project_move" => self.project_move(args(a)?).map(|_| None),
            "project_delete" => self.project_delete(args(a)?).map(|_| None),
            "project_archive" => self.project_set_archived(args(a)?, 1).map(|_| None),
            "project_unarchive" => self.project_set_archived(args(a)?, 0).map(|_| None),
            "project_reorder" => self.project_reorder(args(a)?).map(|_| None),
            "section_add" => self.section_add(args(a)?).map(Some),
            "section_update" => self.section_update(args(a)?).map(|_| None),
            "section_move" => self.section_move(args(a)?).map(|_| None),
            "section_reorder" => self.section_reorder(args(a)?).map(|_| None),
            "section_delete" => self.section_delete(args(a)?).map(|_| None),
            "section_archive" => self.section_set_archived(args(a)?, true).map(|_| None),
            "section_unarchive" => self.section_set_archived(args(a)?, false).map(|_| None),
            "item_add" => self.item_add(args(a)?).map(Some),
            "item_update" => self.item_update(args(a)?).map(|_| None),
            "item_move" => self.item_move(args(a)?).map(|_| None),
            "item_delete" => self.item_delete(args(a)?).map(|_| None),
            "item_complete" => self.item_complete(args(a)?).map(|_| None),
            "item_uncomplete" => self.item_uncomplete(args(a)?).map(|_| None),
            "item_close" => self.item_close(args(a)?).map(|_| None),
            other => Err(ApiFailure::invalid_command(other)),
        }
    }

    /// Remember the server id for a temp id.
    pub fn bind_temp_id(&mut self, temp_id: &str, id: i64) {
        self.temp_ids.insert(temp_id.to_string(), id);
    }

    /// Live projects: neither deleted nor archived.
    pub fn live_projects(&self) -> impl Iterator<Item = &Project> {
        self.projects
            .iter()
            .filter(|p| p.is_deleted == 0 && p.is_archived == 0)
    }

    pub fn archived_projects(&self) -> impl Iterator<Item = &Project> {
        self.projects
            .iter()
            .filter(|p| p.is_deleted == 0 && p.is_archived == 1)
    }

    pub fn live_sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter().filter(|s| !s.is_deleted)
    }

    /// Items that are neither deleted nor moved to history.
    pub fn live_items(&self) -> impl Iterator<Item = &Item> {
        self.items
            .iter()
            .filter(|i| i.is_deleted == 0 && i.in_history == 0)
    }

    pub fn project(&self, id: i64) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id && p.is_deleted == 0)
    }

    fn resolve(&self, id: &IdRef) -> Option<i64> {
        match id {
            IdRef::Id(id) => Some(*id),
            IdRef::Temp(temp) => self
                .temp_ids
                .get(temp)
                .copied()
                .or_else(|| temp.parse().ok()),
        }
    }

    fn next_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn project_index(&self, id: &IdRef) -> Result<usize, ApiFailure> {
        let id = self.resolve(id).ok_or_else(project_not_found)?;
        self.projects
            .iter()
            .position(|p| p.id == id && p.is_deleted == 0)
            .ok_or_else(project_not_found)
    }

    fn section_index(&self, id: &IdRef) -> Result<usize, ApiFailure> {
        let id = self.resolve(id).ok_or_else(section_not_found)?;
        self.sections
            .iter()
            .position(|s| s.id == id && !s.is_deleted)
            .ok_or_else(section_not_found)
    }

    fn item_index(&self, id: &IdRef) -> Result<usize, ApiFailure> {
        let id = self.resolve(id).ok_or_else(item_not_found)?;
        self.items
            .iter()
            .position(|i| i.id == id && i.is_deleted == 0)
            .ok_or_else(item_not_found)
    }

    /// A project and every project below it.
    fn project_subtree(&self, root: i64) -> Vec<i64> {
        let mut ids = vec![root];
        let mut i = 0;
        while i < ids.len() {
            let parent = ids[i];
            ids.extend(
                self.projects
                    .iter()
                    .filter(|p| p.parent_id == Some(parent) && p.is_deleted == 0)
                    .map(|p| p.id),
            );
            i += 1;
        }
        ids
    }

    /// An item and all of its subtasks.
    fn item_subtree(&self, root: i64) -> Vec<i64> {
        let mut ids = vec![root];
        let mut i = 0;
        while i < ids.len() {
            let parent = ids[i];
            ids.extend(
                self.items
                    .iter()
                    .filter(|item| item.parent_id == Some(parent) && item.is_deleted == 0)
                    .map(|item| item.id),
            );
            i += 1;
        }
        ids
    }

    // ---- projects ----

    fn project_add(&mut self, args: ProjectAdd) -> Result<i64, ApiFailure> {
        if args.name.trim().is_empty() {
            return Err(ApiFailure::invalid_argument("Project name must not be empty"));
        }
        let parent_id = match &args.parent_id {
            Some(parent) => Some(self.projects[self.project_index(parent)?].id),
            None => None,
        };
        let child_order = args.child_order.unwrap_or_else(|| {
            self.live_projects()
                .filter(|p| p.parent_id == parent_id)
                .count() as i64
        });
        let id = self.next_id();
        self.projects.push(Project {
            id,
            name: args.name,
            color: args.color.unwrap_or(DEFAULT_COLOR),
            parent_id,
            child_order,
            collapsed: 0,
            shared: false,
            is_deleted: 0,
            is_archived: 0,
            is_favorite: args.is_favorite.unwrap_or(0),
            inbox_project: false,
        });
        Ok(id)
    }

    fn project_update(&mut self, args: ProjectUpdate) -> Result<(), ApiFailure> {
        let idx = self.project_index(&args.id)?;
        let project = &mut self.projects[idx];
        if let Some(name) = args.name {
            project.name = name;
        }
        if let Some(color) = args.color {
            project.color = color;
        }
        if let Some(collapsed) = args.collapsed {
            project.collapsed = collapsed;
        }
        if let Some(is_favorite) = args.is_favorite {
            project.is_favorite = is_favorite;
        }
        Ok(())
    }

    fn project_move(&mut self, args: ProjectMove) -> Result<(), ApiFailure> {
        let idx = self.project_index(&args.id)?;
        let parent_id = match &args.parent_id {
            Some(parent) => {
                let parent = self.projects[self.project_index(parent)?].id;
                if self.project_subtree(self.projects[idx].id).contains(&parent) {
                    return Err(ApiFailure::invalid_argument(
                        "Project cannot be moved below itself",
                    ));
                }
                Some(parent)
            }
            None => None,
        };
        self.projects[idx].parent_id = parent_id;
        Ok(())
    }

    fn project_delete(&mut self, args: IdArgs) -> Result<(), ApiFailure> {
        let idx = self.project_index(&args.id)?;
        if self.projects[idx].inbox_project {
            return Err(ApiFailure::invalid_argument("Inbox project cannot be deleted"));
        }
        let doomed = self.project_subtree(self.projects[idx].id);
        for project in self.projects.iter_mut().filter(|p| doomed.contains(&p.id)) {
            project.is_deleted = 1;
        }
        for section in self.sections.iter_mut().filter(|s| doomed.contains(&s.project_id)) {
            section.is_deleted = true;
        }
        for item in self.items.iter_mut().filter(|i| doomed.contains(&i.project_id)) {
            item.is_deleted = 1;
        }
        Ok(())
    }

    fn project_set_archived(&mut self, args: IdArgs, archived: i64) -> Result<(), ApiFailure> {
        let idx = self.project_index(&args.id)?;
        if self.projects[idx].inbox_project {
            return Err(ApiFailure::invalid_argument("Inbox project cannot be archived"));
        }
        let affected = self.project_subtree(self.projects[idx].id);
        for project in self.projects.iter_mut().filter(|p| affected.contains(&p.id)) {
            project.is_archived = archived;
        }
        Ok(())
    }

    fn project_reorder(&mut self, args: ProjectReorder) -> Result<(), ApiFailure> {
        for order in args.projects {
            let idx = self.project_index(&order.id)?;
            self.projects[idx].child_order = order.child_order;
        }
        Ok(())
    }

    // ---- sections ----

    fn section_add(&mut self, args: SectionAdd) -> Result<i64, ApiFailure> {
        if args.name.trim().is_empty() {
            return Err(ApiFailure::invalid_argument("Section name must not be empty"));
        }
        let project_id = self.projects[self.project_index(&args.project_id)?].id;
        let section_order = args.section_order.unwrap_or_else(|| {
            self.live_sections()
                .filter(|s| s.project_id == project_id)
                .count() as i64
                + 1
        });
        let id = self.next_id();
        self.sections.push(Section {
            id,
            name: args.name,
            project_id,
            section_order,
            collapsed: false,
            is_deleted: false,
            is_archived: false,
        });
        Ok(id)
    }

    fn section_update(&mut self, args: SectionUpdate) -> Result<(), ApiFailure> {
        let idx = self.section_index(&args.id)?;
        let section = &mut self.sections[idx];
        if let Some(name) = args.name {
            section.name = name;
        }
        if let Some(collapsed) = args.collapsed {
            section.collapsed = collapsed;
        }
        Ok(())
    }

    fn section_move(&mut self, args: SectionMove) -> Result<(), ApiFailure> {
        let idx = self.section_index(&args.id)?;
        let project_id = self.projects[self.project_index(&args.project_id)?].id;
        let section_id = self.sections[idx].id;
        self.sections[idx].project_id = project_id;
        for item in self
            .items
            .iter_mut()
            .filter(|i| i.section_id == Some(section_id))
        {
            item.project_id = project_id;
        }
        Ok(())
    }

    fn section_reorder(&mut self, args: SectionReorder) -> Result<(), ApiFailure> {
        for order in args.sections {
            let idx = self.section_index(&order.id)?;
            self.sections[idx].section_order = order.section_order;
        }
        Ok(())
    }

    fn section_delete(&mut self, args: IdArgs) -> Result<(), ApiFailure> {
        let idx = self.section_index(&args.id)?;
        let section_id = self.sections[idx].id;
        self.sections[idx].is_deleted = true;
        for item in self
            .items
            .iter_mut()
            .filter(|i| i.section_id == Some(section_id))
        {
            item.is_deleted = 1;
        }
        Ok(())
    }

    /// Archiving a section completes its items; unarchiving leaves them
    /// completed.
    fn section_set_archived(&mut self, args: IdArgs, archived: bool) -> Result<(), ApiFailure> {
        let idx = self.section_index(&args.id)?;
        let section_id = self.sections[idx].id;
        self.sections[idx].is_archived = archived;
        if archived {
            for item in self
                .items
                .iter_mut()
                .filter(|i| i.section_id == Some(section_id) && i.is_deleted == 0)
            {
                item.checked = 1;
                item.in_history = 1;
            }
        }
        Ok(())
    }

    // ---- items ----

    fn item_add(&mut self, args: ItemAdd) -> Result<i64, ApiFailure> {
        if args.content.trim().is_empty() {
            return Err(ApiFailure::invalid_argument("Item content must not be empty"));
        }
        let parent = match &args.parent_id {
            Some(parent) => Some(self.items[self.item_index(parent)?].clone()),
            None => None,
        };
        let section = match &args.section_id {
            Some(section) => Some(self.sections[self.section_index(section)?].clone()),
            None => None,
        };
        let project_id = match &args.project_id {
            Some(project) => self.projects[self.project_index(project)?].id,
            None => parent
                .as_ref()
                .map(|p| p.project_id)
                .or(section.as_ref().map(|s| s.project_id))
                .unwrap_or(INBOX_ID),
        };
        let section_id = section
            .map(|s| s.id)
            .or(parent.as_ref().and_then(|p| p.section_id));
        let parent_id = parent.map(|p| p.id);
        let child_order = args.child_order.unwrap_or_else(|| {
            self.live_items()
                .filter(|i| i.project_id == project_id && i.parent_id == parent_id)
                .count() as i64
                + 1
        });
        let id = self.next_id();
        self.items.push(Item {
            id,
            project_id,
            section_id,
            parent_id,
            content: args.content,
            description: args.description,
            due: args.due.map(DueInput::into_value),
            priority: args.priority.unwrap_or(DEFAULT_PRIORITY),
            child_order,
            collapsed: 0,
            labels: args.labels,
            checked: 0,
            in_history: 0,
            is_deleted: 0,
            date_completed: None,
        });
        Ok(id)
    }

    fn item_update(&mut self, args: ItemUpdate) -> Result<(), ApiFailure> {
        let idx = self.item_index(&args.id)?;
        let item = &mut self.items[idx];
        if let Some(content) = args.content {
            item.content = content;
        }
        if let Some(description) = args.description {
            item.description = description;
        }
        if let Some(due) = args.due {
            item.due = Some(due.into_value());
        }
        if let Some(priority) = args.priority {
            item.priority = priority;
        }
        if let Some(collapsed) = args.collapsed {
            item.collapsed = collapsed;
        }
        if let Some(labels) = args.labels {
            item.labels = labels;
        }
        Ok(())
    }

    /// Exactly one of `parent_id`, `section_id` and `project_id` must be set.
    fn item_move(&mut self, args: ItemMove) -> Result<(), ApiFailure> {
        let idx = self.item_index(&args.id)?;
        let (project_id, section_id, parent_id) =
            match (&args.parent_id, &args.section_id, &args.project_id) {
                (Some(parent), None, None) => {
                    let parent = &self.items[self.item_index(parent)?];
                    (parent.project_id, parent.section_id, Some(parent.id))
                }
                (None, Some(section), None) => {
                    let section = &self.sections[self.section_index(section)?];
                    (section.project_id, Some(section.id), None)
                }
                (None, None, Some(project)) => {
                    (self.projects[self.project_index(project)?].id, None, None)
                }
                _ => {
                    return Err(ApiFailure::invalid_argument(
                        "Exactly one of parent_id, section_id or project_id is required",
                    ))
                }
            };

        let moved = self.item_subtree(self.items[idx].id);
        if parent_id.is_some_and(|parent| moved.contains(&parent)) {
            return Err(ApiFailure::invalid_argument("Item cannot be moved below itself"));
        }
        for item in self.items.iter_mut().filter(|i| moved.contains(&i.id)) {
            item.project_id = project_id;
            item.section_id = section_id;
        }
        self.items[idx].parent_id = parent_id;
        Ok(())
    }

    fn item_delete(&mut self, args: IdArgs) -> Result<(), ApiFailure> {
        let idx = self.item_index(&args.id)?;
        let doomed = self.item_subtree(self.items[idx].id);
        for item in self.items.iter_mut().filter(|i| doomed.contains(&i.id)) {
            item.is_deleted = 1;
        }
        Ok(())
    }

    fn item_complete(&mut self, args: ItemComplete) -> Result<(), ApiFailure> {
        let idx = self.item_index(&args.id)?;
        let done = self.item_subtree(self.items[idx].id);
        for item in self.items.iter_mut().filter(|i| done.contains(&i.id)) {
            item.checked = 1;
            item.in_history = 1;
            item.date_completed = args.date_completed.clone();
        }
        Ok(())
    }

    fn item_uncomplete(&mut self, args: IdArgs) -> Result<(), ApiFailure> {
        let idx = self.item_index(&args.id)?;
        let item = &mut self.items[idx];
        item.checked = 0;
        item.in_history = 0;
        item.date_completed = None;
        Ok(())
    }

    /// Recurring items stay open; the mock does not advance due dates.
    fn item_close(&mut self, args: IdArgs) -> Result<(), ApiFailure> {
        let idx = self.item_index(&args.id)?;
        if self.items[idx].is_recurring() {
            return Ok(());
        }
        self.item_complete(ItemComplete {
            id: args.id,
            date_completed: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn command(kind: &str, args: Value, temp_id: Option<&str>) -> RawCommand {
        RawCommand {
            kind: kind.to_string(),
            args,
            uuid: "uuid".to_string(),
            temp_id: temp_id.map(str::to_string),
        }
    }

    fn add_project(store: &mut Store, name: &str, temp_id: &str) -> i64 {
        let id = store
            .apply(&command("project_add", json!({"name": name}), Some(temp_id)))
            .unwrap()
            .unwrap();
        store.bind_temp_id(temp_id, id);
        id
    }

    #[test]
    fn starts_with_inbox() {
        let store = Store::default();
        let live: Vec<_> = store.live_projects().collect();
        assert_eq!(live.len(), 1);
        assert!(live[0].inbox_project);
    }

    #[test]
    fn temp_ids_resolve_in_later_commands() {
        let mut store = Store::default();
        let parent = add_project(&mut store, "Parent", "p1");
        let child = store
            .apply(&command(
                "project_add",
                json!({"name": "Child", "parent_id": "p1"}),
                None,
            ))
            .unwrap()
            .unwrap();
        assert_eq!(store.project(child).unwrap().parent_id, Some(parent));
    }

    #[test]
    fn unknown_command_is_rejected() {
        let mut store = Store::default();
        let err = store
            .apply(&command("note_add", json!({}), None))
            .unwrap_err();
        assert_eq!(err.tag, "INVALID_COMMAND");
    }

    #[test]
    fn bad_arguments_are_rejected() {
        let mut store = Store::default();
        let err = store
            .apply(&command("project_add", json!({"color": 3}), None))
            .unwrap_err();
        assert_eq!(err.tag, "INVALID_ARGUMENT_VALUE");

        let err = store
            .apply(&command("project_add", json!({"name": "  "}), None))
            .unwrap_err();
        assert_eq!(err.tag, "INVALID_ARGUMENT_VALUE");
    }

    #[test]
    fn missing_targets_are_not_found() {
        let mut store = Store::default();
        let cases = [
            ("project_delete", "PROJECT_NOT_FOUND"),
            ("section_delete", "SECTION_NOT_FOUND"),
            ("item_delete", "ITEM_NOT_FOUND"),
        ];
        for (kind, tag) in cases {
            let err = store
                .apply(&command(kind, json!({"id": 999}), None))
                .unwrap_err();
            assert_eq!(err.tag, tag);
            assert_eq!(err.http_code, 404);
        }
    }

    #[test]
    fn deleting_a_project_cascades() {
        let mut store = Store::default();
        let work = add_project(&mut store, "Work", "work");
        let sub = store
            .apply(&command(
                "project_add",
                json!({"name": "Sub", "parent_id": work}),
                None,
            ))
            .unwrap()
            .unwrap();
        store
            .apply(&command("section_add", json!({"name": "S", "project_id": sub}), None))
            .unwrap();
        store
            .apply(&command("item_add", json!({"content": "T", "project_id": sub}), None))
            .unwrap();

        store
            .apply(&command("project_delete", json!({"id": work}), None))
            .unwrap();
        assert_eq!(store.live_projects().count(), 1);
        assert_eq!(store.live_sections().count(), 0);
        assert_eq!(store.live_items().count(), 0);
    }

    #[test]
    fn inbox_cannot_be_deleted_or_archived() {
        let mut store = Store::default();
        for kind in ["project_delete", "project_archive"] {
            let err = store
                .apply(&command(kind, json!({"id": INBOX_ID}), None))
                .unwrap_err();
            assert_eq!(err.tag, "INVALID_ARGUMENT_VALUE");
        }
    }

    #[test]
    fn archived_projects_are_listed_separately() {
        let mut store = Store::default();
        let old = add_project(&mut store, "Old", "old");
        store
            .apply(&command("project_archive", json!({"id": old}), None))
            .unwrap();
        assert_eq!(store.live_projects().count(), 1);
        assert_eq!(store.archived_projects().next().unwrap().id, old);

        store
            .apply(&command("project_unarchive", json!({"id": "old"}), None))
            .unwrap();
        assert_eq!(store.live_projects().count(), 2);
    }

    #[test]
    fn project_cannot_move_below_itself() {
        let mut store = Store::default();
        let a = add_project(&mut store, "A", "a");
        let b = store
            .apply(&command("project_add", json!({"name": "B", "parent_id": a}), None))
            .unwrap()
            .unwrap();
        let err = store
            .apply(&command("project_move", json!({"id": a, "parent_id": b}), None))
            .unwrap_err();
        assert_eq!(err.tag, "INVALID_ARGUMENT_VALUE");

        store
            .apply(&command("project_move", json!({"id": b, "parent_id": null}), None))
            .unwrap();
        assert_eq!(store.project(b).unwrap().parent_id, None);
    }

    #[test]
    fn items_default_to_inbox_and_follow_their_section() {
        let mut store = Store::default();
        let work = add_project(&mut store, "Work", "work");
        let section = store
            .apply(&command("section_add", json!({"name": "S", "project_id": work}), None))
            .unwrap()
            .unwrap();

        let loose = store
            .apply(&command("item_add", json!({"content": "Loose"}), None))
            .unwrap()
            .unwrap();
        let filed = store
            .apply(&command(
                "item_add",
                json!({"content": "Filed", "section_id": section}),
                None,
            ))
            .unwrap()
            .unwrap();

        let item = |id| store.items.iter().find(|i| i.id == id).unwrap();
        assert_eq!(item(loose).project_id, INBOX_ID);
        assert_eq!(item(filed).project_id, work);
        assert_eq!(item(filed).section_id, Some(section));
    }

    #[test]
    fn item_move_needs_exactly_one_destination() {
        let mut store = Store::default();
        let id = store
            .apply(&command("item_add", json!({"content": "T"}), None))
            .unwrap()
            .unwrap();
        let err = store
            .apply(&command("item_move", json!({"id": id}), None))
            .unwrap_err();
        assert_eq!(err.tag, "INVALID_ARGUMENT_VALUE");

        let err = store
            .apply(&command(
                "item_move",
                json!({"id": id, "project_id": INBOX_ID, "section_id": 5}),
                None,
            ))
            .unwrap_err();
        assert_eq!(err.tag, "INVALID_ARGUMENT_VALUE");
    }

    #[test]
    fn completing_moves_item_and_subtasks_to_history() {
        let mut store = Store::default();
        let parent = store
            .apply(&command("item_add", json!({"content": "Parent"}), None))
            .unwrap()
            .unwrap();
        store
            .apply(&command(
                "item_add",
                json!({"content": "Child", "parent_id": parent}),
                None,
            ))
            .unwrap();
        store
            .apply(&command("item_complete", json!({"id": parent}), None))
            .unwrap();
        assert_eq!(store.live_items().count(), 0);

        store
            .apply(&command("item_uncomplete", json!({"id": parent}), None))
            .unwrap();
        assert_eq!(store.live_items().count(), 1);
    }

    #[test]
    fn closing_a_recurring_item_keeps_it_open() {
        let mut store = Store::default();
        let id = store
            .apply(&command(
                "item_add",
                json!({"content": "Water plants", "due": {"string": "every day"}}),
                None,
            ))
            .unwrap()
            .unwrap();
        store
            .apply(&command("item_close", json!({"id": id}), None))
            .unwrap();
        assert_eq!(store.live_items().count(), 1);
    }

    #[test]
    fn sync_tokens_advance() {
        let mut store = Store::default();
        assert_eq!(store.next_sync_token(), "mock-sync-1");
        assert_eq!(store.next_sync_token(), "mock-sync-2");
    }
}
