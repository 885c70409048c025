//! Wire shapes served by the mock. Defined independently from the client's
//! types so integration tests catch schema drift.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub color: i64,
    pub parent_id: Option<i64>,
    pub child_order: i64,
    pub collapsed: i64,
    pub shared: bool,
    pub is_deleted: i64,
    pub is_archived: i64,
    pub is_favorite: i64,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub inbox_project: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: i64,
    pub name: String,
    pub project_id: i64,
    pub section_order: i64,
    pub collapsed: bool,
    pub is_deleted: bool,
    pub is_archived: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: i64,
    pub project_id: i64,
    pub section_id: Option<i64>,
    pub parent_id: Option<i64>,
    pub content: String,
    pub description: String,
    pub due: Option<Value>,
    pub priority: i64,
    pub child_order: i64,
    pub collapsed: i64,
    pub labels: Vec<i64>,
    pub checked: i64,
    pub in_history: i64,
    pub is_deleted: i64,
    pub date_completed: Option<String>,
}

impl Item {
    pub fn is_recurring(&self) -> bool {
        self.due
            .as_ref()
            .and_then(|due| due["is_recurring"].as_bool())
            .unwrap_or(false)
    }
}

/// Reference to a resource in command arguments: a real id, or a temp id
/// assigned by an earlier command.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum IdRef {
    Id(i64),
    Temp(String),
}

/// Due date as sent in `item_add` / `item_update`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct DueInput {
    pub string: Option<String>,
    pub date: Option<String>,
    pub lang: Option<String>,
}

impl DueInput {
    pub fn into_value(self) -> Value {
        let string = self.string.or_else(|| self.date.clone()).unwrap_or_default();
        let is_recurring = string.to_lowercase().starts_with("every");
        json!({
            "date": self.date.unwrap_or_default(),
            "timezone": null,
            "string": string,
            "lang": self.lang.unwrap_or_else(|| "en".to_string()),
            "is_recurring": is_recurring,
        })
    }
}

/// A command as it arrives in the `commands` form field. `args` is decoded
/// per command type once the type is known.
#[derive(Debug, Deserialize)]
pub struct RawCommand {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub args: Value,
    pub uuid: String,
    #[serde(default)]
    pub temp_id: Option<String>,
}

/// A rejected command or request, rendered as the Sync API error payload.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiFailure {
    pub tag: &'static str,
    pub code: i64,
    pub message: String,
    pub http_code: u16,
}

impl ApiFailure {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self {
            tag: "INVALID_ARGUMENT_VALUE",
            code: 20,
            message: message.into(),
            http_code: 400,
        }
    }

    pub fn invalid_command(kind: &str) -> Self {
        Self {
            tag: "INVALID_COMMAND",
            code: 18,
            message: format!("Unknown command type {kind:?}"),
            http_code: 400,
        }
    }

    pub fn not_found(tag: &'static str, message: &str) -> Self {
        Self {
            tag,
            code: 22,
            message: message.to_string(),
            http_code: 404,
        }
    }

    pub fn to_json(&self) -> Value {
        json!({
            "error_tag": self.tag,
            "error_code": self.code,
            "error": self.message,
            "http_code": self.http_code,
            "error_extra": {},
        })
    }
}
