//! In-memory stand-in for the Todoist Sync API v8.
//!
//! Serves `POST /sync/v8/sync` and the `projects/get*` form endpoints with the
//! same envelope and error payload shapes as the real service. State lives in
//! memory for the lifetime of the router.

pub mod model;
pub mod store;

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Form, Json, Router,
};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;

use model::{ApiFailure, RawCommand};
use store::Store;

pub use model::{Item, Project, Section};

/// Resource types returned for `"all"`.
const RESOURCE_TYPES: [&str; 3] = ["projects", "sections", "items"];

const DEFAULT_ARCHIVED_LIMIT: usize = 500;

pub type Db = Arc<RwLock<Store>>;

#[derive(Clone)]
struct AppState {
    token: Arc<str>,
    db: Db,
}

type FormFields = HashMap<String, String>;

/// A failure of the whole request, answered with a non-200 status.
struct Rejection(ApiFailure);

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.http_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.0.to_json())).into_response()
    }
}

impl From<ApiFailure> for Rejection {
    fn from(failure: ApiFailure) -> Self {
        Rejection(failure)
    }
}

pub fn app(token: impl Into<String>) -> Router {
    let state = AppState {
        token: Arc::from(token.into()),
        db: Db::default(),
    };
    Router::new()
        .route("/sync/v8/sync", post(sync))
        .route("/sync/v8/projects/get", post(get_project))
        .route("/sync/v8/projects/get_data", post(get_project_data))
        .route("/sync/v8/projects/get_archived", post(get_archived_projects))
        .with_state(state)
}

pub async fn run(listener: TcpListener, token: impl Into<String>) -> Result<(), std::io::Error> {
    axum::serve(listener, app(token)).await
}

fn authorize(state: &AppState, form: &FormFields) -> Result<(), Rejection> {
    match form.get("token").map(String::as_str) {
        None | Some("") => Err(Rejection(ApiFailure {
            tag: "AUTH_MISSING_TOKEN",
            code: 401,
            message: "Missing token".to_string(),
            http_code: 401,
        })),
        Some(token) if token != &*state.token => Err(Rejection(ApiFailure {
            tag: "AUTH_INVALID_TOKEN",
            code: 401,
            message: "Invalid token".to_string(),
            http_code: 403,
        })),
        Some(_) => Ok(()),
    }
}

/// A JSON-encoded form field, or `None` when absent.
fn json_field<T: serde::de::DeserializeOwned>(
    form: &FormFields,
    name: &str,
) -> Result<Option<T>, Rejection> {
    form.get(name)
        .map(|raw| {
            serde_json::from_str(raw).map_err(|err| {
                Rejection(ApiFailure::invalid_argument(format!(
                    "Invalid value for {name}: {err}"
                )))
            })
        })
        .transpose()
}

fn id_field(form: &FormFields, name: &str) -> Result<i64, Rejection> {
    form.get(name)
        .and_then(|raw| raw.parse().ok())
        .ok_or_else(|| Rejection(ApiFailure::invalid_argument(format!("Invalid {name}"))))
}

fn to_json<T: serde::Serialize>(value: T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

async fn sync(
    State(state): State<AppState>,
    Form(form): Form<FormFields>,
) -> Result<Json<Value>, Rejection> {
    authorize(&state, &form)?;

    let resource_types: Vec<String> = json_field(&form, "resource_types")?.unwrap_or_default();
    let commands: Option<Vec<RawCommand>> = json_field(&form, "commands")?;
    let full_sync = form.get("sync_token").map_or(true, |token| token == "*");

    let mut store = state.db.write().await;

    let mut body = Map::new();
    if let Some(commands) = commands {
        let mut temp_id_mapping = BTreeMap::new();
        let mut sync_status = BTreeMap::new();
        for command in &commands {
            let status = match store.apply(command) {
                Ok(created) => {
                    if let (Some(id), Some(temp_id)) = (created, &command.temp_id) {
                        store.bind_temp_id(temp_id, id);
                        temp_id_mapping.insert(temp_id.clone(), id);
                    }
                    json!("ok")
                }
                Err(failure) => failure.to_json(),
            };
            debug!(command = %command.kind, uuid = %command.uuid, %status, "applied command");
            sync_status.insert(command.uuid.clone(), status);
        }
        body.insert("sync_status".into(), to_json(sync_status));
        body.insert("temp_id_mapping".into(), to_json(temp_id_mapping));
    } else {
        body.insert("temp_id_mapping".into(), json!({}));
    }

    let wants = |kind: &str| resource_types.iter().any(|t| t == kind || t == "all");
    for kind in RESOURCE_TYPES.into_iter().filter(|kind| wants(*kind)) {
        let collection = match kind {
            "projects" => to_json(store.live_projects().collect::<Vec<_>>()),
            "sections" => to_json(store.live_sections().collect::<Vec<_>>()),
            _ => to_json(store.live_items().collect::<Vec<_>>()),
        };
        body.insert(kind.into(), collection);
    }

    body.insert("sync_token".into(), json!(store.next_sync_token()));
    body.insert("full_sync".into(), json!(full_sync));
    Ok(Json(Value::Object(body)))
}

async fn get_project(
    State(state): State<AppState>,
    Form(form): Form<FormFields>,
) -> Result<Json<Value>, Rejection> {
    authorize(&state, &form)?;
    let project_id = id_field(&form, "project_id")?;

    let store = state.db.read().await;
    let project = store
        .project(project_id)
        .ok_or_else(|| ApiFailure::not_found("PROJECT_NOT_FOUND", "Project not found"))?;
    Ok(Json(json!({ "project": project, "notes": [] })))
}

async fn get_project_data(
    State(state): State<AppState>,
    Form(form): Form<FormFields>,
) -> Result<Json<Value>, Rejection> {
    authorize(&state, &form)?;
    let project_id = id_field(&form, "project_id")?;

    let store = state.db.read().await;
    let project = store
        .project(project_id)
        .ok_or_else(|| ApiFailure::not_found("PROJECT_NOT_FOUND", "Project not found"))?;
    let sections: Vec<_> = store
        .live_sections()
        .filter(|s| s.project_id == project_id)
        .collect();
    let items: Vec<_> = store
        .live_items()
        .filter(|i| i.project_id == project_id)
        .collect();
    Ok(Json(json!({
        "project": project,
        "project_notes": [],
        "sections": sections,
        "items": items,
    })))
}

async fn get_archived_projects(
    State(state): State<AppState>,
    Form(form): Form<FormFields>,
) -> Result<Json<Value>, Rejection> {
    authorize(&state, &form)?;
    let limit = match form.get("limit") {
        Some(raw) => match raw.parse::<usize>() {
            Ok(limit) if (1..=DEFAULT_ARCHIVED_LIMIT).contains(&limit) => limit,
            _ => return Err(ApiFailure::invalid_argument("Invalid limit").into()),
        },
        None => DEFAULT_ARCHIVED_LIMIT,
    };
    let offset = match form.get("offset") {
        Some(raw) => raw
            .parse::<usize>()
            .map_err(|_| ApiFailure::invalid_argument("Invalid offset"))?,
        None => 0,
    };

    let store = state.db.read().await;
    let page: Vec<_> = store.archived_projects().skip(offset).take(limit).collect();
    Ok(Json(to_json(page)))
}
