//! In-process fake of the job API for client integration tests.
//!
//! Serves the same routes as the real server from an in-memory store on an
//! ephemeral port and records every request it receives.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use jobdash_client::api::DashboardApi;

/// Mutable fake server state.
#[derive(Debug, Default)]
pub struct FakeApi {
    pub jobs: Vec<Value>,
    pub scripts: HashMap<String, Value>,
    pub parameters: HashMap<String, Vec<Value>>,
    /// Body served verbatim by `/get-runners`.
    pub runners_body: Value,
    pub logs: Vec<Value>,
    /// When set, `/get-logs` answers with this status.
    pub logs_status: Option<u16>,
    /// When set, PUT/POST/DELETE answer with this status.
    pub write_status: Option<u16>,
    /// `"METHOD /path"` for every request, in arrival order.
    pub requests: Vec<String>,
    /// Last JSON body received by PUT or POST.
    pub last_body: Option<Value>,
    pub next_id: u64,
}

pub type Shared = Arc<Mutex<FakeApi>>;

impl FakeApi {
    pub fn with_script(mut self, script: Value) -> Self {
        let id = script_id_of(&script);
        self.scripts.insert(id, script);
        self
    }

    pub fn with_parameters(mut self, script_id: &str, parameters: Vec<Value>) -> Self {
        self.parameters.insert(script_id.to_string(), parameters);
        self
    }

    pub fn requests_matching(&self, prefix: &str) -> usize {
        self.requests.iter().filter(|r| r.starts_with(prefix)).count()
    }
}

/// A script record as the server stores it.
pub fn script_json(id: &str, file_name: &str) -> Value {
    json!({
        "script_id": id,
        "file_name": file_name,
        "description": "",
        "param": [],
        "status": true,
        "tag": [],
        "runner": [],
        "created_at": "2024-03-15T10:30:00Z",
        "updated_at": "2024-03-15T10:30:00Z"
    })
}

/// Start the fake API and return a client pointed at it.
pub async fn spawn(state: FakeApi) -> (DashboardApi, Shared) {
    let shared: Shared = Arc::new(Mutex::new(state));

    let app = Router::new()
        .route("/get-jobs", get(get_jobs))
        .route("/get-runners", get(get_runners))
        .route("/get-scripts", get(get_scripts))
        .route("/get-logs", get(get_logs))
        .route("/scripts", axum::routing::post(create_script))
        .route(
            "/scripts/{id}",
            get(get_script).put(update_script).delete(delete_script),
        )
        .with_state(shared.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let api = DashboardApi::with_client(reqwest::Client::new(), format!("http://{addr}"));
    (api, shared)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

fn record(state: &Shared, line: String) -> std::sync::MutexGuard<'_, FakeApi> {
    let mut guard = state.lock().unwrap();
    guard.requests.push(line);
    guard
}

fn status_response(status: u16) -> Response {
    let code = StatusCode::from_u16(status).unwrap();
    (code, Json(json!({ "error": code.canonical_reason() }))).into_response()
}

async fn get_jobs(State(state): State<Shared>) -> Response {
    let guard = record(&state, "GET /get-jobs".into());
    Json(json!({ "data": guard.jobs })).into_response()
}

async fn get_runners(State(state): State<Shared>) -> Response {
    let guard = record(&state, "GET /get-runners".into());
    Json(guard.runners_body.clone()).into_response()
}

async fn get_scripts(State(state): State<Shared>) -> Response {
    let guard = record(&state, "GET /get-scripts".into());
    let mut scripts: Vec<&Value> = guard.scripts.values().collect();
    scripts.sort_by_key(|s| script_id_of(s));
    Json(json!({ "scripts": scripts })).into_response()
}

async fn get_logs(State(state): State<Shared>) -> Response {
    let guard = record(&state, "GET /get-logs".into());
    if let Some(status) = guard.logs_status {
        return status_response(status);
    }
    Json(json!({ "logs": guard.logs })).into_response()
}

async fn get_script(State(state): State<Shared>, Path(id): Path<String>) -> Response {
    let guard = record(&state, format!("GET /scripts/{id}"));
    let script = guard.scripts.get(&id).cloned();
    let parameters = guard.parameters.get(&id).cloned().unwrap_or_default();
    Json(json!({ "script": script, "parameters": parameters })).into_response()
}

async fn update_script(
    State(state): State<Shared>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let mut guard = record(&state, format!("PUT /scripts/{id}"));
    guard.last_body = Some(body.clone());
    if let Some(status) = guard.write_status {
        return status_response(status);
    }
    let Some(stored) = guard.scripts.get_mut(&id) else {
        return status_response(404);
    };
    for key in ["file_name", "description", "status", "param", "tag", "runner"] {
        stored[key] = body[key].clone();
    }
    guard.parameters.remove(&id);
    Json(json!({ "message": "updated" })).into_response()
}

async fn create_script(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut guard = record(&state, "POST /scripts".into());
    guard.last_body = Some(body.clone());
    if let Some(status) = guard.write_status {
        return status_response(status);
    }
    guard.next_id += 1;
    let id = format!("new-{}", guard.next_id);
    let mut stored = body;
    stored["script_id"] = json!(id);
    guard.scripts.insert(id.clone(), stored);
    (StatusCode::CREATED, Json(json!({ "script_id": id }))).into_response()
}

async fn delete_script(State(state): State<Shared>, Path(id): Path<String>) -> Response {
    let mut guard = record(&state, format!("DELETE /scripts/{id}"));
    if let Some(status) = guard.write_status {
        return status_response(status);
    }
    match guard.scripts.remove(&id) {
        Some(_) => StatusCode::NO_CONTENT.into_response(),
        None => status_response(404),
    }
}

fn script_id_of(script: &Value) -> String {
    match &script["script_id"] {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
