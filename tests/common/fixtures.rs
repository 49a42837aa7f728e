//! Fake n8n instances and workflow documents
//!
//! A [`FakeN8n`] is a real HTTP server answering the subset of the n8n public
//! API the copier talks to, so the production `N8nClient` is exercised over
//! the wire. Like n8n, it rejects write bodies carrying read-only fields.

use axum::{
    extract::{Path, Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

use super::constants::*;

/// Fields n8n accepts in create/update bodies
const WRITABLE_FIELDS: [&str; 5] = ["name", "nodes", "connections", "settings", "staticData"];

/// A create or update received by a fake instance
#[derive(Clone, Debug)]
pub struct RecordedWrite {
    /// "POST" or "PUT"
    pub method: &'static str,
    /// Id of the written workflow (assigned by the fake on create)
    pub id: String,
    /// Body exactly as received
    pub body: Value,
}

#[derive(Default)]
struct Store {
    workflows: Vec<Value>,
    writes: Vec<RecordedWrite>,
    created: usize,
    fail_with: Option<u16>,
}

#[derive(Clone)]
struct FakeState {
    api_key: String,
    store: Arc<Mutex<Store>>,
}

/// In-memory n8n instance listening on a random port
///
/// When dropped, the server gracefully shuts down.
pub struct FakeN8n {
    /// Base URL of the instance (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    store: Arc<Mutex<Store>>,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl FakeN8n {
    /// Spawns an instance holding `workflows` and accepting `api_key`
    pub async fn spawn(api_key: &str, workflows: Vec<Value>) -> Self {
        let store = Arc::new(Mutex::new(Store {
            workflows,
            ..Default::default()
        }));
        let state = FakeState {
            api_key: api_key.to_string(),
            store: store.clone(),
        };

        let app = Router::new()
            .route("/api/v1/workflows", get(list_workflows).post(create_workflow))
            .route("/api/v1/workflows/{id}", get(get_workflow).put(update_workflow))
            .layer(middleware::from_fn_with_state(state.clone(), check_request))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake n8n to random port");
        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Fake n8n failed");
        });

        Self {
            base_url: format!("http://127.0.0.1:{}", port),
            store,
            _shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Creates and updates received so far, oldest first
    pub fn writes(&self) -> Vec<RecordedWrite> {
        self.store.lock().unwrap().writes.clone()
    }

    /// Current stored document of workflow `id`
    pub fn workflow(&self, id: &str) -> Option<Value> {
        let store = self.store.lock().unwrap();
        position(&store, id).map(|index| store.workflows[index].clone())
    }

    /// Makes every subsequent authorized request fail with `status`
    pub fn fail_with(&self, status: u16) {
        self.store.lock().unwrap().fail_with = Some(status);
    }
}

impl Drop for FakeN8n {
    fn drop(&mut self) {
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

fn message(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}

fn position(store: &Store, id: &str) -> Option<usize> {
    store
        .workflows
        .iter()
        .position(|workflow| workflow.get("id").and_then(Value::as_str) == Some(id))
}

/// Rejects bodies n8n would refuse, returning the error to send back
fn validate_body(body: &Value) -> Option<Response> {
    let Some(fields) = body.as_object() else {
        return Some(message(StatusCode::BAD_REQUEST, "request/body must be object"));
    };
    if !fields.get("name").is_some_and(Value::is_string) {
        return Some(message(
            StatusCode::BAD_REQUEST,
            "request/body must have required property 'name'",
        ));
    }
    if fields.keys().any(|key| !WRITABLE_FIELDS.contains(&key.as_str())) {
        return Some(message(
            StatusCode::BAD_REQUEST,
            "request/body must NOT have additional properties",
        ));
    }
    None
}

async fn check_request(State(state): State<FakeState>, request: Request, next: Next) -> Response {
    let authorized = request
        .headers()
        .get("X-N8N-API-KEY")
        .and_then(|value| value.to_str().ok())
        == Some(state.api_key.as_str());
    if !authorized {
        return message(StatusCode::UNAUTHORIZED, "unauthorized");
    }

    let failure = state.store.lock().unwrap().fail_with;
    if let Some(status) = failure {
        let status = StatusCode::from_u16(status).expect("Invalid failure status");
        return message(status, "Instance unavailable");
    }

    next.run(request).await
}

async fn list_workflows(
    State(state): State<FakeState>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let only_active = params.get("active").map(String::as_str) == Some("true");
    let store = state.store.lock().unwrap();
    let data: Vec<Value> = store
        .workflows
        .iter()
        .filter(|workflow| !only_active || workflow.get("active") == Some(&Value::Bool(true)))
        .cloned()
        .collect();
    Json(json!({ "data": data, "nextCursor": null }))
}

async fn get_workflow(State(state): State<FakeState>, Path(id): Path<String>) -> Response {
    let store = state.store.lock().unwrap();
    match position(&store, &id) {
        Some(index) => Json(store.workflows[index].clone()).into_response(),
        None => message(StatusCode::NOT_FOUND, "Not Found"),
    }
}

async fn create_workflow(State(state): State<FakeState>, Json(body): Json<Value>) -> Response {
    if let Some(rejection) = validate_body(&body) {
        return rejection;
    }

    let mut store = state.store.lock().unwrap();
    store.created += 1;
    let id = format!("dest-{}", store.created);

    let mut workflow = body.clone();
    workflow["id"] = json!(id);
    workflow["active"] = json!(false);
    store.workflows.push(workflow.clone());
    store.writes.push(RecordedWrite {
        method: "POST",
        id,
        body,
    });
    Json(workflow).into_response()
}

async fn update_workflow(
    State(state): State<FakeState>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    if let Some(rejection) = validate_body(&body) {
        return rejection;
    }

    let mut store = state.store.lock().unwrap();
    let Some(index) = position(&store, &id) else {
        return message(StatusCode::NOT_FOUND, "Not Found");
    };

    let mut workflow = body.clone();
    workflow["id"] = json!(id);
    workflow["active"] = store.workflows[index]["active"].clone();
    store.workflows[index] = workflow.clone();
    store.writes.push(RecordedWrite {
        method: "PUT",
        id,
        body,
    });
    Json(workflow).into_response()
}

// ============================================================================
// Workflow Documents
// ============================================================================

fn revision_note(content: &str) -> Value {
    json!({
        "id": "note-1",
        "name": "Revision History",
        "type": "n8n-nodes-base.stickyNote",
        "typeVersion": 1,
        "position": [-400, -200],
        "parameters": { "content": content, "height": 300, "width": 500 }
    })
}

fn webhook_node() -> Value {
    json!({
        "id": "node-1",
        "name": "Webhook",
        "type": "n8n-nodes-base.webhook",
        "typeVersion": 2,
        "position": [0, 0],
        "parameters": { "path": "invoices", "httpMethod": "POST" }
    })
}

/// Source workflows: two active ones and an archived one
///
/// The invoices workflow carries read-only fields n8n refuses on writes,
/// which the copier must strip.
pub fn source_workflows() -> Vec<Value> {
    vec![
        json!({
            "id": INVOICES_ID,
            "name": INVOICES_NAME,
            "active": true,
            "createdAt": "2023-11-01T10:00:00.000Z",
            "updatedAt": "2023-12-01T09:00:00.000Z",
            "tags": [{ "id": "tag-1", "name": "finance" }],
            "pinData": {},
            "nodes": [webhook_node(), revision_note(SOURCE_REVISION_CONTENT)],
            "connections": {},
            "settings": { "executionOrder": "v1" },
            "staticData": null
        }),
        json!({
            "id": REPORTS_ID,
            "name": REPORTS_NAME,
            "active": true,
            "nodes": [webhook_node()],
            "connections": {},
            "settings": {}
        }),
        json!({
            "id": ARCHIVED_ID,
            "name": "Old Exports",
            "active": false,
            "nodes": [],
            "connections": {}
        }),
    ]
}

/// Copy of the invoices workflow already deployed on the destination
pub fn destination_workflow() -> Value {
    json!({
        "id": INVOICES_ID,
        "name": INVOICES_NAME,
        "active": true,
        "nodes": [webhook_node(), revision_note(DESTINATION_REVISION_CONTENT)],
        "connections": {},
        "settings": {}
    })
}
