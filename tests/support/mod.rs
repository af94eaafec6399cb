#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

#[derive(Debug, Clone)]
pub struct RecordedPass {
    pub source_officer_id: i64,
    pub body: Value,
    pub request_id: Option<String>,
}

#[derive(Debug, Default)]
pub struct BackendState {
    pub targets: Vec<Value>,
    pub officers: Vec<Value>,
    pub passes: Vec<RecordedPass>,
    pub pass_reply: Option<(StatusCode, Value)>,
    pub feed_reply: Option<(StatusCode, String)>,
    pub authorization: Vec<Option<String>>,
    pub viewed_officers: Vec<i64>,
}

/// In-memory distribution backend serving the four endpoints the engine uses.
#[derive(Clone, Default)]
pub struct StubBackend {
    pub state: Arc<Mutex<BackendState>>,
}

impl StubBackend {
    pub fn with(targets: Vec<Value>, officers: Vec<Value>) -> Self {
        let backend = Self::default();
        {
            let mut s = backend.state.lock().unwrap();
            s.targets = targets;
            s.officers = officers;
        }
        backend
    }

    pub fn passes(&self) -> Vec<RecordedPass> {
        self.state.lock().unwrap().passes.clone()
    }

    pub fn reply_to_pass(&self, status: StatusCode, body: Value) {
        self.state.lock().unwrap().pass_reply = Some((status, body));
    }

    pub fn reply_to_feed(&self, status: StatusCode, body: &str) {
        self.state.lock().unwrap().feed_reply = Some((status, body.to_owned()));
    }

    /// Serves on an ephemeral loopback port and returns its base URL.
    pub async fn spawn(&self) -> String {
        let app = Router::new()
            .route("/distribution/officer-target", get(own_targets))
            .route(
                "/distribution-manager/distribution-officer/:officer_id",
                get(officer_targets),
            )
            .route(
                "/distribution-manager/get-all-distributionOfficer",
                get(all_officers),
            )
            .route("/distribution-manager/target-pass/:officer_id", post(target_pass))
            .with_state(self.clone());
        serve(app).await
    }
}

pub async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app.into_make_service()).await.unwrap();
    });
    format!("http://{addr}")
}

fn record_auth(backend: &StubBackend, headers: &HeaderMap) {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    backend.state.lock().unwrap().authorization.push(auth);
}

async fn own_targets(
    State(backend): State<StubBackend>,
    headers: HeaderMap,
) -> (StatusCode, String) {
    record_auth(&backend, &headers);
    let s = backend.state.lock().unwrap();
    if let Some(reply) = s.feed_reply.clone() {
        return reply;
    }
    (StatusCode::OK, Value::Array(s.targets.clone()).to_string())
}

async fn officer_targets(
    State(backend): State<StubBackend>,
    Path(officer_id): Path<i64>,
    headers: HeaderMap,
) -> Json<Value> {
    record_auth(&backend, &headers);
    let mut s = backend.state.lock().unwrap();
    s.viewed_officers.push(officer_id);
    Json(json!({ "success": true, "data": s.targets }))
}

async fn all_officers(State(backend): State<StubBackend>, headers: HeaderMap) -> Json<Value> {
    record_auth(&backend, &headers);
    let s = backend.state.lock().unwrap();
    Json(json!({ "success": true, "data": s.officers }))
}

async fn target_pass(
    State(backend): State<StubBackend>,
    Path(officer_id): Path<i64>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    record_auth(&backend, &headers);
    let mut s = backend.state.lock().unwrap();
    s.passes.push(RecordedPass {
        source_officer_id: officer_id,
        body: body.clone(),
        request_id: headers
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned),
    });

    if let Some((status, reply)) = s.pass_reply.clone() {
        return (status, Json(reply));
    }

    let passed: Vec<i64> = body["targetItems"]
        .as_array()
        .map(|ids| ids.iter().filter_map(Value::as_i64).collect())
        .unwrap_or_default();
    s.targets
        .retain(|t| !passed.contains(&t["itemId"].as_i64().unwrap_or_default()));
    (StatusCode::OK, Json(json!({ "success": true })))
}

// ───────────────────────────────────────
// Fixtures
// ───────────────────────────────────────

pub fn pending_target(item_id: i64) -> Value {
    json!({
        "itemId": item_id,
        "orderId": item_id + 1000,
        "invoiceNumber": format!("INV-{item_id:04}"),
        "overallSelectedStatus": "Pending",
        "isPackageOrder": false,
        "additionalItems": { "total": 2, "packed": 0, "pending": 2, "status": "Pending" },
        "packageItems": null,
        "isComplete": null,
        "completedAt": null
    })
}

pub fn opened_package_target(item_id: i64) -> Value {
    json!({
        "itemId": item_id,
        "orderId": item_id + 1000,
        "invoiceNumber": format!("INV-{item_id:04}"),
        "overallSelectedStatus": "Opened",
        "isPackageOrder": true,
        "additionalItems": { "total": 1, "packed": 1, "pending": 0, "status": "Completed" },
        "packageItems": { "total": 3, "packed": 1, "pending": 2, "status": "Opened", "isLocked": false },
        "isComplete": false,
        "completedAt": null
    })
}

pub fn completed_target(item_id: i64) -> Value {
    json!({
        "itemId": item_id,
        "orderId": item_id + 1000,
        "invoiceNumber": format!("INV-{item_id:04}"),
        "overallSelectedStatus": "Completed",
        "isPackageOrder": false,
        "additionalItems": { "total": 2, "packed": 2, "pending": 0, "status": "Completed" },
        "isComplete": true,
        "completedAt": "2026-03-14T08:30:00Z"
    })
}

pub fn officer(id: i64, emp_id: &str, first: &str, last: &str) -> Value {
    json!({
        "id": id,
        "empId": emp_id,
        "firstNameEnglish": first,
        "lastNameEnglish": last,
        "firstNameSinhala": null,
        "lastNameSinhala": null,
        "firstNameTamil": null,
        "lastNameTamil": null,
        "jobRole": "Distribution Officer"
    })
}

pub fn roster() -> Vec<Value> {
    vec![
        officer(5, "DIO005", "Acting", "Officer"),
        officer(20, "DIO020", "Chamari", "Atapattu"),
        officer(21, "DIO021", "Dinesh", "Chandimal"),
    ]
}
