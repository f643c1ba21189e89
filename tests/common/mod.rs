//! Shared test utilities for integration tests.
//!
//! `TestClient` drives the application router in-process with `oneshot`
//! requests. The budget backend it talks to is a small in-memory fake served
//! on an OS-assigned port, so the real reqwest client is exercised end to end.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use allowance_ledger::config::Config;
use allowance_ledger::server::{router, serve};
use allowance_ledger::state::AppState;
use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::{Method, Request, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, patch, post};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

/// In-memory stand-in for the budget backend.
#[derive(Debug, Default)]
pub struct FakeBackend {
    pub plans: HashMap<String, i64>,
    pub categories: Vec<(i64, String, bool)>,
    pub spends: Vec<Value>,
    pub next_id: i64,
    /// Reject every spend submission with a 500.
    pub fail_adds: bool,
    /// Leave newly added spends out of month listings (a lagging read model).
    pub stale_listing: bool,
    pub hidden_ids: Vec<i64>,
}

pub type SharedBackend = Arc<Mutex<FakeBackend>>;

impl FakeBackend {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}

fn str_field<'a>(body: &'a Value, key: &str) -> &'a str {
    body.get(key).and_then(Value::as_str).unwrap_or_default()
}

fn id_field(body: &Value) -> i64 {
    body.get("id").and_then(Value::as_i64).unwrap_or_default()
}

async fn plan_get(State(db): State<SharedBackend>, Json(body): Json<Value>) -> Response {
    let ym = str_field(&body, "ym").to_string();
    let db = db.lock().unwrap();
    match db.plans.get(&ym) {
        Some(amount) => Json(json!({ "id": 1, "ym": ym, "amount": amount })).into_response(),
        None => error(StatusCode::NOT_FOUND, "plan not found"),
    }
}

async fn plan_create(State(db): State<SharedBackend>, Json(body): Json<Value>) -> Response {
    let ym = str_field(&body, "ym").to_string();
    let amount = body.get("amount").and_then(Value::as_i64).unwrap_or_default();
    let mut db = db.lock().unwrap();
    if db.plans.contains_key(&ym) {
        return error(StatusCode::CONFLICT, "plan already exists");
    }
    db.plans.insert(ym.clone(), amount);
    Json(json!({ "ym": ym, "amount": amount })).into_response()
}

async fn plan_update(State(db): State<SharedBackend>, Json(body): Json<Value>) -> Response {
    let ym = str_field(&body, "ym").to_string();
    let amount = body.get("amount").and_then(Value::as_i64).unwrap_or_default();
    let mut db = db.lock().unwrap();
    match db.plans.get_mut(&ym) {
        Some(stored) => {
            *stored = amount;
            // Update answers with an empty body
            StatusCode::OK.into_response()
        }
        None => error(StatusCode::NOT_FOUND, "plan not found"),
    }
}

async fn category_list(State(db): State<SharedBackend>, Json(body): Json<Value>) -> Response {
    let include_inactive = body
        .get("includeInactive")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let db = db.lock().unwrap();
    let list: Vec<Value> = db
        .categories
        .iter()
        .filter(|(_, _, active)| include_inactive || *active)
        .map(|(id, name, active)| json!({ "id": id, "name": name, "active": active }))
        .collect();
    Json(Value::Array(list)).into_response()
}

async fn category_create(State(db): State<SharedBackend>, Json(body): Json<Value>) -> Response {
    let name = str_field(&body, "name").to_string();
    let mut db = db.lock().unwrap();
    let id = db.next_id();
    db.categories.push((id, name, true));
    Json(json!({ "data": { "id": id } })).into_response()
}

async fn spend_add(State(db): State<SharedBackend>, Json(body): Json<Value>) -> Response {
    let mut db = db.lock().unwrap();
    if db.fail_adds {
        return error(StatusCode::INTERNAL_SERVER_ERROR, "db down");
    }
    let id = db.next_id();
    let mut record = body.clone();
    record["id"] = json!(id);
    db.spends.push(record.clone());
    if db.stale_listing {
        db.hidden_ids.push(id);
    }
    Json(record).into_response()
}

async fn spend_delete(State(db): State<SharedBackend>, Json(body): Json<Value>) -> Response {
    let id = id_field(&body);
    let mut db = db.lock().unwrap();
    let before = db.spends.len();
    db.spends.retain(|s| id_field(s) != id);
    if db.spends.len() == before {
        return error(StatusCode::NOT_FOUND, "spend not found");
    }
    StatusCode::OK.into_response()
}

async fn spend_update(State(db): State<SharedBackend>, Json(body): Json<Value>) -> Response {
    let id = id_field(&body);
    let mut db = db.lock().unwrap();
    match db.spends.iter_mut().find(|s| id_field(s) == id) {
        Some(stored) => {
            *stored = body;
            StatusCode::OK.into_response()
        }
        None => error(StatusCode::NOT_FOUND, "spend not found"),
    }
}

async fn spend_load_by_month(State(db): State<SharedBackend>, Json(body): Json<Value>) -> Response {
    let ym = str_field(&body, "ym").to_string();
    let db = db.lock().unwrap();
    let list: Vec<Value> = db
        .spends
        .iter()
        .filter(|s| str_field(s, "date").starts_with(&ym))
        .filter(|s| !db.hidden_ids.contains(&id_field(s)))
        .map(|s| {
            // The backend reports timestamps, not plain dates
            let mut listed = s.clone();
            listed["date"] = json!(format!("{}T00:00:00", str_field(s, "date")));
            listed
        })
        .collect();
    Json(json!({ "spendDetailResList": list })).into_response()
}

async fn spend_detail(State(db): State<SharedBackend>, Json(body): Json<Value>) -> Response {
    let id = id_field(&body);
    let db = db.lock().unwrap();
    match db.spends.iter().find(|s| id_field(s) == id) {
        Some(record) => Json(record.clone()).into_response(),
        None => error(StatusCode::NOT_FOUND, "spend not found"),
    }
}

async fn naver_login(Query(params): Query<HashMap<String, String>>) -> Response {
    match params.get("code").map(String::as_str) {
        Some("good-code") => Json(json!({
            "accessToken": "access-123",
            "refreshToken": "refresh-456"
        }))
        .into_response(),
        _ => Json(json!({})).into_response(),
    }
}

fn backend_router(db: SharedBackend) -> Router {
    Router::new()
        .route("/api/budget/plans/get", post(plan_get))
        .route("/api/budget/plans/create", post(plan_create))
        .route("/api/budget/plans/update", patch(plan_update))
        .route("/api/budget/categories/list", post(category_list))
        .route("/api/budget/categories/create", post(category_create))
        .route("/api/budget/spends/add", post(spend_add))
        .route("/api/budget/spends/delete", post(spend_delete))
        .route("/api/budget/spends/update", patch(spend_update))
        .route("/api/budget/spends/loadByMonth", post(spend_load_by_month))
        .route("/api/budget/spends/getDetail", post(spend_detail))
        .route("/member/naverlogin", get(naver_login))
        .with_state(db)
}

/// A test client that talks to the application router, which in turn talks
/// to a fake backend over real HTTP.
pub struct TestClient {
    pub state: AppState,
    pub backend: SharedBackend,
}

impl TestClient {
    pub async fn start() -> Self {
        let backend: SharedBackend = Arc::new(Mutex::new(FakeBackend::default()));
        let (port, _handle) = serve(backend_router(backend.clone()), "127.0.0.1", 0)
            .await
            .expect("Failed to start fake backend");

        let config = Config {
            host: "127.0.0.1".into(),
            port: 0,
            backend_url: format!("http://127.0.0.1:{}", port),
            ..Config::default()
        };
        let state = AppState::new(config).expect("Failed to build state");

        Self { state, backend }
    }

    /// Start with an unreachable backend.
    pub fn offline() -> Self {
        let config = Config {
            backend_url: "http://127.0.0.1:9".into(),
            ..Config::default()
        };
        Self {
            state: AppState::new(config).expect("Failed to build state"),
            backend: Arc::new(Mutex::new(FakeBackend::default())),
        }
    }

    pub fn router(&self) -> Router {
        router(self.state.clone())
    }

    pub fn with_backend<R>(&self, f: impl FnOnce(&mut FakeBackend) -> R) -> R {
        f(&mut self.backend.lock().unwrap())
    }

    /// Make a GET request and return status and body.
    pub async fn get(&self, uri: &str) -> (StatusCode, String) {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> (StatusCode, String) {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn put_json(&self, uri: &str, body: Value) -> (StatusCode, String) {
        self.request(Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, String) {
        self.request(Method::DELETE, uri, None).await
    }

    /// Get JSON from an endpoint and parse it.
    pub async fn get_json(&self, uri: &str) -> (StatusCode, Value) {
        let (status, body) = self.get(uri).await;
        let parsed = serde_json::from_str(&body).unwrap_or(Value::Null);
        (status, parsed)
    }

    async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, String) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header("Content-Type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8_lossy(&bytes).to_string())
    }

    // =========================================================================
    // Helpers for seeding data through the application
    // =========================================================================

    pub async fn set_plan(&self, ym: &str, amount: i64) -> StatusCode {
        let (status, _) = self
            .put_json("/api/plan", json!({ "ym": ym, "amount": amount }))
            .await;
        status
    }

    pub async fn add_spend(&self, date: &str, amount: i64) -> (StatusCode, Value) {
        let (status, body) = self
            .post_json(
                "/api/spends",
                json!({ "date": date, "categoryId": 1, "amount": amount, "memo": "" }),
            )
            .await;
        (status, serde_json::from_str(&body).unwrap_or(Value::Null))
    }
}
