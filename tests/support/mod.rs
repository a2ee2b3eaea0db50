//! In-process stub of the medbear backend for integration tests.
//!
//! Every endpoint's answer is scripted through [`StubState`]; every request
//! the client issues is recorded with its method, path, JSON body, and cookie
//! header so tests can assert the exact wire traffic.

#![allow(dead_code)]

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

/// Cookie value issued by the stub's login endpoint.
pub const STUB_COOKIE: &str = "session=stub-session";

/// One recorded request.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub body: Value,
    pub cookie: Option<String>,
}

/// Scripted answers. Statuses default to success; bodies default to a user
/// with id 7 owning chat 3 and both models answering.
#[derive(Debug)]
pub struct StubState {
    pub home_status: u16,
    pub expired: bool,
    pub user_id: i64,
    pub user_status: u16,
    pub chat_id: i64,
    pub chat_id_status: u16,
    pub created_chat_id: i64,
    pub chats: Value,
    pub transcript: Value,
    pub persist_status: u16,
    pub replies: Value,
    pub replies_status: u16,
    pub login_status: u16,
    pub sign_up_status: u16,
    pub account: Value,
    pub recorded: Vec<Recorded>,
}

impl Default for StubState {
    fn default() -> Self {
        Self {
            home_status: 200,
            expired: false,
            user_id: 7,
            user_status: 200,
            chat_id: 3,
            chat_id_status: 200,
            created_chat_id: 9,
            chats: json!([]),
            transcript: json!({"messages_sent": [], "messages_received": []}),
            persist_status: 200,
            replies: json!({"biomistral": "x", "meditron": "y"}),
            replies_status: 200,
            login_status: 200,
            sign_up_status: 200,
            account: json!({"id": 7, "username": "lola", "email": "lola@example.com"}),
            recorded: Vec::new(),
        }
    }
}

/// The shared stub: scripted state plus the request log.
#[derive(Debug, Default)]
pub struct Stub {
    pub state: Mutex<StubState>,
}

impl Stub {
    pub fn new(state: StubState) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(state),
        })
    }

    /// Every recorded request, in arrival order.
    pub fn recorded(&self) -> Vec<Recorded> {
        self.state.lock().unwrap().recorded.clone()
    }

    /// Recorded paths, in arrival order.
    pub fn paths(&self) -> Vec<String> {
        self.recorded().into_iter().map(|r| r.path).collect()
    }

    /// How many recorded requests start with the given path.
    pub fn hits(&self, path: &str) -> usize {
        self.recorded()
            .iter()
            .filter(|r| r.path.starts_with(path))
            .count()
    }

    fn record(&self, method: &str, path: String, body: Value, headers: &HeaderMap) {
        let cookie = headers
            .get(header::COOKIE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        self.state.lock().unwrap().recorded.push(Recorded {
            method: method.to_owned(),
            path,
            body,
            cookie,
        });
    }
}

/// Bind the stub to an ephemeral port and serve it on a background task.
pub async fn spawn(stub: Arc<Stub>) -> SocketAddr {
    let app = router(stub);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn status_of(code: u16) -> StatusCode {
    StatusCode::from_u16(code).unwrap()
}

fn router(stub: Arc<Stub>) -> Router {
    Router::new()
        .route("/home", get(home))
        .route("/get-id-for-username", post(user_id))
        .route("/get-chat-id/{user_id}", get(chat_id))
        .route("/create-chat", post(create_chat))
        .route("/get-user-chats/{user_id}", get(user_chats))
        .route("/restore-chat-history/{chat_id}", get(restore_history))
        .route("/send-message", post(send_message))
        .route("/models-replies", post(models_replies))
        .route("/log-in", post(log_in))
        .route("/sign-up", post(sign_up))
        .route("/log-out", post(log_out))
        .route("/get-account", post(get_account))
        .route("/edit-account", post(edit_account))
        .with_state(stub)
}

async fn home(State(stub): State<Arc<Stub>>, headers: HeaderMap) -> Response {
    stub.record("GET", "/home".into(), Value::Null, &headers);
    let (status, expired) = {
        let state = stub.state.lock().unwrap();
        (state.home_status, state.expired)
    };
    (status_of(status), Json(json!({"expired": expired}))).into_response()
}

async fn user_id(
    State(stub): State<Arc<Stub>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    stub.record("POST", "/get-id-for-username".into(), body, &headers);
    let (status, id) = {
        let state = stub.state.lock().unwrap();
        (state.user_status, state.user_id)
    };
    (status_of(status), Json(json!({"id": id}))).into_response()
}

async fn chat_id(
    State(stub): State<Arc<Stub>>,
    headers: HeaderMap,
    Path(user_id): Path<i64>,
) -> Response {
    stub.record(
        "GET",
        format!("/get-chat-id/{user_id}"),
        Value::Null,
        &headers,
    );
    let (status, chat_id) = {
        let state = stub.state.lock().unwrap();
        (state.chat_id_status, state.chat_id)
    };
    (status_of(status), Json(json!({"chat_id": chat_id}))).into_response()
}

async fn create_chat(
    State(stub): State<Arc<Stub>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    stub.record("POST", "/create-chat".into(), body, &headers);
    let chat_id = stub.state.lock().unwrap().created_chat_id;
    (StatusCode::CREATED, Json(json!({"chat_id": chat_id}))).into_response()
}

async fn user_chats(
    State(stub): State<Arc<Stub>>,
    headers: HeaderMap,
    Path(user_id): Path<i64>,
) -> Response {
    stub.record(
        "GET",
        format!("/get-user-chats/{user_id}"),
        Value::Null,
        &headers,
    );
    let chats = stub.state.lock().unwrap().chats.clone();
    Json(json!({"chats": chats})).into_response()
}

async fn restore_history(
    State(stub): State<Arc<Stub>>,
    headers: HeaderMap,
    Path(chat_id): Path<i64>,
) -> Response {
    stub.record(
        "GET",
        format!("/restore-chat-history/{chat_id}"),
        Value::Null,
        &headers,
    );
    let transcript = stub.state.lock().unwrap().transcript.clone();
    Json(transcript).into_response()
}

async fn send_message(
    State(stub): State<Arc<Stub>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    stub.record("POST", "/send-message".into(), body, &headers);
    let status = stub.state.lock().unwrap().persist_status;
    status_of(status).into_response()
}

async fn models_replies(
    State(stub): State<Arc<Stub>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    stub.record("POST", "/models-replies".into(), body, &headers);
    let (status, replies) = {
        let state = stub.state.lock().unwrap();
        (state.replies_status, state.replies.clone())
    };
    (status_of(status), Json(replies)).into_response()
}

async fn log_in(
    State(stub): State<Arc<Stub>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let login = body["login"].as_str().unwrap_or_default().to_owned();
    stub.record("POST", "/log-in".into(), body, &headers);
    let status = stub.state.lock().unwrap().login_status;
    if status == 200 {
        (
            [(header::SET_COOKIE, STUB_COOKIE)],
            Json(json!({"username": login})),
        )
            .into_response()
    } else {
        status_of(status).into_response()
    }
}

async fn sign_up(
    State(stub): State<Arc<Stub>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    stub.record("POST", "/sign-up".into(), body, &headers);
    let status = stub.state.lock().unwrap().sign_up_status;
    status_of(status).into_response()
}

async fn log_out(State(stub): State<Arc<Stub>>, headers: HeaderMap) -> Response {
    stub.record("POST", "/log-out".into(), Value::Null, &headers);
    StatusCode::OK.into_response()
}

async fn get_account(
    State(stub): State<Arc<Stub>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    stub.record("POST", "/get-account".into(), body, &headers);
    let account = stub.state.lock().unwrap().account.clone();
    Json(account).into_response()
}

async fn edit_account(
    State(stub): State<Arc<Stub>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    stub.record("POST", "/edit-account".into(), body, &headers);
    StatusCode::OK.into_response()
}
