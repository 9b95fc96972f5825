//! In-process fake of the local platform backend.
//!
//! Same routes and error bodies as the real backend, with an in-memory
//! file table and document store.

#![allow(dead_code)] // Not every test binary uses every helper.

use axum::{
    Json, Router,
    extract::{
        Path, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::Response,
    routing::{get, post},
};
use localbridge_client::BridgeConfig;
use serde::Deserialize;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::net::TcpListener;
use tokio::sync::{Notify, RwLock};

type ApiError = (StatusCode, Json<Value>);

fn api_error(status: StatusCode, detail: impl Into<String>) -> ApiError {
    (status, Json(json!({ "detail": detail.into() })))
}

#[derive(Default)]
struct Store {
    files: HashMap<String, String>,
    documents: HashMap<(String, String), Value>,
}

#[derive(Default)]
struct BackendState {
    store: RwLock<Store>,
    shutting_down: AtomicBool,
    shutdown: Notify,
    lifecycle_closed: AtomicUsize,
    lifecycle_closed_notify: Notify,
}

type AppState = Arc<BackendState>;

pub struct FakeBackend {
    addr: SocketAddr,
    state: AppState,
}

impl FakeBackend {
    pub async fn spawn() -> Self {
        let state = AppState::default();

        let app = Router::new()
            .route("/sys/info", get(system_info))
            .route("/sys/open-external", post(open_external))
            .route("/sys/lifecycle", get(lifecycle))
            .route("/io/read_text", post(read_text))
            .route("/io/write_text", post(write_text))
            .route("/store/save", post(save_document))
            .route("/store/{collection}/{filename}", get(get_document))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    pub fn config(&self) -> BridgeConfig {
        BridgeConfig::new(&format!("http://{}", self.addr)).unwrap()
    }

    /// Close every open lifecycle socket from the backend side.
    pub fn shut_down_lifecycle(&self) {
        self.state.shutting_down.store(true, Ordering::SeqCst);
        self.state.shutdown.notify_waiters();
    }

    /// Resolves once some lifecycle socket has been closed by the client.
    pub async fn client_went_away(&self) {
        loop {
            let notified = self.state.lifecycle_closed_notify.notified();
            if self.state.lifecycle_closed.load(Ordering::SeqCst) > 0 {
                return;
            }
            notified.await;
        }
    }
}

async fn system_info() -> Json<Value> {
    Json(json!({
        "platform": "linux",
        "python_version": "3.12.1 (main)",
        "current_working_directory": "/srv/platform"
    }))
}

#[derive(Deserialize)]
struct OpenExternalBody {
    target: String,
}

async fn open_external(Json(body): Json<OpenExternalBody>) -> Json<Value> {
    Json(json!({ "status": "opened", "target": body.target }))
}

#[derive(Deserialize)]
struct PathBody {
    path: String,
    #[serde(default)]
    content: String,
}

async fn read_text(
    State(state): State<AppState>,
    Json(body): Json<PathBody>,
) -> Result<Json<Value>, ApiError> {
    if !body.path.starts_with('/') {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            format!("Path must be absolute: {}", body.path),
        ));
    }
    let store = state.store.read().await;
    let content = store
        .files
        .get(&body.path)
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "File not found"))?;
    Ok(Json(json!({ "path": body.path, "content": content })))
}

async fn write_text(
    State(state): State<AppState>,
    Json(body): Json<PathBody>,
) -> Result<Json<Value>, ApiError> {
    if !body.path.starts_with('/') {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            format!("Path must be absolute: {}", body.path),
        ));
    }
    let mut store = state.store.write().await;
    store.files.insert(body.path.clone(), body.content);
    Ok(Json(json!({ "status": "success", "path": body.path })))
}

#[derive(Deserialize)]
struct SaveBody {
    collection: String,
    filename: String,
    data: Value,
}

async fn save_document(State(state): State<AppState>, Json(body): Json<SaveBody>) -> Json<Value> {
    let path = format!("/data/{}/{}.json", body.collection, body.filename);
    let mut store = state.store.write().await;
    store
        .documents
        .insert((body.collection, body.filename), body.data);
    Json(json!({ "status": "success", "path": path }))
}

async fn get_document(
    State(state): State<AppState>,
    Path((collection, filename)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    let store = state.store.read().await;
    store
        .documents
        .get(&(collection.clone(), filename.clone()))
        .cloned()
        .map(Json)
        .ok_or_else(|| {
            api_error(
                StatusCode::NOT_FOUND,
                format!("Document '{filename}' not found in collection '{collection}'"),
            )
        })
}

async fn lifecycle(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| hold_lifecycle(socket, state))
}

async fn hold_lifecycle(mut socket: WebSocket, state: AppState) {
    loop {
        tokio::select! {
            msg = socket.recv() => match msg {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => {
                    state.lifecycle_closed.fetch_add(1, Ordering::SeqCst);
                    state.lifecycle_closed_notify.notify_waiters();
                    return;
                }
                Some(Ok(_)) => {}
            },
            () = shutdown_requested(&state) => {
                let _ = socket.send(Message::Close(None)).await;
                return;
            }
        }
    }
}

async fn shutdown_requested(state: &BackendState) {
    loop {
        let notified = state.shutdown.notified();
        if state.shutting_down.load(Ordering::SeqCst) {
            return;
        }
        notified.await;
    }
}
