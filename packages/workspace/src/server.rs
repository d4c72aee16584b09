//! HTTP and WebSocket host for the playground.
//!
//! The browser page at `/` owns the real iframe. It receives render, device
//! and console events over `/ws` and answers with load completions and the
//! raw messages the sandbox posts. All mutations go through the JSON API.

use crate::error::ServerError;
use crate::events::{HostMessage, ServerEvent};
use crate::host_page::host_page;
use crate::state::{PlaygroundState, StateSnapshot};
use crate::store::{ProjectStore, ProjectSummary};
use crate::watcher::{load_directory, FileWatcher, WatcherError};
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use codenano_common::FileSet;
use codenano_preview::{DeviceMode, Generation, RenderFrame};
use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

const EVENT_CAPACITY: usize = 256;

/// Shared state behind every handler. The playground lock is never held
/// across an `.await`.
#[derive(Clone)]
pub struct AppState {
    playground: Arc<Mutex<PlaygroundState>>,
    store: Arc<dyn ProjectStore>,
    events: broadcast::Sender<ServerEvent>,
    owner: String,
}

impl AppState {
    pub fn new(
        mut playground: PlaygroundState,
        store: Arc<dyn ProjectStore>,
        owner: impl Into<String>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        let console_events = events.clone();
        playground.preview_mut().on_console_message(move |message| {
            let _ = console_events.send(ServerEvent::from(message));
        });

        Self {
            playground: Arc::new(Mutex::new(playground)),
            store,
            events,
            owner: owner.into(),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ServerEvent> {
        self.events.subscribe()
    }

    pub fn with_playground<R>(&self, f: impl FnOnce(&mut PlaygroundState) -> R) -> R {
        let mut playground = self.playground.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut playground)
    }

    /// Push an event to every connected host. Nobody listening is fine.
    pub fn publish(&self, event: ServerEvent) {
        let _ = self.events.send(event);
    }

    pub fn render(&self) -> RenderFrame {
        let frame = self.with_playground(|playground| playground.render());
        self.publish(frame.clone().into());
        frame
    }

    pub fn reload_files(&self, files: FileSet) -> RenderFrame {
        let frame = self.with_playground(|playground| {
            playground.replace_files(files);
            playground.render()
        });
        self.publish(frame.clone().into());
        frame
    }

    pub fn store(&self) -> &dyn ProjectStore {
        self.store.as_ref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderSummary {
    pub generation: Generation,
    pub sandbox_key: u64,
    pub device: DeviceMode,
    pub bytes: usize,
}

impl From<&RenderFrame> for RenderSummary {
    fn from(frame: &RenderFrame) -> Self {
        Self {
            generation: frame.generation,
            sandbox_key: frame.sandbox_key,
            device: frame.device,
            bytes: frame.document.len(),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/ws", get(ws_handler))
        .route("/api/state", get(get_state))
        .route("/api/files", put(put_files))
        .route("/api/files/*path", put(put_file))
        .route("/api/tab", post(post_tab))
        .route("/api/mode", put(put_mode))
        .route("/api/device", put(put_device))
        .route("/api/render", post(post_render))
        .route("/api/refresh", post(post_refresh))
        .route("/api/projects", get(list_projects))
        .route("/api/projects/:id/load", post(load_project))
        .route("/api/projects/:id", put(save_project))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

pub async fn serve(state: AppState, addr: SocketAddr) -> Result<(), ServerError> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Preview host listening on http://{}", addr);
    axum::serve(listener, router(state)).await?;
    Ok(())
}

/// Reload `root` into the playground and re-render whenever it changes
pub fn spawn_watcher(state: AppState, root: PathBuf) -> Result<JoinHandle<()>, WatcherError> {
    let watcher = FileWatcher::new(root.clone())?;

    let handle = std::thread::Builder::new()
        .name("codenano-watcher".to_string())
        .spawn(move || {
            while let Some(changed) = watcher.next_change(Duration::from_millis(50)) {
                tracing::info!("{} path(s) changed, reloading {:?}", changed.len(), root);
                match load_directory(&root) {
                    Ok(files) => {
                        state.reload_files(files);
                    }
                    Err(err) => tracing::warn!("Reload failed: {}", err),
                }
            }
        })?;

    Ok(handle)
}

async fn index() -> Html<String> {
    Html(host_page())
}

async fn get_state(State(state): State<AppState>) -> Json<StateSnapshot> {
    Json(state.with_playground(|playground| playground.snapshot()))
}

async fn put_files(State(state): State<AppState>, Json(files): Json<FileSet>) -> Json<RenderSummary> {
    let frame = state.reload_files(files);
    Json(RenderSummary::from(&frame))
}

#[derive(Debug, Deserialize)]
struct ContentBody {
    content: String,
}

async fn put_file(
    State(state): State<AppState>,
    Path(path): Path<String>,
    Json(body): Json<ContentBody>,
) -> Result<Json<RenderSummary>, ServerError> {
    state.with_playground(|playground| playground.write_file(&path, body.content))?;
    let frame = state.render();
    Ok(Json(RenderSummary::from(&frame)))
}

#[derive(Debug, Deserialize)]
struct TabBody {
    path: String,
    cursor: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TabResponse {
    cursor: usize,
    render: RenderSummary,
}

async fn post_tab(
    State(state): State<AppState>,
    Json(body): Json<TabBody>,
) -> Result<Json<TabResponse>, ServerError> {
    let cursor = state.with_playground(|playground| {
        playground.session_mut().insert_tab(&body.path, body.cursor)
    })?;
    let frame = state.render();
    Ok(Json(TabResponse {
        cursor,
        render: RenderSummary::from(&frame),
    }))
}

#[derive(Debug, Deserialize)]
struct ModeBody {
    mode: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ModeResponse {
    mode: String,
    supported: bool,
    render: RenderSummary,
}

/// An unknown mode is accepted and rendered as an "Unsupported mode"
/// document, so the preview says what went wrong.
async fn put_mode(State(state): State<AppState>, Json(body): Json<ModeBody>) -> Json<ModeResponse> {
    let (mode, supported) = state.with_playground(|playground| {
        let supported = playground.set_mode_name(&body.mode).is_ok();
        (playground.mode_name(), supported)
    });
    let frame = state.render();
    Json(ModeResponse {
        mode,
        supported,
        render: RenderSummary::from(&frame),
    })
}

#[derive(Debug, Deserialize)]
struct DeviceBody {
    device: String,
}

async fn put_device(
    State(state): State<AppState>,
    Json(body): Json<DeviceBody>,
) -> Result<Json<ServerEvent>, ServerError> {
    let device: DeviceMode = body.device.parse()?;
    if state.with_playground(|playground| playground.set_device_mode(device)) {
        state.publish(device.into());
    }
    Ok(Json(device.into()))
}

async fn post_render(State(state): State<AppState>) -> Json<RenderSummary> {
    let frame = state.render();
    Json(RenderSummary::from(&frame))
}

async fn post_refresh(State(state): State<AppState>) -> Response {
    match state.with_playground(|playground| playground.refresh()) {
        Some(frame) => {
            let summary = RenderSummary::from(&frame);
            state.publish(frame.into());
            Json(summary).into_response()
        }
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

#[derive(Debug, Deserialize)]
struct OwnerQuery {
    owner: Option<String>,
}

async fn list_projects(
    State(state): State<AppState>,
    Query(query): Query<OwnerQuery>,
) -> Result<Json<Vec<ProjectSummary>>, ServerError> {
    let owner = query.owner.unwrap_or_else(|| state.owner.clone());
    Ok(Json(state.store().list_projects(&owner)?))
}

async fn load_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RenderSummary>, ServerError> {
    let project = state.store().load_project(&id)?;
    state.with_playground(|playground| playground.load_project(project));
    let frame = state.render();
    Ok(Json(RenderSummary::from(&frame)))
}

async fn save_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProjectSummary>, ServerError> {
    let (files, mode) = state.with_playground(|playground| {
        let files = playground.session().files().clone();
        match playground.mode() {
            Some(mode) => Ok((files, mode)),
            None => Err(ServerError::UnsupportedMode(playground.mode_name())),
        }
    })?;

    state.store().save_project(&id, &files, mode)?;
    state.with_playground(|playground| playground.set_project_id(id.as_str()));

    let project = state.store().load_project(&id)?;
    Ok(Json(ProjectSummary::from(&project)))
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    tracing::info!("Host connected");

    let (mut sink, mut stream) = socket.split();
    let mut rx = state.subscribe();

    // Catch a late host up with what is on screen
    let initial = state.with_playground(|playground| {
        let preview = playground.preview();
        let mut events = Vec::new();
        if let Some(frame) = preview.current_frame() {
            events.push(ServerEvent::from(frame));
        }
        events.push(ServerEvent::from(preview.device_mode()));
        events
    });

    let mut send_task = tokio::spawn(async move {
        for event in &initial {
            if send_event(&mut sink, event).await.is_err() {
                return;
            }
        }
        loop {
            match rx.recv().await {
                Ok(event) => {
                    if send_event(&mut sink, &event).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(n)) => {
                    tracing::warn!("Host lagged by {} events", n);
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    let recv_state = state.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(message)) = stream.next().await {
            match message {
                Message::Text(text) => handle_host_message(&recv_state, &text),
                Message::Close(_) => break,
                _ => {}
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    tracing::info!("Host disconnected");
}

async fn send_event(
    sink: &mut SplitSink<WebSocket, Message>,
    event: &ServerEvent,
) -> Result<(), axum::Error> {
    match serde_json::to_string(event) {
        Ok(json) => sink.send(Message::Text(json)).await,
        Err(err) => {
            tracing::warn!("Failed to encode event: {}", err);
            Ok(())
        }
    }
}

/// Load completions and forwarded sandbox messages. Console messages reach
/// hosts through the preview's console handler.
pub fn handle_host_message(state: &AppState, raw: &str) {
    if let Ok(HostMessage::Loaded { generation }) = serde_json::from_str::<HostMessage>(raw) {
        let outcome = state.with_playground(|playground| playground.handle_load(generation));
        tracing::debug!("Load of {}: {:?}", generation, outcome);
        return;
    }

    state.with_playground(|playground| playground.handle_message(raw));
}
