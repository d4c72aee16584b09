use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use codenano_assembler::AssembleOptions;
use codenano_common::{ConsoleKind, FileSet, Mode, SourceFile};
use codenano_preview::RenderState;
use codenano_workspace::{
    handle_host_message, router, AppState, MemoryProjectStore, PlaygroundState, ServerEvent,
    LOCAL_OWNER,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

const MAX_SIZE: usize = 1024 * 1024;

fn app_state() -> AppState {
    let files = FileSet::from_files(vec![
        SourceFile::from_path("index.html", "<html><head></head><body></body></html>"),
        SourceFile::from_path("app.js", "console.log('hi')"),
    ])
    .unwrap();
    let playground = PlaygroundState::new(files, Mode::Html, AssembleOptions::default());
    AppState::new(playground, Arc::new(MemoryProjectStore::default()), LOCAL_OWNER)
}

async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(match body {
            Some(body) => Body::from(body.to_string()),
            None => Body::empty(),
        })
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), MAX_SIZE).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

#[tokio::test]
async fn test_index_serves_host_page() {
    let app = router(app_state());
    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), MAX_SIZE).await.unwrap();
    let page = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(page.contains("allow-scripts allow-same-origin"));
}

#[tokio::test]
async fn test_state_snapshot() {
    let app = router(app_state());
    let (status, state) = call(&app, "GET", "/api/state", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(state["mode"], "html");
    assert_eq!(state["files"].as_array().unwrap().len(), 2);
    assert_eq!(state["render"]["state"], "idle");
    assert_eq!(state["device"], "desktop");
}

#[tokio::test]
async fn test_editing_a_file_broadcasts_a_render() {
    let state = app_state();
    let mut events = state.subscribe();
    let app = router(state);

    let (status, summary) = call(
        &app,
        "PUT",
        "/api/files/app.js",
        Some(json!({ "content": "console.log('edited')" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["generation"], 1);

    match events.recv().await.unwrap() {
        ServerEvent::Render { document, .. } => {
            assert!(document.contains("<script>console.log('edited')</script></body>"));
        }
        other => panic!("Expected render event, got {:?}", other),
    }
}

#[tokio::test]
async fn test_tab_insertion() {
    let app = router(app_state());
    let (status, body) = call(
        &app,
        "POST",
        "/api/tab",
        Some(json!({ "path": "app.js", "cursor": 0 })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cursor"], 2);

    let (_, state) = call(&app, "GET", "/api/state", None).await;
    assert_eq!(state["files"][1]["content"], "  console.log('hi')");

    let (status, _) = call(
        &app,
        "POST",
        "/api/tab",
        Some(json!({ "path": "missing.js", "cursor": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_mode_renders_error_document() {
    let state = app_state();
    let mut events = state.subscribe();
    let app = router(state.clone());

    let (status, body) = call(&app, "PUT", "/api/mode", Some(json!({ "mode": "svelte" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["supported"], false);
    assert_eq!(body["mode"], "svelte");

    match events.recv().await.unwrap() {
        ServerEvent::Render { document, .. } => {
            assert!(document.contains("Unsupported mode: svelte"));
        }
        other => panic!("Expected render event, got {:?}", other),
    }

    let render = state.with_playground(|playground| playground.preview().state());
    assert!(matches!(render, RenderState::Error { .. }));
}

#[tokio::test]
async fn test_device_changes_do_not_render() {
    let state = app_state();
    let app = router(state.clone());
    call(&app, "POST", "/api/render", None).await;
    let before = state.with_playground(|playground| playground.preview().state());

    let (status, body) = call(&app, "PUT", "/api/device", Some(json!({ "device": "mobile" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["width"], 375);
    assert_eq!(body["height"], 667);

    let after = state.with_playground(|playground| playground.preview().state());
    assert_eq!(before, after);

    let (status, _) = call(&app, "PUT", "/api/device", Some(json!({ "device": "watch" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_refresh() {
    let app = router(app_state());

    let (status, _) = call(&app, "POST", "/api/refresh", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, first) = call(&app, "POST", "/api/render", None).await;
    let (status, refreshed) = call(&app, "POST", "/api/refresh", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(refreshed["generation"], 2);
    assert_ne!(refreshed["sandboxKey"], first["sandboxKey"]);
}

#[tokio::test]
async fn test_host_messages() {
    let state = app_state();
    let mut events = state.subscribe();
    let generation = state.render().generation;
    events.recv().await.unwrap();

    handle_host_message(&state, r#"{"type":"console-log","content":"hi"}"#);
    handle_host_message(&state, &format!(r#"{{"type":"loaded","generation":{}}}"#, generation.0));
    handle_host_message(&state, r#"{"type":"something-else"}"#);

    match events.recv().await.unwrap() {
        ServerEvent::Console { kind, content, .. } => {
            assert_eq!(kind, ConsoleKind::Log);
            assert_eq!(content, "hi");
        }
        other => panic!("Expected console event, got {:?}", other),
    }
    assert!(events.try_recv().is_err());

    let render = state.with_playground(|playground| playground.preview().state());
    assert_eq!(render, RenderState::Ready { generation });
}

#[tokio::test]
async fn test_project_round_trip() {
    let app = router(app_state());

    let (status, saved) = call(&app, "PUT", "/api/projects/demo", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(saved["id"], "demo");
    assert_eq!(saved["fileCount"], 2);

    let (_, listed) = call(&app, "GET", "/api/projects", None).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let (_, listed) = call(&app, "GET", "/api/projects?owner=someone-else", None).await;
    assert!(listed.as_array().unwrap().is_empty());

    call(
        &app,
        "PUT",
        "/api/files",
        Some(json!([{ "name": "App.jsx", "path": "App.jsx", "content": "", "language": "jsx" }])),
    )
    .await;

    let (status, _) = call(&app, "POST", "/api/projects/demo/load", None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, state) = call(&app, "GET", "/api/state", None).await;
    assert_eq!(state["files"].as_array().unwrap().len(), 2);
    assert_eq!(state["projectId"], "demo");
}

#[tokio::test]
async fn test_project_errors() {
    let app = router(app_state());

    let (status, body) = call(&app, "POST", "/api/projects/missing/load", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("missing"));

    let (status, _) = call(&app, "PUT", "/api/projects/bad.id", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    call(&app, "PUT", "/api/mode", Some(json!({ "mode": "svelte" }))).await;
    let (status, _) = call(&app, "PUT", "/api/projects/demo", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
