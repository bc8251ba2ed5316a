//! HTTP-level tests for the explorer API, driving the router directly
//! with `tower::ServiceExt::oneshot` over a temporary directory tree.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use spyglass_host::activity::ActivityLog;
use spyglass_host::api::{api_router, AppState};
use spyglass_vfs::{Explorer, TargetList};
use tokio::sync::RwLock;
use tower::ServiceExt;

fn app() -> Router {
    let state = AppState {
        explorer: Arc::new(RwLock::new(Explorer::new(
            None,
            TargetList::from_patterns(["password.txt"]),
        ))),
        log: Arc::new(ActivityLog::new()),
    };
    Router::new().nest("/api", api_router()).with_state(state)
}

async fn post_json(app: &Router, uri: &str, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(
            Request::post(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

/// Percent-encode a filesystem path into a single wildcard segment, the
/// way the UI's encodeURIComponent does.
fn encode_path(path: &str) -> String {
    path.replace('%', "%25").replace('/', "%2F").replace('\\', "%5C")
}

#[tokio::test]
async fn health_reports_ok() {
    let app = app();
    let (status, body) = get_json(&app, "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn breadcrumb_decomposes_posix_path() {
    let app = app();
    let (status, body) = post_json(
        &app,
        "/api/breadcrumb",
        serde_json::json!({ "path": "/home/user" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let segments = body["segments"].as_array().unwrap();
    assert_eq!(segments.len(), 4);
    assert_eq!(segments[0]["label"], "Drives");
    assert_eq!(segments[0]["target_path"], "");
    assert_eq!(segments[1]["target_path"], "/");
    assert_eq!(segments[3]["target_path"], "/home/user");
}

#[tokio::test]
async fn breadcrumb_decomposes_drive_path() {
    let app = app();
    let (_, body) = post_json(
        &app,
        "/api/breadcrumb",
        serde_json::json!({ "path": "C:\\Users\\me" }),
    )
    .await;

    let segments = body["segments"].as_array().unwrap();
    assert_eq!(segments.len(), 4);
    assert_eq!(segments[1]["label"], "C:");
    assert_eq!(segments[1]["target_path"], "C:\\");
    assert_eq!(segments[3]["target_path"], "C:\\Users\\me");
}

#[tokio::test]
async fn list_returns_entries_and_flags_targets() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("password.txt"), b"x").unwrap();
    std::fs::create_dir(dir.path().join("docs")).unwrap();

    let app = app();
    let (status, body) = post_json(
        &app,
        "/api/list",
        serde_json::json!({ "directory": dir.path().to_string_lossy() }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].as_str().unwrap().starts_with("[SUCCESS]"));

    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    let pw = items
        .iter()
        .find(|i| i["name"] == "password.txt")
        .unwrap();
    assert_eq!(pw["type"], "file");
    assert_eq!(pw["is_target"], true);
    let docs = items.iter().find(|i| i["name"] == "docs").unwrap();
    assert_eq!(docs["type"], "directory");
}

#[tokio::test]
async fn empty_directory_lists_drives() {
    let app = app();
    let (_, body) = post_json(&app, "/api/list", serde_json::json!({ "directory": "" })).await;
    assert_eq!(body["message"], "[SUCCESS] Listed available drives");
    let items = body["items"].as_array().unwrap();
    assert!(items
        .iter()
        .any(|i| i["name"] == "Current Working Directory"));
}

#[tokio::test]
async fn read_text_file_and_log_it() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("note.txt");
    std::fs::write(&path, b"remember the milk").unwrap();

    let app = app();
    let (_, body) = post_json(
        &app,
        "/api/read",
        serde_json::json!({ "filepath": path.to_string_lossy() }),
    )
    .await;
    assert_eq!(body["data"]["type"], "text");
    assert_eq!(body["data"]["content"], "remember the milk");

    let (_, logs) = get_json(&app, "/api/logs").await;
    let entries = logs["logs"].as_array().unwrap();
    assert!(entries
        .iter()
        .any(|e| e["action"] == "READ" && e["status"] == "SUCCESS"));
}

#[tokio::test]
async fn read_failure_degrades_to_error_payload() {
    let app = app();
    let (status, body) = post_json(
        &app,
        "/api/read",
        serde_json::json!({ "filepath": "/no/such/file.txt" }),
    )
    .await;
    // Degraded, not a server error.
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["type"], "error");
    assert!(body["message"].as_str().unwrap().starts_with("[ERROR]"));
}

#[tokio::test]
async fn metadata_endpoint_returns_sections() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.csv");
    std::fs::write(&path, b"a,b\n1,2\n").unwrap();

    let app = app();
    let (_, body) = post_json(
        &app,
        "/api/metadata",
        serde_json::json!({ "filepath": path.to_string_lossy() }),
    )
    .await;
    assert_eq!(body["metadata"]["basic"]["filename"], "data.csv");
    assert_eq!(body["metadata"]["basic"]["size"], 8);
    assert!(body["metadata"]["timestamps"]["modified"].is_string());
}

#[tokio::test]
async fn write_and_delete_are_blocked_and_logged() {
    let app = app();

    let (_, body) = post_json(
        &app,
        "/api/write",
        serde_json::json!({ "filepath": "/tmp/x.txt", "content": "nope" }),
    )
    .await;
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap().contains("[BLOCKED]"));

    let (_, body) = post_json(
        &app,
        "/api/delete",
        serde_json::json!({ "filepath": "/tmp/x.txt" }),
    )
    .await;
    assert_eq!(body["success"], false);

    let (_, logs) = get_json(&app, "/api/logs").await;
    let entries = logs["logs"].as_array().unwrap();
    assert!(entries
        .iter()
        .any(|e| e["action"] == "WRITE" && e["status"] == "BLOCKED"));
    assert!(entries
        .iter()
        .any(|e| e["action"] == "DELETE" && e["status"] == "BLOCKED"));
}

#[tokio::test]
async fn download_streams_attachment() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("evidence.bin");
    std::fs::write(&path, b"payload bytes").unwrap();

    let app = app();
    let uri = format!("/api/download/{}", encode_path(&path.to_string_lossy()));
    let response = app
        .clone()
        .oneshot(Request::get(&uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let disposition = response
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.contains("attachment"));
    assert!(disposition.contains("evidence.bin"));

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"payload bytes");
}

#[tokio::test]
async fn missing_download_is_404_and_logged_as_error() {
    let app = app();
    let uri = format!("/api/download/{}", encode_path("/no/such/file.bin"));
    let response = app
        .clone()
        .oneshot(Request::get(&uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let (_, logs) = get_json(&app, "/api/logs").await;
    assert!(logs["logs"]
        .as_array()
        .unwrap()
        .iter()
        .any(|e| e["action"] == "DOWNLOAD" && e["status"] == "ERROR"));
}

#[tokio::test]
async fn media_requests_are_deduplicated_in_the_log() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shot.png");
    std::fs::write(&path, [0x89, 0x50, 0x4e, 0x47]).unwrap();

    let app = app();
    let encoded = encode_path(&path.to_string_lossy());
    for bust in ["1", "2", "3"] {
        let uri = format!("/api/media/{encoded}?_t={bust}");
        let response = app
            .clone()
            .oneshot(Request::get(&uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "image/png"
        );
    }

    let (_, logs) = get_json(&app, "/api/logs").await;
    let reads = logs["logs"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|e| e["action"] == "READ")
        .count();
    assert_eq!(reads, 1, "media refetches suppressed");
}

#[tokio::test]
async fn set_allowed_dir_and_reload_targets_are_config_ops() {
    let dir = tempfile::tempdir().unwrap();

    let app = app();
    let (_, body) = post_json(
        &app,
        "/api/set_allowed_dir",
        serde_json::json!({ "directory": dir.path().to_string_lossy() }),
    )
    .await;
    assert_eq!(body["success"], true);
    assert!(body["message"].as_str().unwrap().contains("[SUCCESS]"));

    let (_, body) = post_json(&app, "/api/reload_targets", serde_json::json!({})).await;
    assert_eq!(body["success"], true);

    let (_, logs) = get_json(&app, "/api/logs").await;
    let configs = logs["logs"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|e| e["action"] == "CONFIG")
        .count();
    assert_eq!(configs, 2);
}

#[tokio::test]
async fn debug_targets_reports_patterns_and_probes() {
    let app = app();
    let (_, body) = get_json(&app, "/api/debug/targets").await;
    assert_eq!(body["target_files_count"], 1);
    assert_eq!(body["test_matches"]["password.txt"], true);
    assert_eq!(body["test_matches"]["passwords.txt"], true);
    assert_eq!(body["test_matches"]["normal.txt"], false);
}
