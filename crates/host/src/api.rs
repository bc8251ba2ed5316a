//! REST API for the spyglass explorer UI.
//!
//! Every endpoint the single-page UI calls lives under `/api`. Handlers
//! are thin adapters: they hand the request to the explorer, record the
//! attempt in the activity log, and put the result on the wire. Failures
//! the explorer already degraded (bad directory, unreadable file) still
//! return 200 with an `[ERROR]` message, matching what the UI renders in
//! its status bar.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, Response, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use spyglass_protocol::{
    breadcrumb, BreadcrumbRequest, BreadcrumbResponse, FileContent, ListRequest, ListResponse,
    LogAction, LogStatus, LogsResponse, MetadataRequest, MetadataResponse, MutationRequest,
    MutationResponse, ReadRequest, ReadResponse, SetRootRequest,
};
use spyglass_vfs::Explorer;
use tokio::sync::RwLock;
use tokio_util::io::ReaderStream;

use crate::activity::{is_media_mime, ActivityLog};

// Shared state
#[derive(Clone)]
pub struct AppState {
    pub explorer: Arc<RwLock<Explorer>>,
    pub log: Arc<ActivityLog>,
}

// Routes
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/list", post(list_directory))
        .route("/read", post(read_file))
        .route("/metadata", post(file_metadata))
        .route("/breadcrumb", post(build_breadcrumb))
        .route("/download/*path", get(download_file))
        .route("/media/*path", get(serve_media))
        .route("/write", post(write_file))
        .route("/delete", post(delete_file))
        .route("/logs", get(get_logs))
        .route("/set_allowed_dir", post(set_allowed_dir))
        .route("/reload_targets", post(reload_targets))
        .route("/debug/targets", get(debug_targets))
}

// Handlers

async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") }))
}

async fn list_directory(
    State(state): State<AppState>,
    Json(payload): Json<ListRequest>,
) -> Json<ListResponse> {
    let (items, message) = state
        .explorer
        .read()
        .await
        .list_directory(payload.directory.as_deref())
        .await;
    Json(ListResponse { items, message })
}

async fn read_file(
    State(state): State<AppState>,
    Json(payload): Json<ReadRequest>,
) -> Json<ReadResponse> {
    let (data, message) = state.explorer.read().await.read_file(&payload.filepath).await;

    match &data {
        FileContent::Error { error } => {
            state.log.record(
                LogAction::Read,
                &payload.filepath,
                LogStatus::Error,
                Some(error.clone()),
            );
        }
        _ => {
            state
                .log
                .record(LogAction::Read, &payload.filepath, LogStatus::Success, None);
        }
    }

    Json(ReadResponse { data, message })
}

async fn file_metadata(
    State(state): State<AppState>,
    Json(payload): Json<MetadataRequest>,
) -> Json<MetadataResponse> {
    let (metadata, message) = state.explorer.read().await.metadata(&payload.filepath).await;

    if metadata.is_some() {
        state.log.record(
            LogAction::Metadata,
            &payload.filepath,
            LogStatus::Success,
            None,
        );
    } else {
        state.log.record(
            LogAction::Metadata,
            &payload.filepath,
            LogStatus::Error,
            Some(message.clone()),
        );
    }

    Json(MetadataResponse { metadata, message })
}

async fn build_breadcrumb(Json(payload): Json<BreadcrumbRequest>) -> Json<BreadcrumbResponse> {
    Json(BreadcrumbResponse {
        segments: breadcrumb::build(&payload.path),
    })
}

async fn download_file(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Response<Body> {
    match tokio::fs::File::open(&path).await {
        Ok(file) => {
            state
                .log
                .record(LogAction::Download, &path, LogStatus::Success, None);

            let filename = std::path::Path::new(&path)
                .file_name()
                .map_or_else(|| "download".to_string(), |n| n.to_string_lossy().into_owned());
            let mime = mime_guess::from_path(&path)
                .first_raw()
                .unwrap_or("application/octet-stream");

            Response::builder()
                .status(StatusCode::OK)
                .header(header::CONTENT_TYPE, mime)
                .header(
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{filename}\""),
                )
                .body(Body::from_stream(ReaderStream::new(file)))
                .unwrap()
        }
        Err(e) => {
            state.log.record(
                LogAction::Download,
                &path,
                LogStatus::Error,
                Some(e.to_string()),
            );
            not_found(&e.to_string())
        }
    }
}

async fn serve_media(State(state): State<AppState>, Path(path): Path<String>) -> Response<Body> {
    let mime = mime_guess::from_path(&path)
        .first_raw()
        .unwrap_or("application/octet-stream");

    match tokio::fs::File::open(&path).await {
        Ok(file) => {
            // Media elements refetch their source; suppress the repeats.
            if is_media_mime(mime) {
                state
                    .log
                    .record_media(LogAction::Read, &path, LogStatus::Success);
            } else {
                state
                    .log
                    .record(LogAction::Read, &path, LogStatus::Success, None);
            }

            Response::builder()
                .status(StatusCode::OK)
                .header(header::CONTENT_TYPE, mime)
                .body(Body::from_stream(ReaderStream::new(file)))
                .unwrap()
        }
        Err(e) => {
            state.log.record(
                LogAction::Read,
                &path,
                LogStatus::Error,
                Some(e.to_string()),
            );
            not_found(&e.to_string())
        }
    }
}

fn not_found(message: &str) -> Response<Body> {
    Response::builder()
        .status(StatusCode::NOT_FOUND)
        .body(Body::from(message.to_string()))
        .unwrap()
}

async fn write_file(
    State(state): State<AppState>,
    Json(payload): Json<MutationRequest>,
) -> Json<MutationResponse> {
    state.log.record(
        LogAction::Write,
        &payload.filepath,
        LogStatus::Blocked,
        None,
    );
    Json(MutationResponse {
        success: false,
        message: "[BLOCKED] Write operations are not allowed.".to_string(),
    })
}

async fn delete_file(
    State(state): State<AppState>,
    Json(payload): Json<MutationRequest>,
) -> Json<MutationResponse> {
    state.log.record(
        LogAction::Delete,
        &payload.filepath,
        LogStatus::Blocked,
        None,
    );
    Json(MutationResponse {
        success: false,
        message: "[BLOCKED] Delete operations are not allowed.".to_string(),
    })
}

async fn get_logs(State(state): State<AppState>) -> Json<LogsResponse> {
    Json(LogsResponse {
        logs: state.log.entries(),
    })
}

async fn set_allowed_dir(
    State(state): State<AppState>,
    Json(payload): Json<SetRootRequest>,
) -> impl IntoResponse {
    let stored = state
        .explorer
        .write()
        .await
        .set_allowed_dir(payload.directory);

    let display = stored
        .as_ref()
        .map_or_else(|| "None".to_string(), |p| p.display().to_string());
    state
        .log
        .record(LogAction::Config, &display, LogStatus::Success, None);

    Json(MutationResponse {
        success: true,
        message: format!("[SUCCESS] Set allowed directory to: {display}"),
    })
}

async fn reload_targets(State(state): State<AppState>) -> Json<MutationResponse> {
    let (old, new) = state.explorer.write().await.reload_targets();
    let message = format!("Reloaded target files: {old} -> {new}");
    state.log.record(
        LogAction::Config,
        "targets.txt",
        LogStatus::Success,
        Some(message.clone()),
    );
    Json(MutationResponse {
        success: true,
        message,
    })
}

async fn debug_targets(State(state): State<AppState>) -> Json<serde_json::Value> {
    let explorer = state.explorer.read().await;
    let targets = explorer.targets();

    let probes = [
        "passwords.txt",
        "todo.txt",
        "resume.docx",
        "normal.txt",
        "password.txt",
    ];
    let test_matches: serde_json::Map<String, serde_json::Value> = probes
        .iter()
        .map(|name| ((*name).to_string(), targets.matches(name).into()))
        .collect();

    Json(serde_json::json!({
        "target_files_count": targets.len(),
        "target_files": targets.sample(20),
        "test_matches": test_matches,
    }))
}
