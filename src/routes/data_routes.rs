use axum::{
    extract::{ws::WebSocketUpgrade, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::state::app_state::{reader_id, AppState};
use crate::utils::conf_helper;
use plw_reader::{handle_ws_fetch, PlwError, PlwReader};

#[derive(Serialize)]
pub struct ReaderSummary {
    pub id: String,            // same id /read-file returns
    pub signals_count: usize,  // channels registered for this file
    pub headers: Vec<String>,  // column names inside the file
}

/// Response for GET /readers/{id}/headers
#[derive(Serialize)]
pub struct ReaderHeaders {
    pub id: String,
    pub headers: Vec<String>,
}

#[derive(Deserialize, Debug)]
pub struct FileReadRequest {
    pub mode: String, // "online" | "offline"
    pub path: String,
}

#[derive(Serialize, Debug)]
pub struct FileReadResponse {
    pub id: String,
    pub name: String,
    pub path: String,
    pub source: String,
    pub headers: Option<Vec<String>>,
    pub desc: Option<String>,
    pub tags: Option<Vec<String>>,
    pub created_at: Option<String>,
    pub source_url: Option<String>,
}

/// =======================
/// ROUTER
/// =======================

pub fn data_routes(state: AppState) -> Router {
    Router::new()
        .route("/read-file", post(read_file))
        .route("/fetch/{signal}", get(ws_fetch))
        .route("/readers", get(list_readers))
        .route("/readers/{id}/headers", get(reader_headers))
        .with_state(state)
}

/// =======================
/// HANDLERS
/// =======================

fn status_for(err: &PlwError) -> StatusCode {
    match err.root() {
        PlwError::Io(e) if e.kind() == std::io::ErrorKind::NotFound => StatusCode::NOT_FOUND,
        PlwError::Io(e) if e.kind() == std::io::ErrorKind::PermissionDenied => StatusCode::FORBIDDEN,
        PlwError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

async fn read_file(State(state): State<AppState>, Json(request): Json<FileReadRequest>) -> Response {
    debug!("Reading file: mode={}, path={}", request.mode, request.path);

    if let Some(config) = conf_helper::try_cached_config() {
        if !config.accepts(&request.path) {
            error!("Unsupported file type: {}", request.path);
            return StatusCode::UNSUPPORTED_MEDIA_TYPE.into_response();
        }
    }

    // Decoding is blocking file I/O
    let path = request.path.clone();
    let decoded = tokio::task::spawn_blocking(move || PlwReader::open(path)).await;

    let reader = match decoded {
        Ok(Ok(r)) => Arc::new(r),
        Ok(Err(e)) => {
            error!("Failed to decode file {}: {}", request.path, e);
            return status_for(&e).into_response();
        }
        Err(e) => {
            error!("Decode task for {} failed: {}", request.path, e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let summary = reader.summary();
    let exposed_headers = state.register_reader(reader.clone()).await;
    for name in &exposed_headers {
        info!("Register channel: {}", name);
    }

    let mut tags = vec!["plw".to_string(), format!("v{}", summary.format_version)];
    if reader.is_truncated() {
        tags.push("truncated".to_string());
    }

    Json(FileReadResponse {
        id: reader_id(&reader),
        name: summary.file_name.clone(),
        path: request.path.clone(),
        source: request.path,
        headers: Some(exposed_headers),
        desc: Some(summary.to_string()),
        tags: Some(tags),
        created_at: summary.start.map(|start| start.to_rfc3339()),
        source_url: None,
    })
    .into_response()
}

async fn ws_fetch(
    State(state): State<AppState>,
    Path(signal_name): Path<String>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    let channel_info = {
        let channels = state.channels.read().await;
        channels.get(&signal_name).cloned()
    };

    let channel_info = match channel_info {
        Some(info) => info,
        None => {
            error!("Channel not found: {}", signal_name);
            return StatusCode::NOT_FOUND.into_response();
        }
    };

    ws.on_upgrade(move |socket| {
        handle_ws_fetch(socket, channel_info.reader, channel_info.original_name)
    })
}

async fn list_readers(State(state): State<AppState>) -> impl IntoResponse {
    let channels = state.channels.read().await;

    let mut groups: HashMap<String, Vec<String>> = HashMap::new();
    for info in channels.values() {
        groups
            .entry(reader_id(&info.reader))
            .or_default()
            .push(info.original_name.clone());
    }

    let mut out: Vec<ReaderSummary> = groups
        .into_iter()
        .map(|(id, mut names)| {
            names.sort();
            names.dedup();
            ReaderSummary {
                id,
                signals_count: names.len(),
                headers: names,
            }
        })
        .collect();
    out.sort_by(|a, b| a.id.cmp(&b.id));

    Json(out)
}

async fn reader_headers(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    match state.headers_for(&id).await {
        Some(headers) => Json(ReaderHeaders {
            id,
            headers,
        })
        .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
