use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};

use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, error};

use crate::state::app_state::AppState;
use crate::utils::conf_helper;

pub fn health_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/health", get(health_check))
        .route("/info", get(info_check))
        .route("/stop", get(stop_process))
        .with_state(state)
}

/// Lists the decoded files with their header summaries.
async fn index_page(State(state): State<AppState>) -> Html<String> {
    let channels = state.channels.read().await;

    let mut seen = HashSet::new();
    let mut body = String::from("<html><body><h1>PLW Reader</h1>");
    for info in channels.values() {
        if !seen.insert(Arc::as_ptr(&info.reader) as usize) {
            continue;
        }
        let summary = info.reader.summary();
        body.push_str("<pre>");
        body.push_str(&escape_html(&summary.to_string()));
        body.push_str(&format!(
            "\nRows Recovered: {}</pre>",
            info.reader.rows_decoded()
        ));
    }
    if seen.is_empty() {
        body.push_str("<p>No files loaded.</p>");
    }
    body.push_str("</body></html>");

    Html(body)
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

pub async fn info_check() -> Response {
    let config = conf_helper::get_cached_config();

    debug!("{} requested", config.name);
    Json(config).into_response()
}

async fn health_check() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_owned(),
    })
}

async fn stop_process() -> impl IntoResponse {
    error!("Stop endpoint called, shutting down process");

    // Give the response and log lines time to flush
    tokio::spawn(async {
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        std::process::exit(0);
    });

    StatusCode::OK
}

#[derive(Serialize)]
pub struct HealthStatus {
    status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a<b>&c"), "a&lt;b&gt;&amp;c");
    }

    #[tokio::test]
    async fn test_index_without_files() {
        let Html(page) = index_page(State(AppState::new())).await;
        assert!(page.contains("No files loaded."));
    }
}
