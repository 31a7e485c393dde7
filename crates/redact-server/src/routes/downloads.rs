//! Download history and stored output files.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use redact_store::sanitize_filename;

use super::error_response;
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/downloads", get(list_downloads))
        .route("/downloads/{filename}", get(download_file))
}

/// GET /api/downloads: history entries, oldest first.
async fn list_downloads(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let history: Vec<serde_json::Value> = state
        .history
        .list_all()
        .into_iter()
        .map(|entry| {
            serde_json::json!({
                "available": state.files.exists(&entry.filename),
                "filename": entry.filename,
                "timestamp": entry.timestamp,
            })
        })
        .collect();

    Json(serde_json::json!({
        "count": history.len(),
        "history": history,
    }))
}

/// GET /api/downloads/{filename}: the stored file as an attachment.
async fn download_file(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> Response {
    match state.files.load(&filename) {
        Ok(content) => (
            [
                (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", sanitize_filename(&filename)),
                ),
            ],
            content,
        )
            .into_response(),
        Err(e) => error_response(&e).into_response(),
    }
}
