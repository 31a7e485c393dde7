//! Entity analysis route.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use super::error_response;
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/analyze", post(analyze))
}

#[derive(serde::Deserialize)]
struct TextInput {
    text: String,
}

/// POST /api/analyze: entity counts by label.
async fn analyze(
    State(state): State<Arc<AppState>>,
    Json(input): Json<TextInput>,
) -> impl IntoResponse {
    let counts = match state.service.analyze(&input.text) {
        Ok(counts) => counts,
        Err(e) => return error_response(&e),
    };

    state.spawn_sweep();

    (StatusCode::OK, Json(serde_json::json!({ "counts": counts })))
}
