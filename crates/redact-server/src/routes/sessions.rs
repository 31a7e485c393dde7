//! Session routes with undo/redo over completed transformations.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use redact_core::Result;
use redact_protocol::TransformRecord;

use super::error_response;
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/sessions", post(create_session))
        .route("/sessions/{id}", get(get_session).delete(delete_session))
        .route("/sessions/{id}/undo", post(undo))
        .route("/sessions/{id}/redo", post(redo))
}

async fn create_session(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let info = state.sessions.create_session();
    (StatusCode::CREATED, Json(info))
}

/// GET /api/sessions/{id}: summary plus the transformation in effect.
async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    step_response(&state, &id, state.sessions.current(&id))
}

async fn delete_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    if state.sessions.remove_session(&id) {
        (StatusCode::OK, Json(serde_json::json!({ "deleted": true, "id": id })))
    } else {
        (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": "Session not found" })),
        )
    }
}

async fn undo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    step_response(&state, &id, state.sessions.undo(&id))
}

async fn redo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    step_response(&state, &id, state.sessions.redo(&id))
}

/// `{entry, current, session}`: the record the step touched, the record now
/// in effect, and the session summary.
fn step_response(
    state: &AppState,
    id: &str,
    step: Result<Option<TransformRecord>>,
) -> (StatusCode, Json<serde_json::Value>) {
    let entry = match step {
        Ok(entry) => entry,
        Err(e) => return error_response(&e),
    };
    let current = match state.sessions.current(id) {
        Ok(current) => current,
        Err(e) => return error_response(&e),
    };

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "entry": entry,
            "current": current,
            "session": state.sessions.get_session(id),
        })),
    )
}
