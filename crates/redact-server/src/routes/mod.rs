//! HTTP route handlers.

pub mod about;
pub mod analyze;
pub mod downloads;
pub mod protect;
pub mod sessions;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::{Json, Router};
use redact_core::Error;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the main Axum router with all routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/api", api_routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(protect::routes())
        .merge(analyze::routes())
        .merge(downloads::routes())
        .merge(sessions::routes())
        .merge(about::routes())
}

/// Map a library error onto a status code and `{ "error": ... }` body.
pub(crate) fn error_response(err: &Error) -> (StatusCode, Json<serde_json::Value>) {
    let status = match err {
        Error::Validation(_) => StatusCode::BAD_REQUEST,
        Error::NotFound(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if !err.is_user_error() {
        tracing::error!("Request failed: {}", err);
    }
    (status, Json(serde_json::json!({ "error": err.to_string() })))
}
