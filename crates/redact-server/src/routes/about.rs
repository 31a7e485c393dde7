//! Tool description.

use std::sync::Arc;

use axum::routing::get;
use axum::{Json, Router};
use redact_protocol::ProtectionMethod;

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/about", get(about))
}

async fn about() -> Json<serde_json::Value> {
    let methods: Vec<&str> = [
        ProtectionMethod::Redaction,
        ProtectionMethod::Masking,
        ProtectionMethod::Anonymization,
    ]
    .iter()
    .map(ProtectionMethod::display_name)
    .collect();

    Json(serde_json::json!({
        "name": "RE-DACT",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Protects sensitive information in text by redacting, masking or anonymizing named entities, email addresses and custom words.",
        "methods": methods,
        "redactionLevels": ["High", "Medium", "Low"],
        "features": [
            "Entity detection for people, organizations, places and dates",
            "Email address detection",
            "Custom word protection",
            "File upload support (.txt, .csv)",
            "Three redaction levels",
            "Entity analysis",
            "Download history with retention cleanup",
            "Per-session undo and redo",
        ],
    }))
}
