//! Protection and entity-type routes.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use redact_core::{Error, Result};
use redact_protocol::engine::MISSING_TEXT_MESSAGE;
use redact_protocol::{
    parse_custom_words, read_upload, ProtectionMethod, ProtectionRequest, RedactionLevel,
    TransformRecord,
};
use redact_store::sanitize_filename;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{info, warn};

use super::error_response;
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/entity-types", get(entity_types))
        .route("/protect", post(protect))
        .route("/protect/upload", post(protect_upload))
}

/// Custom words arrive either as a list or as one comma-separated string.
#[derive(Deserialize)]
#[serde(untagged)]
enum CustomWords {
    List(Vec<String>),
    Csv(String),
}

impl CustomWords {
    fn into_words(self) -> Vec<String> {
        match self {
            CustomWords::List(words) => words,
            CustomWords::Csv(raw) => parse_custom_words(&raw),
        }
    }
}

#[derive(Deserialize)]
struct ProtectBody {
    text: String,
    /// Absent means the configured defaults; an explicit empty list means none.
    #[serde(rename = "entityTypes")]
    entity_types: Option<Vec<String>>,
    #[serde(rename = "customWords")]
    custom_words: Option<CustomWords>,
    method: ProtectionMethod,
    #[serde(default, rename = "redactionLevel")]
    redaction_level: RedactionLevel,
    #[serde(rename = "sessionId")]
    session_id: Option<String>,
}

/// GET /api/entity-types: selectable labels and the default selection.
async fn entity_types(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "entityTypes": state.service.available_entity_types(),
        "defaults": state.config.default_entity_types,
    }))
}

/// POST /api/protect: rewrite text, store the result and record it.
async fn protect(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ProtectBody>,
) -> impl IntoResponse {
    let entity_types = body
        .entity_types
        .unwrap_or_else(|| state.config.default_entity_types.clone());
    let custom_words = body
        .custom_words
        .map(CustomWords::into_words)
        .unwrap_or_default();

    let request = ProtectionRequest::new(body.text, body.method)
        .with_entity_types(&entity_types)
        .with_custom_words(&custom_words)
        .with_redaction_level(body.redaction_level);

    run_protection(&state, &request, body.session_id.as_deref())
}

/// POST /api/protect/upload: protect the text of an uploaded `.txt`/`.csv`
/// file (multipart field `file`). Other form fields mirror `/protect`, with
/// `entityTypes` and `customWords` given as comma-separated strings.
async fn protect_upload(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let mut upload: Option<(String, Vec<u8>)> = None;
    let mut fields: HashMap<String, String> = HashMap::new();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return error_response(&Error::Validation(format!("Malformed upload: {}", e))),
        };
        let name = field.name().unwrap_or_default().to_string();

        if name == "file" {
            let filename = sanitize_filename(field.file_name().unwrap_or_default());
            match field.bytes().await {
                Ok(bytes) => upload = Some((filename, bytes.to_vec())),
                Err(e) => {
                    return error_response(&Error::Validation(format!("Read failed: {}", e)))
                }
            }
        } else {
            match field.text().await {
                Ok(value) => {
                    fields.insert(name, value);
                }
                Err(e) => {
                    return error_response(&Error::Validation(format!("Read failed: {}", e)))
                }
            }
        }
    }

    let Some((filename, bytes)) = upload else {
        return error_response(&Error::Validation(MISSING_TEXT_MESSAGE.to_string()));
    };
    let request = match upload_request(&state, &filename, &bytes, &fields) {
        Ok(request) => request,
        Err(e) => return error_response(&e),
    };
    info!("Protecting uploaded file {} ({} bytes)", filename, bytes.len());

    let session_id = fields
        .get("sessionId")
        .map(|s| s.trim())
        .filter(|s| !s.is_empty());
    let (status, Json(mut response)) = run_protection(&state, &request, session_id);
    if status == StatusCode::OK {
        response["source"] = serde_json::json!(filename);
    }
    (status, Json(response))
}

fn upload_request(
    state: &AppState,
    filename: &str,
    bytes: &[u8],
    fields: &HashMap<String, String>,
) -> Result<ProtectionRequest> {
    let text = read_upload(filename, bytes)?;

    let method: ProtectionMethod = match fields.get("method") {
        Some(raw) => form_value(raw, "protection method")?,
        None => return Err(Error::Validation("Missing protection method.".to_string())),
    };
    let level: RedactionLevel = match fields.get("redactionLevel") {
        Some(raw) => form_value(raw, "redaction level")?,
        None => RedactionLevel::default(),
    };
    let entity_types = fields
        .get("entityTypes")
        .map(|raw| parse_custom_words(raw))
        .unwrap_or_else(|| state.config.default_entity_types.clone());
    let custom_words = fields
        .get("customWords")
        .map(|raw| parse_custom_words(raw))
        .unwrap_or_default();

    Ok(ProtectionRequest::new(text, method)
        .with_entity_types(&entity_types)
        .with_custom_words(&custom_words)
        .with_redaction_level(level))
}

/// Parse a form string with the same names the JSON body accepts.
fn form_value<T: DeserializeOwned>(raw: &str, what: &str) -> Result<T> {
    serde_json::from_value(serde_json::Value::String(raw.trim().to_string()))
        .map_err(|_| Error::Validation(format!("Unknown {}: {}", what, raw.trim())))
}

/// Validate, rewrite, save, record and respond. Shared by both protect routes.
fn run_protection(
    state: &AppState,
    request: &ProtectionRequest,
    session_id: Option<&str>,
) -> (StatusCode, Json<serde_json::Value>) {
    let outcome = match state.service.protect(request) {
        Ok(outcome) => outcome,
        Err(e) => return error_response(&e),
    };

    let filename = request.method.output_filename(&chrono::Local::now());
    let mut warnings: Vec<String> = Vec::new();

    if let Err(e) = state.files.save(&filename, &outcome.text) {
        warn!("Failed to save {}: {}", filename, e);
        warnings.push(format!("Output file could not be saved: {}", e));
    }
    if let Err(e) = state.history.record(&filename) {
        warn!("Error saving download history: {}", e);
        warnings.push(format!("Download history could not be updated: {}", e));
    }

    if let Some(session_id) = session_id {
        let record = TransformRecord::new(request.method, request.text.as_str(), outcome.text.as_str())
            .with_filename(filename.as_str());
        if let Err(e) = state.sessions.record(session_id, record) {
            warn!("Transformation not added to session history: {}", e);
            warnings.push(e.to_string());
        }
    }

    state.spawn_sweep();

    let mut response = serde_json::json!({
        "text": outcome.text,
        "method": outcome.method,
        "filename": filename,
        "applied": outcome.applied,
        "dropped": outcome.dropped,
        "warnings": warnings,
    });
    if outcome.method == ProtectionMethod::Redaction {
        response["audit"] = serde_json::json!(outcome.audit);
    }

    (StatusCode::OK, Json(response))
}
