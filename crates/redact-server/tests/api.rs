//! Route tests: drive the router in-process with `oneshot` and check
//! response shapes and side effects on the data directory.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use redact_core::config::DEFAULT_PORT;
use redact_core::RedactConfig;
use redact_infer::HeuristicRecognizer;
use redact_server::{build_router, AppState};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

const SCENARIO: &str = "John Doe works at ACME Corp, email john@acme.com";

fn test_app() -> (Router, Arc<AppState>, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let config = RedactConfig::new(dir.path(), DEFAULT_PORT, 30).unwrap();
    let state = Arc::new(AppState::new(config, Arc::new(HeuristicRecognizer::new())).unwrap());
    (build_router(state.clone()), state, dir)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (status, _, bytes) = send_raw(app, method, uri, body).await;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn send_raw(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, headers, bytes.to_vec())
}

#[tokio::test]
async fn test_entity_types() {
    let (app, _state, _dir) = test_app();
    let (status, body) = send(&app, "GET", "/api/entity-types", None).await;

    assert_eq!(status, StatusCode::OK);
    let types: Vec<&str> = body["entityTypes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert!(types.contains(&"PERSON"));
    assert!(types.contains(&"EMAIL"));
    assert_eq!(body["defaults"], json!(["PERSON", "ORG", "GPE", "DATE", "EMAIL"]));
}

#[tokio::test]
async fn test_protect_masking_saves_and_records() {
    let (app, state, _dir) = test_app();
    let (status, body) = send(
        &app,
        "POST",
        "/api/protect",
        Some(json!({
            "text": SCENARIO,
            "entityTypes": ["PERSON", "ORG", "EMAIL"],
            "method": "Data Masking",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let text = body["text"].as_str().unwrap();
    assert!(text.starts_with("John Doe works at ACME Corporation, email user"));
    assert!(text.ends_with("@example.com"));
    assert_eq!(body["method"], "masking");
    assert!(body.get("audit").is_none());
    assert_eq!(body["warnings"], json!([]));

    let filename = body["filename"].as_str().unwrap();
    assert!(filename.starts_with("data_masking_"));
    assert!(filename.ends_with(".txt"));
    assert_eq!(state.files.load(filename).unwrap(), text);

    let history = state.history.list_all();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].filename, filename);
}

#[tokio::test]
async fn test_protect_redaction_includes_audit() {
    let (app, _state, _dir) = test_app();
    let (status, body) = send(
        &app,
        "POST",
        "/api/protect",
        Some(json!({
            "text": "Reach me at john@acme.com today",
            "entityTypes": ["EMAIL"],
            "method": "redaction",
            "redactionLevel": "High",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["text"], "Reach me at [Redacted] today");
    assert_eq!(body["applied"], 1);
    assert_eq!(body["audit"][0]["label"], "EMAIL");
    assert_eq!(body["audit"][0]["replacement"], "[Redacted]");
}

#[tokio::test]
async fn test_protect_custom_words_as_string() {
    let (app, _state, _dir) = test_app();
    let (status, body) = send(
        &app,
        "POST",
        "/api/protect",
        Some(json!({
            "text": "Project Falcon and project falcon",
            "entityTypes": [],
            "customWords": " falcon , ",
            "method": "redaction",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["text"],
        "Project [REDACTED CUSTOM] and project [REDACTED CUSTOM]"
    );
}

#[tokio::test]
async fn test_protect_validation_errors() {
    let (app, state, _dir) = test_app();

    let (status, body) = send(
        &app,
        "POST",
        "/api/protect",
        Some(json!({ "text": "Type Here", "method": "masking" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Please enter some text to protect or upload a file.");

    let (status, body) = send(
        &app,
        "POST",
        "/api/protect",
        Some(json!({ "text": "hello", "entityTypes": [], "customWords": [], "method": "masking" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "Please select at least one entity type to protect or enter custom words."
    );

    let (status, body) = send(
        &app,
        "POST",
        "/api/protect",
        Some(json!({ "text": "hello", "entityTypes": [" ", ""], "method": "masking" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "Please select at least one entity type to protect or enter custom words."
    );

    assert!(state.history.list_all().is_empty());
    assert!(std::fs::read_dir(state.files.dir()).unwrap().next().is_none());
}

const BOUNDARY: &str = "redact-test-boundary";

/// A multipart body with text fields plus one `file` field.
fn multipart_body(fields: &[(&str, &str)], filename: &str, content: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(
        format!(
            "--{}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
            BOUNDARY, filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

async fn upload(app: &Router, body: Vec<u8>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/api/protect/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_protect_upload_text_file() {
    let (app, state, _dir) = test_app();
    let body = multipart_body(
        &[
            ("method", "Data Redaction"),
            ("entityTypes", "EMAIL"),
            ("customWords", "falcon"),
            ("redactionLevel", "High"),
        ],
        "notes.txt",
        "Falcon report for john@acme.com".as_bytes(),
    );
    let (status, body) = upload(&app, body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["text"], "[REDACTED CUSTOM] report for [Redacted]");
    assert_eq!(body["source"], "notes.txt");
    assert_eq!(body["applied"], 2);

    let filename = body["filename"].as_str().unwrap();
    assert!(filename.starts_with("data_redaction_"));
    assert_eq!(state.history.list_all().len(), 1);
}

#[tokio::test]
async fn test_protect_upload_rejects_bad_files() {
    let (app, state, _dir) = test_app();

    let (status, body) = upload(
        &app,
        multipart_body(&[("method", "masking")], "scan.pdf", b"%PDF-1.4"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("Unsupported file type"));

    let (status, body) = upload(
        &app,
        multipart_body(&[("method", "masking")], "data.csv", &[0x61, 0xff, 0xfe, 0x62]),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("not valid UTF-8"));

    let (status, body) = upload(
        &app,
        multipart_body(&[("method", "shredding")], "notes.txt", b"John Doe"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("Unknown protection method"));

    assert!(state.history.list_all().is_empty());
}

#[tokio::test]
async fn test_protect_unknown_session_is_a_warning() {
    let (app, _state, _dir) = test_app();
    let (status, body) = send(
        &app,
        "POST",
        "/api/protect",
        Some(json!({
            "text": "mail a@b.io",
            "method": "anonymization",
            "sessionId": "missing",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["warnings"].as_array().unwrap().len(), 1);
    assert!(body["text"].as_str().unwrap().ends_with("@anon.com"));
}

#[tokio::test]
async fn test_analyze() {
    let (app, _state, _dir) = test_app();
    let (status, body) = send(
        &app,
        "POST",
        "/api/analyze",
        Some(json!({ "text": SCENARIO })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["counts"]["EMAIL"], 1);
    assert_eq!(body["counts"]["PERSON"], 1);
    assert_eq!(body["counts"]["ORG"], 1);

    let (status, body) = send(&app, "POST", "/api/analyze", Some(json!({ "text": "  " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Please enter some text to analyze.");
}

#[tokio::test]
async fn test_downloads_list_and_fetch() {
    let (app, state, _dir) = test_app();
    let (_, body) = send(
        &app,
        "POST",
        "/api/protect",
        Some(json!({ "text": SCENARIO, "method": "redaction", "redactionLevel": "High" })),
    )
    .await;
    let filename = body["filename"].as_str().unwrap().to_string();
    let protected = body["text"].as_str().unwrap().to_string();

    let (status, list) = send(&app, "GET", "/api/downloads", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["count"], 1);
    assert_eq!(list["history"][0]["filename"], filename.as_str());
    assert_eq!(list["history"][0]["available"], true);

    let (status, headers, bytes) =
        send_raw(&app, "GET", &format!("/api/downloads/{}", filename), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(String::from_utf8(bytes).unwrap(), protected);
    let disposition = headers[header::CONTENT_DISPOSITION].to_str().unwrap();
    assert!(disposition.starts_with("attachment"));
    assert!(disposition.contains(&filename));

    std::fs::remove_file(state.files.path_for(&filename)).unwrap();
    let (_, list) = send(&app, "GET", "/api/downloads", None).await;
    assert_eq!(list["history"][0]["available"], false);

    let (status, body) = send(&app, "GET", &format!("/api/downloads/{}", filename), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_session_undo_redo() {
    let (app, _state, _dir) = test_app();
    let (status, session) = send(&app, "POST", "/api/sessions", None).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = session["id"].as_str().unwrap().to_string();

    for text in ["first secret", "second secret"] {
        let (status, body) = send(
            &app,
            "POST",
            "/api/protect",
            Some(json!({
                "text": text,
                "entityTypes": [],
                "customWords": ["secret"],
                "method": "redaction",
                "sessionId": id,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["warnings"], json!([]));
    }

    let (status, body) = send(&app, "POST", &format!("/api/sessions/{}/undo", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["entry"]["input"], "second secret");
    assert_eq!(body["current"]["input"], "first secret");
    assert_eq!(body["session"]["canRedo"], true);

    let (_, body) = send(&app, "POST", &format!("/api/sessions/{}/redo", id), None).await;
    assert_eq!(body["entry"]["output"], "second [REDACTED CUSTOM]");
    assert_eq!(body["current"]["input"], "second secret");
    assert_eq!(body["session"]["canRedo"], false);

    let (_, body) = send(&app, "POST", &format!("/api/sessions/{}/redo", id), None).await;
    assert!(body["entry"].is_null());

    let (status, _) = send(&app, "DELETE", &format!("/api/sessions/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = send(&app, "POST", &format!("/api/sessions/{}/undo", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_about() {
    let (app, _state, _dir) = test_app();
    let (status, body) = send(&app, "GET", "/api/about", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["methods"],
        json!(["Data Redaction", "Data Masking", "Data Anonymization"])
    );
    assert!(body["features"].as_array().unwrap().len() > 3);
}

#[tokio::test]
async fn test_sweep_keeps_fresh_files() {
    let (_app, state, _dir) = test_app();
    state.files.save("fresh.txt", "x").unwrap();
    assert_eq!(state.spawn_sweep().await.unwrap(), 0);
    assert!(state.files.exists("fresh.txt"));
}
