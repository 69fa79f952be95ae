//! Session lifecycle integration tests: allocate, ingest, finalize.
//!
//! Run with: `cargo test -p reeldrop-api --test sessions_test`

mod helpers;

use helpers::{api_path, ingest_chunk, setup_test_app, setup_test_app_with, start_session};
use serde_json::{json, Value};
use std::collections::HashSet;

#[tokio::test]
async fn test_start_session_returns_token() {
    let app = setup_test_app();
    let response = app.client().get(&api_path("/sessions/start")).await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["ok"], true);
    let session_id = body["sessionId"].as_str().unwrap();
    assert!(uuid::Uuid::parse_str(session_id).is_ok());
    assert_eq!(app.storage.puts(), 0);
}

#[tokio::test]
async fn test_start_session_tokens_are_distinct() {
    let app = setup_test_app();
    let mut seen = HashSet::new();
    for _ in 0..50 {
        assert!(seen.insert(start_session(app.client()).await));
    }
}

#[tokio::test]
async fn test_degraded_source_tokens() {
    let app = setup_test_app_with(&[("SESSION_ID_SOURCE", "degraded")]);
    let session_id = start_session(app.client()).await;
    assert!(session_id.starts_with("sess_"));
}

#[tokio::test]
async fn test_start_session_rejects_other_methods() {
    let app = setup_test_app();
    let response = app.client().post(&api_path("/sessions/start")).await;

    assert_eq!(response.status_code(), 405);
    let body: Value = response.json();
    assert_eq!(body["ok"], false);
    assert_eq!(body["code"], "METHOD_NOT_ALLOWED");
    assert_eq!(body["error"], "Method Not Allowed: POST");
}

#[tokio::test]
async fn test_end_to_end_upload_and_finalize() {
    let app = setup_test_app();
    let client = app.client();
    let session_id = start_session(client).await;

    let first = ingest_chunk(client, &session_id, "0", b"b0").await;
    assert_eq!(first.status_code(), 200);
    let second = ingest_chunk(client, &session_id, "1", b"b1").await;
    assert_eq!(second.status_code(), 200);

    let second_body: Value = second.json();
    assert_eq!(
        second_body["key"],
        format!("sessions/{}/chunks/000001.webm", session_id)
    );

    let finalize = client
        .post(&api_path("/sessions/finalize"))
        .json(&json!({ "sessionId": session_id }))
        .await;
    assert_eq!(finalize.status_code(), 200);
    let body: Value = finalize.json();
    let prefix = format!("sessions/{}/chunks/", session_id);
    assert_eq!(body["ok"], true);
    assert_eq!(body["prefix"], prefix.as_str());
    assert_eq!(body["message"], "Finalized (chunks are stored).");

    assert_eq!(
        app.storage.keys(),
        vec![
            format!("{}000000.webm", prefix),
            format!("{}000001.webm", prefix)
        ]
    );
    let b0 = app.storage.object(&format!("{}000000.webm", prefix)).unwrap();
    let b1 = app.storage.object(&format!("{}000001.webm", prefix)).unwrap();
    assert_eq!(b0.data.as_ref(), b"b0");
    assert_eq!(b1.data.as_ref(), b"b1");
    assert_eq!(b0.content_type, "video/webm");
    assert_eq!(app.storage.puts(), 2);
}

#[tokio::test]
async fn test_finalize_without_chunks_succeeds() {
    let app = setup_test_app();
    let session_id = start_session(app.client()).await;

    let response = app
        .client()
        .post(&api_path("/sessions/finalize"))
        .json(&json!({ "sessionId": session_id }))
        .await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["prefix"], format!("sessions/{}/chunks/", session_id));
    assert_eq!(app.storage.puts(), 0);
    assert_eq!(app.storage.signs(), 0);
}

#[tokio::test]
async fn test_finalize_requires_session_id() {
    let app = setup_test_app();
    let client = app.client();

    for body in [json!({}), json!({ "sessionId": "" }), json!({ "sessionId": null })] {
        let response = client.post(&api_path("/sessions/finalize")).json(&body).await;
        assert_eq!(response.status_code(), 400);
        let body: Value = response.json();
        assert_eq!(body["code"], "MISSING_PARAMETER");
    }

    let response = client
        .post(&api_path("/sessions/finalize"))
        .text("not json")
        .await;
    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["code"], "MISSING_PARAMETER");

    assert_eq!(app.storage.puts(), 0);
    assert_eq!(app.storage.signs(), 0);
}

#[tokio::test]
async fn test_finalize_rejects_traversal_session_id() {
    let app = setup_test_app();
    let response = app
        .client()
        .post(&api_path("/sessions/finalize"))
        .json(&json!({ "sessionId": "../other" }))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["code"], "INVALID_ARGUMENT");
}

#[tokio::test]
async fn test_finalize_rejects_get() {
    let app = setup_test_app();
    let response = app.client().get(&api_path("/sessions/finalize")).await;
    assert_eq!(response.status_code(), 405);
}

#[tokio::test]
async fn test_health_and_openapi() {
    let app = setup_test_app();

    let health = app.client().get("/health").await;
    assert_eq!(health.status_code(), 200);
    let body: Value = health.json();
    assert_eq!(body["status"], "alive");

    let spec = app.client().get("/api/openapi.json").await;
    assert_eq!(spec.status_code(), 200);
    let body: Value = spec.json();
    assert!(body["paths"].get("/api/v0/chunks").is_some());
}

#[tokio::test]
async fn test_responses_carry_request_id_and_no_store() {
    let app = setup_test_app();

    let response = app
        .client()
        .get(&api_path("/sessions/start"))
        .add_header("X-Request-ID", "trace-123")
        .await;

    let headers = response.headers();
    assert_eq!(headers.get("x-request-id").unwrap(), "trace-123");
    assert_eq!(headers.get("cache-control").unwrap(), "no-store, private");
    assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
}
