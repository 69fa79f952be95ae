//! Test helpers: build the real router over a recording storage for integration tests.
//!
//! Run from workspace root: `cargo test -p reeldrop-api`.

// Each test binary uses a different subset of these helpers.
#![allow(dead_code)]

pub mod storage;

use axum_test::{TestResponse, TestServer};
use bytes::Bytes;
use reeldrop_api::constants;
use reeldrop_api::setup::routes;
use reeldrop_api::state::AppState;
use reeldrop_core::Config;
use std::collections::HashMap;
use std::sync::Arc;

pub use storage::RecordingStorage;

pub const BOUNDARY: &str = "reeldrop-test-boundary";

/// API path prefix for tests (e.g. `/api/v0/chunks`).
pub fn api_path(path: &str) -> String {
    constants::api_path(path)
}

/// Test application: server plus the storage it writes to.
pub struct TestApp {
    pub server: TestServer,
    pub storage: Arc<RecordingStorage>,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

/// Config with a local backend path (never touched) and a forced secure id source.
pub fn test_config(overrides: &[(&str, &str)]) -> Config {
    let mut vars: HashMap<String, String> = [
        ("STORAGE_BACKEND", "local"),
        ("LOCAL_STORAGE_PATH", "/tmp/reeldrop-test-unused"),
        ("SESSION_ID_SOURCE", "secure"),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
    for (k, v) in overrides {
        vars.insert(k.to_string(), v.to_string());
    }
    Config::from_lookup(move |name| vars.get(name).cloned()).expect("Invalid test config")
}

pub fn setup_test_app() -> TestApp {
    setup_test_app_with(&[])
}

pub fn setup_test_app_with(overrides: &[(&str, &str)]) -> TestApp {
    let config = test_config(overrides);
    let storage = Arc::new(RecordingStorage::default());
    let state = Arc::new(AppState::from_config(&config, storage.clone()));

    let app = routes::setup_routes(&config, state).expect("Failed to setup routes");
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp { server, storage }
}

/// One part of a hand-built multipart body.
pub enum Part<'a> {
    Text(&'a str, &'a str),
    File {
        name: &'a str,
        filename: Option<&'a str>,
        content_type: Option<&'a str>,
        data: &'a [u8],
    },
}

impl<'a> Part<'a> {
    /// A `file` part named `chunk.webm` with the given bytes and no declared type.
    pub fn chunk(data: &'a [u8]) -> Self {
        Part::File {
            name: "file",
            filename: Some("chunk.webm"),
            content_type: None,
            data,
        }
    }
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={}", BOUNDARY)
}

pub fn multipart_body(parts: &[Part<'_>]) -> Bytes {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name)
                        .as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File {
                name,
                filename,
                content_type,
                data,
            } => {
                let mut disposition = format!("Content-Disposition: form-data; name=\"{}\"", name);
                if let Some(filename) = filename {
                    disposition.push_str(&format!("; filename=\"{}\"", filename));
                }
                body.extend_from_slice(disposition.as_bytes());
                body.extend_from_slice(b"\r\n");
                if let Some(ct) = content_type {
                    body.extend_from_slice(format!("Content-Type: {}\r\n", ct).as_bytes());
                }
                body.extend_from_slice(b"\r\n");
                body.extend_from_slice(data);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    Bytes::from(body)
}

/// POST a multipart body to the ingest route.
pub async fn post_chunk_form(server: &TestServer, parts: &[Part<'_>]) -> TestResponse {
    server
        .post(&api_path("/chunks"))
        .content_type(&multipart_content_type())
        .bytes(multipart_body(parts))
        .await
}

/// Ingest one chunk the way a recorder would.
pub async fn ingest_chunk(server: &TestServer, session_id: &str, idx: &str, data: &[u8]) -> TestResponse {
    post_chunk_form(
        server,
        &[
            Part::Text("sessionId", session_id),
            Part::Text("idx", idx),
            Part::chunk(data),
        ],
    )
    .await
}

/// Allocate a session and return its id.
pub async fn start_session(server: &TestServer) -> String {
    let response = server.get(&api_path("/sessions/start")).await;
    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    body["sessionId"]
        .as_str()
        .expect("sessionId missing")
        .to_string()
}
