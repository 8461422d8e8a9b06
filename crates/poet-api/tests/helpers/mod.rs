//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p poet-api`.

#![allow(dead_code)]

use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use object_store::memory::InMemory;
use poet_api::constants;
use poet_api::setup::routes;
use poet_api::{AppState, InMemoryUploadRepository};
use poet_core::Config;
use poet_storage::{S3Storage, UploadStorageManager};
use std::collections::HashMap;
use std::sync::Arc;
use tempfile::TempDir;
use uuid::Uuid;

pub const TEST_JWT_SECRET: &str = "integration-test-secret-0123456789abcdef";
pub const TEST_PUBLIC_HOST: &str = "https://cdn.example.com";
pub const TEST_BUCKET: &str = "poet-uploads";

/// Minimal valid 1x1 PNG bytes.
pub fn create_minimal_png() -> Vec<u8> {
    vec![
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
        0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x02, 0x00, 0x00, 0x00, 0x90,
        0x77, 0x53, 0xDE, 0x00, 0x00, 0x00, 0x0C, 0x49, 0x44, 0x41, 0x54, 0x08, 0xD7, 0x63, 0xF8,
        0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x18, 0xDD, 0x8D, 0x89, 0x00, 0x00, 0x00,
        0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
    ]
}

/// API path prefix for tests (e.g. `/api/v1/uploads`).
pub fn api_path(path: &str) -> String {
    format!("{}{}", constants::API_PREFIX, path)
}

/// Test application: server, state, and owned resources.
pub struct TestApp {
    pub server: TestServer,
    pub state: Arc<AppState>,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn uploads_dir(&self) -> &std::path::Path {
        self._temp_dir.path()
    }

    /// Bearer header value for `user_id`.
    pub fn bearer(&self, user_id: Uuid) -> String {
        let jwt = self.state.jwt.as_ref().expect("JWT configured for tests");
        format!("Bearer {}", jwt.issue_token(user_id).expect("issue token"))
    }
}

fn test_config(temp_dir: &TempDir, overrides: &[(&str, &str)]) -> Config {
    let mut vars: HashMap<String, String> = HashMap::new();
    vars.insert("ENVIRONMENT".into(), "test".into());
    vars.insert("STORAGE_BACKEND".into(), "local".into());
    vars.insert("UPLOADS_DIR".into(), temp_dir.path().display().to_string());
    vars.insert("JWT_SECRET".into(), TEST_JWT_SECRET.into());
    for (key, value) in overrides {
        vars.insert(key.to_string(), value.to_string());
    }

    Config::from_lookup(move |key| vars.get(key).cloned()).expect("valid test config")
}

fn build(state: Arc<AppState>, temp_dir: TempDir) -> TestApp {
    let router = routes::setup_routes(state.clone()).expect("routes");
    let server = TestServer::new(router.into_make_service()).expect("Failed to create test server");
    TestApp {
        server,
        state,
        _temp_dir: temp_dir,
    }
}

/// App writing uploads to a temporary directory.
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(&[]).await
}

pub async fn setup_test_app_with(overrides: &[(&str, &str)]) -> TestApp {
    let temp_dir = TempDir::new().expect("temp dir");
    let config = test_config(&temp_dir, overrides);

    let uploads = poet_storage::create_manager(&config.storage)
        .await
        .expect("local storage");
    let state = Arc::new(AppState::new(
        config,
        uploads,
        Arc::new(InMemoryUploadRepository::new()),
    ));

    build(state, temp_dir)
}

/// App writing uploads to an in-memory object store behind the S3 backend.
pub async fn setup_remote_test_app() -> TestApp {
    let temp_dir = TempDir::new().expect("temp dir");
    let config = test_config(&temp_dir, &[]);

    let remote = S3Storage::with_store(
        Arc::new(InMemory::new()),
        TEST_BUCKET.to_string(),
        "us-east-1".to_string(),
        Some(TEST_PUBLIC_HOST.to_string()),
    );
    let uploads = UploadStorageManager::new(Arc::new(remote));
    let state = Arc::new(AppState::new(
        config,
        uploads,
        Arc::new(InMemoryUploadRepository::new()),
    ));

    build(state, temp_dir)
}

/// Multipart form with a single `file` part.
pub fn file_form(filename: &str, data: Vec<u8>) -> MultipartForm {
    let part = Part::bytes(bytes::Bytes::from(data))
        .file_name(filename.to_string())
        .mime_type("image/png");
    MultipartForm::new().add_part("file", part)
}

/// Upload `filename` and return the new upload's id.
pub async fn upload(app: &TestApp, filename: &str, auth: Option<&str>) -> String {
    let mut request = app
        .client()
        .post(&api_path("/uploads"))
        .multipart(file_form(filename, create_minimal_png()));
    if let Some(auth) = auth {
        request = request.add_header("Authorization", auth.to_string());
    }

    let response = request.await;
    assert_eq!(response.status_code(), 200, "{}", response.text());
    let body: serde_json::Value = response.json();
    body["data"]["id"].as_str().expect("upload id").to_string()
}

/// Files currently in the local uploads directory.
pub fn stored_files(app: &TestApp) -> Vec<String> {
    std::fs::read_dir(app.uploads_dir())
        .expect("read uploads dir")
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect()
}
