//! Uploads resource integration tests.
//!
//! Run with: `cargo test -p poet-api --test uploads_test`

mod helpers;

use axum_test::multipart::{MultipartForm, Part};
use helpers::{
    api_path, create_minimal_png, file_form, setup_remote_test_app, setup_test_app,
    setup_test_app_with, stored_files, upload, TEST_BUCKET, TEST_PUBLIC_HOST,
};
use uuid::Uuid;

fn error_code(response: &axum_test::TestResponse) -> String {
    let body: serde_json::Value = response.json();
    body["error_code"].as_str().unwrap_or_default().to_string()
}

#[tokio::test]
async fn test_upload_then_fetch_metadata_and_file() {
    let app = setup_test_app().await;
    let client = app.client();

    let id = upload(&app, "photo.png", None).await;

    let response = client.get(&api_path(&format!("/uploads/{}", id))).await;
    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["data"]["filename"], "photo.png");
    assert!(body["data"].get("owner").is_none());
    assert!(body["data"].get("location").is_none());

    let response = client.get(&api_path(&format!("/uploads/{}/file", id))).await;
    assert_eq!(response.status_code(), 200);
    assert_eq!(response.as_bytes().as_ref(), create_minimal_png().as_slice());
    let disposition = response.header("content-disposition");
    assert_eq!(
        disposition.to_str().unwrap(),
        "attachment; filename=\"photo.png\""
    );
    assert_eq!(response.header("content-type").to_str().unwrap(), "image/png");

    let files = stored_files(&app);
    assert_eq!(files.len(), 1);
    assert!(files[0].ends_with("_photo.png"));
}

#[tokio::test]
async fn test_authenticated_upload_records_owner() {
    let app = setup_test_app().await;
    let user_id = Uuid::new_v4();
    let auth = app.bearer(user_id);

    let response = app
        .client()
        .post(&api_path("/uploads"))
        .add_header("Authorization", auth)
        .multipart(file_form("cat.gif", create_minimal_png()))
        .await;

    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["data"]["owner"], user_id.to_string());
}

#[tokio::test]
async fn test_upload_without_file_field() {
    let app = setup_test_app().await;

    let form = MultipartForm::new().add_text("caption", "no file here");
    let response = app
        .client()
        .post(&api_path("/uploads"))
        .multipart(form)
        .await;
    assert_eq!(response.status_code(), 400);
    assert_eq!(error_code(&response), "file-not-sent");

    let response = app.client().post(&api_path("/uploads")).await;
    assert_eq!(response.status_code(), 400);
    assert_eq!(error_code(&response), "file-not-sent");
}

#[tokio::test]
async fn test_upload_without_filename() {
    let app = setup_test_app().await;

    let part = Part::bytes(bytes::Bytes::from(create_minimal_png())).file_name("");
    let response = app
        .client()
        .post(&api_path("/uploads"))
        .multipart(MultipartForm::new().add_part("file", part))
        .await;

    assert_eq!(response.status_code(), 400);
    assert_eq!(error_code(&response), "file-name-required");
}

#[tokio::test]
async fn test_upload_rejects_disallowed_extension() {
    let app = setup_test_app().await;

    for name in ["notes.txt", "script.PNG.exe", "noextension"] {
        let response = app
            .client()
            .post(&api_path("/uploads"))
            .multipart(file_form(name, b"data".to_vec()))
            .await;
        assert_eq!(response.status_code(), 415, "{}", name);
        assert_eq!(error_code(&response), "image-type-not-supported");
    }

    assert!(stored_files(&app).is_empty());
}

#[tokio::test]
async fn test_upload_accepts_uppercase_extension() {
    let app = setup_test_app().await;
    upload(&app, "HOLIDAY.JPG", None).await;
}

#[tokio::test]
async fn test_upload_rejects_empty_file() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post(&api_path("/uploads"))
        .multipart(file_form("photo.png", Vec::new()))
        .await;

    assert_eq!(response.status_code(), 422);
    assert_eq!(error_code(&response), "file-required");
    assert!(stored_files(&app).is_empty());
}

#[tokio::test]
async fn test_upload_sanitizes_filename() {
    let app = setup_test_app().await;

    let id = upload(&app, "../../my summer pic.png", None).await;

    let response = app.client().get(&api_path(&format!("/uploads/{}", id))).await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["data"]["filename"], "my_summer_pic.png");
    assert!(stored_files(&app)[0].ends_with("_my_summer_pic.png"));
}

#[tokio::test]
async fn test_upload_over_size_limit() {
    let app = setup_test_app_with(&[("MAX_CONTENT_LENGTH_MB", "1")]).await;

    let response = app
        .client()
        .post(&api_path("/uploads"))
        .multipart(file_form("huge.png", vec![7u8; 2 * 1024 * 1024]))
        .await;

    assert_eq!(response.status_code(), 413);
    assert!(stored_files(&app).is_empty());
}

#[tokio::test]
async fn test_find_unknown_or_malformed_id() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .get(&api_path(&format!("/uploads/{}", Uuid::new_v4())))
        .await;
    assert_eq!(response.status_code(), 404);
    assert_eq!(error_code(&response), "resource-not-found");

    let response = app.client().get(&api_path("/uploads/not-a-uuid")).await;
    assert_eq!(response.status_code(), 404);
    assert_eq!(error_code(&response), "resource-not-found");
}

#[tokio::test]
async fn test_file_missing_from_storage() {
    let app = setup_test_app().await;
    let id = upload(&app, "photo.png", None).await;

    let keys = stored_files(&app);
    for name in &keys {
        std::fs::remove_file(app.uploads_dir().join(name)).unwrap();
    }

    let response = app
        .client()
        .get(&api_path(&format!("/uploads/{}/file", id)))
        .await;
    assert_eq!(response.status_code(), 404);
    assert_eq!(error_code(&response), "file-not-found");

    // Storage keys never reach clients, details included
    let body = response.text();
    let key_id = keys[0].split('_').next().unwrap();
    assert!(!body.contains(&keys[0]), "{}", body);
    assert!(!body.contains(key_id), "{}", body);
}

#[tokio::test]
async fn test_error_details_outside_production() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .get(&api_path(&format!("/uploads/{}", Uuid::new_v4())))
        .await;
    assert_eq!(response.status_code(), 404);
    let body: serde_json::Value = response.json();
    assert!(body["details"].as_str().unwrap().contains("Upload"));
}

#[tokio::test]
async fn test_error_details_hidden_in_production() {
    let app = setup_test_app_with(&[
        ("ENVIRONMENT", "production"),
        ("CORS_ORIGINS", "https://poet.example.com"),
    ])
    .await;

    let response = app
        .client()
        .get(&api_path(&format!("/uploads/{}", Uuid::new_v4())))
        .await;
    assert_eq!(response.status_code(), 404);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error_code"], "resource-not-found");
    assert!(body.get("details").is_none());
}

#[tokio::test]
async fn test_upload_with_very_long_filename() {
    let app = setup_test_app().await;
    let filename = format!("{}.png", "a".repeat(200));

    let id = upload(&app, &filename, None).await;

    let response = app.client().get(&api_path(&format!("/uploads/{}", id))).await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["data"]["filename"], filename.as_str());

    let response = app
        .client()
        .get(&api_path(&format!("/uploads/{}/file", id)))
        .await;
    assert_eq!(response.status_code(), 200);
    assert_eq!(response.as_bytes().as_ref(), create_minimal_png().as_slice());

    let files = stored_files(&app);
    assert_eq!(files.len(), 1);
    assert!(files[0].len() < 255 && files[0].ends_with(".png"));
}

#[tokio::test]
async fn test_link_for_local_upload_is_unsupported() {
    let app = setup_test_app().await;
    let id = upload(&app, "photo.png", None).await;

    let response = app
        .client()
        .get(&api_path(&format!("/uploads/{}/link", id)))
        .await;
    assert_eq!(response.status_code(), 409);
    assert_eq!(error_code(&response), "link-unsupported");
}

#[tokio::test]
async fn test_remote_upload_round_trip_and_link() {
    let app = setup_remote_test_app().await;
    let id = upload(&app, "photo.png", None).await;

    let response = app
        .client()
        .get(&api_path(&format!("/uploads/{}/file", id)))
        .await;
    assert_eq!(response.status_code(), 200);
    assert_eq!(response.as_bytes().as_ref(), create_minimal_png().as_slice());

    let response = app
        .client()
        .get(&api_path(&format!("/uploads/{}/link", id)))
        .await;
    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    let url = body["data"]["url"].as_str().unwrap();
    assert!(url.starts_with(&format!("{}/{}/", TEST_PUBLIC_HOST, TEST_BUCKET)));
    assert!(url.ends_with("_photo.png"));

    // Deterministic for the same record
    let again: serde_json::Value = app
        .client()
        .get(&api_path(&format!("/uploads/{}/link", id)))
        .await
        .json();
    assert_eq!(again["data"]["url"], url);
}

#[tokio::test]
async fn test_delete_requires_owner() {
    let app = setup_test_app().await;
    let owner = Uuid::new_v4();
    let owner_auth = app.bearer(owner);
    let id = upload(&app, "photo.png", Some(&owner_auth)).await;
    let path = api_path(&format!("/uploads/{}", id));

    let response = app.client().delete(&path).await;
    assert_eq!(response.status_code(), 401);
    assert_eq!(error_code(&response), "unauthorized");

    let response = app
        .client()
        .delete(&path)
        .add_header("Authorization", app.bearer(Uuid::new_v4()))
        .await;
    assert_eq!(response.status_code(), 403);
    assert_eq!(error_code(&response), "forbidden");
    assert_eq!(stored_files(&app).len(), 1);

    let response = app
        .client()
        .delete(&path)
        .add_header("Authorization", owner_auth)
        .await;
    assert_eq!(response.status_code(), 204);

    assert_eq!(app.client().get(&path).await.status_code(), 404);
    assert!(stored_files(&app).is_empty());
}

#[tokio::test]
async fn test_anonymous_upload_cannot_be_deleted() {
    let app = setup_test_app().await;
    let id = upload(&app, "photo.png", None).await;

    let response = app
        .client()
        .delete(&api_path(&format!("/uploads/{}", id)))
        .add_header("Authorization", app.bearer(Uuid::new_v4()))
        .await;
    assert_eq!(response.status_code(), 403);
}

#[tokio::test]
async fn test_invalid_token_is_rejected() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post(&api_path("/uploads"))
        .add_header("Authorization", "Bearer not-a-token")
        .multipart(file_form("photo.png", create_minimal_png()))
        .await;
    assert_eq!(response.status_code(), 401);
    assert_eq!(error_code(&response), "unauthorized");

    let response = app
        .client()
        .post(&api_path("/uploads"))
        .add_header("Authorization", "Basic dXNlcjpwYXNz")
        .multipart(file_form("photo.png", create_minimal_png()))
        .await;
    assert_eq!(response.status_code(), 401);
    assert!(stored_files(&app).is_empty());
}

#[tokio::test]
async fn test_trailing_slash_routes() {
    let app = setup_test_app().await;
    let id = upload(&app, "photo.png", None).await;

    let response = app
        .client()
        .get(&api_path(&format!("/uploads/{}/", id)))
        .await;
    assert_eq!(response.status_code(), 200);
}

#[tokio::test]
async fn test_healthcheck_and_docs() {
    let app = setup_test_app().await;

    let response = app.client().get("/healthcheck").await;
    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "ok");

    let response = app.client().get("/api/openapi.json").await;
    assert_eq!(response.status_code(), 200);
    let spec: serde_json::Value = response.json();
    assert!(spec["paths"].get("/api/v1/uploads").is_some());

    assert_eq!(app.client().get("/docs").await.status_code(), 200);
}
