use std::sync::Arc;

use axum::{
    body::Body,
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use poet_core::models::{Identity, UploadLinkResponse, UploadRecord, UploadResponse};
use poet_core::AppError;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::utils::upload::{content_type_for, extract_multipart_file, validate_submitted_file};

#[derive(Serialize, ToSchema)]
pub struct UploadEnvelope {
    pub data: UploadResponse,
}

#[derive(Serialize, ToSchema)]
pub struct UploadLinkEnvelope {
    pub data: UploadLinkResponse,
}

/// Look up a record by the raw path segment. Malformed ids are simply unknown.
async fn load_upload(state: &AppState, uid: &str) -> Result<UploadRecord, HttpAppError> {
    let not_found = || AppError::NotFound(format!("Upload {}", uid));

    let id = Uuid::parse_str(uid).map_err(|_| not_found())?;
    let record = state.repository.get(id).await?.ok_or_else(not_found)?;
    Ok(record)
}

/// Upload an image
///
/// Validates the `file` part, stores its bytes through the configured backend
/// and records the upload. The owner is attached only for authenticated callers.
#[utoipa::path(
    post,
    path = "/api/v0/uploads",
    tag = "uploads",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Upload stored", body = UploadEnvelope),
        (status = 400, description = "No file or no filename", body = ErrorResponse),
        (status = 401, description = "Invalid token", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 415, description = "Extension not allowed", body = ErrorResponse),
        (status = 422, description = "Empty file", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    ),
    security(("bearer" = []))
)]
#[tracing::instrument(skip(state, multipart), fields(authenticated = user.0.is_authenticated()))]
pub async fn create_upload(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadEnvelope>, HttpAppError> {
    let multipart = multipart.map_err(|_| AppError::FileNotSent)?;
    let limits = &state.config.uploads;

    let submitted = extract_multipart_file(multipart).await?;
    let filename = validate_submitted_file(
        &submitted,
        &limits.allowed_extensions,
        limits.max_content_length_bytes,
    )?;
    let size_bytes = submitted.data.len();

    let record = state
        .uploads
        .store(&filename, submitted.data, user.0.owner())
        .await?;
    state.repository.insert(record.clone()).await?;

    tracing::info!(
        upload_id = %record.id,
        filename = %record.filename,
        size_bytes = size_bytes,
        "Upload stored"
    );

    Ok(Json(UploadEnvelope {
        data: UploadResponse::from(&record),
    }))
}

/// Get upload metadata
#[utoipa::path(
    get,
    path = "/api/v0/uploads/{uid}",
    tag = "uploads",
    params(
        ("uid" = Uuid, Path, description = "Upload ID")
    ),
    responses(
        (status = 200, description = "Upload found", body = UploadEnvelope),
        (status = 404, description = "Upload not found", body = ErrorResponse)
    )
)]
pub async fn find_upload(
    State(state): State<Arc<AppState>>,
    Path(uid): Path<String>,
) -> Result<Json<UploadEnvelope>, HttpAppError> {
    let record = load_upload(&state, &uid).await?;
    Ok(Json(UploadEnvelope {
        data: UploadResponse::from(&record),
    }))
}

/// Download the stored file as an attachment
#[utoipa::path(
    get,
    path = "/api/v0/uploads/{uid}/file",
    tag = "uploads",
    params(
        ("uid" = Uuid, Path, description = "Upload ID")
    ),
    responses(
        (status = 200, description = "File content", content_type = "application/octet-stream"),
        (status = 404, description = "Upload or stored file not found", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn get_upload_file(
    State(state): State<Arc<AppState>>,
    Path(uid): Path<String>,
) -> Result<Response, HttpAppError> {
    let record = load_upload(&state, &uid).await?;
    let stream = state.uploads.retrieve(&record).await?;

    let disposition = format!("attachment; filename=\"{}\"", record.filename);
    Ok((
        [
            (header::CONTENT_TYPE, content_type_for(&record.filename).to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        Body::from_stream(stream),
    )
        .into_response())
}

/// Public link for a remotely stored file
#[utoipa::path(
    get,
    path = "/api/v0/uploads/{uid}/link",
    tag = "uploads",
    params(
        ("uid" = Uuid, Path, description = "Upload ID")
    ),
    responses(
        (status = 200, description = "Public link", body = UploadLinkEnvelope),
        (status = 404, description = "Upload not found", body = ErrorResponse),
        (status = 409, description = "Upload is stored locally", body = ErrorResponse)
    )
)]
pub async fn get_upload_link(
    State(state): State<Arc<AppState>>,
    Path(uid): Path<String>,
) -> Result<Json<UploadLinkEnvelope>, HttpAppError> {
    let record = load_upload(&state, &uid).await?;
    let url = state.uploads.link_for(&record)?;
    Ok(Json(UploadLinkEnvelope {
        data: UploadLinkResponse { url },
    }))
}

/// Delete an upload and its stored file
///
/// Only the authenticated owner may delete. Anonymous uploads cannot be deleted.
#[utoipa::path(
    delete,
    path = "/api/v0/uploads/{uid}",
    tag = "uploads",
    params(
        ("uid" = Uuid, Path, description = "Upload ID")
    ),
    responses(
        (status = 204, description = "Upload deleted"),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Not the owner", body = ErrorResponse),
        (status = 404, description = "Upload not found", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    ),
    security(("bearer" = []))
)]
#[tracing::instrument(skip(state, user), fields(upload_id = %uid))]
pub async fn delete_upload(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(uid): Path<String>,
) -> Result<StatusCode, HttpAppError> {
    let Identity::Authenticated { user_id } = user.0 else {
        return Err(AppError::Unauthorized("Authentication required".to_string()).into());
    };

    let record = load_upload(&state, &uid).await?;
    if !record.is_owned_by(user_id) {
        return Err(AppError::Forbidden("Only the owner can delete this upload".to_string()).into());
    }

    // Object first: a failed backend delete keeps the row so the caller can retry
    state.uploads.delete(&record).await?;
    state.repository.delete(record.id).await?;

    tracing::info!(upload_id = %record.id, user_id = %user_id, "Upload deleted");
    Ok(StatusCode::NO_CONTENT)
}
