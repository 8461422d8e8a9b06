//! HTTP error response conversion
//!
//! Handlers return `Result<impl IntoResponse, HttpAppError>`. Domain errors
//! (`AppError`, `UploadError`) convert into `HttpAppError`, which renders a
//! consistent JSON body and logs at the level the error asks for.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use poet_core::{AppError, ErrorMetadata, LogLevel};
use poet_storage::UploadError;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Machine-readable error code for programmatic handling
    pub error_code: String,
    pub error_message: String,
    /// Whether this error is recoverable (can be retried)
    pub recoverable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Wrapper type for AppError to implement IntoResponse
/// (orphan rules: IntoResponse and AppError both live in other crates).
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_type = error_type, "Error occurred");
        }
    }
}

/// Diagnostic text for a non-sensitive error, carried as a response extension.
///
/// `middleware::error_details` copies it into the body outside production and
/// drops it otherwise.
#[derive(Debug, Clone)]
pub struct ErrorDetails(pub String);

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        let body = Json(ErrorResponse {
            error_code: app_error.error_code().to_string(),
            error_message: app_error.client_message(),
            recoverable: app_error.is_recoverable(),
            suggested_action: app_error.suggested_action().map(String::from),
            details: None,
        });

        let mut response = (status, body).into_response();
        if !app_error.is_sensitive() {
            response
                .extensions_mut()
                .insert(ErrorDetails(app_error.detailed_message()));
        }
        response
    }
}

impl From<UploadError> for HttpAppError {
    fn from(err: UploadError) -> Self {
        let app = match err {
            UploadError::BadInput(msg) => AppError::InvalidInput(msg),
            UploadError::NotFound(key) => {
                // Storage keys stay server-side
                tracing::debug!(key = %key, "Stored object missing");
                AppError::FileNotFound("stored object is missing".to_string())
            }
            UploadError::LinkUnsupported(backend) => AppError::LinkUnsupported(format!(
                "Uploads kept in {} storage have no public link",
                backend
            )),
            UploadError::BackendNotConfigured(_) | UploadError::Storage(_) => {
                AppError::Storage(err.to_string())
            }
            UploadError::OverwriteAttempt { .. } | UploadError::NotPersisted { .. } => {
                AppError::Internal(err.to_string())
            }
        };
        HttpAppError(app)
    }
}
