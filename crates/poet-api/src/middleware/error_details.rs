use axum::body::{to_bytes, Body};
use axum::http::header::CONTENT_LENGTH;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::error::{ErrorDetails, ErrorResponse};
use crate::state::AppState;

/// Error bodies are small JSON documents; anything larger is left alone.
const MAX_ERROR_BODY_BYTES: usize = 64 * 1024;

/// Error details middleware
/// Adds `details` to error bodies outside production
pub async fn error_details_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;

    let Some(ErrorDetails(details)) = response.extensions_mut().remove::<ErrorDetails>() else {
        return response;
    };
    if !state.expose_error_details {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let bytes = match to_bytes(body, MAX_ERROR_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to buffer error body");
            return Response::from_parts(parts, Body::empty());
        }
    };

    let mut error_body: ErrorResponse = match serde_json::from_slice(&bytes) {
        Ok(error_body) => error_body,
        Err(_) => return Response::from_parts(parts, Body::from(bytes)),
    };
    error_body.details = Some(details);

    match serde_json::to_vec(&error_body) {
        Ok(json) => {
            parts.headers.remove(CONTENT_LENGTH);
            Response::from_parts(parts, Body::from(json))
        }
        Err(_) => Response::from_parts(parts, Body::from(bytes)),
    }
}
