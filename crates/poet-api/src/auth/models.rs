use axum::extract::FromRequestParts;
use axum::http::{header::AUTHORIZATION, request::Parts};
use poet_core::models::Identity;
use poet_core::AppError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::HttpAppError;
use crate::state::AppState;

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: Uuid, // user_id
    pub exp: i64,  // expiration timestamp
    pub iat: i64,  // issued at timestamp
}

/// Caller identity resolved from the `Authorization` header.
///
/// No header means an anonymous caller. A header that is present but does not
/// carry a valid bearer token is rejected with 401 rather than downgraded.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser(pub Identity);

// Extracted from parts so it can sit in front of Multipart
impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = HttpAppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let Some(auth_header) = parts.headers.get(AUTHORIZATION) else {
            return Ok(CurrentUser(Identity::Anonymous));
        };

        let auth_header = auth_header.to_str().map_err(|_| {
            AppError::Unauthorized("Invalid authorization header".to_string())
        })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Unauthorized("Invalid authorization header format".to_string())
        })?;

        let jwt = state.jwt.as_ref().ok_or_else(|| {
            AppError::Unauthorized("Token authentication is not enabled".to_string())
        })?;

        let claims = jwt.validate_token(token)?;

        Ok(CurrentUser(Identity::Authenticated {
            user_id: claims.sub,
        }))
    }
}
