//! OpenAPI documentation.
//! Paths in handler annotations use placeholder /api/v0; they are rewritten to
//! `crate::constants::API_VERSION` when the document is built.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::constants::API_VERSION;
use crate::error;
use crate::handlers;
use poet_core::models;

/// Placeholder version used in handler path annotations (utoipa requires compile-time literals).
const OPENAPI_PATH_PLACEHOLDER: &str = "/api/v0";

fn transform_openapi_paths(spec: &mut utoipa::openapi::OpenApi, version: &str) {
    let replacement = format!("/api/{}", version);
    if OPENAPI_PATH_PLACEHOLDER == replacement {
        return;
    }
    let path_map = std::mem::take(&mut spec.paths.paths);
    for (key, item) in path_map {
        let new_key = key.replacen(OPENAPI_PATH_PLACEHOLDER, &replacement, 1);
        spec.paths.paths.insert(new_key, item);
    }
}

/// Returns the OpenAPI spec with path placeholders replaced by the current API version.
pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    let mut spec = ApiDoc::openapi();
    transform_openapi_paths(&mut spec, API_VERSION);
    spec
}

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Poet API",
        description = "Image uploads stored on local disk or S3-compatible object storage"
    ),
    paths(
        handlers::uploads::create_upload,
        handlers::uploads::find_upload,
        handlers::uploads::get_upload_file,
        handlers::uploads::get_upload_link,
        handlers::uploads::delete_upload,
        handlers::health::healthcheck,
    ),
    components(
        schemas(
            models::UploadResponse,
            models::UploadLinkResponse,
            handlers::uploads::UploadEnvelope,
            handlers::uploads::UploadLinkEnvelope,
            handlers::health::HealthResponse,
            error::ErrorResponse,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "uploads", description = "Image upload, metadata, download and deletion"),
        (name = "health", description = "Service health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_use_current_version() {
        let spec = get_openapi_spec();
        let paths: Vec<&String> = spec.paths.paths.keys().collect();

        assert!(paths.iter().any(|p| p.as_str() == "/api/v1/uploads"));
        assert!(paths.iter().any(|p| p.as_str() == "/api/v1/uploads/{uid}/file"));
        assert!(paths.iter().any(|p| p.as_str() == "/healthcheck"));
        assert!(!paths.iter().any(|p| p.starts_with(OPENAPI_PATH_PLACEHOLDER)));
    }

    #[test]
    fn test_bearer_scheme_registered() {
        let spec = get_openapi_spec();
        let components = spec.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer"));
    }
}
