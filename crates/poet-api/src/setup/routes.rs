//! Route table and middleware stack

use std::sync::Arc;

use anyhow::Result;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method};
use axum::routing::get;
use axum::Router;
use poet_core::Config;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use utoipa_rapidoc::RapiDoc;

use crate::api_doc::get_openapi_spec;
use crate::constants::API_PREFIX;
use crate::handlers;
use crate::middleware::error_details_middleware;
use crate::rest::RestResource;
use crate::state::AppState;

pub fn setup_routes(state: Arc<AppState>) -> Result<Router> {
    let cors = setup_cors(&state.config)?;
    let body_limit = state.config.uploads.max_content_length_bytes;

    let uploads = RestResource::new("uploads")
        .create(handlers::uploads::create_upload)
        .find(handlers::uploads::find_upload)
        .destroy(handlers::uploads::delete_upload)
        .route("/{uid}/file", get(handlers::uploads::get_upload_file))
        .route("/{uid}/link", get(handlers::uploads::get_upload_link));

    let app = Router::new()
        .route("/healthcheck", get(handlers::health::healthcheck))
        .nest(API_PREFIX, uploads.into_router())
        .merge(RapiDoc::with_openapi("/api/openapi.json", get_openapi_spec()).path("/docs"))
        // tower-http enforces the limit; axum's own 2 MB multipart default is lifted
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(cors)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            error_details_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    tracing::debug!(max_body_bytes = body_limit, "Routes configured");

    Ok(app)
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> Result<CorsLayer> {
    let methods = [Method::GET, Method::POST, Method::DELETE, Method::OPTIONS];

    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(Any)
    };
    Ok(cors)
}
