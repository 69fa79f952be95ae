//! Route configuration and setup

use crate::constants::{
    api_path, openapi_path, CHUNKS_PATH, CHUNKS_SIGN_PATH, SESSIONS_FINALIZE_PATH,
    SESSIONS_START_PATH,
};
use crate::handlers;
use crate::handlers::fallback::method_not_allowed;
use crate::middleware::{
    ingest_cors_middleware, request_id_middleware, security_headers_middleware, RequestId,
    SecurityHeadersConfig,
};
use crate::state::AppState;
use anyhow::Context;
use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, Request},
    routing::{get, post},
    Json, Router,
};
use reeldrop_core::Config;
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router, anyhow::Error> {
    let cors = setup_cors(config)?;

    // The ingest route carries its own CORS policy, so the app-wide layer must not
    // answer its preflight first.
    let api_routes = protocol_routes().merge(public_routes()).layer(cors.clone());
    let ingest_routes = if config.ingest_cors_permissive() {
        ingest_routes(&state).layer(axum::middleware::from_fn(ingest_cors_middleware))
    } else {
        ingest_routes(&state).layer(cors)
    };

    let trace_layer = TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
        let request_id = request
            .extensions()
            .get::<RequestId>()
            .map(|id| id.0.as_str())
            .unwrap_or("-");
        tracing::info_span!(
            "http_request",
            method = %request.method(),
            uri = %request.uri(),
            request_id = %request_id,
        )
    });

    let security_headers_config = Arc::new(SecurityHeadersConfig::new(config.is_production()));

    // Server-level concurrency limit to protect against resource exhaustion under extreme load
    let http_concurrency_limit = config.http_concurrency_limit();
    tracing::info!(
        http_concurrency_limit = http_concurrency_limit,
        "HTTP concurrency limit layer enabled"
    );

    let app = api_routes
        .merge(ingest_routes)
        .merge(utoipa_rapidoc::RapiDoc::new(openapi_path()).path("/docs"))
        .layer(ConcurrencyLimitLayer::new(http_concurrency_limit))
        .layer(trace_layer)
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(axum::middleware::from_fn_with_state(
            security_headers_config,
            security_headers_middleware,
        ))
        .with_state(state);

    Ok(app)
}

/// Setup CORS configuration for every route except direct ingest
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods = [Method::GET, Method::POST, Method::OPTIONS];

    if config.cors_origins().iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        return Ok(CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any));
    }

    let origins = config
        .cors_origins()
        .iter()
        .map(|o| {
            o.parse::<HeaderValue>()
                .with_context(|| format!("Invalid CORS origin: {}", o))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(methods)
        .allow_headers(Any))
}

/// Session and signing routes
fn protocol_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &api_path(SESSIONS_START_PATH),
            get(handlers::sessions::start_session).fallback(method_not_allowed),
        )
        .route(
            &api_path(SESSIONS_FINALIZE_PATH),
            post(handlers::sessions::finalize_session).fallback(method_not_allowed),
        )
        .route(
            &api_path(CHUNKS_SIGN_PATH),
            get(handlers::chunk_sign::sign_chunk).fallback(method_not_allowed),
        )
}

/// Direct chunk ingest, with a body limit sized from the chunk cap
fn ingest_routes(state: &AppState) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &api_path(CHUNKS_PATH),
            post(handlers::chunk_upload::upload_chunk).fallback(method_not_allowed),
        )
        .layer(DefaultBodyLimit::max(state.limits.max_request_bytes()))
}

/// Public routes (health and documentation)
fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(handlers::health::liveness_check))
        .route(
            &openapi_path(),
            get(|| async { Json(crate::api_doc::get_openapi_spec()) }),
        )
}
