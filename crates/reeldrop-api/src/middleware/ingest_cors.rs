//! Permissive CORS for the direct ingest route.
//!
//! Browsers recording media post chunks from arbitrary origins, so the ingest route
//! answers preflight itself with `204 No Content` and stamps every response with a
//! wildcard origin. Other routes keep the configured `CorsLayer`.

use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

const ALLOW_METHODS: &str = "POST, OPTIONS";
const PREFLIGHT_MAX_AGE_SECS: &str = "86400";

fn apply_cors_headers(response: &mut Response) {
    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOW_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("*"),
    );
}

pub async fn ingest_cors_middleware(request: Request, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        let mut response = StatusCode::NO_CONTENT.into_response();
        apply_cors_headers(&mut response);
        response.headers_mut().insert(
            header::ACCESS_CONTROL_MAX_AGE,
            HeaderValue::from_static(PREFLIGHT_MAX_AGE_SECS),
        );
        return response;
    }

    let mut response = next.run(request).await;
    apply_cors_headers(&mut response);
    response
}
