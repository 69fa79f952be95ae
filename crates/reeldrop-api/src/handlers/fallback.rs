use crate::error::HttpAppError;
use axum::http::Method;
use reeldrop_core::AppError;

/// Method fallback for every protocol route.
pub async fn method_not_allowed(method: Method) -> HttpAppError {
    HttpAppError(AppError::MethodNotAllowed(method.to_string()))
}
