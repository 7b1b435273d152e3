use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::{ErrorResponse, messages};

/// Handler for 404 Not Found errors.
///
/// This can be used as a fallback handler in your router.
pub async fn not_found() -> Response {
    let body = Json(ErrorResponse {
        error: "NotFound".to_string(),
        message: messages::NOT_FOUND_RESOURCE.to_string(),
        details: None,
        code: Some(messages::CODE_NOT_FOUND),
    });

    (StatusCode::NOT_FOUND, body).into_response()
}

/// Handler for 405 Method Not Allowed errors.
pub async fn method_not_allowed() -> Response {
    let body = Json(ErrorResponse {
        error: "MethodNotAllowed".to_string(),
        message: messages::METHOD_NOT_ALLOWED.to_string(),
        details: None,
        code: None,
    });

    (StatusCode::METHOD_NOT_ALLOWED, body).into_response()
}
