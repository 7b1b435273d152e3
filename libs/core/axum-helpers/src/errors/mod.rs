pub mod handlers;
pub mod messages;

use serde::Serialize;
use utoipa::ToSchema;

/// Standard error response structure.
///
/// Returned for all error responses produced by the shared helpers:
/// - `error`: Machine-readable error identifier (e.g., "BadRequest")
/// - `message`: Human-readable error message
/// - `details`: Optional structured details (e.g., validation field errors)
/// - `code`: Optional integer error code for logging and monitoring
///
/// # JSON Example
///
/// ```json
/// {
///   "error": "BadRequest",
///   "message": "Request validation failed",
///   "details": {"email": [{"code": "email", "message": null, "params": {}}]},
///   "code": 1001
/// }
/// ```
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Machine-readable error identifier for programmatic handling
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Optional structured error details (e.g., validation field errors)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// Optional integer error code for logging and monitoring
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<i32>,
}
