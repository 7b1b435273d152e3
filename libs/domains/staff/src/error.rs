use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StaffError {
    #[error("User not found: {0}")]
    NotFound(Uuid),

    #[error("User with email '{0}' already exists")]
    DuplicateEmail(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account is not active")]
    NotActive,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("You cannot delete your own account")]
    SelfDeletion,

    #[error("Invalid role: {0}")]
    InvalidRole(String),

    #[error("Invalid or expired token")]
    TokenInvalid,

    #[error("Invalid activation token")]
    InvalidActivationToken,

    #[error("Account is already active")]
    AlreadyActive,

    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Email delivery failed: {0}")]
    EmailDelivery(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type StaffResult<T> = Result<T, StaffError>;

impl From<sea_orm::DbErr> for StaffError {
    fn from(err: sea_orm::DbErr) -> Self {
        StaffError::Database(err.to_string())
    }
}

impl IntoResponse for StaffError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            StaffError::NotFound(id) => (
                StatusCode::NOT_FOUND,
                "not_found",
                format!("User {} not found", id),
            ),
            StaffError::DuplicateEmail(email) => (
                StatusCode::CONFLICT,
                "duplicate",
                format!("User with email '{}' already exists", email),
            ),
            StaffError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "invalid_credentials",
                "Invalid email or password".to_string(),
            ),
            StaffError::NotActive => (
                StatusCode::UNAUTHORIZED,
                "not_active",
                "Please activate your account before logging in".to_string(),
            ),
            StaffError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg.clone()),
            StaffError::SelfDeletion => (
                StatusCode::FORBIDDEN,
                "self_deletion",
                "You cannot delete your own account".to_string(),
            ),
            StaffError::InvalidRole(role) => (
                StatusCode::BAD_REQUEST,
                "invalid_role",
                format!("Invalid role: {}", role),
            ),
            StaffError::TokenInvalid => (
                StatusCode::UNAUTHORIZED,
                "token_invalid",
                "Invalid or expired token".to_string(),
            ),
            StaffError::InvalidActivationToken => (
                StatusCode::BAD_REQUEST,
                "invalid_activation_token",
                "Invalid activation token".to_string(),
            ),
            StaffError::AlreadyActive => (
                StatusCode::BAD_REQUEST,
                "already_active",
                "Account is already active".to_string(),
            ),
            StaffError::InvalidRefreshToken => (
                StatusCode::UNAUTHORIZED,
                "invalid_refresh_token",
                "Invalid refresh token".to_string(),
            ),
            StaffError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "validation_error", msg.clone())
            }
            StaffError::EmailDelivery(msg) => {
                tracing::error!("Email delivery error: {}", msg);
                (
                    StatusCode::BAD_GATEWAY,
                    "email_delivery",
                    "Failed to send email. Please try again later.".to_string(),
                )
            }
            StaffError::Database(msg) => {
                tracing::error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
            StaffError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
        };

        (
            status,
            Json(json!({
                "error": {
                    "type": error_type,
                    "message": message
                }
            })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_mapping() {
        let cases = [
            (
                StaffError::NotFound(Uuid::nil()).into_response(),
                StatusCode::NOT_FOUND,
            ),
            (
                StaffError::DuplicateEmail("a@b.c".into()).into_response(),
                StatusCode::CONFLICT,
            ),
            (
                StaffError::InvalidCredentials.into_response(),
                StatusCode::UNAUTHORIZED,
            ),
            (
                StaffError::NotActive.into_response(),
                StatusCode::UNAUTHORIZED,
            ),
            (
                StaffError::Forbidden("no".into()).into_response(),
                StatusCode::FORBIDDEN,
            ),
            (
                StaffError::SelfDeletion.into_response(),
                StatusCode::FORBIDDEN,
            ),
            (
                StaffError::InvalidRole("X".into()).into_response(),
                StatusCode::BAD_REQUEST,
            ),
            (
                StaffError::TokenInvalid.into_response(),
                StatusCode::UNAUTHORIZED,
            ),
            (
                StaffError::InvalidActivationToken.into_response(),
                StatusCode::BAD_REQUEST,
            ),
            (
                StaffError::AlreadyActive.into_response(),
                StatusCode::BAD_REQUEST,
            ),
            (
                StaffError::InvalidRefreshToken.into_response(),
                StatusCode::UNAUTHORIZED,
            ),
            (
                StaffError::EmailDelivery("smtp down".into()).into_response(),
                StatusCode::BAD_GATEWAY,
            ),
            (
                StaffError::Database("boom".into()).into_response(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (response, expected) in cases {
            assert_eq!(response.status(), expected);
        }
    }
}
