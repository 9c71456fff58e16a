//! Error types for the gateway layer

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use courier_database::DomainError;
use serde_json::json;
use thiserror::Error;

/// Gateway error types
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Authorization failed: {0}")]
    AuthorizationFailed(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::AuthenticationFailed(_) => StatusCode::UNAUTHORIZED,
            GatewayError::AuthorizationFailed(_) => StatusCode::FORBIDDEN,
            GatewayError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::NotFound(_) => StatusCode::NOT_FOUND,
            GatewayError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        // Internal detail stays in the logs, not in the body.
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "request failed");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };
        let body = json!({
            "error": status.as_str(),
            "message": message,
        });

        (status, Json(body)).into_response()
    }
}

/// Result type for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;

impl From<DomainError> for GatewayError {
    fn from(error: DomainError) -> Self {
        match error {
            DomainError::Validation(msg) => GatewayError::InvalidRequest(msg),
            DomainError::Unauthorized => {
                GatewayError::AuthenticationFailed("Invalid token".to_string())
            }
            DomainError::Forbidden(msg) => GatewayError::AuthorizationFailed(msg),
            DomainError::MessageNotFound => {
                GatewayError::NotFound("Message not found".to_string())
            }
            DomainError::GroupNotFound => GatewayError::NotFound("Group not found".to_string()),
            DomainError::UserNotFound => GatewayError::NotFound("User not found".to_string()),
            DomainError::Database(msg) => GatewayError::InternalError(msg),
        }
    }
}

impl From<sqlx::Error> for GatewayError {
    fn from(error: sqlx::Error) -> Self {
        GatewayError::InternalError(error.to_string())
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(error: serde_json::Error) -> Self {
        GatewayError::InvalidRequest(format!("JSON error: {}", error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_map_to_expected_statuses() {
        let cases = [
            (DomainError::validation("bad"), StatusCode::BAD_REQUEST),
            (DomainError::Unauthorized, StatusCode::UNAUTHORIZED),
            (DomainError::forbidden("no"), StatusCode::FORBIDDEN),
            (DomainError::MessageNotFound, StatusCode::NOT_FOUND),
            (DomainError::GroupNotFound, StatusCode::NOT_FOUND),
            (DomainError::UserNotFound, StatusCode::NOT_FOUND),
            (
                DomainError::Database("boom".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (domain, status) in cases {
            assert_eq!(GatewayError::from(domain).status_code(), status);
        }
    }
}
