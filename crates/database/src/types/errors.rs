//! Error types for the Courier data layer

use thiserror::Error;

/// Domain error taxonomy shared by repositories and services.
///
/// The gateway maps these onto HTTP statuses; anything that is not one of
/// the four caller-facing kinds (validation, unauthorized, forbidden, not
/// found) is treated as an internal failure and never leaks its detail.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Message not found")]
    MessageNotFound,

    #[error("Group not found")]
    GroupNotFound,

    #[error("User not found")]
    UserNotFound,

    #[error("Database error: {0}")]
    Database(String),
}

impl DomainError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a forbidden error
    pub fn forbidden(reason: impl Into<String>) -> Self {
        Self::Forbidden(reason.into())
    }
}

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        Self::Database(format!("JSON column error: {}", err))
    }
}

/// Result type alias for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
