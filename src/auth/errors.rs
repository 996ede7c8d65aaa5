//! Classified authentication failures and their HTTP rendering.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::error;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthErrorKind {
    ValidationError,
    UserNotFound,
    AccountInactive,
    InvalidPassword,
    InvalidCredentials,
    DatabaseError,
    UnknownError,
}

impl AuthErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AuthErrorKind::ValidationError => "VALIDATION_ERROR",
            AuthErrorKind::UserNotFound => "USER_NOT_FOUND",
            AuthErrorKind::AccountInactive => "ACCOUNT_INACTIVE",
            AuthErrorKind::InvalidPassword => "INVALID_PASSWORD",
            AuthErrorKind::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthErrorKind::DatabaseError => "DATABASE_ERROR",
            AuthErrorKind::UnknownError => "UNKNOWN_ERROR",
        }
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{} required", .missing.join(" and "))]
    Validation { missing: Vec<&'static str> },

    #[error("No account found for this email")]
    UserNotFound { email: String },

    #[error("Account is {status}")]
    AccountInactive { status: String },

    #[error("Invalid password")]
    InvalidPassword,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Authentication service is temporarily unavailable")]
    Database(#[source] anyhow::Error),

    #[error("Something went wrong, please try again later")]
    Unknown(#[source] anyhow::Error),
}

/// Wire shape of an authentication failure.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    #[serde(rename = "type")]
    pub kind: AuthErrorKind,
    pub message: String,
    pub details: Option<Value>,
}

impl AuthError {
    pub fn kind(&self) -> AuthErrorKind {
        match self {
            AuthError::Validation { .. } => AuthErrorKind::ValidationError,
            AuthError::UserNotFound { .. } => AuthErrorKind::UserNotFound,
            AuthError::AccountInactive { .. } => AuthErrorKind::AccountInactive,
            AuthError::InvalidPassword => AuthErrorKind::InvalidPassword,
            AuthError::InvalidCredentials => AuthErrorKind::InvalidCredentials,
            AuthError::Database(_) => AuthErrorKind::DatabaseError,
            AuthError::Unknown(_) => AuthErrorKind::UnknownError,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Validation { .. } => StatusCode::BAD_REQUEST,
            AuthError::UserNotFound { .. }
            | AuthError::InvalidPassword
            | AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::AccountInactive { .. } => StatusCode::FORBIDDEN,
            AuthError::Database(_) => StatusCode::SERVICE_UNAVAILABLE,
            AuthError::Unknown(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Caller-safe diagnostics. Internal error chains are never included.
    pub fn details(&self) -> Option<Value> {
        match self {
            AuthError::Validation { missing } => Some(json!({ "missing": missing })),
            AuthError::UserNotFound { email } => Some(json!({ "email": email })),
            AuthError::AccountInactive { status } => Some(json!({ "status": status })),
            _ => None,
        }
    }

    /// Folds the two credential-mismatch outcomes into `InvalidCredentials`.
    pub fn conceal(self) -> Self {
        match self {
            AuthError::UserNotFound { .. } | AuthError::InvalidPassword => {
                AuthError::InvalidCredentials
            }
            other => other,
        }
    }

    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            kind: self.kind(),
            message: self.to_string(),
            details: self.details(),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        if let AuthError::Database(e) | AuthError::Unknown(e) = &self {
            error!(kind = self.kind().as_str(), error = ?e, "authentication failed");
        }
        (self.status_code(), Json(self.body())).into_response()
    }
}
