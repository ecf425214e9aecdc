// src/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

use crate::{mail::EmailError, services::identity::IdentityError, store::StoreError};

/// Global Application Error Enum.
/// One variant per error kind exposed to callers; each kind has a stable
/// string code and an HTTP status.
#[derive(Debug)]
pub enum AppError {
    // 400 - caller-supplied data failed validation
    InvalidArgument(String),

    // 401 - missing or invalid session token
    Unauthenticated(String),

    // 403 - caller or email-provider credentials rejected
    PermissionDenied(String),

    // 404
    NotFound(String),

    // 409 - duplicate account
    AlreadyExists(String),

    // 410 - a time-bounded resource (OTP) expired
    DeadlineExceeded(String),

    // 429 - attempt budget or provider rate limit exceeded
    ResourceExhausted(String),

    // 500
    Internal(String),
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidArgument(_) => "invalid-argument",
            AppError::Unauthenticated(_) => "unauthenticated",
            AppError::PermissionDenied(_) => "permission-denied",
            AppError::NotFound(_) => "not-found",
            AppError::AlreadyExists(_) => "already-exists",
            AppError::DeadlineExceeded(_) => "deadline-exceeded",
            AppError::ResourceExhausted(_) => "resource-exhausted",
            AppError::Internal(_) => "internal",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            AppError::InvalidArgument(msg)
            | AppError::Unauthenticated(msg)
            | AppError::PermissionDenied(msg)
            | AppError::NotFound(msg)
            | AppError::AlreadyExists(msg)
            | AppError::DeadlineExceeded(msg)
            | AppError::ResourceExhausted(msg)
            | AppError::Internal(msg) => msg,
        }
    }

    /// The message safe to hand to callers; internal details are masked.
    pub fn public_message(&self) -> &str {
        match self {
            AppError::Internal(_) => "Internal Server Error",
            other => other.message(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            AppError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::AlreadyExists(_) => StatusCode::CONFLICT,
            AppError::DeadlineExceeded(_) => StatusCode::GONE,
            AppError::ResourceExhausted(_) => StatusCode::TOO_MANY_REQUESTS,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}

impl std::error::Error for AppError {}

/// Converts the error into a JSON response with the matching HTTP status.
/// Internal details are logged and replaced by a generic message.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();
        if let AppError::Internal(msg) = &self {
            tracing::error!("Internal Server Error: {}", msg);
        }
        let body = Json(json!({
            "error": self.public_message(),
            "code": code,
        }));

        (status, body).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { collection, id } => {
                AppError::NotFound(format!("No document '{}' in {}", id, collection))
            }
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl From<EmailError> for AppError {
    fn from(err: EmailError) -> Self {
        match err {
            EmailError::RateLimited => AppError::ResourceExhausted(
                "Rate limit exceeded. Please try again later.".to_string(),
            ),
            EmailError::Unauthorized(_) => AppError::PermissionDenied(
                "API key authentication failed or IP blocked.".to_string(),
            ),
            EmailError::NotConfigured => {
                AppError::Internal("Email service configuration error".to_string())
            }
            other => AppError::Internal(format!("Failed to send email: {}", other)),
        }
    }
}

impl From<IdentityError> for AppError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::AlreadyExists => AppError::AlreadyExists(
                "This email is already registered. Please sign in instead.".to_string(),
            ),
            IdentityError::InvalidCredentials => {
                AppError::Unauthenticated("Invalid email or password".to_string())
            }
            other => AppError::Internal(other.to_string()),
        }
    }
}

/// Validation failures surface as `invalid-argument` before any write happens.
impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::InvalidArgument(err.to_string())
    }
}
