use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::models::BookingStatus;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("end time must be after start time")]
    InvalidRange,

    #[error("sign in required")]
    Unauthorized,

    #[error("{0}")]
    Forbidden(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("booking has already been {status}")]
    InvalidTransition { status: BookingStatus },

    #[error("booking was reviewed by another request")]
    PreconditionFailed,

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("storage error: {0}")]
    Persistence(#[from] anyhow::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::InvalidRange => StatusCode::BAD_REQUEST,
            AppError::Unauthorized | AppError::Auth(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidTransition { .. } | AppError::PreconditionFailed => {
                StatusCode::CONFLICT
            }
            AppError::Persistence(_) | AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to the actor. Storage and auth failures are opaque
    /// to the caller, so they get a generic retry prompt.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Persistence(_) | AppError::Config(_) => {
                "something went wrong, please try again".to_string()
            }
            AppError::Auth(_) => "invalid credentials, please try again".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = serde_json::json!({ "error": self.public_message() });
        (status, axum::Json(body)).into_response()
    }
}
