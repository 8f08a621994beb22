use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::models::BookingStatus;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{message}")]
    Validation { field: &'static str, message: String },

    #[error("not available: {0}")]
    NotAvailable(String),

    #[error("cannot move booking from {} to {}", from.as_str(), to.as_str())]
    InvalidTransition {
        from: BookingStatus,
        to: BookingStatus,
    },

    #[error("conflicting update: {0}")]
    Conflict(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("gateway error: {0}")]
    Gateway(String),

    #[error("backend rejected request: {0}")]
    Backend(String),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}

impl AppError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        AppError::Validation {
            field,
            message: message.into(),
        }
    }

    /// True only when the store could not be reached or failed internally.
    /// A backend that answered, even with an unreadable body, is not a
    /// transport failure.
    pub fn is_transport(&self) -> bool {
        matches!(self, AppError::Gateway(_) | AppError::Database(_))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Validation { .. } => "validation",
            AppError::NotAvailable(_) => "not_available",
            AppError::InvalidTransition { .. } => "invalid_transition",
            AppError::Conflict(_) => "conflict",
            AppError::NotFound(_) => "not_found",
            AppError::Unauthorized => "unauthorized",
            AppError::Gateway(_) | AppError::Database(_) => "gateway",
            AppError::Backend(_) => "backend",
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        AppError::Gateway(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotAvailable(_) => StatusCode::CONFLICT,
            AppError::InvalidTransition { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Gateway(_) | AppError::Backend(_) => StatusCode::BAD_GATEWAY,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let mut body = serde_json::json!({
            "error": self.to_string(),
            "kind": self.kind(),
        });
        match &self {
            AppError::Validation { field, .. } => {
                body["field"] = serde_json::json!(field);
            }
            AppError::InvalidTransition { from, to } => {
                body["from"] = serde_json::json!(from.as_str());
                body["to"] = serde_json::json!(to.as_str());
            }
            _ => {}
        }

        (status, axum::Json(body)).into_response()
    }
}
