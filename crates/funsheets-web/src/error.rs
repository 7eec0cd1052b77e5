//! Error types for the web service.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use database::{DatabaseError, ValidationError};
use thiserror::Error;
use worksheet_gen::GenerationError;

/// Errors that can occur while handling a request.
///
/// Every variant is scoped to the request that raised it; none of them stop
/// the server.
#[derive(Debug, Error)]
pub enum WebError {
    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Form input rejected before any store call.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Worksheet generation failed.
    #[error("Worksheet generation failed: {0}")]
    Generation(#[from] GenerationError),

    /// No identity headers on the request.
    #[error("Not signed in")]
    Unauthorized,

    /// Signed in, but the parent profile could not be loaded.
    #[error("There was an error loading your profile. Some features may be limited. ({0})")]
    ProfileUnavailable(String),

    /// Nothing at this id (or route).
    #[error("{0} not found")]
    NotFound(String),
}

impl WebError {
    fn status(&self) -> StatusCode {
        match self {
            WebError::Database(err) => match err {
                DatabaseError::NotFound { .. } => StatusCode::NOT_FOUND,
                DatabaseError::Invalid(_) => StatusCode::BAD_REQUEST,
                DatabaseError::InvalidTransition { .. } | DatabaseError::Conflict { .. } => {
                    StatusCode::CONFLICT
                }
                DatabaseError::Sqlx(_) | DatabaseError::Migration(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            WebError::Validation(_) => StatusCode::BAD_REQUEST,
            WebError::Generation(GenerationError::InvalidRequest(_)) => StatusCode::BAD_REQUEST,
            WebError::Generation(_) => StatusCode::BAD_GATEWAY,
            WebError::Unauthorized => StatusCode::UNAUTHORIZED,
            WebError::ProfileUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            WebError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    /// Message shown to the user.
    fn message(&self) -> String {
        match self {
            WebError::Database(DatabaseError::Invalid(err)) => err.to_string(),
            WebError::Database(err @ DatabaseError::NotFound { .. }) => err.to_string(),
            WebError::Database(err @ DatabaseError::InvalidTransition { .. }) => err.to_string(),
            WebError::Database(DatabaseError::Sqlx(_) | DatabaseError::Migration(_)) => {
                "Something went wrong. Please try again.".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, status = %status, "Request rejected");
        }

        let body = serde_json::json!({
            "error": self.message()
        });

        (status, Json(body)).into_response()
    }
}

/// Result type for handlers.
pub type Result<T> = std::result::Result<T, WebError>;
