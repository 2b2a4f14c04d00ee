use argon2::password_hash::Error as PasswordHashError;
use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;
use tokio::task::JoinError;
use tracing::error;

#[derive(Debug, ThisError)]
pub enum DeskError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("identifier already exists")]
    DuplicateIdentifier,

    #[error("invalid identifier or secret")]
    InvalidCredentials,

    #[error("request body too large")]
    PayloadTooLarge,

    #[error("Database error: {0}")]
    DatabaseError(#[from] SqlxError),

    #[error("Password hash error: {0}")]
    PasswordHash(#[from] PasswordHashError),

    #[error("Invalid hashing parameters: {0}")]
    HashParams(String),

    #[error("Blocking task failed: {0}")]
    Blocking(#[from] JoinError),
}

impl IntoResponse for DeskError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_body) = match self {
            DeskError::Validation(reason) => (
                StatusCode::BAD_REQUEST,
                ApiErrorBody {
                    code: "VALIDATION_ERROR".to_string(),
                    message: reason,
                },
            ),
            DeskError::DuplicateIdentifier => (
                StatusCode::BAD_REQUEST,
                ApiErrorBody {
                    code: "DUPLICATE_IDENTIFIER".to_string(),
                    message: "An account with this identifier already exists.".to_string(),
                },
            ),
            DeskError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                ApiErrorBody {
                    code: "INVALID_CREDENTIALS".to_string(),
                    message: "Invalid identifier or secret.".to_string(),
                },
            ),
            DeskError::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                ApiErrorBody {
                    code: "PAYLOAD_TOO_LARGE".to_string(),
                    message: "request body too large".to_string(),
                },
            ),
            DeskError::DatabaseError(_)
            | DeskError::PasswordHash(_)
            | DeskError::HashParams(_)
            | DeskError::Blocking(_) => {
                error!(error = %self, "request failed with internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiErrorBody {
                        code: "INTERNAL_ERROR".to_string(),
                        message: "An internal server error occurred.".to_string(),
                    },
                )
            }
        };
        (status, Json(ApiErrorResponse { error: error_body })).into_response()
    }
}

/// Standardized API error response body
#[derive(Serialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}
