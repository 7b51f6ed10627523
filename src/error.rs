use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;
use tracing::error;

#[derive(Debug, ThisError)]
pub enum LinkpageError {
    #[error("Profile not found")]
    ProfileNotFound,

    #[error("Link not found")]
    LinkNotFound,

    #[error("Not signed in")]
    Unauthenticated,

    #[error("{0}")]
    AuthFailure(String),

    #[error("Invalid login credentials")]
    InvalidCredentials,

    #[error("{0}")]
    InvalidInput(String),

    #[error("Username already taken")]
    UsernameTaken,

    #[error("Email already registered")]
    EmailTaken,

    #[error("Password hashing error: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),

    #[error("Blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] SqlxError),
}

impl LinkpageError {
    /// True when the database rejected a write because of a UNIQUE index.
    pub fn is_unique_violation(&self) -> bool {
        match self {
            LinkpageError::DatabaseError(e) => e
                .as_database_error()
                .is_some_and(|db| db.is_unique_violation()),
            _ => false,
        }
    }
}

impl From<JsonRejection> for LinkpageError {
    fn from(rejection: JsonRejection) -> Self {
        LinkpageError::InvalidInput(rejection.body_text())
    }
}

impl From<PathRejection> for LinkpageError {
    fn from(rejection: PathRejection) -> Self {
        LinkpageError::InvalidInput(rejection.body_text())
    }
}

impl IntoResponse for LinkpageError {
    fn into_response(self) -> axum::response::Response {
        let (status, code) = match &self {
            LinkpageError::ProfileNotFound | LinkpageError::LinkNotFound => {
                (StatusCode::NOT_FOUND, "NOT_FOUND")
            }
            LinkpageError::Unauthenticated
            | LinkpageError::AuthFailure(_)
            | LinkpageError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            LinkpageError::InvalidInput(_) => (StatusCode::UNPROCESSABLE_ENTITY, "INVALID_INPUT"),
            LinkpageError::UsernameTaken | LinkpageError::EmailTaken => {
                (StatusCode::CONFLICT, "CONFLICT")
            }
            LinkpageError::PasswordHash(_)
            | LinkpageError::Join(_)
            | LinkpageError::Config(_)
            | LinkpageError::DatabaseError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        };

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %self, "request failed");
            "An internal server error occurred.".to_string()
        } else {
            self.to_string()
        };

        let body = ApiErrorBody {
            code: code.to_string(),
            message,
        };
        (status, Json(ApiErrorResponse { error: body })).into_response()
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
