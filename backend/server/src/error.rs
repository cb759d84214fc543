use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use ink::PageError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Malformed payload: {0}")]
    MalformedPayload(&'static str),

    #[error("Invalid search pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("Missing or invalid user identity")]
    Unauthorized,

    #[error("Note not found")]
    NoteNotFound,

    #[error("Drawing session not found")]
    SessionNotFound,

    #[error(transparent)]
    Page(#[from] PageError),

    #[error("Storage unavailable: {0}")]
    Storage(#[from] redis::RedisError),

    #[error("Stored note is unreadable: {0}")]
    CorruptNote(#[from] serde_json::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::MalformedPayload { .. } | AppError::InvalidPattern { .. } => {
                StatusCode::BAD_REQUEST
            }
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::NoteNotFound | AppError::SessionNotFound => StatusCode::NOT_FOUND,
            AppError::Page { .. } => StatusCode::CONFLICT,
            AppError::Storage { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::CorruptNote { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, self.to_string()).into_response()
    }
}
