use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::constants::*;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    #[error("Session layer missing: {0}")]
    SessionLayer(&'static str),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Token error: {0}")]
    Token(String),

    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),

    #[error("Malformed multipart body: {0}")]
    Multipart(#[from] MultipartError),

    #[error("Missing required fields")]
    MissingFields,

    #[error("Invalid security code")]
    InvalidSecurityCode,

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("User already exists")]
    UserAlreadyExists,

    #[error("No file part")]
    NoFilePart,

    #[error("No selected file")]
    NoSelectedFile,

    #[error("No file provided")]
    NoFileProvided,

    #[error("No file selected")]
    NoFileSelected,

    #[error("File type not allowed")]
    FileTypeNotAllowed,

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Implement IntoResponse to convert AppError into HTTP responses
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Database(ref e) => {
                tracing::error!("Database error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
            AppError::Session(ref e) => {
                tracing::error!("Session error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
            AppError::SessionLayer(reason) => {
                tracing::error!("Session layer missing: {}", reason);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
            AppError::Io(ref e) => {
                tracing::error!("I/O error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
            AppError::PasswordHash(ref e) => {
                tracing::error!("Password hashing error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
            AppError::Token(ref e) => {
                tracing::error!("Token error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
            AppError::TaskJoin(ref e) => {
                tracing::error!("Task join error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
            AppError::Multipart(ref e) => {
                tracing::warn!("Rejected multipart body: {}", e);
                match e.status() {
                    StatusCode::PAYLOAD_TOO_LARGE => {
                        (StatusCode::PAYLOAD_TOO_LARGE, ERR_UPLOAD_TOO_LARGE)
                    }
                    status => (status, "Malformed multipart body"),
                }
            }
            AppError::MissingFields => (StatusCode::BAD_REQUEST, ERR_MISSING_FIELDS),
            AppError::InvalidSecurityCode => (StatusCode::UNAUTHORIZED, "Invalid security code"),
            AppError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Invalid username or password")
            }
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized"),
            AppError::UserAlreadyExists => (StatusCode::CONFLICT, "User already exists"),
            AppError::NoFilePart => (StatusCode::BAD_REQUEST, ERR_NO_FILE_PART),
            AppError::NoSelectedFile => (StatusCode::BAD_REQUEST, ERR_NO_SELECTED_FILE),
            AppError::NoFileProvided => (StatusCode::BAD_REQUEST, ERR_NO_FILE_PROVIDED),
            AppError::NoFileSelected => (StatusCode::BAD_REQUEST, ERR_NO_FILE_SELECTED),
            AppError::FileTypeNotAllowed => (StatusCode::BAD_REQUEST, ERR_FILE_TYPE_NOT_ALLOWED),
            AppError::InvalidInput(ref msg) => (StatusCode::BAD_REQUEST, msg.as_str()),
        };

        let body = Json(json!({
            "status": "error",
            "message": message
        }));

        (status, body).into_response()
    }
}

/// Result type alias for application results
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = [
            (AppError::MissingFields, StatusCode::BAD_REQUEST),
            (AppError::InvalidSecurityCode, StatusCode::UNAUTHORIZED),
            (AppError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (AppError::Unauthorized, StatusCode::UNAUTHORIZED),
            (AppError::UserAlreadyExists, StatusCode::CONFLICT),
            (AppError::FileTypeNotAllowed, StatusCode::BAD_REQUEST),
            (
                AppError::Token("bad key".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }
}
