//!
//! # Error Handling
//!
//! `AppError` is the single error type shared by the stores, the services and the
//! HTTP handlers. It implements `actix_web::error::ResponseError`, so a handler can
//! return `Result<_, AppError>` and the client receives a JSON body of the form
//! `{"error": "<message>", "code": "<machine code>"}`.
//!
//! Server-side failures (database, hashing, token signing) keep their detail for
//! the log only; the client sees a generic message.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

const INTERNAL_MESSAGE: &str = "internal server error";

/// Represents all possible errors that can occur within the application.
#[derive(Debug)]
pub enum AppError {
    /// Missing or malformed input (HTTP 400).
    ValidationError(String),
    /// A request body that could not be parsed at all (HTTP 400).
    BadRequest(String),
    /// Registration with an email that already belongs to a user (HTTP 400).
    DuplicateEmail,
    /// Login with an email that has no account (HTTP 400).
    UserNotFound,
    /// Login with a wrong password (HTTP 400).
    InvalidCredentials,
    /// Rejected by the auth gateway (HTTP 401).
    Unauthorized(String),
    /// The requested resource does not exist or is not owned by the caller (HTTP 404).
    NotFound(String),
    /// Unexpected server-side failure (HTTP 500).
    InternalServerError(String),
    /// Failure reported by the persistence layer (HTTP 500).
    DatabaseError(String),
}

impl AppError {
    /// Stable machine-readable code sent alongside the message.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "validation_error",
            AppError::BadRequest(_) => "bad_request",
            AppError::DuplicateEmail => "duplicate_email",
            AppError::UserNotFound => "user_not_found",
            AppError::InvalidCredentials => "invalid_credentials",
            AppError::Unauthorized(_) => "unauthorized",
            AppError::NotFound(_) => "not_found",
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => "internal_error",
        }
    }

    /// Message safe to show to the client.
    pub fn public_message(&self) -> String {
        match self {
            AppError::ValidationError(msg)
            | AppError::BadRequest(msg)
            | AppError::Unauthorized(msg)
            | AppError::NotFound(msg) => msg.clone(),
            AppError::DuplicateEmail => "email is already registered".into(),
            AppError::UserNotFound => "user not found".into(),
            AppError::InvalidCredentials => "invalid credentials".into(),
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                INTERNAL_MESSAGE.into()
            }
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::DuplicateEmail => write!(f, "Duplicate Email"),
            AppError::UserNotFound => write!(f, "User Not Found"),
            AppError::InvalidCredentials => write!(f, "Invalid Credentials"),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::BadRequest(_)
            | AppError::DuplicateEmail
            | AppError::UserNotFound
            | AppError::InvalidCredentials => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code().is_server_error() {
            log::error!("{}", self);
        }
        HttpResponse::build(self.status_code()).json(json!({
            "error": self.public_message(),
            "code": self.code(),
        }))
    }
}

/// `RowNotFound` becomes `NotFound`; everything else is a database failure.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound("record not found".into()),
            _ => AppError::DatabaseError(error.to_string()),
        }
    }
}

/// Keeps the message of the first failing field, falling back to the full report.
impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        let first_message = error
            .field_errors()
            .values()
            .flat_map(|errors| errors.iter())
            .find_map(|e| e.message.as_ref().map(|m| m.to_string()));
        AppError::ValidationError(first_message.unwrap_or_else(|| error.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[test]
    fn test_error_statuses() {
        let cases = vec![
            (AppError::ValidationError("bad".into()), 400),
            (AppError::BadRequest("bad json".into()), 400),
            (AppError::DuplicateEmail, 400),
            (AppError::UserNotFound, 400),
            (AppError::InvalidCredentials, 400),
            (AppError::Unauthorized("invalid token".into()), 401),
            (AppError::NotFound("task not found".into()), 404),
            (AppError::InternalServerError("boom".into()), 500),
            (AppError::DatabaseError("pool timed out".into()), 500),
        ];

        for (error, status) in cases {
            assert_eq!(error.error_response().status(), status, "{}", error);
        }
    }

    #[actix_rt::test]
    async fn test_internal_detail_is_not_exposed() {
        let error = AppError::DatabaseError("password authentication failed for user".into());
        let body = to_bytes(error.error_response().into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json["error"], "internal server error");
        assert_eq!(json["code"], "internal_error");
    }

    #[actix_rt::test]
    async fn test_body_carries_message_and_code() {
        let error = AppError::DuplicateEmail;
        let body = to_bytes(error.error_response().into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json["error"], "email is already registered");
        assert_eq!(json["code"], "duplicate_email");
    }

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        assert!(matches!(
            AppError::from(sqlx::Error::RowNotFound),
            AppError::NotFound(_)
        ));
    }
}
