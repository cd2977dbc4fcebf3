//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the service.
//! Every failure a request can hit, from a malformed body to a lost database
//! connection, ends up as one of its variants.
//!
//! `AppError` implements `actix_web::error::ResponseError`, so handlers can return
//! `Result<_, AppError>` and let Actix Web render the matching status code with a
//! `{"error": "..."}` JSON body. Storage faults are logged in full where they are
//! converted and reach the client only as a generic message.

use crate::store::postgres::LIVE_EMAIL_INDEX;
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// Message returned to clients for every storage fault.
pub const GENERIC_STORAGE_MESSAGE: &str = "Internal server error";

/// Represents all possible errors that can occur within the service.
#[derive(Debug)]
pub enum AppError {
    /// The request body could not be parsed (HTTP 400).
    BadRequest(String),
    /// The payload parsed but broke one or more field rules (HTTP 400).
    /// The message names every failing field.
    ValidationError(String),
    /// No live record matched the identifier (HTTP 404).
    NotFound(String),
    /// Another live user already holds the email (HTTP 409).
    Conflict(String),
    /// The backing store failed (HTTP 500). The detail is server-side only.
    DatabaseError(String),
    /// Any other server-side failure, e.g. password hashing (HTTP 500).
    InternalServerError(String),
}

impl AppError {
    pub fn user_not_found() -> Self {
        AppError::NotFound("User not found".into())
    }

    pub fn email_taken() -> Self {
        AppError::Conflict("Email already registered".into())
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

/// Converts `AppError` variants into `HttpResponse` objects.
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) | AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AppError::BadRequest(msg)
            | AppError::ValidationError(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg) => msg.as_str(),
            // Internal details were logged where they happened; never echo them.
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => {
                GENERIC_STORAGE_MESSAGE
            }
        };
        HttpResponse::build(self.status_code()).json(json!({ "error": message }))
    }
}

/// Converts `sqlx::Error` into `AppError`.
///
/// `RowNotFound` is an expected outcome and becomes `NotFound`. A violation of
/// the live-email index becomes `Conflict`. Anything else, other unique
/// constraints included, is a storage fault and is logged here with full detail.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::user_not_found(),
            sqlx::Error::Database(ref db_error)
                if db_error.is_unique_violation()
                    && db_error.constraint() == Some(LIVE_EMAIL_INDEX) =>
            {
                AppError::email_taken()
            }
            _ => {
                log::error!("storage fault: {}", error);
                AppError::DatabaseError(error.to_string())
            }
        }
    }
}

/// Converts `validator::ValidationErrors` into `AppError::ValidationError`.
///
/// Fields are listed alphabetically so the message is stable between requests.
impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> AppError {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by_key(|(field, _)| *field);

        let message = fields
            .into_iter()
            .flat_map(|(field, field_errors)| {
                field_errors.iter().map(move |e| match &e.message {
                    Some(msg) => format!("{}: {}", field, msg),
                    None => format!("{}: failed '{}' rule", field, e.code),
                })
            })
            .collect::<Vec<_>>()
            .join("; ");

        AppError::ValidationError(message)
    }
}

/// Converts `bcrypt::BcryptError` into `AppError::InternalServerError`.
impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        log::error!("password hashing failed: {}", error);
        AppError::InternalServerError(error.to_string())
    }
}
