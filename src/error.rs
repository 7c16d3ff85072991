//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the application.
//! Every failure a request can hit is translated into one of a small set of variants,
//! each with a fixed HTTP status and a JSON body of the form `{"detail": "..."}`.
//!
//! Authentication failures are deliberately uniform: whatever went wrong with a token,
//! the caller only ever sees `AppError::Unauthenticated`. Internal failures are logged
//! with their real cause and rendered with a fixed generic message.

use actix_web::{
    dev::ServiceResponse,
    error::{JsonPayloadError, PathError, ResponseError},
    http::StatusCode,
    middleware::{ErrorHandlerResponse, ErrorHandlers},
    HttpRequest, HttpResponse,
};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

use crate::auth::token::InvalidToken;

/// Message returned for every 401 on a protected route.
pub const UNAUTHENTICATED_DETAIL: &str = "Could not validate credentials";
/// Message returned when signin fails, whether the email is unknown or the password wrong.
pub const INVALID_CREDENTIALS_DETAIL: &str = "Invalid email or password";
/// Message returned for every 500.
pub const INTERNAL_DETAIL: &str = "Internal server error";

/// Represents all possible errors that can occur within the application.
#[derive(Debug)]
pub enum AppError {
    /// Malformed input shape or a violated field constraint (HTTP 400).
    Validation(String),
    /// The resource already exists, e.g. a duplicate email (HTTP 400).
    ///
    /// 409 would be the conventional code; clients of this API expect 400.
    Conflict(String),
    /// Missing, malformed, forged or expired token, or a token whose user no longer
    /// exists (HTTP 401). Carries no detail on purpose.
    Unauthenticated,
    /// Email/password pair did not match a user (HTTP 401).
    InvalidCredentials,
    /// The resource does not exist or is not owned by the caller (HTTP 404).
    NotFound(String),
    /// A storage operation failed (HTTP 500).
    Database(String),
    /// Any other unexpected server-side failure (HTTP 500).
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Validation(msg) => write!(f, "Validation Error: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::Unauthenticated => write!(f, "Unauthenticated"),
            AppError::InvalidCredentials => write!(f, "Invalid Credentials"),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::Database(msg) => write!(f, "Database Error: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal Server Error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl AppError {
    /// The message exposed to the client. Internal causes never leave the server.
    pub fn detail(&self) -> &str {
        match self {
            AppError::Validation(msg) | AppError::Conflict(msg) | AppError::NotFound(msg) => msg,
            AppError::Unauthenticated => UNAUTHENTICATED_DETAIL,
            AppError::InvalidCredentials => INVALID_CREDENTIALS_DETAIL,
            AppError::Database(_) | AppError::Internal(_) => INTERNAL_DETAIL,
        }
    }
}

/// Converts `AppError` variants into `HttpResponse` objects.
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::Conflict(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthenticated | AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let AppError::Database(cause) | AppError::Internal(cause) = self {
            log::error!("request failed: {}", cause);
        }
        HttpResponse::build(self.status_code()).json(json!({
            "detail": self.detail()
        }))
    }
}

/// Converts `sqlx::Error` into `AppError`.
///
/// A unique violation can only come from `users.email`, so it becomes a `Conflict`.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match &error {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::Conflict("Email already registered".into())
            }
            _ => AppError::Database(error.to_string()),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::Validation(error.to_string())
    }
}

/// Every token failure collapses into the same outcome.
impl From<InvalidToken> for AppError {
    fn from(_: InvalidToken) -> AppError {
        AppError::Unauthenticated
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::Internal(format!("bcrypt failure: {}", error))
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(error: tokio::task::JoinError) -> AppError {
        AppError::Internal(format!("blocking task failed: {}", error))
    }
}

/// Error handler for `web::Json` extraction failures (bad JSON, missing fields).
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::Validation(err.to_string()).into()
}

/// Error handler for `web::Path` extraction failures. A malformed todo id is a 400.
pub fn path_error_handler(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    log::debug!("rejecting malformed path parameter: {}", err);
    AppError::Validation("Invalid todo ID format".into()).into()
}

/// Outermost safety net: whatever produced a 500, the client gets the generic body.
pub fn internal_error_handlers<B: 'static>() -> ErrorHandlers<B> {
    ErrorHandlers::new().handler(StatusCode::INTERNAL_SERVER_ERROR, render_internal_error)
}

fn render_internal_error<B>(
    res: ServiceResponse<B>,
) -> actix_web::Result<ErrorHandlerResponse<B>> {
    let (req, _) = res.into_parts();
    let response = HttpResponse::InternalServerError().json(json!({
        "detail": INTERNAL_DETAIL
    }));
    let res = ServiceResponse::new(req, response)
        .map_into_boxed_body()
        .map_into_right_body::<B>();
    Ok(ErrorHandlerResponse::Response(res))
}
