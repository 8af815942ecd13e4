// HTTP application error types
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::auth::PasswordError;
use crate::database::DatabaseError;
use crate::views::{self, ErrorTemplate};

static TEXT_500: &str = "An internal error occurred; an appropriate response was inconstructable.";

/// Application error with appropriate status codes and user-facing messages
#[derive(Debug)]
pub enum AppError {
    // 400 Bad Request - one message per failed rule
    Validation(Vec<String>),

    // 401 Unauthorized - bad credentials or no session
    Authentication(String),

    // 403 Forbidden - authenticated but wrong role or hostel scope
    Authorization(String),

    // 404 Not Found
    NotFound(String),

    // 409 Conflict
    Conflict(String),

    // 500 Internal Server Error
    Server(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Authentication(_) => StatusCode::UNAUTHORIZED,
            AppError::Authorization(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-safe messages, in display order
    pub fn messages(&self) -> Vec<String> {
        match self {
            AppError::Validation(messages) => messages.clone(),
            other => vec![other.message().to_string()],
        }
    }

    pub fn message(&self) -> &str {
        match self {
            AppError::Validation(messages) => messages
                .first()
                .map(String::as_str)
                .unwrap_or("Invalid input"),
            AppError::Authentication(msg) => msg,
            AppError::Authorization(msg) => msg,
            AppError::NotFound(msg) => msg,
            AppError::Conflict(msg) => msg,
            AppError::Server(msg) => msg,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Authentication(_) => "AUTHENTICATION_ERROR",
            AppError::Authorization(_) => "AUTHORIZATION_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::Server(_) => "SERVER_ERROR",
        }
    }
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation(vec![message.into()])
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        AppError::Authentication(message.into())
    }

    pub fn authorization(message: impl Into<String>) -> Self {
        AppError::Authorization(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        AppError::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        AppError::Conflict(message.into())
    }

    pub fn server(message: impl Into<String>) -> Self {
        AppError::Server(message.into())
    }
}

impl From<DatabaseError> for AppError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound(msg) => AppError::not_found(msg),
            DatabaseError::Duplicate(_) => AppError::conflict("Record already exists"),
            other => {
                // Log the real error but return generic message
                tracing::error!("Database error: {}", other);
                AppError::server("Server Error")
            }
        }
    }
}

impl From<PasswordError> for AppError {
    fn from(err: PasswordError) -> Self {
        tracing::error!("{}", err);
        AppError::server("Server Error")
    }
}

impl From<askama::Error> for AppError {
    fn from(err: askama::Error) -> Self {
        tracing::error!("Template rendering failed: {}", err);
        AppError::server("Server Error")
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let page = ErrorTemplate::new(status, self.message());
        match views::render(&page) {
            Ok(html) => (status, html).into_response(),
            Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, Html(TEXT_500)).into_response(),
        }
    }
}
