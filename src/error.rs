//! Error handling module
//!
//! Centralized error types and HTTP response conversion. Every response body
//! is a `BaseMessage` carrying a numeric code and a localized message; domain
//! errors use their stable codes, unexpected faults are logged and collapse
//! into the generic "contact support" message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::domain::{Locale, ShopError};
use crate::messages;

/// Application-wide Result type
pub type AppResult<T> = Result<T, AppError>;

/// Code for unexpected, non-domain failures.
const GENERIC_FAILURE_CODE: i32 = 100;
/// Code for malformed requests rejected at the boundary.
const INVALID_REQUEST_CODE: i32 = 101;
/// Code for a registration attempt with an occupied username.
const USERNAME_TAKEN_CODE: i32 = 102;
/// Code for a bounded lock-wait timeout; the client may retry.
const LOCK_TIMEOUT_CODE: i32 = 103;

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain rule violation, paired with the request locale so the
    /// response message can be rendered in the caller's language.
    #[error("{source}")]
    Domain { source: ShopError, locale: Locale },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Username already taken: {username}")]
    UsernameTaken { username: String, locale: Locale },

    /// A row-lock wait exceeded the configured bound; retryable.
    #[error("Lock wait timed out, please retry")]
    LockTimeout,

    // Server errors (5xx)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

impl AppError {
    /// Wrap a domain error with the locale of the current request.
    pub fn domain(source: ShopError, locale: Locale) -> Self {
        Self::Domain { source, locale }
    }
}

impl From<ShopError> for AppError {
    fn from(source: ShopError) -> Self {
        Self::Domain {
            source,
            locale: Locale::default(),
        }
    }
}

/// Response envelope: numeric code plus human-readable message.
/// Code 0 means success.
#[derive(Debug, Clone, Serialize)]
pub struct BaseMessage {
    pub code: i32,
    pub message: String,
}

impl BaseMessage {
    pub fn ok() -> Self {
        Self {
            code: 0,
            message: "OK".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::Domain { source, locale } => {
                let status = if source.is_not_found() {
                    StatusCode::NOT_FOUND
                } else if matches!(source, ShopError::UnauthorizedAccess) {
                    StatusCode::FORBIDDEN
                } else {
                    StatusCode::BAD_REQUEST
                };
                (
                    status,
                    BaseMessage {
                        code: source.code(),
                        message: messages::render(source, *locale),
                    },
                )
            }

            AppError::InvalidRequest(msg) => (
                StatusCode::BAD_REQUEST,
                BaseMessage {
                    code: INVALID_REQUEST_CODE,
                    message: msg.clone(),
                },
            ),

            AppError::UsernameTaken { locale, .. } => (
                StatusCode::BAD_REQUEST,
                BaseMessage {
                    code: USERNAME_TAKEN_CODE,
                    message: messages::username_taken(*locale).to_string(),
                },
            ),

            AppError::LockTimeout => (
                StatusCode::CONFLICT,
                BaseMessage {
                    code: LOCK_TIMEOUT_CODE,
                    message: "Operation conflicted with another request, please retry".to_string(),
                },
            ),

            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    BaseMessage {
                        code: GENERIC_FAILURE_CODE,
                        message: messages::generic_failure(Locale::default()).to_string(),
                    },
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    BaseMessage {
                        code: GENERIC_FAILURE_CODE,
                        message: messages::generic_failure(Locale::default()).to_string(),
                    },
                )
            }
            AppError::Config(e) => {
                tracing::error!("Config error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    BaseMessage {
                        code: GENERIC_FAILURE_CODE,
                        message: messages::generic_failure(Locale::default()).to_string(),
                    },
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
