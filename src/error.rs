//! Structured error types for API responses.

use crate::nextdate::NextDateError;
use serde::Serialize;
use std::fmt;

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Validation errors (400)
    MissingTitle,
    InvalidDateFormat,
    InvalidRepeatRule,
    MissingId,
    InvalidId,
    InvalidBody,

    // Not found errors (404)
    TaskNotFound,

    // Internal errors (500)
    DatabaseError,
    InternalError,
}

/// Structured error carried through service and HTTP layers.
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    // Convenience constructors

    pub fn missing_title() -> Self {
        Self::new(ErrorCode::MissingTitle, "title is required")
    }

    pub fn invalid_date_format(value: &str) -> Self {
        Self::new(
            ErrorCode::InvalidDateFormat,
            format!("invalid date: {}, expected YYYYMMDD", value),
        )
    }

    pub fn invalid_repeat_rule(err: NextDateError) -> Self {
        Self::new(
            ErrorCode::InvalidRepeatRule,
            format!("invalid repeat rule: {}", err),
        )
    }

    pub fn missing_id() -> Self {
        Self::new(ErrorCode::MissingId, "id is required")
    }

    pub fn invalid_id(value: &str) -> Self {
        Self::new(ErrorCode::InvalidId, format!("invalid id: {}", value))
    }

    pub fn invalid_body(err: impl fmt::Display) -> Self {
        Self::new(ErrorCode::InvalidBody, format!("invalid request body: {}", err))
    }

    pub fn task_not_found(id: i64) -> Self {
        Self::new(ErrorCode::TaskNotFound, format!("task not found: {}", id))
    }

    pub fn database(err: impl fmt::Display) -> Self {
        Self::new(ErrorCode::DatabaseError, err.to_string())
    }

    pub fn internal(err: impl fmt::Display) -> Self {
        Self::new(ErrorCode::InternalError, err.to_string())
    }

    /// Whether this error is the client's fault (400/404) rather than ours.
    pub fn is_client_error(&self) -> bool {
        !matches!(
            self.code,
            ErrorCode::DatabaseError | ErrorCode::InternalError
        )
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

// Allow using ? with anyhow errors from the db layer by converting them
impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<ApiError>() {
            Ok(api_err) => api_err,
            Err(err) => ApiError::database(err),
        }
    }
}

/// Result type for service operations.
pub type ApiResult<T> = std::result::Result<T, ApiError>;
