/// Error handling for the API server
///
/// Handlers return `ApiResult<T>`; the error half converts into an HTTP
/// response with a plain-text body the client can show as-is.
///
/// # Example
///
/// ```
/// use kanban_api::error::{ApiError, ApiResult};
///
/// fn require_name(name: &str) -> ApiResult<&str> {
///     let name = name.trim();
///     if name.is_empty() {
///         return Err(ApiError::BadRequest("Name is required".to_string()));
///     }
///     Ok(name)
/// }
///
/// assert!(require_name("  ").is_err());
/// ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use kanban_shared::access::AccessError;
use std::fmt;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400): malformed ids, bodies or field values
    BadRequest(String),

    /// Forbidden (403): caller is not a member of the owning space
    Forbidden(String),

    /// Not found (404)
    NotFound(String),

    /// Conflict (409): unique constraint violations
    Conflict(String),

    /// Internal server error (500)
    InternalError(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = match self {
            ApiError::InternalError(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }
            ApiError::BadRequest(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg) => msg,
        };

        (status, message).into_response()
    }
}

/// Convert sqlx errors to API errors
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db_err) => {
                if db_err.is_unique_violation() {
                    return match db_err.constraint() {
                        Some("board_columns_project_name_key") => {
                            ApiError::Conflict("Column name already exists".to_string())
                        }
                        Some(constraint) => {
                            ApiError::Conflict(format!("Constraint violation: {}", constraint))
                        }
                        None => ApiError::Conflict("Duplicate value".to_string()),
                    };
                }

                ApiError::InternalError(format!("Database error: {}", db_err))
            }
            _ => ApiError::InternalError(format!("Database error: {}", err)),
        }
    }
}

/// Convert access check failures to API errors
impl From<AccessError> for ApiError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::SpaceDenied(_) => ApiError::Forbidden("No access to space".to_string()),
            AccessError::ProjectDenied(_) => {
                ApiError::Forbidden("No access to project".to_string())
            }
            AccessError::TaskDenied(_) => ApiError::Forbidden("No access to task".to_string()),
            AccessError::TaskNotFound(_) => ApiError::NotFound("Task not found".to_string()),
            AccessError::DatabaseError(err) => err.into(),
        }
    }
}
