/// Error handling for the API server
///
/// A single `ApiError` maps every failure a handler can hit onto an
/// HTTP response. Handlers return `ApiResult<T>` and rely on the
/// `From` impls below to lift store/auth errors into the right status
/// code. Internal details (hashing failures, database errors) are
/// logged and replaced with a generic message; clients never see
/// them. Login failures never reveal whether the username or the
/// password was wrong.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;

use taskforge_shared::auth::jwt::JwtError;
use taskforge_shared::auth::password::PasswordError;
use taskforge_shared::error::StoreError;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400)
    BadRequest(String),

    /// Unauthorized (401) - missing/invalid credentials or token
    Unauthorized(String),

    /// Forbidden (403) - authenticated but not allowed
    Forbidden(String),

    /// Not found (404)
    NotFound(String),

    /// Conflict (409) - duplicate id or username
    Conflict(String),

    /// Unprocessable entity (422) - field validation failures
    ValidationError(Vec<ValidationErrorDetail>),

    /// Internal server error (500)
    InternalError(String),

    /// Service unavailable (503) - store timed out
    ServiceUnavailable(String),
}

/// Validation error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code (e.g., "not_found", "conflict")
    pub error: String,

    /// Human-readable, user-safe message
    pub message: String,

    /// Optional validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationErrorDetail>>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::ValidationError(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
            ApiError::ServiceUnavailable(msg) => write!(f, "Service unavailable: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg, None),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg, None),
            ApiError::ValidationError(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error",
                "Request validation failed".to_string(),
                Some(errors),
            ),
            ApiError::InternalError(msg) => {
                // Log the detail, return a generic body
                tracing::error!("internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
            ApiError::ServiceUnavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "service_unavailable", msg, None)
            }
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

/// Maps the store taxonomy to HTTP semantics: duplicates are
/// conflicts, ownership misses are forbidden (the caller is
/// authenticated, just not the owner), store timeouts read as the
/// service being unavailable.
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateId(id) => {
                ApiError::Conflict(format!("id '{}' already exists", id))
            }
            StoreError::DuplicateUsername(name) => {
                ApiError::Conflict(format!("username '{}' already exists", name))
            }
            StoreError::NotFound => ApiError::NotFound("Resource not found".to_string()),
            StoreError::Unauthorized(_) => {
                ApiError::Forbidden("You are not the owner of this resource".to_string())
            }
            StoreError::BootstrapViolation => {
                ApiError::Forbidden("The first registered user must be an ADMIN".to_string())
            }
            StoreError::Timeout => {
                ApiError::ServiceUnavailable("Storage did not respond in time".to_string())
            }
            StoreError::Database(e) => ApiError::InternalError(format!("database error: {}", e)),
        }
    }
}

impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Expired => ApiError::Unauthorized("Token expired".to_string()),
            JwtError::Invalid(_) | JwtError::WrongTokenType { .. } => {
                ApiError::Unauthorized("Invalid token".to_string())
            }
            JwtError::Create(msg) => ApiError::InternalError(format!("token signing: {}", msg)),
        }
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::InternalError(format!("password operation failed: {}", err))
    }
}

/// Flattens validator's nested field errors into response details
pub fn validation_error(errors: validator::ValidationErrors) -> ApiError {
    let details: Vec<ValidationErrorDetail> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| ValidationErrorDetail {
                field: field.to_string(),
                message: error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "Validation failed".to_string()),
            })
        })
        .collect();
    ApiError::ValidationError(details)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_error_display() {
        let err = ApiError::BadRequest("Invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: Invalid input");

        let err = ApiError::NotFound("Task not found".to_string());
        assert_eq!(err.to_string(), "Not found: Task not found");
    }

    #[test]
    fn test_store_error_mapping() {
        let err: ApiError = StoreError::DuplicateUsername("alice".to_string()).into();
        assert!(matches!(err, ApiError::Conflict(_)));

        let err: ApiError = StoreError::Unauthorized(Uuid::new_v4()).into();
        assert!(matches!(err, ApiError::Forbidden(_)));

        let err: ApiError = StoreError::BootstrapViolation.into();
        assert!(matches!(err, ApiError::Forbidden(_)));

        let err: ApiError = StoreError::NotFound.into();
        assert!(matches!(err, ApiError::NotFound(_)));

        let err: ApiError = StoreError::Timeout.into();
        assert!(matches!(err, ApiError::ServiceUnavailable(_)));
    }

    #[test]
    fn test_jwt_error_mapping() {
        let err: ApiError = JwtError::Expired.into();
        assert!(matches!(err, ApiError::Unauthorized(_)));

        let err: ApiError = JwtError::Create("boom".to_string()).into();
        assert!(matches!(err, ApiError::InternalError(_)));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::Forbidden("no".to_string()).into_response().status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::ValidationError(vec![]).into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::ServiceUnavailable("slow".to_string())
                .into_response()
                .status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
