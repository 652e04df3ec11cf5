/// Error handling for the API server
///
/// This module provides a unified error type that maps to HTTP responses.
/// All handlers return `Result<T, ApiError>` which automatically converts to
/// the appropriate HTTP status code with a body of the shape
/// `{"message": "...", "error": "..."}` — the `error` field carries internal
/// detail and is emitted only when the server is not running in production
/// mode.
///
/// # Taxonomy
///
/// - `Unauthorized` (401): missing/invalid/expired token
/// - `Forbidden` (403): valid token, insufficient role or protected target
/// - `BadRequest` / `ValidationError` (400): malformed input, illegal status
///   transition
/// - `NotFound` (404): referenced id does not exist
/// - `Conflict` (409): uniqueness violation or referential-guard rejection,
///   always with a human-readable count/detail
/// - `InternalError` (500): unexpected store/runtime failure

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

use taskdesk_shared::auth::{authorization::AuthzError, jwt::JwtError, password::PasswordError};
use taskdesk_shared::models::{
    area::DeleteAreaError, company::DeleteCompanyError, user::DeleteUserError,
};

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Whether internal error detail is echoed to clients
///
/// Set once at startup from the config; defaults to exposing detail
/// (development behavior) until then.
static EXPOSE_INTERNAL_DETAIL: OnceLock<bool> = OnceLock::new();

/// Records the production flag for error rendering
///
/// Called once when the application state is built. Later calls are no-ops.
pub fn set_production_mode(production: bool) {
    let _ = EXPOSE_INTERNAL_DETAIL.set(!production);
}

fn expose_internal_detail() -> bool {
    *EXPOSE_INTERNAL_DETAIL.get().unwrap_or(&true)
}

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400)
    BadRequest(String),

    /// Unauthorized (401)
    Unauthorized(String),

    /// Forbidden (403)
    Forbidden(String),

    /// Not found (404)
    NotFound(String),

    /// Conflict (409) - duplicate unique field or referential-guard rejection
    Conflict(String),

    /// Validation failure (400) with per-field detail
    ValidationError(Vec<ValidationErrorDetail>),

    /// Internal server error (500)
    InternalError(String),
}

/// Validation error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

/// Error response body
///
/// `error` is present only outside production mode (internal detail) or for
/// validation failures (the per-field summary the client needs).
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub message: String,

    /// Optional detail
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
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
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, detail) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg, None),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg, None),
            ApiError::ValidationError(errors) => {
                let joined = errors
                    .iter()
                    .map(|e| format!("{}: {}", e.field, e.message))
                    .collect::<Vec<_>>()
                    .join("; ");
                (
                    StatusCode::BAD_REQUEST,
                    "Request validation failed".to_string(),
                    Some(joined),
                )
            }
            ApiError::InternalError(msg) => {
                // Always log the real failure; only echo it outside production
                tracing::error!("Internal error: {}", msg);
                let detail = expose_internal_detail().then_some(msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                    detail,
                )
            }
        };

        let body = Json(ErrorResponse {
            message,
            error: detail,
        });

        (status, body).into_response()
    }
}

/// Convert sqlx errors to API errors
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db_err) => {
                // Check for unique and foreign-key constraint violations
                if let Some(constraint) = db_err.constraint() {
                    if constraint.contains("email") {
                        return ApiError::Conflict("Email already exists".to_string());
                    }
                    if constraint.contains("nit") {
                        return ApiError::Conflict("NIT already exists".to_string());
                    }
                    if constraint.contains("tax_id") {
                        return ApiError::Conflict("Tax id already exists".to_string());
                    }
                    if db_err.is_foreign_key_violation() {
                        return ApiError::BadRequest(
                            "Referenced row does not exist".to_string(),
                        );
                    }
                    return ApiError::Conflict(format!("Constraint violation: {}", constraint));
                }

                ApiError::InternalError(format!("Database error: {}", db_err))
            }
            _ => ApiError::InternalError(format!("Database error: {}", err)),
        }
    }
}

/// Convert validator failures to API errors
impl From<validator::ValidationErrors> for ApiError {
    fn from(e: validator::ValidationErrors) -> Self {
        let errors: Vec<ValidationErrorDetail> = e
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
        ApiError::ValidationError(errors)
    }
}

/// Convert JWT errors to API errors
impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Expired => ApiError::Unauthorized("Token expired".to_string()),
            JwtError::InvalidIssuer => ApiError::Unauthorized("Invalid token issuer".to_string()),
            _ => ApiError::Unauthorized(format!("Invalid token: {}", err)),
        }
    }
}

/// Convert password errors to API errors
impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::InternalError(format!("Password operation failed: {}", err))
    }
}

/// Convert authorization errors to API errors
impl From<AuthzError> for ApiError {
    fn from(err: AuthzError) -> Self {
        match err {
            AuthzError::AdminRequired => {
                ApiError::Forbidden("Administrator role required".to_string())
            }
            AuthzError::NotAuthorized => {
                ApiError::Forbidden("Not authorized to access this resource".to_string())
            }
        }
    }
}

/// Convert user delete-guard errors to API errors
impl From<DeleteUserError> for ApiError {
    fn from(err: DeleteUserError) -> Self {
        match err {
            DeleteUserError::NotFound => ApiError::NotFound("User not found".to_string()),
            DeleteUserError::Protected => ApiError::Forbidden(err.to_string()),
            DeleteUserError::HasAssignedTasks(_) => ApiError::Conflict(err.to_string()),
            DeleteUserError::Database(e) => e.into(),
        }
    }
}

/// Convert company delete-guard errors to API errors
impl From<DeleteCompanyError> for ApiError {
    fn from(err: DeleteCompanyError) -> Self {
        match err {
            DeleteCompanyError::NotFound => ApiError::NotFound("Company not found".to_string()),
            DeleteCompanyError::HasDependents { .. } => ApiError::Conflict(err.to_string()),
            DeleteCompanyError::Database(e) => e.into(),
        }
    }
}

/// Convert area delete-guard errors to API errors
impl From<DeleteAreaError> for ApiError {
    fn from(err: DeleteAreaError) -> Self {
        match err {
            DeleteAreaError::NotFound => ApiError::NotFound("Area not found".to_string()),
            DeleteAreaError::HasTasks(_) => ApiError::Conflict(err.to_string()),
            DeleteAreaError::Database(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ApiError::BadRequest("Invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: Invalid input");

        let err = ApiError::NotFound("User not found".to_string());
        assert_eq!(err.to_string(), "Not found: User not found");
    }

    #[test]
    fn test_validation_error() {
        let errors = vec![
            ValidationErrorDetail {
                field: "email".to_string(),
                message: "Invalid email format".to_string(),
            },
            ValidationErrorDetail {
                field: "password".to_string(),
                message: "Password too short".to_string(),
            },
        ];

        let err = ApiError::ValidationError(errors);
        assert_eq!(err.to_string(), "Validation failed: 2 errors");
    }

    #[test]
    fn test_guard_errors_map_to_conflict() {
        let err: ApiError = DeleteCompanyError::HasDependents {
            areas: 2,
            clients: 0,
        }
        .into();
        assert!(matches!(err, ApiError::Conflict(_)));

        let err: ApiError = DeleteAreaError::HasTasks(1).into();
        assert!(matches!(err, ApiError::Conflict(_)));

        let err: ApiError = DeleteUserError::HasAssignedTasks(4).into();
        assert!(matches!(err, ApiError::Conflict(_)));
    }

    #[test]
    fn test_protected_admin_maps_to_forbidden() {
        let err: ApiError = DeleteUserError::Protected.into();
        assert!(matches!(err, ApiError::Forbidden(_)));
    }

    #[test]
    fn test_status_codes() {
        let response = ApiError::Unauthorized("no token".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = ApiError::Conflict("duplicate".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = ApiError::ValidationError(vec![]).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
