/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /login` - Login and get tokens (public)
/// - `POST /auth/refresh` - Refresh access token (public)
/// - `POST /auth/register` - Register new user (admin-only)
///
/// Login fails uniformly for an unknown email and a wrong password so the
/// response never reveals which accounts exist.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use taskdesk_shared::{
    auth::{jwt, password},
    models::user::{CreateUser, User, UserRole},
};
use uuid::Uuid;
use validator::Validate;

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    pub password: String,
}

/// Identity echoed back to clients after login
#[derive(Debug, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Access token (24h)
    pub token: String,

    /// Refresh token (30d)
    pub refresh_token: String,

    /// The authenticated user
    pub user: UserSummary,
}

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password (validated for strength)
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    /// Role for the new account; defaults to `user`
    pub role: Option<UserRole>,
}

/// Refresh token request
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    /// Refresh token
    pub refresh_token: String,
}

/// Refresh token response
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    /// New access token (24h)
    pub token: String,
}

/// Login endpoint
///
/// Authenticates a user by email and password and returns signed tokens
/// embedding `{id, role, name, email}`.
///
/// # Endpoint
///
/// ```text
/// POST /login
/// Content-Type: application/json
///
/// { "email": "user@example.com", "password": "SecureP@ss123" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `401 Unauthorized`: Invalid credentials (uniform for unknown email and
///   wrong password)
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    req.validate()?;

    let user = User::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".to_string()))?;

    let valid = password::verify_password(&req.password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    let access_claims = jwt::Claims::new(
        user.id,
        user.role,
        user.name.clone(),
        user.email.clone(),
        jwt::TokenType::Access,
    );
    let refresh_claims = jwt::Claims::new(
        user.id,
        user.role,
        user.name.clone(),
        user.email.clone(),
        jwt::TokenType::Refresh,
    );

    let token = jwt::create_token(&access_claims, state.jwt_secret())?;
    let refresh_token = jwt::create_token(&refresh_claims, state.jwt_secret())?;

    Ok(Json(LoginResponse {
        token,
        refresh_token,
        user: UserSummary::from(&user),
    }))
}

/// Register a new user (admin-only)
///
/// Sits behind the admin gate; only administrators create accounts.
///
/// # Endpoint
///
/// ```text
/// POST /auth/register
/// Content-Type: application/json
///
/// {
///   "name": "Jane Doe",
///   "email": "jane@example.com",
///   "password": "SecureP@ss123",
///   "role": "user"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed or password too weak
/// - `403 Forbidden`: Caller is not an admin (rejected by the gate)
/// - `409 Conflict`: Email already exists
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<UserSummary>)> {
    req.validate()?;

    password::validate_password_strength(&req.password)
        .map_err(ApiError::BadRequest)?;

    let password_hash = password::hash_password(&req.password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            name: req.name,
            email: req.email,
            password_hash,
            role: req.role.unwrap_or(UserRole::User),
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(UserSummary::from(&user))))
}

/// Token refresh endpoint
///
/// Exchanges a refresh token for a new 24-hour access token.
///
/// # Errors
///
/// - `401 Unauthorized`: Invalid or expired refresh token
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> ApiResult<Json<RefreshResponse>> {
    let token = jwt::refresh_access_token(&req.refresh_token, state.jwt_secret())?;

    Ok(Json(RefreshResponse { token }))
}
