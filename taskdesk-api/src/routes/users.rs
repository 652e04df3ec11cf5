/// User administration endpoints (admin-only)
///
/// The whole group sits behind the admin gate. Deletion is guarded: the
/// protected system administrator can never be removed, and neither can a
/// user that still has tasks assigned.
///
/// # Endpoints
///
/// - `GET /users` - List all users (password hashes excluded)
/// - `PUT /users/:id` - Update a user
/// - `DELETE /users/:id` - Delete a user (guarded)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use taskdesk_shared::{
    auth::password,
    models::user::{UpdateUser, User, UserRole},
};
use uuid::Uuid;
use validator::Validate;

/// Update-user request
///
/// The password, when present, arrives in plaintext and is hashed here; the
/// stored hash is never writable directly.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: Option<String>,

    pub role: Option<UserRole>,
}

/// Lists all users
///
/// Password hashes are excluded from serialization at the model level.
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<User>>> {
    let users = User::list(&state.db).await?;

    Ok(Json(users))
}

/// Updates a user
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed or password too weak
/// - `404 Not Found`: No such user
/// - `409 Conflict`: New email already belongs to another user
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateUserRequest>,
) -> ApiResult<Json<User>> {
    req.validate()?;

    let password_hash = match req.password {
        Some(ref plaintext) => {
            password::validate_password_strength(plaintext).map_err(ApiError::BadRequest)?;
            Some(password::hash_password(plaintext)?)
        }
        None => None,
    };

    let user = User::update(
        &state.db,
        id,
        UpdateUser {
            name: req.name,
            email: req.email,
            password_hash,
            role: req.role,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(user))
}

/// Deletes a user (guarded)
///
/// # Errors
///
/// - `403 Forbidden`: Target is the protected administrator account
/// - `404 Not Found`: No such user
/// - `409 Conflict`: Tasks are still assigned to the user (count reported)
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    User::delete(&state.db, id).await?;

    Ok(Json(serde_json::json!({ "message": "User deleted" })))
}
