/// Area endpoints
///
/// Reads for any authenticated caller, mutations admin-only. Creation checks
/// the owning company exists first so a dangling reference yields a 404
/// instead of a raw constraint error. Deletion is guarded against remaining
/// tasks.
///
/// # Endpoints
///
/// - `GET /areas` / `GET /areas/:id`
/// - `POST /areas` (admin)
/// - `PUT /areas/:id` (admin)
/// - `DELETE /areas/:id` (admin, guarded)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Deserialize;
use taskdesk_shared::{
    auth::{authorization::require_admin, middleware::AuthContext},
    models::{
        area::{Area, CreateArea, UpdateArea},
        company::{Company, EntityStatus},
    },
};
use uuid::Uuid;
use validator::Validate;

/// Create-area request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateAreaRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    pub department: Option<String>,
    pub description: Option<String>,
    pub status: Option<EntityStatus>,
    pub company_id: Uuid,
}

/// Lists all areas
pub async fn list_areas(State(state): State<AppState>) -> ApiResult<Json<Vec<Area>>> {
    let areas = Area::list(&state.db).await?;

    Ok(Json(areas))
}

/// Gets one area
pub async fn get_area(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Area>> {
    let area = Area::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Area not found".to_string()))?;

    Ok(Json(area))
}

/// Creates an area under a company (admin)
///
/// # Errors
///
/// - `403 Forbidden`: Caller is not an admin
/// - `404 Not Found`: Owning company does not exist
pub async fn create_area(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateAreaRequest>,
) -> ApiResult<Json<Area>> {
    require_admin(&auth)?;
    req.validate()?;

    if !Company::exists(&state.db, req.company_id).await? {
        return Err(ApiError::NotFound("Company not found".to_string()));
    }

    let area = Area::create(
        &state.db,
        CreateArea {
            name: req.name,
            department: req.department,
            description: req.description,
            status: req.status,
            company_id: req.company_id,
        },
    )
    .await?;

    Ok(Json(area))
}

/// Updates an area (admin)
pub async fn update_area(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateArea>,
) -> ApiResult<Json<Area>> {
    require_admin(&auth)?;

    let area = Area::update(&state.db, id, req)
        .await?
        .ok_or_else(|| ApiError::NotFound("Area not found".to_string()))?;

    Ok(Json(area))
}

/// Deletes an area (admin, guarded)
///
/// # Errors
///
/// - `403 Forbidden`: Caller is not an admin
/// - `404 Not Found`: No such area
/// - `409 Conflict`: Tasks still reference the area (count reported)
pub async fn delete_area(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    require_admin(&auth)?;

    Area::delete(&state.db, id).await?;

    Ok(Json(serde_json::json!({ "message": "Area deleted" })))
}
