/// Company endpoints
///
/// Reads are available to any authenticated caller; mutations require the
/// admin role (checked in-handler because `GET /companies` and
/// `POST /companies` share one path and therefore one middleware stack).
/// Deletion is guarded against remaining areas and clients.
///
/// # Endpoints
///
/// - `GET /companies` / `GET /companies/:id`
/// - `POST /companies` (admin)
/// - `PUT /companies/:id` (admin)
/// - `DELETE /companies/:id` (admin, guarded)

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
    models::company::{Company, CompanyType, CreateCompany, EntityStatus, UpdateCompany},
};
use uuid::Uuid;
use validator::Validate;

/// Create-company request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCompanyRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    #[validate(length(min = 1, max = 64, message = "NIT must be 1-64 characters"))]
    pub nit: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    pub contact_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub company_type: CompanyType,
    pub status: Option<EntityStatus>,
}

/// Lists all companies
pub async fn list_companies(State(state): State<AppState>) -> ApiResult<Json<Vec<Company>>> {
    let companies = Company::list(&state.db).await?;

    Ok(Json(companies))
}

/// Gets one company
pub async fn get_company(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Company>> {
    let company = Company::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Company not found".to_string()))?;

    Ok(Json(company))
}

/// Creates a company (admin)
///
/// # Errors
///
/// - `403 Forbidden`: Caller is not an admin
/// - `409 Conflict`: NIT already exists
pub async fn create_company(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateCompanyRequest>,
) -> ApiResult<Json<Company>> {
    require_admin(&auth)?;
    req.validate()?;

    let company = Company::create(
        &state.db,
        CreateCompany {
            name: req.name,
            nit: req.nit,
            email: req.email,
            contact_name: req.contact_name,
            phone: req.phone,
            address: req.address,
            company_type: req.company_type,
            status: req.status,
        },
    )
    .await?;

    Ok(Json(company))
}

/// Updates a company (admin)
pub async fn update_company(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateCompany>,
) -> ApiResult<Json<Company>> {
    require_admin(&auth)?;

    let company = Company::update(&state.db, id, req)
        .await?
        .ok_or_else(|| ApiError::NotFound("Company not found".to_string()))?;

    Ok(Json(company))
}

/// Deletes a company (admin, guarded)
///
/// # Errors
///
/// - `403 Forbidden`: Caller is not an admin
/// - `404 Not Found`: No such company
/// - `409 Conflict`: Areas and/or clients still reference the company; the
///   message reports both counts
pub async fn delete_company(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    require_admin(&auth)?;

    Company::delete(&state.db, id).await?;

    Ok(Json(serde_json::json!({ "message": "Company deleted" })))
}
