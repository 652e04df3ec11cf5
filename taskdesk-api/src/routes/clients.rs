/// Client endpoints
///
/// Reads for any authenticated caller, mutations admin-only. Clients have no
/// dependents, so deletion is unguarded; they do block deletion of their
/// owning company.
///
/// # Endpoints
///
/// - `GET /clients` / `GET /clients/:id`
/// - `POST /clients` (admin)
/// - `PUT /clients/:id` (admin)
/// - `DELETE /clients/:id` (admin)

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
        client::{Client, CreateClient, UpdateClient},
        company::Company,
    },
};
use uuid::Uuid;
use validator::Validate;

/// Create-client request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateClientRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    #[validate(length(min = 1, max = 64, message = "Tax id must be 1-64 characters"))]
    pub tax_id: String,

    pub company_id: Uuid,
    pub software_key: Option<String>,
    pub account_key: Option<String>,
}

/// Lists all clients
pub async fn list_clients(State(state): State<AppState>) -> ApiResult<Json<Vec<Client>>> {
    let clients = Client::list(&state.db).await?;

    Ok(Json(clients))
}

/// Gets one client
pub async fn get_client(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Client>> {
    let client = Client::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Client not found".to_string()))?;

    Ok(Json(client))
}

/// Creates a client under a company (admin)
///
/// # Errors
///
/// - `403 Forbidden`: Caller is not an admin
/// - `404 Not Found`: Owning company does not exist
/// - `409 Conflict`: Tax id already exists
pub async fn create_client(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateClientRequest>,
) -> ApiResult<Json<Client>> {
    require_admin(&auth)?;
    req.validate()?;

    if !Company::exists(&state.db, req.company_id).await? {
        return Err(ApiError::NotFound("Company not found".to_string()));
    }

    let client = Client::create(
        &state.db,
        CreateClient {
            name: req.name,
            tax_id: req.tax_id,
            company_id: req.company_id,
            software_key: req.software_key,
            account_key: req.account_key,
        },
    )
    .await?;

    Ok(Json(client))
}

/// Updates a client (admin)
pub async fn update_client(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateClient>,
) -> ApiResult<Json<Client>> {
    require_admin(&auth)?;

    let client = Client::update(&state.db, id, req)
        .await?
        .ok_or_else(|| ApiError::NotFound("Client not found".to_string()))?;

    Ok(Json(client))
}

/// Deletes a client (admin)
pub async fn delete_client(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    require_admin(&auth)?;

    let deleted = Client::delete(&state.db, id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Client not found".to_string()));
    }

    Ok(Json(serde_json::json!({ "message": "Client deleted" })))
}
