/// Task lifecycle endpoints
///
/// Visibility is role-scoped: admins see every task, regular users only the
/// tasks assigned to them. Listings are denormalized with the assigned user,
/// company, and area display fields and ordered by due date ascending.
///
/// Updates come in two shapes. A body carrying only `status` takes the
/// narrow status-only path — the one write regular users may perform on
/// their own tasks — and is validated against the status state machine.
/// Anything else is a full-field edit over the allow-listed columns,
/// admin-only.
///
/// # Endpoints
///
/// - `GET /tasks` - Role-scoped listing
/// - `GET /tasks/:id` - Single task with context
/// - `POST /tasks` - Create (admin assigns anyone; users only themselves)
/// - `PUT /tasks/:id` - Status-only or full update
/// - `DELETE /tasks/:id` - Admin-only

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use taskdesk_shared::{
    auth::{
        authorization::{require_admin, require_self_or_admin},
        middleware::AuthContext,
    },
    models::{
        area::Area,
        company::Company,
        task::{CreateTask, Task, TaskWithContext, UpdateTaskFields},
        user::User,
    },
};
use uuid::Uuid;
use validator::Validate;

/// Create-task request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    /// Short description of the work (required)
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    /// Free-form notes
    pub observation: Option<String>,

    /// User the task is assigned to (required)
    pub assigned_to: Uuid,

    /// Company scope (required)
    pub company_id: Uuid,

    /// Area scope (required)
    pub area_id: Uuid,

    /// Due date; defaults to creation time + 7 days when omitted
    pub due_date: Option<DateTime<Utc>>,
}

/// Role-scoped task listing
///
/// Admins get every task; everyone else only rows where `assigned_to` equals
/// the caller id. Ordered by due date ascending, each row joined with
/// `assigned_user {name, email}`, `company {name}`, `area {name,
/// department}`.
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<TaskWithContext>>> {
    let tasks = if auth.role.can_view_all_tasks() {
        Task::list_all(&state.db).await?
    } else {
        Task::list_for_user(&state.db, auth.user_id).await?
    };

    Ok(Json(tasks))
}

/// Gets one task with its display context
///
/// # Errors
///
/// - `403 Forbidden`: Task belongs to someone else and caller is not admin
/// - `404 Not Found`: No such task
pub async fn get_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<TaskWithContext>> {
    let task = Task::find_with_context(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    require_self_or_admin(&auth, task.task.assigned_to)?;

    Ok(Json(task))
}

/// Creates a task
///
/// The referenced user, company, and area must exist; each is checked before
/// the insert so a dangling reference yields a 404 naming the missing row.
/// Admins may assign anyone. A regular user may create a task only for
/// themself (the self-submission path); any other assignee is rejected.
///
/// # Errors
///
/// - `400 Bad Request`: Missing title or malformed ids
/// - `403 Forbidden`: Non-admin assigning someone else
/// - `404 Not Found`: Assigned user, company, or area does not exist
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<Json<Task>> {
    req.validate()?;

    if !auth.is_admin() && req.assigned_to != auth.user_id {
        return Err(ApiError::Forbidden(
            "Only administrators may assign tasks to other users".to_string(),
        ));
    }

    if User::find_by_id(&state.db, req.assigned_to).await?.is_none() {
        return Err(ApiError::NotFound("Assigned user not found".to_string()));
    }
    if !Company::exists(&state.db, req.company_id).await? {
        return Err(ApiError::NotFound("Company not found".to_string()));
    }
    if !Area::exists(&state.db, req.area_id).await? {
        return Err(ApiError::NotFound("Area not found".to_string()));
    }

    let task = Task::create(
        &state.db,
        CreateTask {
            title: req.title,
            observation: req.observation,
            assigned_to: req.assigned_to,
            company_id: req.company_id,
            area_id: req.area_id,
            due_date: req.due_date,
        },
    )
    .await?;

    Ok(Json(task))
}

/// Updates a task
///
/// A body containing only `status` takes the narrow status-only path; the
/// requested transition is validated against the current row's status.
/// Regular users may only take that path, and only on their own tasks.
/// Any other combination of allow-listed fields is a full edit, admin-only;
/// re-assignments and re-scoping are checked against existing rows the same
/// way creation is.
///
/// # Errors
///
/// - `400 Bad Request`: Empty body or illegal status transition
/// - `403 Forbidden`: Someone else's task, or a non-admin full edit
/// - `404 Not Found`: Task or a newly referenced row does not exist
pub async fn update_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTaskFields>,
) -> ApiResult<Json<Task>> {
    if req.is_empty() {
        return Err(ApiError::BadRequest("No fields to update".to_string()));
    }

    let current = Task::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    require_self_or_admin(&auth, current.assigned_to)?;

    if let Some(target) = req.status {
        if !current.status.can_transition_to(target) {
            return Err(ApiError::BadRequest(format!(
                "Invalid status transition: {} -> {}",
                current.status.as_str(),
                target.as_str()
            )));
        }

        if req.is_status_only() {
            let task = Task::set_status(&state.db, id, target)
                .await?
                .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

            return Ok(Json(task));
        }
    }

    // Full-field edits are reserved for admins
    require_admin(&auth)?;

    if let Some(assigned_to) = req.assigned_to {
        if User::find_by_id(&state.db, assigned_to).await?.is_none() {
            return Err(ApiError::NotFound("Assigned user not found".to_string()));
        }
    }
    if let Some(company_id) = req.company_id {
        if !Company::exists(&state.db, company_id).await? {
            return Err(ApiError::NotFound("Company not found".to_string()));
        }
    }
    if let Some(area_id) = req.area_id {
        if !Area::exists(&state.db, area_id).await? {
            return Err(ApiError::NotFound("Area not found".to_string()));
        }
    }

    let task = Task::update_fields(&state.db, id, req)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(task))
}

/// Deletes a task (admin-only)
///
/// Unconditional hard delete; tasks have no dependents.
///
/// # Errors
///
/// - `403 Forbidden`: Caller is not an admin
/// - `404 Not Found`: No such task
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    require_admin(&auth)?;

    let deleted = Task::delete(&state.db, id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Task not found".to_string()));
    }

    Ok(Json(serde_json::json!({ "message": "Task deleted" })))
}
