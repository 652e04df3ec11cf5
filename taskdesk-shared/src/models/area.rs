/// Area model and database operations
///
/// An area is a department-like subdivision belonging to exactly one company.
/// Tasks reference areas, so deletion is guarded against remaining tasks the
/// same way company deletion is guarded against areas and clients.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE areas (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL,
///     department VARCHAR(255),
///     description TEXT,
///     status entity_status NOT NULL DEFAULT 'active',
///     company_id UUID NOT NULL REFERENCES companies(id),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::company::EntityStatus;

/// Area model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Area {
    /// Unique area ID
    pub id: Uuid,

    /// Area name
    pub name: String,

    /// Department the area belongs to
    pub department: Option<String>,

    /// Free-form description
    pub description: Option<String>,

    /// Whether the area is active
    pub status: EntityStatus,

    /// Owning company
    pub company_id: Uuid,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new area
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateArea {
    pub name: String,
    pub department: Option<String>,
    pub description: Option<String>,
    pub status: Option<EntityStatus>,
    pub company_id: Uuid,
}

/// Input for updating an existing area
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateArea {
    pub name: Option<String>,
    pub department: Option<String>,
    pub description: Option<String>,
    pub status: Option<EntityStatus>,
}

/// Error type for guarded area deletion
#[derive(Debug, thiserror::Error)]
pub enum DeleteAreaError {
    /// The target does not exist
    #[error("Area not found")]
    NotFound,

    /// Tasks still reference the area
    #[error("Area has {0} associated task(s) and cannot be deleted")]
    HasTasks(i64),

    /// Underlying database failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Area {
    /// Creates a new area under a company
    ///
    /// # Errors
    ///
    /// Fails with a foreign-key violation if the company does not exist.
    pub async fn create(pool: &PgPool, data: CreateArea) -> Result<Self, sqlx::Error> {
        let area = sqlx::query_as::<_, Area>(
            r#"
            INSERT INTO areas (name, department, description, status, company_id)
            VALUES ($1, $2, $3, COALESCE($4, 'active'), $5)
            RETURNING id, name, department, description, status, company_id,
                      created_at, updated_at
            "#,
        )
        .bind(data.name)
        .bind(data.department)
        .bind(data.description)
        .bind(data.status)
        .bind(data.company_id)
        .fetch_one(pool)
        .await?;

        Ok(area)
    }

    /// Finds an area by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let area = sqlx::query_as::<_, Area>(
            r#"
            SELECT id, name, department, description, status, company_id,
                   created_at, updated_at
            FROM areas
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(area)
    }

    /// Lists all areas ordered by name
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let areas = sqlx::query_as::<_, Area>(
            r#"
            SELECT id, name, department, description, status, company_id,
                   created_at, updated_at
            FROM areas
            ORDER BY name ASC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(areas)
    }

    /// Lists areas belonging to a company
    pub async fn list_by_company(pool: &PgPool, company_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let areas = sqlx::query_as::<_, Area>(
            r#"
            SELECT id, name, department, description, status, company_id,
                   created_at, updated_at
            FROM areas
            WHERE company_id = $1
            ORDER BY name ASC
            "#,
        )
        .bind(company_id)
        .fetch_all(pool)
        .await?;

        Ok(areas)
    }

    /// Updates an existing area
    ///
    /// COALESCE keeps the stored value for every field the caller omitted.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateArea,
    ) -> Result<Option<Self>, sqlx::Error> {
        let area = sqlx::query_as::<_, Area>(
            r#"
            UPDATE areas
            SET name = COALESCE($2, name),
                department = COALESCE($3, department),
                description = COALESCE($4, description),
                status = COALESCE($5, status),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, department, description, status, company_id,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(data.name)
        .bind(data.department)
        .bind(data.description)
        .bind(data.status)
        .fetch_optional(pool)
        .await?;

        Ok(area)
    }

    /// Deletes an area, refusing while tasks reference it
    ///
    /// Check and delete run in one transaction under a `FOR UPDATE` row lock;
    /// see [`super::company::Company::delete`] for the locking rationale.
    ///
    /// # Errors
    ///
    /// - [`DeleteAreaError::NotFound`] if the area doesn't exist
    /// - [`DeleteAreaError::HasTasks`] with the task count if any task still
    ///   references the area
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), DeleteAreaError> {
        let mut tx = pool.begin().await?;

        let locked: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM areas WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;

        if locked.is_none() {
            return Err(DeleteAreaError::NotFound);
        }

        let (tasks,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tasks WHERE area_id = $1")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        if tasks > 0 {
            return Err(DeleteAreaError::HasTasks(tasks));
        }

        sqlx::query("DELETE FROM areas WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Checks that an area row exists
    pub async fn exists(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let row: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM areas WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(row.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delete_error_reports_task_count() {
        let err = DeleteAreaError::HasTasks(3);
        assert!(err.to_string().contains("3 associated task"));
    }

    #[test]
    fn test_update_area_default_is_empty() {
        let update = UpdateArea::default();
        assert!(update.name.is_none());
        assert!(update.department.is_none());
        assert!(update.description.is_none());
        assert!(update.status.is_none());
    }
}
