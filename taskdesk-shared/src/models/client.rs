/// Client model and database operations
///
/// A client belongs to exactly one company and carries the credential fields
/// (software/account keys) used by the billing integrations. Nothing
/// references clients, so deletion is unguarded; clients themselves block the
/// deletion of their owning company.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE clients (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL,
///     tax_id VARCHAR(64) NOT NULL UNIQUE,
///     company_id UUID NOT NULL REFERENCES companies(id),
///     software_key VARCHAR(255),
///     account_key VARCHAR(255),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Client model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Client {
    /// Unique client ID
    pub id: Uuid,

    /// Client name
    pub name: String,

    /// Tax identification number, unique across all clients
    pub tax_id: String,

    /// Owning company
    pub company_id: Uuid,

    /// Accounting-software credential
    pub software_key: Option<String>,

    /// Account credential
    pub account_key: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateClient {
    pub name: String,
    pub tax_id: String,
    pub company_id: Uuid,
    pub software_key: Option<String>,
    pub account_key: Option<String>,
}

/// Input for updating an existing client
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateClient {
    pub name: Option<String>,
    pub tax_id: Option<String>,
    pub software_key: Option<String>,
    pub account_key: Option<String>,
}

impl Client {
    /// Creates a new client under a company
    ///
    /// # Errors
    ///
    /// Returns an error if the tax id already exists or the company does not
    /// (foreign-key violation).
    pub async fn create(pool: &PgPool, data: CreateClient) -> Result<Self, sqlx::Error> {
        let client = sqlx::query_as::<_, Client>(
            r#"
            INSERT INTO clients (name, tax_id, company_id, software_key, account_key)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, tax_id, company_id, software_key, account_key,
                      created_at, updated_at
            "#,
        )
        .bind(data.name)
        .bind(data.tax_id)
        .bind(data.company_id)
        .bind(data.software_key)
        .bind(data.account_key)
        .fetch_one(pool)
        .await?;

        Ok(client)
    }

    /// Finds a client by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let client = sqlx::query_as::<_, Client>(
            r#"
            SELECT id, name, tax_id, company_id, software_key, account_key,
                   created_at, updated_at
            FROM clients
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(client)
    }

    /// Lists all clients ordered by name
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let clients = sqlx::query_as::<_, Client>(
            r#"
            SELECT id, name, tax_id, company_id, software_key, account_key,
                   created_at, updated_at
            FROM clients
            ORDER BY name ASC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(clients)
    }

    /// Lists clients belonging to a company
    pub async fn list_by_company(pool: &PgPool, company_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let clients = sqlx::query_as::<_, Client>(
            r#"
            SELECT id, name, tax_id, company_id, software_key, account_key,
                   created_at, updated_at
            FROM clients
            WHERE company_id = $1
            ORDER BY name ASC
            "#,
        )
        .bind(company_id)
        .fetch_all(pool)
        .await?;

        Ok(clients)
    }

    /// Updates an existing client
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateClient,
    ) -> Result<Option<Self>, sqlx::Error> {
        let client = sqlx::query_as::<_, Client>(
            r#"
            UPDATE clients
            SET name = COALESCE($2, name),
                tax_id = COALESCE($3, tax_id),
                software_key = COALESCE($4, software_key),
                account_key = COALESCE($5, account_key),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, tax_id, company_id, software_key, account_key,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(data.name)
        .bind(data.tax_id)
        .bind(data.software_key)
        .bind(data.account_key)
        .fetch_optional(pool)
        .await?;

        Ok(client)
    }

    /// Deletes a client
    ///
    /// Returns true if the client was deleted, false if it didn't exist.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_client_default_is_empty() {
        let update = UpdateClient::default();
        assert!(update.name.is_none());
        assert!(update.tax_id.is_none());
        assert!(update.software_key.is_none());
        assert!(update.account_key.is_none());
    }
}
