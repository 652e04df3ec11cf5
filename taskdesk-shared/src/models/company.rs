/// Company model and database operations
///
/// Companies own areas and clients. Deletion is refused while either kind of
/// dependent exists; the rejection reports both counts so the caller can see
/// exactly what is still attached.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE company_type AS ENUM ('A', 'B', 'C');
/// CREATE TYPE entity_status AS ENUM ('active', 'inactive');
///
/// CREATE TABLE companies (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL,
///     nit VARCHAR(64) NOT NULL UNIQUE,
///     email VARCHAR(255),
///     contact_name VARCHAR(255),
///     phone VARCHAR(64),
///     address VARCHAR(512),
///     company_type company_type NOT NULL DEFAULT 'A',
///     status entity_status NOT NULL DEFAULT 'active',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Legal/billing classification of a company
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "company_type")]
pub enum CompanyType {
    A,
    B,
    C,
}

impl CompanyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompanyType::A => "A",
            CompanyType::B => "B",
            CompanyType::C => "C",
        }
    }
}

/// Active/inactive flag shared by companies and areas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "entity_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EntityStatus {
    Active,
    Inactive,
}

impl EntityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityStatus::Active => "active",
            EntityStatus::Inactive => "inactive",
        }
    }
}

/// Company model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Company {
    /// Unique company ID
    pub id: Uuid,

    /// Company name
    pub name: String,

    /// Tax identification number, unique across all companies
    pub nit: String,

    /// Billing email
    pub email: Option<String>,

    /// Contact person
    pub contact_name: Option<String>,

    /// Contact phone
    pub phone: Option<String>,

    /// Billing address
    pub address: Option<String>,

    /// Classification (A, B, or C)
    pub company_type: CompanyType,

    /// Whether the company is active
    pub status: EntityStatus,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new company
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCompany {
    pub name: String,
    pub nit: String,
    pub email: Option<String>,
    pub contact_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub company_type: CompanyType,
    pub status: Option<EntityStatus>,
}

/// Input for updating an existing company
///
/// Only non-None fields are written.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCompany {
    pub name: Option<String>,
    pub nit: Option<String>,
    pub email: Option<String>,
    pub contact_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub company_type: Option<CompanyType>,
    pub status: Option<EntityStatus>,
}

/// Error type for guarded company deletion
#[derive(Debug, thiserror::Error)]
pub enum DeleteCompanyError {
    /// The target does not exist
    #[error("Company not found")]
    NotFound,

    /// Areas and/or clients still reference the company
    #[error("Company has {areas} associated area(s) and {clients} associated client(s) and cannot be deleted")]
    HasDependents { areas: i64, clients: i64 },

    /// Underlying database failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Company {
    /// Creates a new company
    ///
    /// # Errors
    ///
    /// Returns an error if the NIT already exists (unique constraint
    /// violation) or the database connection fails.
    pub async fn create(pool: &PgPool, data: CreateCompany) -> Result<Self, sqlx::Error> {
        let company = sqlx::query_as::<_, Company>(
            r#"
            INSERT INTO companies (name, nit, email, contact_name, phone, address, company_type, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, COALESCE($8, 'active'))
            RETURNING id, name, nit, email, contact_name, phone, address,
                      company_type, status, created_at, updated_at
            "#,
        )
        .bind(data.name)
        .bind(data.nit)
        .bind(data.email)
        .bind(data.contact_name)
        .bind(data.phone)
        .bind(data.address)
        .bind(data.company_type)
        .bind(data.status)
        .fetch_one(pool)
        .await?;

        Ok(company)
    }

    /// Finds a company by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let company = sqlx::query_as::<_, Company>(
            r#"
            SELECT id, name, nit, email, contact_name, phone, address,
                   company_type, status, created_at, updated_at
            FROM companies
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(company)
    }

    /// Lists all companies ordered by name
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let companies = sqlx::query_as::<_, Company>(
            r#"
            SELECT id, name, nit, email, contact_name, phone, address,
                   company_type, status, created_at, updated_at
            FROM companies
            ORDER BY name ASC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(companies)
    }

    /// Updates an existing company
    ///
    /// Only non-None fields in `data` are written. Returns None if the
    /// company doesn't exist.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateCompany,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE companies SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.name.is_some() {
            bind_count += 1;
            query.push_str(&format!(", name = ${}", bind_count));
        }
        if data.nit.is_some() {
            bind_count += 1;
            query.push_str(&format!(", nit = ${}", bind_count));
        }
        if data.email.is_some() {
            bind_count += 1;
            query.push_str(&format!(", email = ${}", bind_count));
        }
        if data.contact_name.is_some() {
            bind_count += 1;
            query.push_str(&format!(", contact_name = ${}", bind_count));
        }
        if data.phone.is_some() {
            bind_count += 1;
            query.push_str(&format!(", phone = ${}", bind_count));
        }
        if data.address.is_some() {
            bind_count += 1;
            query.push_str(&format!(", address = ${}", bind_count));
        }
        if data.company_type.is_some() {
            bind_count += 1;
            query.push_str(&format!(", company_type = ${}", bind_count));
        }
        if data.status.is_some() {
            bind_count += 1;
            query.push_str(&format!(", status = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, name, nit, email, contact_name, phone, address, company_type, status, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Company>(&query).bind(id);

        if let Some(name) = data.name {
            q = q.bind(name);
        }
        if let Some(nit) = data.nit {
            q = q.bind(nit);
        }
        if let Some(email) = data.email {
            q = q.bind(email);
        }
        if let Some(contact_name) = data.contact_name {
            q = q.bind(contact_name);
        }
        if let Some(phone) = data.phone {
            q = q.bind(phone);
        }
        if let Some(address) = data.address {
            q = q.bind(address);
        }
        if let Some(company_type) = data.company_type {
            q = q.bind(company_type);
        }
        if let Some(status) = data.status {
            q = q.bind(status);
        }

        let company = q.fetch_optional(pool).await?;

        Ok(company)
    }

    /// Deletes a company, refusing while it owns areas or clients
    ///
    /// The dependent counts and the delete run in one transaction under a
    /// `FOR UPDATE` row lock. Inserting an area or client concurrently takes
    /// a key-share lock on the company row via its foreign key, so it blocks
    /// until this transaction finishes; the check cannot be raced.
    ///
    /// # Errors
    ///
    /// - [`DeleteCompanyError::NotFound`] if the company doesn't exist
    /// - [`DeleteCompanyError::HasDependents`] with both counts if any area
    ///   or client still references the company
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), DeleteCompanyError> {
        let mut tx = pool.begin().await?;

        let locked: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM companies WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;

        if locked.is_none() {
            return Err(DeleteCompanyError::NotFound);
        }

        let (areas,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM areas WHERE company_id = $1")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        let (clients,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM clients WHERE company_id = $1")
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;

        if areas > 0 || clients > 0 {
            return Err(DeleteCompanyError::HasDependents { areas, clients });
        }

        sqlx::query("DELETE FROM companies WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Checks that a company row exists
    pub async fn exists(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let row: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM companies WHERE id = $1")
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
    fn test_company_type_as_str() {
        assert_eq!(CompanyType::A.as_str(), "A");
        assert_eq!(CompanyType::B.as_str(), "B");
        assert_eq!(CompanyType::C.as_str(), "C");
    }

    #[test]
    fn test_entity_status_serde() {
        assert_eq!(
            serde_json::to_string(&EntityStatus::Active).unwrap(),
            "\"active\""
        );
        let parsed: EntityStatus = serde_json::from_str("\"inactive\"").unwrap();
        assert_eq!(parsed, EntityStatus::Inactive);
    }

    #[test]
    fn test_delete_error_reports_counts() {
        let err = DeleteCompanyError::HasDependents {
            areas: 1,
            clients: 2,
        };
        let msg = err.to_string();
        assert!(msg.contains("1 associated area"));
        assert!(msg.contains("2 associated client"));
    }
}
