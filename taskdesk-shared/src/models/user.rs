/// User model and database operations
///
/// This module provides the User model and CRUD operations for managing user
/// accounts. Tasks reference users through `tasks.assigned_to`, which is why
/// deletion is guarded: a user with assigned tasks, or the protected system
/// administrator, can never be removed.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE user_role AS ENUM ('admin', 'user');
///
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL,
///     email VARCHAR(255) NOT NULL UNIQUE,
///     password_hash VARCHAR(255) NOT NULL,
///     role user_role NOT NULL DEFAULT 'user',
///     protected BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskdesk_shared::models::user::{User, CreateUser, UserRole};
/// use taskdesk_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let user = User::create(&pool, CreateUser {
///     name: "Jane Doe".to_string(),
///     email: "jane@example.com".to_string(),
///     password_hash: "$argon2id$...".to_string(),
///     role: UserRole::User,
/// }).await?;
///
/// let found = User::find_by_email(&pool, "jane@example.com").await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Role determining which routes and rows a user may reach
///
/// Admins manage users, companies, areas, and clients, and see every task.
/// Regular users only see and update the tasks assigned to them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Full access: entity management, every task, user administration
    Admin,

    /// Sees and updates only tasks assigned to them
    User,
}

impl UserRole {
    /// Converts role to string for display
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::User => "user",
        }
    }

    /// Parses role from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(UserRole::Admin),
            "user" => Some(UserRole::User),
            _ => None,
        }
    }

    /// Whether this role may see tasks assigned to other users
    pub fn can_view_all_tasks(&self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

/// User model representing an account
///
/// Passwords are stored as Argon2id hashes, never in plaintext. The
/// `protected` flag marks the system administrator account that can never be
/// deleted, regardless of any other rule.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID v4)
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Email address, unique across all users
    pub email: String,

    /// Argon2id password hash, never exposed in API responses
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    /// Role gate applied by the authorization middleware
    pub role: UserRole,

    /// Marks the immutable system account excluded from deletion
    pub protected: bool,

    /// When the user account was created
    pub created_at: DateTime<Utc>,

    /// When the user account was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Display name
    pub name: String,

    /// Email address (must be unique)
    pub email: String,

    /// Argon2id password hash (NOT the plaintext password)
    pub password_hash: String,

    /// Role assigned to the account
    pub role: UserRole,
}

/// Input for updating an existing user
///
/// All fields are optional. Only non-None fields will be updated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUser {
    /// New display name
    pub name: Option<String>,

    /// New email address
    pub email: Option<String>,

    /// New password hash
    pub password_hash: Option<String>,

    /// New role
    pub role: Option<UserRole>,
}

/// Error type for guarded user deletion
#[derive(Debug, thiserror::Error)]
pub enum DeleteUserError {
    /// The target does not exist
    #[error("User not found")]
    NotFound,

    /// The target is the protected system administrator
    #[error("The protected administrator account cannot be deleted")]
    Protected,

    /// Tasks still reference the target
    #[error("User has {0} assigned task(s) and cannot be deleted")]
    HasAssignedTasks(i64),

    /// Underlying database failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl User {
    /// Creates a new user in the database
    ///
    /// # Errors
    ///
    /// Returns an error if the email already exists (unique constraint
    /// violation) or the database connection fails.
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, password_hash, role, protected,
                      created_at, updated_at
            "#,
        )
        .bind(data.name)
        .bind(data.email)
        .bind(data.password_hash)
        .bind(data.role)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, role, protected,
                   created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by email address
    ///
    /// Lookup is case-insensitive; emails are compared lowercased.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, role, protected,
                   created_at, updated_at
            FROM users
            WHERE LOWER(email) = LOWER($1)
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Lists all users, newest first
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, role, protected,
                   created_at, updated_at
            FROM users
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(users)
    }

    /// Updates an existing user
    ///
    /// Only non-None fields in `data` are written; `updated_at` is set to the
    /// current time. Returns the updated user, or None if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the new email already belongs to another user or
    /// the database connection fails.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateUser,
    ) -> Result<Option<Self>, sqlx::Error> {
        // Build dynamic update query based on which fields are present
        let mut query = String::from("UPDATE users SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.name.is_some() {
            bind_count += 1;
            query.push_str(&format!(", name = ${}", bind_count));
        }
        if data.email.is_some() {
            bind_count += 1;
            query.push_str(&format!(", email = ${}", bind_count));
        }
        if data.password_hash.is_some() {
            bind_count += 1;
            query.push_str(&format!(", password_hash = ${}", bind_count));
        }
        if data.role.is_some() {
            bind_count += 1;
            query.push_str(&format!(", role = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, name, email, password_hash, role, protected, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, User>(&query).bind(id);

        if let Some(name) = data.name {
            q = q.bind(name);
        }
        if let Some(email) = data.email {
            q = q.bind(email);
        }
        if let Some(password_hash) = data.password_hash {
            q = q.bind(password_hash);
        }
        if let Some(role) = data.role {
            q = q.bind(role);
        }

        let user = q.fetch_optional(pool).await?;

        Ok(user)
    }

    /// Deletes a user, refusing while tasks reference it
    ///
    /// The check and the delete run in one transaction under a `FOR UPDATE`
    /// row lock, so a task assigned concurrently cannot slip between the
    /// dependent count and the delete.
    ///
    /// # Errors
    ///
    /// - [`DeleteUserError::NotFound`] if the user doesn't exist
    /// - [`DeleteUserError::Protected`] if the target is the system
    ///   administrator account
    /// - [`DeleteUserError::HasAssignedTasks`] with the task count if any
    ///   task is still assigned to the user
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), DeleteUserError> {
        let mut tx = pool.begin().await?;

        let target: Option<(bool,)> =
            sqlx::query_as("SELECT protected FROM users WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;

        let (protected,) = target.ok_or(DeleteUserError::NotFound)?;
        if protected {
            return Err(DeleteUserError::Protected);
        }

        let (task_count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM tasks WHERE assigned_to = $1")
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;

        if task_count > 0 {
            return Err(DeleteUserError::HasAssignedTasks(task_count));
        }

        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Counts total number of users
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }

    /// Ensures the protected system administrator account exists
    ///
    /// Called once at startup. Creates the account with the given email and
    /// password hash if no user with that email exists yet; otherwise leaves
    /// the existing row untouched. The created account is always an admin and
    /// always protected.
    pub async fn ensure_protected_admin(
        pool: &PgPool,
        email: &str,
        name: &str,
        password_hash: &str,
    ) -> Result<Self, sqlx::Error> {
        if let Some(existing) = Self::find_by_email(pool, email).await? {
            return Ok(existing);
        }

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash, role, protected)
            VALUES ($1, $2, $3, 'admin', TRUE)
            ON CONFLICT (email) DO UPDATE SET updated_at = NOW()
            RETURNING id, name, email, password_hash, role, protected,
                      created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .fetch_one(pool)
        .await?;

        tracing::info!(email = %user.email, "Bootstrapped protected administrator account");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_role_round_trip() {
        assert_eq!(UserRole::Admin.as_str(), "admin");
        assert_eq!(UserRole::User.as_str(), "user");
        assert_eq!(UserRole::from_str("admin"), Some(UserRole::Admin));
        assert_eq!(UserRole::from_str("user"), Some(UserRole::User));
        assert_eq!(UserRole::from_str("root"), None);
    }

    #[test]
    fn test_role_task_visibility() {
        assert!(UserRole::Admin.can_view_all_tasks());
        assert!(!UserRole::User.can_view_all_tasks());
    }

    #[test]
    fn test_update_user_default_is_empty() {
        let update = UpdateUser::default();
        assert!(update.name.is_none());
        assert!(update.email.is_none());
        assert!(update.password_hash.is_none());
        assert!(update.role.is_none());
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let user = User {
            id: Uuid::new_v4(),
            name: "Test".to_string(),
            email: "test@example.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            role: UserRole::User,
            protected: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2id"));
        assert!(!json.contains("password_hash"));
        assert!(json.contains("test@example.com"));
    }

    // Integration tests for database operations are in taskdesk-api/tests/
}
