/// Database models for Taskdesk
///
/// This module contains all database models, their CRUD operations, and the
/// referential delete guards.
///
/// # Models
///
/// - `user`: User accounts, roles, and the protected-account delete guard
/// - `company`: Companies that own areas and clients
/// - `area`: Areas (departments) belonging to a company
/// - `client`: Clients belonging to a company
/// - `task`: Assigned tasks and their status lifecycle
///
/// # Delete guards
///
/// Deleting a company, area, or user is refused while dependent rows exist.
/// Each guarded delete runs as a single transaction: the target row is locked
/// with `FOR UPDATE`, dependents are counted, and the delete executes only if
/// the count is zero. A concurrent insert of a dependent row blocks on the
/// row lock (foreign-key inserts take a key-share lock on the referenced
/// row), so the check and the delete are atomic.
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
/// # Ok(())
/// # }
/// ```

pub mod area;
pub mod client;
pub mod company;
pub mod task;
pub mod user;
