/// Authentication and authorization utilities
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and strength validation
/// - [`jwt`]: JWT token generation and validation
/// - [`middleware`]: Axum middleware that turns a Bearer token into an
///   [`middleware::AuthContext`] and gates admin-only routes
/// - [`authorization`]: Role and ownership checks used by route handlers
///
/// # Example
///
/// ```no_run
/// use taskdesk_shared::auth::password::{hash_password, verify_password};
/// use taskdesk_shared::auth::jwt::{create_token, Claims, TokenType};
/// use taskdesk_shared::models::user::UserRole;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let claims = Claims::new(
///     Uuid::new_v4(),
///     UserRole::User,
///     "Jane Doe".to_string(),
///     "jane@example.com".to_string(),
///     TokenType::Access,
/// );
/// let token = create_token(&claims, "secret-key-at-least-32-bytes-long!!")?;
/// # Ok(())
/// # }
/// ```

pub mod authorization;
pub mod jwt;
pub mod middleware;
pub mod password;
