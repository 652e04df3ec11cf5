/// Authorization helpers for route handlers
///
/// The middleware gates in [`super::middleware`] cover whole route groups;
/// the checks here cover the per-resource decisions inside a handler, such as
/// "a regular user may only touch their own task".
///
/// # Example
///
/// ```
/// use taskdesk_shared::auth::authorization::require_self_or_admin;
/// use taskdesk_shared::auth::middleware::AuthContext;
/// use uuid::Uuid;
///
/// # fn example(auth: &AuthContext, task_owner: Uuid) -> Result<(), Box<dyn std::error::Error>> {
/// // Admins pass for any owner; users only for themselves
/// require_self_or_admin(auth, task_owner)?;
/// # Ok(())
/// # }
/// ```

use uuid::Uuid;

use super::middleware::AuthContext;

/// Error type for authorization checks
#[derive(Debug, thiserror::Error)]
pub enum AuthzError {
    /// Caller lacks the admin role
    #[error("Administrator role required")]
    AdminRequired,

    /// Caller is neither the resource owner nor an admin
    #[error("Not authorized to access this resource")]
    NotAuthorized,
}

/// Requires the caller to hold the admin role
pub fn require_admin(auth: &AuthContext) -> Result<(), AuthzError> {
    if !auth.is_admin() {
        return Err(AuthzError::AdminRequired);
    }

    Ok(())
}

/// Requires the caller to be the resource owner or an admin
///
/// This is the task-scoping rule: admins reach every task, regular users only
/// the ones assigned to them.
pub fn require_self_or_admin(auth: &AuthContext, owner_id: Uuid) -> Result<(), AuthzError> {
    if auth.is_admin() || auth.user_id == owner_id {
        return Ok(());
    }

    Err(AuthzError::NotAuthorized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::{Claims, TokenType};
    use crate::models::user::UserRole;

    fn context(role: UserRole) -> AuthContext {
        AuthContext::from_claims(&Claims::new(
            Uuid::new_v4(),
            role,
            "Test".to_string(),
            "test@example.com".to_string(),
            TokenType::Access,
        ))
    }

    #[test]
    fn test_require_admin() {
        assert!(require_admin(&context(UserRole::Admin)).is_ok());
        assert!(require_admin(&context(UserRole::User)).is_err());
    }

    #[test]
    fn test_require_self_or_admin() {
        let user = context(UserRole::User);

        // Own resource passes
        assert!(require_self_or_admin(&user, user.user_id).is_ok());

        // Someone else's resource is rejected
        assert!(require_self_or_admin(&user, Uuid::new_v4()).is_err());

        // Admins pass for any owner
        let admin = context(UserRole::Admin);
        assert!(require_self_or_admin(&admin, Uuid::new_v4()).is_ok());
    }
}
