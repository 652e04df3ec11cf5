/// Authentication middleware for Axum
///
/// Two gates are provided:
///
/// - [`jwt_auth_middleware`]: validates the `Authorization: Bearer <token>`
///   header and attaches an [`AuthContext`] to the request extensions. Every
///   protected route sits behind this gate; a missing or invalid token
///   terminates the request before any business logic runs.
/// - [`admin_gate_middleware`]: rejects with 403 unless the attached context
///   carries the admin role. Layered on top of the JWT gate for admin-only
///   route groups.
///
/// # Example
///
/// ```no_run
/// use axum::{middleware, routing::get, Extension, Router};
/// use taskdesk_shared::auth::middleware::{admin_gate_middleware, AuthContext};
///
/// async fn protected_handler(Extension(auth): Extension<AuthContext>) -> String {
///     format!("Hello, {}!", auth.name)
/// }
///
/// let admin_routes: Router = Router::new()
///     .route("/users", get(protected_handler))
///     .layer(middleware::from_fn(admin_gate_middleware));
/// ```

use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::jwt::{validate_access_token, Claims, JwtError};
use crate::models::user::UserRole;

/// Authentication context added to request extensions
///
/// Handlers extract it with Axum's `Extension` extractor. It is the decoded
/// token identity; no database lookup backs it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user ID
    pub user_id: Uuid,

    /// Caller role, used by the admin gate and task scoping
    pub role: UserRole,

    /// Display name from the token
    pub name: String,

    /// Email from the token
    pub email: String,
}

impl AuthContext {
    /// Creates auth context from validated JWT claims
    pub fn from_claims(claims: &Claims) -> Self {
        Self {
            user_id: claims.sub,
            role: claims.role,
            name: claims.name.clone(),
            email: claims.email.clone(),
        }
    }

    /// Whether the caller holds the admin role
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// Error type for authentication middleware
#[derive(Debug)]
pub enum AuthError {
    /// Missing authorization header
    MissingCredentials,

    /// Invalid authorization header format
    InvalidFormat(String),

    /// Token validation failed
    InvalidToken(String),

    /// Valid token, insufficient role
    InsufficientRole,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::MissingCredentials => {
                (StatusCode::UNAUTHORIZED, "Missing credentials".to_string())
            }
            AuthError::InvalidFormat(msg) => (StatusCode::UNAUTHORIZED, msg),
            AuthError::InvalidToken(msg) => (StatusCode::UNAUTHORIZED, msg),
            AuthError::InsufficientRole => (
                StatusCode::FORBIDDEN,
                "Administrator role required".to_string(),
            ),
        };

        (status, Json(serde_json::json!({ "message": message }))).into_response()
    }
}

/// JWT authentication middleware
///
/// Validates Bearer tokens from the `Authorization` header and attaches an
/// [`AuthContext`] on success. Failure is terminal for the request; the
/// handler chain is never entered.
///
/// # Errors
///
/// Returns 401 Unauthorized if the header is missing, the token format is
/// invalid, validation fails, or the token has expired.
pub async fn jwt_auth_middleware(
    secret: String,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))?;

    let claims = validate_access_token(token, &secret).map_err(|e| match e {
        JwtError::Expired => AuthError::InvalidToken("Token expired".to_string()),
        JwtError::InvalidIssuer => AuthError::InvalidToken("Invalid issuer".to_string()),
        _ => AuthError::InvalidToken(format!("Invalid token: {}", e)),
    })?;

    let auth_context = AuthContext::from_claims(&claims);
    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}

/// Admin role gate
///
/// Must be layered inside [`jwt_auth_middleware`] so the [`AuthContext`] is
/// already attached. Rejects with 403 unless the caller is an admin.
pub async fn admin_gate_middleware(req: Request, next: Next) -> Result<Response, AuthError> {
    let auth = req
        .extensions()
        .get::<AuthContext>()
        .ok_or(AuthError::MissingCredentials)?;

    if !auth.is_admin() {
        return Err(AuthError::InsufficientRole);
    }

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::TokenType;

    #[test]
    fn test_auth_context_from_claims() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(
            user_id,
            UserRole::Admin,
            "Admin".to_string(),
            "admin@example.com".to_string(),
            TokenType::Access,
        );

        let context = AuthContext::from_claims(&claims);

        assert_eq!(context.user_id, user_id);
        assert_eq!(context.role, UserRole::Admin);
        assert_eq!(context.name, "Admin");
        assert_eq!(context.email, "admin@example.com");
        assert!(context.is_admin());
    }

    #[test]
    fn test_regular_user_is_not_admin() {
        let claims = Claims::new(
            Uuid::new_v4(),
            UserRole::User,
            "User".to_string(),
            "user@example.com".to_string(),
            TokenType::Access,
        );

        assert!(!AuthContext::from_claims(&claims).is_admin());
    }

    #[test]
    fn test_auth_error_into_response() {
        let response = AuthError::MissingCredentials.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = AuthError::InvalidToken("expired".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = AuthError::InsufficientRole.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
