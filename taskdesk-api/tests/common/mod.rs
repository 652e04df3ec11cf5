/// Common test utilities for integration tests
///
/// Provides shared infrastructure:
/// - Test database setup (skipped gracefully when DATABASE_URL is unset)
/// - Test user creation and JWT token generation
/// - Request/response helpers for driving the router

use axum::body::Body;
use axum::http::{header, Request, Response};
use axum::Router;
use sqlx::PgPool;
use taskdesk_api::app::{build_router, AppState};
use taskdesk_api::config::{AdminConfig, ApiConfig, Config, DatabaseConfig, JwtConfig};
use taskdesk_shared::auth::jwt::{create_token, Claims, TokenType};
use taskdesk_shared::auth::password::hash_password;
use taskdesk_shared::models::user::{CreateUser, User, UserRole};
use uuid::Uuid;

/// Secret used for all test tokens
pub const TEST_JWT_SECRET: &str = "test-secret-key-at-least-32-bytes-long";

/// Fixed email of the protected administrator in tests
pub const PROTECTED_ADMIN_EMAIL: &str = "admin@taskdesk.local";

/// Builds a config pointing at the given database URL
pub fn test_config(database_url: &str) -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec!["*".to_string()],
            production: false,
        },
        database: DatabaseConfig {
            url: database_url.to_string(),
            max_connections: 5,
        },
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
        },
        admin: AdminConfig {
            email: PROTECTED_ADMIN_EMAIL.to_string(),
            name: "System Administrator".to_string(),
            password: "ChangeMe123!".to_string(),
        },
    }
}

/// Creates a signed access token for a user
pub fn token_for(user: &User) -> String {
    let claims = Claims::new(
        user.id,
        user.role,
        user.name.clone(),
        user.email.clone(),
        TokenType::Access,
    );
    create_token(&claims, TEST_JWT_SECRET).expect("token creation should succeed")
}

/// Test context containing the router, pool, and pre-created users
pub struct TestContext {
    pub db: PgPool,
    pub app: Router,
    pub admin: User,
    pub admin_token: String,
    pub user: User,
    pub user_token: String,
}

impl TestContext {
    /// Creates a new test context against the DATABASE_URL database
    ///
    /// Returns None when DATABASE_URL is unset so DB-bound tests can skip
    /// instead of failing on machines without Postgres.
    pub async fn new() -> Option<Self> {
        let url = match std::env::var("DATABASE_URL") {
            Ok(url) => url,
            Err(_) => {
                eprintln!("DATABASE_URL not set; skipping database-backed test");
                return None;
            }
        };

        let db = PgPool::connect(&url).await.expect("database should connect");

        // Migrations are idempotent; concurrent test binaries serialize on
        // sqlx's advisory lock
        sqlx::migrate!("../migrations")
            .run(&db)
            .await
            .expect("migrations should run");

        let config = test_config(&url);

        // Protected admin for the delete-guard tests
        let protected_hash = hash_password(&config.admin.password).unwrap();
        User::ensure_protected_admin(
            &db,
            &config.admin.email,
            &config.admin.name,
            &protected_hash,
        )
        .await
        .expect("protected admin bootstrap should succeed");

        // Per-context admin and regular user with unique emails
        let admin = User::create(
            &db,
            CreateUser {
                name: "Test Admin".to_string(),
                email: format!("admin-{}@example.com", Uuid::new_v4()),
                password_hash: hash_password("AdminP@ss1").unwrap(),
                role: UserRole::Admin,
            },
        )
        .await
        .expect("admin creation should succeed");

        let user = User::create(
            &db,
            CreateUser {
                name: "Test User".to_string(),
                email: format!("user-{}@example.com", Uuid::new_v4()),
                password_hash: hash_password("UserP@ss1").unwrap(),
                role: UserRole::User,
            },
        )
        .await
        .expect("user creation should succeed");

        let admin_token = token_for(&admin);
        let user_token = token_for(&user);

        let state = AppState::new(db.clone(), config);
        let app = build_router(state);

        Some(Self {
            db,
            app,
            admin,
            admin_token,
            user,
            user_token,
        })
    }
}

/// Builds a JSON request with an optional bearer token
pub fn json_request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    let body = match body {
        Some(json) => Body::from(json.to_string()),
        None => Body::empty(),
    };

    builder.body(body).expect("request should build")
}

/// Reads a response body as JSON
pub async fn response_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should read");
    serde_json::from_slice(&bytes).expect("body should be JSON")
}
