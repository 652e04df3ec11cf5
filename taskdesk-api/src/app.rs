/// Application state and router builder
///
/// This module defines the shared application state and provides a function
/// to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use taskdesk_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = taskdesk_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::config::Config;
use axum::{
    extract::Request,
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{get, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use taskdesk_shared::auth::middleware::{
    admin_gate_middleware, jwt_auth_middleware, AuthError,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor. Uses Arc
/// internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        crate::error::set_production_mode(config.api.production);

        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET  /health              # Health check (public)
/// ├── POST /login               # Token issuance (public)
/// ├── POST /auth/refresh        # Access token refresh (public)
/// ├── POST /auth/register       # Create user (admin gate)
/// ├── /users                    # User administration (admin gate)
/// ├── /companies, /areas,       # Entity CRUD (token gate; mutations
/// │   /clients                  #   check the admin role in-handler)
/// └── /tasks                    # Task lifecycle (token gate, role-scoped)
/// ```
///
/// The token gate rejects before any handler runs; the admin gate is layered
/// inside it for the user-administration group. Entity mutations that share a
/// path with user-visible reads (`POST /companies` vs `GET /companies`)
/// enforce the admin role in the handler via
/// [`taskdesk_shared::auth::authorization::require_admin`] instead, since a
/// path can only carry one middleware stack.
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Public routes (no auth)
    let public_routes = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/login", post(routes::auth::login))
        .route("/auth/refresh", post(routes::auth::refresh));

    // Routes for any authenticated caller; task visibility and entity
    // mutations are scoped per-role inside the handlers
    let authenticated_routes = Router::new()
        .route(
            "/tasks",
            get(routes::tasks::list_tasks).post(routes::tasks::create_task),
        )
        .route(
            "/tasks/:id",
            get(routes::tasks::get_task)
                .put(routes::tasks::update_task)
                .delete(routes::tasks::delete_task),
        )
        .route(
            "/companies",
            get(routes::companies::list_companies).post(routes::companies::create_company),
        )
        .route(
            "/companies/:id",
            get(routes::companies::get_company)
                .put(routes::companies::update_company)
                .delete(routes::companies::delete_company),
        )
        .route(
            "/areas",
            get(routes::areas::list_areas).post(routes::areas::create_area),
        )
        .route(
            "/areas/:id",
            get(routes::areas::get_area)
                .put(routes::areas::update_area)
                .delete(routes::areas::delete_area),
        )
        .route(
            "/clients",
            get(routes::clients::list_clients).post(routes::clients::create_client),
        )
        .route(
            "/clients/:id",
            get(routes::clients::get_client)
                .put(routes::clients::update_client)
                .delete(routes::clients::delete_client),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    // User administration (admin gate on the whole group)
    let admin_routes = Router::new()
        .route("/auth/register", post(routes::auth::register))
        .route("/users", get(routes::users::list_users))
        .route(
            "/users/:id",
            put(routes::users::update_user).delete(routes::users::delete_user),
        )
        .layer(axum::middleware::from_fn(admin_gate_middleware))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        // Development mode: permissive CORS
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(public_routes)
        .merge(authenticated_routes)
        .merge(admin_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

/// JWT authentication middleware layer
///
/// Delegates to the shared token gate with this state's secret. The gate
/// validates the Bearer token and injects [`AuthContext`] into request
/// extensions; failure terminates the request with 401.
async fn jwt_auth_layer(
    state: axum::extract::State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    jwt_auth_middleware(state.jwt_secret().to_string(), req, next).await
}
