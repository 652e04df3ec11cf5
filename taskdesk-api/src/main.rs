//! # Taskdesk API Server
//!
//! REST backend for the Taskdesk task-assignment application:
//! administrators manage users, companies, areas, and clients, and assign
//! tasks scoped to a company/area; regular users see and update their own
//! assigned tasks.
//!
//! ## Startup sequence
//!
//! 1. Initialize tracing
//! 2. Load configuration from the environment
//! 3. Create the database pool and run migrations
//! 4. Bootstrap the protected administrator account
//! 5. Serve the Axum router
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p taskdesk-api
//! ```

use taskdesk_api::{
    app::{build_router, AppState},
    config::Config,
};
use taskdesk_shared::{
    auth::password,
    db::{migrations, pool},
    models::user::User,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskdesk_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Taskdesk API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    let db = pool::create_pool(pool::DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await?;

    migrations::run_migrations(&db).await?;

    // The protected administrator must exist before the first login
    let admin_hash = password::hash_password(&config.admin.password)
        .map_err(|e| anyhow::anyhow!("Failed to hash admin password: {}", e))?;
    User::ensure_protected_admin(&db, &config.admin.email, &config.admin.name, &admin_hash)
        .await?;

    let bind_address = config.bind_address();
    let state = AppState::new(db.clone(), config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app).await?;

    pool::close_pool(db).await;

    Ok(())
}
