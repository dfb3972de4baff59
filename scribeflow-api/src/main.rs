//! # ScribeFlow API Server
//!
//! Binary entry point: loads configuration, wires the store adapters and
//! stage collaborators, and serves the axum router.
//!
//! Missing persistence or signing configuration does not abort startup —
//! the affected routes answer `503` until the environment provides them.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p scribeflow-api
//! ```

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use scribeflow_api::app::{build_router, AppState, Stores};
use scribeflow_api::config::Config;
use scribeflow_pipeline::stages::extract::HttpExtractor;
use scribeflow_pipeline::stages::generate::GeminiGenerator;
use scribeflow_pipeline::stages::images::UnsplashFetcher;
use scribeflow_shared::db::pool::{create_pool, DatabaseConfig};
use scribeflow_shared::store::postgres::{
    run_migrations, PgArtifactStore, PgAuditStore, PgCredentialStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scribeflow_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    tracing::info!(
        "ScribeFlow API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );
    tracing::info!(
        environment = %config.api.app_env,
        model = %config.generator.model,
        "Configuration loaded"
    );

    if config.generator.api_key.is_empty() {
        tracing::warn!("GEMINI_API_KEY is not set; article generation will fail");
    }

    let stores = build_stores(&config).await;
    if stores.is_none() {
        tracing::warn!("Persistent storage unavailable; auth and store routes will return 503");
    }
    if config.auth.is_none() {
        tracing::warn!("JWT_SECRET is not set; authenticated routes will return 503");
    }

    let timeout = Duration::from_secs(config.limits.request_timeout_seconds);
    let extractor = Arc::new(HttpExtractor::new(timeout, config.limits.max_content_length));
    let generator = Arc::new(GeminiGenerator::new(
        config.generator.api_key.clone(),
        config.generator.model.clone(),
        timeout,
    ));
    let images = Arc::new(UnsplashFetcher::new(config.images.access_key.clone(), timeout));

    let bind_address = config.bind_address();
    let state = AppState::new(config, stores, extractor, generator, images);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Connects the Postgres-backed stores, degrading to `None` on failure
async fn build_stores(config: &Config) -> Option<Stores> {
    let database = config.database.as_ref()?;

    let pool = match create_pool(DatabaseConfig {
        url: database.url.clone(),
        max_connections: database.max_connections,
        ..Default::default()
    })
    .await
    {
        Ok(pool) => pool,
        Err(e) => {
            tracing::warn!(error = %e, "Database connection failed");
            return None;
        }
    };

    if let Err(e) = run_migrations(&pool).await {
        tracing::warn!(error = %e, "Database migration failed");
        return None;
    }

    Some(Stores {
        users: Arc::new(PgCredentialStore::new(pool.clone())),
        audit: Arc::new(PgAuditStore::new(pool.clone())),
        artifacts: Arc::new(PgArtifactStore::new(pool)),
    })
}
