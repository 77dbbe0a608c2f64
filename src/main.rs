//! FraudGuard - Main Application Entry Point
//!
//! REST API server that records transactions, screens them for fraud, and
//! lets reviewers approve or decline flagged ones.
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Create database connection pool
//! 3. Run database migrations
//! 4. Register the bootstrap admin key, if configured
//! 5. Load the fraud classifier, if configured
//! 6. Build HTTP router with routes and middleware
//! 7. Start server on configured port

use std::sync::Arc;

use anyhow::Context;
use fraudguard_server::{
    app, config, db,
    fraud::classifier::{FraudClassifier, LogisticModel},
    services::notification_service,
    state::AppState,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Reads RUST_LOG environment variable (defaults to "info" level)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = config::Config::from_env()?;
    tracing::info!("Configuration loaded");

    if let Some(url) = &config.alert_webhook_url {
        notification_service::validate_webhook_url(url).context("ALERT_WEBHOOK_URL")?;
    }
    url::Url::parse(&config.public_base_url).context("PUBLIC_BASE_URL")?;

    let pool = db::create_pool(&config.database_url).await?;
    tracing::info!("Database pool created");

    db::run_migrations(&pool).await?;
    tracing::info!("Database migrations complete");

    if let Some(admin_key) = &config.bootstrap_admin_key {
        db::ensure_admin_key(&pool, admin_key, &config.bootstrap_admin_name).await?;
        tracing::info!(admin = %config.bootstrap_admin_name, "Bootstrap admin key registered");
    }

    let classifier: Option<Arc<dyn FraudClassifier>> = match &config.model_path {
        Some(path) => {
            let model = LogisticModel::from_path(path)
                .with_context(|| format!("failed to load fraud model from {path}"))?;
            Some(Arc::new(model) as Arc<dyn FraudClassifier>)
        }
        None => {
            tracing::info!("MODEL_PATH not set, running with rules only");
            None
        }
    };

    let port = config.server_port;
    let state = AppState::new(pool, config, classifier)?;
    let app = app::router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
