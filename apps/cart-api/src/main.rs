//! Cart API entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use cart_api::config::CartConfig;
use cart_api::engine::CartEngine;
use cart_api::events::RedisEventPublisher;
use cart_api::routes::{self, AppState};
use mercato_auth::{ClaimsCodec, TokenValidator};
use mercato_db::Database;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("Starting Mercato cart API...");

    // Load configuration
    let config = CartConfig::load()?;
    info!(port = config.http_port, "Configuration loaded");

    // Connect to database
    let db = Database::connect(&config.database_url).await?;
    info!("Connected to PostgreSQL");

    // Run migrations
    db.run_migrations().await?;

    // Connect the event channel
    let publisher = RedisEventPublisher::connect(&config.redis_url).await?;

    // Build the token validator from process-wide, immutable configuration.
    // The secret MUST match identity-api's or every token is rejected here.
    let validator = TokenValidator::new(ClaimsCodec::new(&config.jwt_secret));

    let state = Arc::new(AppState {
        engine: CartEngine::new(db.carts(), publisher),
        validator,
    });

    // Start server
    let addr: SocketAddr = format!("0.0.0.0:{}", config.http_port).parse()?;
    info!(%addr, "Starting HTTP server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, routes::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
