//! Mock Payout Gateway - Main Application Entry Point
//!
//! REST API server simulating a payout provider: users hold a wallet, save
//! bank accounts and beneficiaries, and submit payouts that settle
//! asynchronously with a random outcome.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Database**: SQLite with sqlx (async queries)
//! - **Authentication**: HS256 JWT bearer tokens, Argon2 password hashes
//! - **Settlement**: background worker polling for due payouts
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Create database connection pool
//! 3. Run database migrations
//! 4. Seed the default test user
//! 5. Start the settlement worker
//! 6. Build HTTP router and serve until Ctrl-C / SIGTERM

use std::sync::Arc;

use mock_payout_gateway::{
    app, config, db,
    services::{
        auth_service::{self, JwtKeys},
        settlement::{RandomOracle, SettlementOracle, SettlementWorker},
    },
    state::AppState,
};
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with tracing subscriber. Reads RUST_LOG environment variable (defaults to "info" level)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // Load configuration
    let config = config::Config::from_env()?;
    tracing::info!("Configuration loaded");

    // Create database pool
    let pool = db::create_pool(&config.database_url, config.database_max_connections).await?;
    tracing::info!("Database pool created");

    // Run migrations
    db::run_migrations(&pool).await?;
    tracing::info!("Database migrations complete");

    if config.seed_default_user && auth_service::seed_default_user(&pool).await? {
        tracing::info!(
            email = auth_service::DEFAULT_USER_EMAIL,
            "Default test user created"
        );
    }

    let oracle: Arc<dyn SettlementOracle> = Arc::new(RandomOracle::default());

    // Settlement runs until the shutdown flag flips
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let worker = SettlementWorker::new(
        pool.clone(),
        oracle.clone(),
        config.settlement_poll_interval(),
    );
    let worker_handle = tokio::spawn(worker.run(shutdown_rx));

    let state = AppState::new(
        pool.clone(),
        JwtKeys::new(&config.jwt_secret, config.jwt_ttl_hours),
        oracle,
    );
    let router = app::build_router(state).layer(app::cors_layer(&config.cors_origin_list()));

    // Bind to network address and start server
    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutting down");
    shutdown_tx.send(true).ok();
    if let Err(e) = worker_handle.await {
        tracing::error!(error = %e, "settlement worker panicked");
    }
    pool.close().await;

    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
