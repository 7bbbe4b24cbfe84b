//! # CLI Server
//!
//! Server startup for the Hackforge CLI: connect, migrate, seed, then serve
//! HTTP until a shutdown signal arrives.

use std::net::SocketAddr;

use error::{AppError, Result};
use migration::{seeds::run_all_seeds, Migrator, MigratorTrait as _};
use server::{create_app_router, repository::provisioner_from_config, AppState};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::{
    commands::ServeArgs,
    config::{jwt_config_from_env, parse_socket_addr, repository_config_from_env, DatabaseConfig},
};

/// Starts the API server
pub async fn serve(config: &DatabaseConfig, args: &ServeArgs) -> Result<()> {
    info!(target: "serve", "Starting API server...");

    let jwt_config = jwt_config_from_env()?;
    jwt_config.validate()?;
    let repository_config = repository_config_from_env()?;
    let repositories = provisioner_from_config(&repository_config)?;
    info!(
        target: "serve",
        enabled = repository_config.function_url.is_some(),
        "Repository provisioner configured"
    );

    let address = parse_socket_addr(&args.host, args.port)
        .map_err(|e| AppError::config(format!("Invalid address {}:{}: {}", args.host, args.port, e)))?;

    info!(target: "serve", "Connecting to database...");
    let db = migration::connect_to_database(&config.database_url())
        .await
        .map_err(|e| AppError::database(format!("Failed to connect to database: {}", e)))?;

    // Run migrations automatically on startup
    info!(target: "serve", "Running database migrations...");
    Migrator::up(&db, None)
        .await
        .map_err(|e| AppError::migration(format!("Failed to run database migrations: {}", e)))?;
    info!(target: "serve", "Database migrations completed successfully");

    for result in run_all_seeds(&db, false).await? {
        if !result.errors.is_empty() {
            warn!(target: "serve", seed = %result.seed_name, errors = ?result.errors, "Seed reported errors");
        }
    }

    let state = AppState::new(db, jwt_config, repositories);
    let app = create_app_router(state);

    serve_http(app, address).await
}

async fn serve_http(app: axum::Router, address: SocketAddr) -> Result<()> {
    let listener = TcpListener::bind(address)
        .await
        .map_err(|e| AppError::config(format!("Failed to bind to {}: {}", address, e)))?;

    info!(target: "serve", %address, "Starting HTTP server...");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!(target: "serve", "Server stopped");
    Ok(())
}

/// Waits for shutdown signals (Ctrl+C or SIGTERM)
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(target: "serve", error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                warn!(target: "serve", error = %e, "Failed to install terminate handler");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!(target: "serve", "Shutdown signal received");
}
