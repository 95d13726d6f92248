//! Bounded Ledger - Main Application Entry Point
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Build the account store (PostgreSQL if `DATABASE_URL` is set,
//!    in-memory reference accounts otherwise)
//! 3. Build HTTP router around the ledger service
//! 4. Serve until Ctrl-C

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use bounded_ledger::{
    config::Config,
    db,
    routes::create_router,
    services::ledger_service::LedgerService,
    store::{AccountStore, memory::MemoryAccountStore, postgres::PgAccountStore},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG, defaulting to "info"
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env()?;
    tracing::info!(
        port = config.server_port,
        postgres = config.database_url.is_some(),
        "Configuration loaded"
    );

    let store: Arc<dyn AccountStore> = match config.database_url.as_deref() {
        Some(url) => {
            let pool = db::create_pool(url, config.database_max_connections).await?;
            tracing::info!(
                max_connections = config.database_max_connections,
                "Database pool created"
            );

            db::run_migrations(&pool).await?;
            tracing::info!("Database migrations complete");

            Arc::new(PgAccountStore::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory store with reference accounts");
            Arc::new(MemoryAccountStore::with_reference_accounts())
        }
    };

    let app = create_router(LedgerService::new(store));

    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        // Keep serving rather than stopping immediately
        std::future::pending::<()>().await;
    }
}
