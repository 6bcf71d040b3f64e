//! Field Operations Core - API Server Binary
//!
//! # Usage
//!
//! ```bash
//! API_DATABASE_URL=postgres://... API_JWT_SECRET=... cargo run --bin fieldops-api
//! ```
//!
//! # Environment Variables
//!
//! * `API_HOST` - Server host (default: 0.0.0.0)
//! * `API_PORT` - Server port (default: 8080)
//! * `API_JWT_SECRET` - JWT signing secret (required in production)
//! * `API_JWT_EXPIRATION_SECS` - JWT token expiration in seconds (default: 3600)
//! * `API_DATABASE_URL` - PostgreSQL connection string
//! * `API_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)
//! * `API_ALLOWED_ORIGIN` - The browser origin allowed by CORS
//! * `API_PRINT_SERVICE_URL` - HTML to PDF endpoint used for invoices
//! * `API_STORAGE_ROOT` - Directory holding generated invoice PDFs
//! * `API_CURRENCY` - ISO currency code for all prices (default: USD)
//! * `API_TIMEZONE` - IANA timezone for calendar days (default: UTC)

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use domain_billing::{LocalFsDocumentStore, PrintServiceConfig, PrintServiceRenderer};
use infra_db::{
    create_pool, run_migrations, DatabaseConfig, PostgresCatalogAdapter, PostgresDriverLogAdapter,
    PostgresInvoiceAdapter, PostgresOrderAdapter, PostgresUserAdapter,
};
use interface_api::{config::ApiConfig, create_router, AppState, Backends};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = ApiConfig::from_env().context("Failed to load API configuration")?;

    init_tracing(&config.log_level);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        "Starting Field Operations Core API Server"
    );

    let db_config = DatabaseConfig::new(config.database_url.clone());
    tracing::info!(url = %db_config.redacted_url(), "Connecting to database");
    let pool = create_pool(db_config).await.context("Failed to connect to database")?;
    run_migrations(&pool).await.context("Failed to run migrations")?;

    let renderer = PrintServiceRenderer::new(
        PrintServiceConfig::new(config.print_service_url.clone()).with_timeout(config.print_service_timeout()),
    )
    .context("Failed to build print service client")?;

    let backends = Backends {
        catalog: Arc::new(PostgresCatalogAdapter::new(pool.clone())),
        users: Arc::new(PostgresUserAdapter::new(pool.clone())),
        orders: Arc::new(PostgresOrderAdapter::new(pool.clone())),
        logs: Arc::new(PostgresDriverLogAdapter::new(pool.clone())),
        invoices: Arc::new(PostgresInvoiceAdapter::new(pool)),
        renderer: Arc::new(renderer),
        documents: Arc::new(LocalFsDocumentStore::new(config.storage_root.clone())),
    };

    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .context("Invalid server address")?;
    let state = AppState::new(config, backends).context("Invalid API configuration")?;
    let app = create_router(state);

    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Waits for Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
