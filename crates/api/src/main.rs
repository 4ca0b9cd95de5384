//! AgriRent API server entrypoint.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agrirent_api::background;
use agrirent_api::config::ServerConfig;
use agrirent_api::router::build_app_router;
use agrirent_api::state::AppState;
use agrirent_gateway::razorpay::{RazorpayConfig, RazorpayGateway};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "agrirent_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env();
    let pool = connect_database().await;

    let gateway = Arc::new(RazorpayGateway::new(RazorpayConfig::from_env()));

    // Reconciliation runs for the lifetime of the server and is cancelled
    // during graceful shutdown.
    let reconcile_cancel = CancellationToken::new();
    let reconcile_handle = tokio::spawn(background::reconciliation::run(
        pool.clone(),
        reconcile_cancel.clone(),
    ));

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        gateway,
    };
    let app = build_app_router(state, &config);

    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");
    tracing::info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Stopped accepting connections, draining background tasks");
    reconcile_cancel.cancel();
    let _ = tokio::time::timeout(
        Duration::from_secs(config.shutdown_timeout_secs),
        reconcile_handle,
    )
    .await;
    tracing::info!("Shutdown complete");
}

/// Connect to PostgreSQL, verify the connection, and apply migrations.
/// Startup aborts on any failure; there is nothing useful the server can
/// do without its database.
async fn connect_database() -> agrirent_db::DbPool {
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = agrirent_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");

    agrirent_db::health_check(&pool)
        .await
        .expect("Database health check failed");

    agrirent_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("Database ready, migrations applied");
    pool
}

/// Resolve on SIGINT or SIGTERM, whichever arrives first.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received SIGINT, shutting down"),
        () = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
