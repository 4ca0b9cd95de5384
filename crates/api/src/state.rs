use std::sync::Arc;

use agrirent_gateway::PaymentGateway;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: agrirent_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Payment gateway adapter (Razorpay in production, mock in tests).
    pub gateway: Arc<dyn PaymentGateway>,
}
