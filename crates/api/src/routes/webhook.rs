//! Route definitions for inbound webhooks.

use axum::routing::post;
use axum::Router;

use crate::handlers::webhook;
use crate::state::AppState;

/// Routes mounted at `/webhooks`.
///
/// ```text
/// POST   /payment-gateway    gateway callback (HMAC-verified)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/payment-gateway", post(webhook::payment_gateway))
}
