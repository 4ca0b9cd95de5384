//! Route definitions for the `/bookings` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::booking;
use crate::state::AppState;

/// Routes mounted at `/bookings`.
///
/// ```text
/// POST   /                   create (reserves slot + payment session)
/// POST   /verify-payment     confirm via client-submitted proof
/// GET    /{id}               get_by_id
/// GET    /{id}/receipt       receipt for a paid booking
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(booking::create))
        .route("/verify-payment", post(booking::verify_payment))
        .route("/{id}", get(booking::get_by_id))
        .route("/{id}/receipt", get(booking::get_receipt))
}
