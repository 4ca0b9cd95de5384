//! Route definitions for the `/users` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::user;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// POST   /                 create
/// GET    /{id}             get_by_id
/// GET    /{id}/bookings    list_bookings
/// GET    /{id}/receipts    list_receipts
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(user::create))
        .route("/{id}", get(user::get_by_id))
        .route("/{id}/bookings", get(user::list_bookings))
        .route("/{id}/receipts", get(user::list_receipts))
}
