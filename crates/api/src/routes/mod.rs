pub mod booking;
pub mod equipment;
pub mod health;
pub mod user;
pub mod webhook;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /users                                   create
/// /users/{id}                              get
/// /users/{id}/bookings                     renter's bookings
/// /users/{id}/receipts                     renter's receipts
///
/// /equipment                               list, create
/// /equipment/{id}                          get, update, delete
/// /equipment/{id}/availability             date-range availability check
///
/// /bookings                                create (+ payment session)
/// /bookings/verify-payment                 client payment proof
/// /bookings/{id}                           get
/// /bookings/{id}/receipt                   receipt for a paid booking
///
/// /webhooks/payment-gateway                gateway callback (HMAC-gated)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/users", user::router())
        .nest("/equipment", equipment::router())
        .nest("/bookings", booking::router())
        .nest("/webhooks", webhook::router())
}
