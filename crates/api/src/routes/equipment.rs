//! Route definitions for the `/equipment` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::equipment;
use crate::state::AppState;

/// Routes mounted at `/equipment`.
///
/// ```text
/// GET    /                     list (category / only_available filters)
/// POST   /                     create
/// GET    /{id}                 get_by_id
/// PUT    /{id}                 update
/// DELETE /{id}                 delete
/// GET    /{id}/availability    availability for a date range
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(equipment::list).post(equipment::create))
        .route(
            "/{id}",
            get(equipment::get_by_id)
                .put(equipment::update)
                .delete(equipment::delete),
        )
        .route("/{id}/availability", get(equipment::availability))
}
