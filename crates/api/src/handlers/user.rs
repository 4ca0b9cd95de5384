//! Handlers for the `/users` resource.
//!
//! Authentication is external to this service; users exist to satisfy
//! owner/renter references and to let renters list their bookings and
//! receipts.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use validator::Validate;

use agrirent_core::error::CoreError;
use agrirent_core::types::DbId;
use agrirent_db::models::booking::Booking;
use agrirent_db::models::receipt::Receipt;
use agrirent_db::models::user::{CreateUser, User};
use agrirent_db::repositories::{BookingRepo, ReceiptRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for creating a user.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    pub phone: Option<String>,
}

/// POST /api/v1/users
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<User>>)> {
    input.validate()?;
    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            name: input.name,
            email: input.email,
            phone: input.phone,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: user })))
}

/// GET /api/v1/users/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<User>>> {
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;
    Ok(Json(DataResponse { data: user }))
}

/// GET /api/v1/users/{id}/bookings
pub async fn list_bookings(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Booking>>>> {
    let bookings = BookingRepo::list_by_renter(&state.pool, id).await?;
    Ok(Json(DataResponse { data: bookings }))
}

/// GET /api/v1/users/{id}/receipts
pub async fn list_receipts(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Receipt>>>> {
    let receipts = ReceiptRepo::list_by_renter(&state.pool, id).await?;
    Ok(Json(DataResponse { data: receipts }))
}
