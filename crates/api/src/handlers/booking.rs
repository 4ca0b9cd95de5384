//! Handlers for the `/bookings` resource.
//!
//! Thin wrappers over [`crate::lifecycle`]; no transition logic lives
//! here.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use validator::Validate;

use agrirent_core::dates::DateRange;
use agrirent_core::error::CoreError;
use agrirent_core::types::{DbId, RentalDate};
use agrirent_db::models::booking::Booking;
use agrirent_db::models::receipt::Receipt;
use agrirent_db::repositories::{BookingRepo, ReceiptRepo};

use crate::error::{AppError, AppResult};
use crate::lifecycle::{self, BookingCreated, PaymentConfirmed};
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for creating a booking.
#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub equipment_id: DbId,
    pub renter_id: DbId,
    pub start_date: RentalDate,
    pub end_date: RentalDate,
}

/// Request body for the synchronous payment confirmation path.
#[derive(Debug, Deserialize, Validate)]
pub struct VerifyPaymentRequest {
    pub booking_id: DbId,
    #[validate(length(min = 1))]
    pub gateway_order_id: String,
    #[validate(length(min = 1))]
    pub gateway_payment_id: String,
    #[validate(length(min = 1))]
    pub signature: String,
}

/// POST /api/v1/bookings
///
/// Creates a booking and returns it together with the payment-session
/// configuration the client needs to collect payment.
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateBookingRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<BookingCreated>>)> {
    let range = DateRange::new(input.start_date, input.end_date)?;
    let created = lifecycle::create_booking(
        &state.pool,
        state.gateway.as_ref(),
        input.equipment_id,
        input.renter_id,
        range,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

/// POST /api/v1/bookings/verify-payment
///
/// Client-submitted payment proof; converges on the same transition as
/// the gateway webhook.
pub async fn verify_payment(
    State(state): State<AppState>,
    Json(input): Json<VerifyPaymentRequest>,
) -> AppResult<Json<DataResponse<PaymentConfirmed>>> {
    input.validate()?;
    let confirmed = lifecycle::confirm_payment(
        &state.pool,
        state.gateway.as_ref(),
        input.booking_id,
        &input.gateway_order_id,
        &input.gateway_payment_id,
        &input.signature,
    )
    .await?;
    Ok(Json(DataResponse { data: confirmed }))
}

/// GET /api/v1/bookings/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Booking>>> {
    let booking = BookingRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Booking",
            id,
        }))?;
    Ok(Json(DataResponse { data: booking }))
}

/// GET /api/v1/bookings/{id}/receipt
pub async fn get_receipt(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Receipt>>> {
    let receipt = ReceiptRepo::find_by_booking(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Receipt",
            id,
        }))?;
    Ok(Json(DataResponse { data: receipt }))
}
