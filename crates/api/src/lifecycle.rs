//! Booking lifecycle orchestration.
//!
//! Every status transition in the system goes through this module: the
//! synchronous `POST /bookings/verify-payment` path, the asynchronous
//! gateway webhook, and the background reconciliation task all call the
//! same functions, so the two trust paths cannot diverge.
//!
//! Creation works in two phases. Phase one is a single database
//! transaction that row-locks the equipment, re-checks the interval
//! overlap, inserts the `pending` booking, and flips `available` with an
//! atomic conditional update -- the second of two racing creates either
//! blocks on the row lock and then sees the flag down, or loses the
//! conditional update outright. Phase two calls the gateway; any failure
//! after the commit, including internal ones, runs the rollback that
//! releases the equipment and fails the booking, so callers never observe
//! a locked listing without a live booking behind it.

use chrono::Utc;
use serde::Serialize;
use sqlx::PgPool;

use agrirent_core::booking::BookingStatus;
use agrirent_core::dates::DateRange;
use agrirent_core::error::CoreError;
use agrirent_core::types::DbId;
use agrirent_db::models::booking::{Booking, CreateBooking};
use agrirent_db::models::receipt::{CreateReceipt, Receipt};
use agrirent_db::repositories::{BookingRepo, EquipmentRepo, ReceiptRepo};
use agrirent_gateway::{PaymentGateway, PaymentSession};

use crate::error::{AppError, AppResult};

/// Payment method recorded on receipts. All payments go through the
/// online gateway today.
const PAYMENT_METHOD: &str = "online";

/// Result of a successful booking creation: the persisted booking plus
/// the checkout configuration the client needs to collect payment.
#[derive(Debug, Serialize)]
pub struct BookingCreated {
    pub booking: Booking,
    pub payment: PaymentSession,
}

/// Result of a confirmed payment.
#[derive(Debug, Serialize)]
pub struct PaymentConfirmed {
    pub booking: Booking,
    pub receipt: Receipt,
}

/// Create a booking and request a payment session for it.
///
/// On success the booking is in `awaiting_payment` and the equipment is
/// locked. On gateway failure the booking ends `payment_failed` and the
/// equipment is released; the error is still returned to the caller.
pub async fn create_booking(
    pool: &PgPool,
    gateway: &dyn PaymentGateway,
    equipment_id: DbId,
    renter_id: DbId,
    range: DateRange,
) -> AppResult<BookingCreated> {
    let today = Utc::now().date_naive();
    if range.start < today {
        return Err(CoreError::Validation(format!(
            "start date {} is in the past",
            range.start
        ))
        .into());
    }

    // Phase one: reserve the slot transactionally.
    let mut tx = pool.begin().await.map_err(AppError::Database)?;

    let equipment = EquipmentRepo::find_by_id_for_update(&mut tx, equipment_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Equipment",
            id: equipment_id,
        })?;

    if !equipment.available {
        return Err(CoreError::Unavailable(format!(
            "equipment {equipment_id} is already booked"
        ))
        .into());
    }

    let conflicts = BookingRepo::find_conflicts_in_tx(&mut tx, equipment_id, &range).await?;
    if let Some(conflict) = conflicts.first() {
        return Err(CoreError::Unavailable(format!(
            "requested range {range} overlaps booking {} ({}..{})",
            conflict.id, conflict.start_date, conflict.end_date
        ))
        .into());
    }

    let total = equipment
        .daily_rate_paise
        .checked_mul_days(range.inclusive_days())?;

    let booking = BookingRepo::create(
        &mut tx,
        &CreateBooking {
            equipment_id,
            renter_id,
            start_date: range.start,
            end_date: range.end,
            total_paise: total,
        },
    )
    .await?;

    // The race arbiter: exactly one concurrent create can flip the flag.
    if !EquipmentRepo::try_lock(&mut tx, equipment_id).await? {
        return Err(CoreError::Unavailable(format!(
            "equipment {equipment_id} was booked concurrently"
        ))
        .into());
    }

    tx.commit().await.map_err(AppError::Database)?;

    tracing::info!(
        booking_id = booking.id,
        equipment_id,
        renter_id,
        total = %total,
        range = %range,
        "Booking created, requesting payment session"
    );

    // Phase two: payment session. Everything from here on must roll back
    // the slot reservation on failure.
    let reference = format!("booking-{}", booking.id);
    let session = match gateway.create_session(total, &reference).await {
        Ok(session) => session,
        Err(e) => {
            tracing::warn!(
                booking_id = booking.id,
                equipment_id,
                error = %e,
                "Payment session creation failed, rolling back reservation"
            );
            roll_back_reservation(pool, booking.id, equipment_id).await;
            return Err(e.into());
        }
    };

    let booking = match BookingRepo::mark_awaiting_payment(pool, booking.id, &session.order_id)
        .await
    {
        Ok(Some(updated)) => updated,
        Ok(None) => {
            // Someone else moved the booking off `pending` between commit
            // and now; treat as an internal inconsistency and roll back.
            roll_back_reservation(pool, booking.id, equipment_id).await;
            return Err(AppError::InternalError(format!(
                "booking {} left pending state unexpectedly",
                booking.id
            )));
        }
        Err(e) => {
            roll_back_reservation(pool, booking.id, equipment_id).await;
            return Err(e.into());
        }
    };

    Ok(BookingCreated {
        booking,
        payment: session,
    })
}

/// Confirm a payment from a client-submitted proof.
///
/// Verifies the proof's signature and order reference, then applies the
/// `awaiting_payment -> paid` transition via [`apply_captured_payment`].
pub async fn confirm_payment(
    pool: &PgPool,
    gateway: &dyn PaymentGateway,
    booking_id: DbId,
    order_id: &str,
    payment_id: &str,
    signature: &str,
) -> AppResult<PaymentConfirmed> {
    let booking = BookingRepo::find_by_id(pool, booking_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Booking",
            id: booking_id,
        })?;

    if booking.gateway_order_id.as_deref() != Some(order_id) {
        return Err(AppError::BadRequest(format!(
            "order id does not match booking {booking_id}"
        )));
    }

    if !gateway.verify_payment_signature(order_id, payment_id, signature) {
        tracing::warn!(booking_id, order_id, "Rejected payment proof with bad signature");
        return Err(CoreError::InvalidSignature.into());
    }

    apply_captured_payment(pool, booking, payment_id).await
}

/// Apply a verified payment capture to a booking.
///
/// Both confirmation entry points (client proof and webhook) converge
/// here after authenticating their input. Idempotent: confirming an
/// already-`paid` booking with the same payment ID returns the existing
/// receipt; a different payment ID is a conflict.
pub async fn apply_captured_payment(
    pool: &PgPool,
    booking: Booking,
    payment_id: &str,
) -> AppResult<PaymentConfirmed> {
    if booking.status == BookingStatus::Paid {
        return confirmed_idempotently(pool, booking, payment_id).await;
    }

    let paid = match BookingRepo::mark_paid(pool, booking.id, payment_id).await? {
        Some(updated) => updated,
        None => {
            // Lost a race or the booking is in the wrong state. Refetch
            // to distinguish a duplicate confirm from a real conflict.
            let current = BookingRepo::find_by_id(pool, booking.id)
                .await?
                .ok_or(CoreError::NotFound {
                    entity: "Booking",
                    id: booking.id,
                })?;
            if current.status == BookingStatus::Paid {
                return confirmed_idempotently(pool, current, payment_id).await;
            }
            return Err(CoreError::InvalidTransition {
                from: current.status,
                to: BookingStatus::Paid,
            }
            .into());
        }
    };

    tracing::info!(
        booking_id = paid.id,
        equipment_id = paid.equipment_id,
        payment_id,
        amount = %paid.total_paise,
        "Payment captured, booking paid"
    );

    let receipt = generate_receipt(pool, &paid).await?;
    Ok(PaymentConfirmed {
        booking: paid,
        receipt,
    })
}

/// Handle a confirm for a booking that is already `paid`.
async fn confirmed_idempotently(
    pool: &PgPool,
    booking: Booking,
    payment_id: &str,
) -> AppResult<PaymentConfirmed> {
    if booking.gateway_payment_id.as_deref() != Some(payment_id) {
        return Err(CoreError::InvalidTransition {
            from: BookingStatus::Paid,
            to: BookingStatus::Paid,
        }
        .into());
    }
    tracing::debug!(booking_id = booking.id, "Duplicate confirm, returning existing receipt");
    // Receipt generation is idempotent, so this also repairs the rare
    // case where the booking was marked paid but the receipt insert
    // never happened.
    let receipt = generate_receipt(pool, &booking).await?;
    Ok(PaymentConfirmed { booking, receipt })
}

/// Record a payment failure: fail the booking and release its equipment.
///
/// Returns `Ok(true)` when the transition actually happened and
/// `Ok(false)` when the booking was already terminal, which makes
/// duplicate failure webhooks and reconciliation races harmless. The
/// conditional `mark_failed` guards the release: equipment is only
/// released by the call that actually performed the transition.
pub async fn fail_payment(pool: &PgPool, booking: &Booking) -> AppResult<bool> {
    match BookingRepo::mark_failed(pool, booking.id).await? {
        Some(failed) => {
            EquipmentRepo::release(pool, failed.equipment_id).await?;
            tracing::info!(
                booking_id = failed.id,
                equipment_id = failed.equipment_id,
                "Booking failed, equipment released"
            );
            Ok(true)
        }
        None => {
            tracing::debug!(
                booking_id = booking.id,
                status = %booking.status,
                "Ignoring failure for terminal booking"
            );
            Ok(false)
        }
    }
}

/// Generate (or fetch) the receipt for a paid booking.
///
/// The amount is copied verbatim from `booking.total_paise` so receipt
/// and booking can never disagree on the charged total.
async fn generate_receipt(pool: &PgPool, booking: &Booking) -> AppResult<Receipt> {
    let equipment = EquipmentRepo::find_by_id(pool, booking.equipment_id)
        .await?
        .ok_or_else(|| {
            AppError::InternalError(format!(
                "equipment {} missing for paid booking {}",
                booking.equipment_id, booking.id
            ))
        })?;

    let receipt = ReceiptRepo::create(
        pool,
        &CreateReceipt {
            booking_id: booking.id,
            renter_id: booking.renter_id,
            amount_paise: booking.total_paise,
            status: booking.status.as_str().to_string(),
            equipment_name: equipment.name,
            start_date: booking.start_date,
            end_date: booking.end_date,
            payment_method: PAYMENT_METHOD.to_string(),
        },
    )
    .await?;

    Ok(receipt)
}

/// Best-effort rollback after the reservation committed but the payment
/// session could not be established.
///
/// Failures here are logged with both IDs for manual reconciliation; the
/// background task will also pick up any booking left in `pending`.
async fn roll_back_reservation(pool: &PgPool, booking_id: DbId, equipment_id: DbId) {
    if let Err(e) = BookingRepo::mark_failed(pool, booking_id).await {
        tracing::error!(
            booking_id,
            equipment_id,
            error = %e,
            "Rollback could not fail booking"
        );
    }
    if let Err(e) = EquipmentRepo::release(pool, equipment_id).await {
        tracing::error!(
            booking_id,
            equipment_id,
            error = %e,
            "Rollback could not release equipment"
        );
    }
}
